//! Cancellation and deadline context passed to every operation.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{MuxError, MuxResult};

/// Cancellation token plus an optional deadline.
///
/// Cloning is cheap; clones share the same token. [`Context::child`] derives a context
/// that is cancelled together with its parent but can also be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context bound to an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derive a child context with the given timeout from now.
    ///
    /// The earlier of the parent's deadline and the new one wins.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a child context with an absolute deadline.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Derive a child context that can be cancelled independently.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline, if one is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Return an error if the context is already cancelled or expired.
    pub fn check(&self) -> MuxResult<()> {
        if self.token.is_cancelled() {
            return Err(MuxError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(MuxError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the context is cancelled or expires first.
    ///
    /// The future is dropped on cancellation, which aborts in-flight dials.
    pub async fn run<F, T>(&self, fut: F) -> MuxResult<T>
    where
        F: Future<Output = MuxResult<T>>,
    {
        self.check()?;
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(MuxError::Cancelled),
                _ = tokio::time::sleep_until(deadline) => Err(MuxError::DeadlineExceeded),
                result = fut => result,
            },
            None => tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(MuxError::Cancelled),
                result = fut => result,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = Context::background();
        let value = ctx.run(async { Ok::<_, MuxError>(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_cancelled_before_run() {
        let ctx = Context::background();
        ctx.cancel();
        let err = ctx.run(async { Ok::<_, MuxError>(()) }).await.unwrap_err();
        assert!(matches!(err, MuxError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_future() {
        let ctx = Context::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });
        let err = ctx
            .run(std::future::pending::<MuxResult<()>>())
            .await
            .unwrap_err();
        assert!(matches!(err, MuxError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let ctx = Context::background().with_timeout(Duration::from_secs(5));
        let err = ctx
            .run(std::future::pending::<MuxResult<()>>())
            .await
            .unwrap_err();
        assert!(matches!(err, MuxError::DeadlineExceeded));
    }

    #[test]
    fn test_child_cancelled_with_parent() {
        let parent = Context::background();
        let child = parent.child();
        parent.cancel();
        assert!(child.check().is_err());
    }

    #[test]
    fn test_child_cancel_leaves_parent() {
        let parent = Context::background();
        let child = parent.child();
        child.cancel();
        assert!(parent.check().is_ok());
    }

    #[tokio::test]
    async fn test_earlier_deadline_wins() {
        let outer = Context::background().with_timeout(Duration::from_secs(1));
        let inner = outer.with_timeout(Duration::from_secs(60));
        assert_eq!(inner.deadline(), outer.deadline());
    }
}
