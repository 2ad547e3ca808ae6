//! The provider abstraction and the values that flow through it.
//!
//! A [`Provider`] knows one dialect: it turns a [`NormalizedUrl`] into a
//! [`ResolvedConnection`] (DSN plus schema name) and opens a [`Driver`] from a DSN.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::MuxResult;
use crate::url::NormalizedUrl;

/// Output of dialect resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConnection {
    /// Dialect-native connection string for the client library.
    pub dsn: String,
    /// Current schema name, empty when the URL does not name one.
    pub schema_name: String,
}

impl ResolvedConnection {
    /// Create a resolved connection.
    pub fn new(dsn: impl Into<String>, schema_name: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            schema_name: schema_name.into(),
        }
    }
}

/// Option passed through to the provider when opening a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOption {
    /// Upper bound for establishing the connection.
    ConnectTimeout(Duration),
    /// Application name reported to the server.
    ApplicationName(String),
    /// Open the connection in read-only mode.
    ReadOnly,
}

/// [`ProviderOption`]s folded into one value. Later options override earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Application name.
    pub application_name: Option<String>,
    /// Read-only session.
    pub read_only: bool,
}

impl ProviderOptions {
    /// Fold a list of options.
    pub fn from_slice(options: &[ProviderOption]) -> Self {
        let mut folded = Self::default();
        for option in options {
            match option {
                ProviderOption::ConnectTimeout(timeout) => folded.connect_timeout = Some(*timeout),
                ProviderOption::ApplicationName(name) => {
                    folded.application_name = Some(name.clone())
                }
                ProviderOption::ReadOnly => folded.read_only = true,
            }
        }
        folded
    }
}

/// An opened database handle.
///
/// The multiplexer never looks inside; callers downcast to the client type the
/// provider documents (e.g. `mysql_async::Conn`).
pub struct Driver {
    dialect: String,
    handle: Box<dyn Any + Send>,
}

impl Driver {
    /// Wrap a client handle.
    pub fn new<T: Any + Send>(dialect: impl Into<String>, handle: T) -> Self {
        Self {
            dialect: dialect.into(),
            handle: Box::new(handle),
        }
    }

    /// Dialect that produced this driver.
    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    /// Check whether the handle is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.handle.is::<T>()
    }

    /// Borrow the handle as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref::<T>()
    }

    /// Mutably borrow the handle as a `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.handle.downcast_mut::<T>()
    }

    /// Take the handle out as a `T`, or give the driver back.
    pub fn into_inner<T: Any>(self) -> Result<T, Self> {
        let Self { dialect, handle } = self;
        match handle.downcast::<T>() {
            Ok(inner) => Ok(*inner),
            Err(handle) => Err(Self { dialect, handle }),
        }
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

/// A dialect provider: resolution plus connection.
///
/// # Example
///
/// ```rust,ignore
/// use sqlmux_core::{Context, Driver, MuxResult, Provider, ProviderOption};
///
/// struct Echo;
///
/// #[async_trait::async_trait]
/// impl Provider for Echo {
///     async fn open(&self, _ctx: &Context, dsn: &str, _opts: &[ProviderOption]) -> MuxResult<Driver> {
///         Ok(Driver::new("echo", dsn.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Compute the DSN and schema name for `url`.
    ///
    /// The default passes the URL through unchanged with an empty schema name.
    async fn resolve(&self, ctx: &Context, url: &NormalizedUrl) -> MuxResult<ResolvedConnection> {
        ctx.check()?;
        Ok(ResolvedConnection::new(url.as_str(), ""))
    }

    /// Open a driver for a DSN previously produced by [`Provider::resolve`].
    async fn open(
        &self,
        ctx: &Context,
        dsn: &str,
        options: &[ProviderOption],
    ) -> MuxResult<Driver>;
}

/// A [`Provider`] backed by a closure; see [`provider_fn`].
pub struct ProviderFn<F, Fut> {
    func: F,
    _marker: PhantomData<fn() -> Fut>,
}

/// Build a provider from an async closure taking owned arguments.
///
/// ```rust
/// use sqlmux_core::{provider_fn, Driver, Mux};
///
/// let mux = Mux::new();
/// mux.register_provider("key", provider_fn(|_ctx, dsn, _opts| async move {
///     Ok(Driver::new("key", dsn))
/// }))
/// .unwrap();
/// ```
pub fn provider_fn<F, Fut>(func: F) -> ProviderFn<F, Fut>
where
    F: Fn(Context, String, Vec<ProviderOption>) -> Fut + Send + Sync,
    Fut: Future<Output = MuxResult<Driver>> + Send,
{
    ProviderFn {
        func,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, Fut> Provider for ProviderFn<F, Fut>
where
    F: Fn(Context, String, Vec<ProviderOption>) -> Fut + Send + Sync,
    Fut: Future<Output = MuxResult<Driver>> + Send,
{
    async fn open(
        &self,
        ctx: &Context,
        dsn: &str,
        options: &[ProviderOption],
    ) -> MuxResult<Driver> {
        (self.func)(ctx.clone(), dsn.to_string(), options.to_vec()).await
    }
}
