//! The multiplexer façade.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::MuxConfig;
use crate::context::Context;
use crate::error::MuxResult;
use crate::provider::{Driver, Provider, ProviderOption, ResolvedConnection};
use crate::registry::{ProviderRegistry, SharedProvider};
use crate::url::NormalizedUrl;

/// Dispatches connection URLs to registered providers by scheme.
///
/// ```rust
/// use sqlmux_core::{Context, Mux};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let mux = Mux::new();
/// let err = mux.open_atlas(&Context::background(), "fake://open", &[]).await.unwrap_err();
/// assert!(err.is_unsupported_scheme());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct Mux {
    registry: ProviderRegistry,
    default_options: Vec<ProviderOption>,
}

impl Mux {
    /// Create a multiplexer with no providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a multiplexer whose opens start from `config`'s default options.
    ///
    /// Aliases in the config are applied by [`Mux::apply_aliases`] once the target
    /// providers are registered.
    pub fn from_config(config: &MuxConfig) -> Self {
        Self {
            registry: ProviderRegistry::new(),
            default_options: config.default_options(),
        }
    }

    /// Options applied before the caller's options on every open.
    pub fn with_default_options(mut self, options: Vec<ProviderOption>) -> Self {
        self.default_options = options;
        self
    }

    /// Register `provider` for `scheme`.
    pub fn register_provider<P>(&self, scheme: &str, provider: P) -> MuxResult<()>
    where
        P: Provider + 'static,
    {
        self.registry.register(scheme, Arc::new(provider))
    }

    /// Register an already shared provider for `scheme`.
    pub fn register_shared(&self, scheme: &str, provider: SharedProvider) -> MuxResult<()> {
        self.registry.register(scheme, provider)
    }

    /// Register `alias` for the provider bound to `target`.
    pub fn register_alias(&self, alias: &str, target: &str) -> MuxResult<()> {
        self.registry.register_alias(alias, target)
    }

    /// Register every alias in `config` whose target is present.
    ///
    /// Aliases that are already registered are skipped; missing targets are an error.
    pub fn apply_aliases(&self, config: &MuxConfig) -> MuxResult<()> {
        for (alias, target) in &config.aliases {
            if self.registry.contains(alias) {
                debug!(alias = %alias, "Alias already registered, skipping");
                continue;
            }
            self.registry.register_alias(alias, target)?;
        }
        Ok(())
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<String> {
        self.registry.schemes()
    }

    /// The underlying registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Normalize `url`, pick its provider and compute DSN plus schema name.
    pub async fn resolve(&self, ctx: &Context, url: &str) -> MuxResult<ResolvedConnection> {
        let (_, resolved) = self.resolve_with_provider(ctx, url).await?;
        Ok(resolved)
    }

    /// Resolve only the schema name of `url`, without opening a connection.
    pub async fn schema_name_from_url(&self, ctx: &Context, url: &str) -> MuxResult<String> {
        let resolved = self.resolve(ctx, url).await?;
        Ok(resolved.schema_name)
    }

    /// Resolve `url` and open a driver through its provider.
    ///
    /// Errors from any stage are returned as they are; the stage is recorded on the
    /// tracing span.
    pub async fn open_atlas(
        &self,
        ctx: &Context,
        url: &str,
        options: &[ProviderOption],
    ) -> MuxResult<Driver> {
        let span = info_span!("open_atlas", scheme = tracing::field::Empty);
        async move {
            let (provider, resolved) = self.resolve_with_provider(ctx, url).await?;

            let mut merged = self.default_options.clone();
            merged.extend_from_slice(options);

            match provider.open(ctx, &resolved.dsn, &merged).await {
                Ok(driver) => {
                    info!(dialect = %driver.dialect(), schema = %resolved.schema_name, "Driver opened");
                    Ok(driver)
                }
                Err(err) => {
                    warn!(stage = "open", error = %err, "Provider failed to open driver");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn resolve_with_provider(
        &self,
        ctx: &Context,
        url: &str,
    ) -> MuxResult<(SharedProvider, ResolvedConnection)> {
        ctx.check()?;

        let normalized = NormalizedUrl::parse(url).inspect_err(|err| {
            debug!(stage = "normalize", error = %err, "URL rejected");
        })?;
        tracing::Span::current().record("scheme", normalized.scheme());

        let provider = self.registry.lookup(normalized.scheme()).inspect_err(|err| {
            debug!(stage = "lookup", error = %err, "No provider for scheme");
        })?;

        let resolved = provider.resolve(ctx, &normalized).await.inspect_err(|err| {
            debug!(stage = "resolve", error = %err, "Resolution failed");
        })?;
        debug!(scheme = %normalized.scheme(), schema = %resolved.schema_name, "URL resolved");

        Ok((provider, resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MuxError;
    use crate::provider::provider_fn;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop() -> impl Provider + 'static {
        provider_fn(|_ctx, _dsn, _opts| async { Ok(Driver::new("key", ())) })
    }

    #[tokio::test]
    async fn test_provider_not_supported() {
        let mux = Mux::new();
        let err = mux
            .open_atlas(&Context::background(), "fake://open", &[])
            .await
            .unwrap_err();
        assert!(err.is_unsupported_scheme());
    }

    #[tokio::test]
    async fn test_get_driver_fails_without_registration() {
        let mux = Mux::new();
        let err = mux
            .open_atlas(&Context::background(), "key://open", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, MuxError::UnsupportedScheme(ref s) if s == "key"));
    }

    #[tokio::test]
    async fn test_get_driver_success() {
        let mux = Mux::new();
        mux.register_provider("key", noop()).unwrap();
        let driver = mux
            .open_atlas(&Context::background(), "key://open", &[])
            .await
            .unwrap();
        assert_eq!(driver.dialect(), "key");
    }

    #[tokio::test]
    async fn test_register_twice_keeps_first() {
        let mux = Mux::new();
        mux.register_provider("key", noop()).unwrap();
        let err = mux.register_provider("key", noop()).unwrap_err();
        assert!(err.is_duplicate_scheme());

        assert!(
            mux.open_atlas(&Context::background(), "key://open", &[])
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_malformed_url() {
        let mux = Mux::new();
        let err = mux
            .schema_name_from_url(&Context::background(), "no-scheme-here")
            .await
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_default_options_come_first() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let mux = Mux::new().with_default_options(vec![ProviderOption::ApplicationName(
            "defaults".into(),
        )]);
        mux.register_provider(
            "key",
            provider_fn(move |_ctx, _dsn, opts| {
                let captured = Arc::clone(&captured);
                async move {
                    *captured.lock() = opts;
                    Ok(Driver::new("key", ()))
                }
            }),
        )
        .unwrap();

        mux.open_atlas(&Context::background(), "key://x", &[ProviderOption::ReadOnly])
            .await
            .unwrap();
        assert_eq!(
            *seen.lock(),
            vec![
                ProviderOption::ApplicationName("defaults".into()),
                ProviderOption::ReadOnly
            ]
        );
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mux = Mux::new();
        mux.register_provider(
            "key",
            provider_fn(move |_ctx, _dsn, _opts| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(Driver::new("key", ())) }
            }),
        )
        .unwrap();

        let ctx = Context::background();
        ctx.cancel();
        let err = mux.open_atlas(&ctx, "key://x", &[]).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_apply_aliases() {
        let mut config = MuxConfig::default();
        config.aliases.clear();
        config.aliases.insert("k2".into(), "key".into());

        let mux = Mux::from_config(&config);
        mux.register_provider("key", noop()).unwrap();
        mux.apply_aliases(&config).unwrap();
        assert_eq!(mux.schemes(), vec!["k2".to_string(), "key".to_string()]);

        // Re-applying is a no-op.
        mux.apply_aliases(&config).unwrap();
    }
}
