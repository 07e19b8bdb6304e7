//! Delivery provider abstraction and dispatch.
//!
//! Providers are resolved by name against the configured provider list and
//! instantiated fresh for every distribution attempt. A provider instance
//! is initialized with its [`ProviderInfo`] before first use and is dropped
//! at the end of the attempt on every exit path.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use pushhub_core::config::push::ProviderInfo;
use pushhub_core::error::AppError;
use pushhub_core::result::AppResult;
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::request::PushRequest;

/// A pluggable push delivery backend.
///
/// Implementations deliver one request payload to a list of users and are
/// expected to silently skip users without a registered device or channel.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Bind the provider to its configuration. Called exactly once, before
    /// the first `push`.
    fn initialize(&mut self, info: &ProviderInfo) -> AppResult<()>;

    /// Deliver a push request to the given users.
    async fn push(&self, recipients: &[UserIdentifier], request: &PushRequest) -> AppResult<()>;
}

impl std::fmt::Debug for dyn PushProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn PushProvider")
    }
}

/// Creates provider instances for one provider kind.
pub trait PushProviderFactory: Send + Sync {
    /// Create a fresh, uninitialized provider instance.
    fn create(&self) -> Box<dyn PushProvider>;
}

impl<F> PushProviderFactory for F
where
    F: Fn() -> Box<dyn PushProvider> + Send + Sync,
{
    fn create(&self) -> Box<dyn PushProvider> {
        self()
    }
}

/// Maps provider kinds to factories. Built at startup, read-only afterwards.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, Arc<dyn PushProviderFactory>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a provider kind.
    pub fn register(&mut self, kind: impl Into<String>, factory: impl PushProviderFactory + 'static) {
        let kind = kind.into();
        tracing::debug!("Registered push provider kind '{}'", kind);
        self.factories.insert(kind, Arc::new(factory));
    }

    /// Whether a provider kind is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    fn factory(&self, kind: &str) -> Option<&Arc<dyn PushProviderFactory>> {
        self.factories.get(kind)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolves configured providers and fans a request out to all of them.
#[derive(Debug)]
pub struct ProviderDispatcher {
    registry: ProviderRegistry,
    providers: Vec<ProviderInfo>,
}

impl ProviderDispatcher {
    /// Create a dispatcher over the configured provider list.
    pub fn new(registry: ProviderRegistry, providers: Vec<ProviderInfo>) -> Self {
        Self {
            registry,
            providers,
        }
    }

    /// The configured provider list.
    pub fn providers(&self) -> &[ProviderInfo] {
        &self.providers
    }

    /// Instantiate and initialize the named provider.
    ///
    /// An unknown provider name or kind is a configuration error, not a
    /// retryable delivery failure.
    pub fn create(&self, name: &str) -> AppResult<Box<dyn PushProvider>> {
        let info = self
            .providers
            .iter()
            .find(|info| info.name == name)
            .ok_or_else(|| AppError::configuration(format!("Unknown push provider '{name}'")))?;

        let factory = self.registry.factory(&info.kind).ok_or_else(|| {
            AppError::configuration(format!(
                "No factory registered for push provider kind '{}' (provider '{}')",
                info.kind, info.name
            ))
        })?;

        let mut provider = factory.create();
        provider.initialize(info)?;
        Ok(provider)
    }

    /// Deliver a request to every configured provider.
    ///
    /// Providers are invoked sequentially; the first failure aborts the
    /// remaining providers, making one distribution attempt all-or-nothing.
    pub async fn dispatch(
        &self,
        recipients: &[UserIdentifier],
        request: &PushRequest,
    ) -> AppResult<()> {
        for info in &self.providers {
            let provider = self.create(&info.name)?;
            provider.push(recipients, request).await.map_err(|error| {
                AppError::new(
                    error.kind,
                    format!(
                        "Provider '{}' failed for push request {}: {}",
                        info.name, request.id, error.message
                    ),
                )
            })?;
            tracing::debug!(
                "Dispatched push request {} to provider '{}' ({} recipients)",
                request.id,
                info.name,
                recipients.len()
            );
        }
        Ok(())
    }
}

/// Provider that accepts every push without delivering anything.
///
/// Useful as a placeholder in configurations that want publish/subscribe
/// semantics without a real delivery backend.
#[derive(Debug, Default)]
pub struct NullPushProvider {
    info: Option<ProviderInfo>,
}

#[async_trait]
impl PushProvider for NullPushProvider {
    fn initialize(&mut self, info: &ProviderInfo) -> AppResult<()> {
        self.info = Some(info.clone());
        Ok(())
    }

    async fn push(&self, recipients: &[UserIdentifier], request: &PushRequest) -> AppResult<()> {
        tracing::debug!(
            "Null provider dropping push request {} for {} recipients",
            request.id,
            recipients.len()
        );
        Ok(())
    }
}
