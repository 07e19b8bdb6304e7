//! # PushHub
//!
//! Multi-tenant push request publishing, subscription, and distribution.
//!
//! The facade crate wires the PushHub crates together:
//! - [`pushhub_store`] persists push requests and subscriptions
//! - [`pushhub_dispatch`] publishes requests and fans them out to providers
//! - [`pushhub_worker`] drains the background distribution queue
//!
//! ```no_run
//! use pushhub::config::AppConfig;
//! use pushhub::{PushHub, PublishOptions, UserIdentifier};
//!
//! # async fn demo() -> Result<(), pushhub::AppError> {
//! let hub = PushHub::builder(AppConfig::default()).build()?;
//! hub.publisher()
//!     .publish(
//!         "Welcome",
//!         PublishOptions {
//!             user_ids: vec![UserIdentifier::host(42)],
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, EnvFilter};

use pushhub_core::config::logging::LoggingConfig;
use pushhub_core::config::AppConfig;
use pushhub_core::result::AppResult;
use pushhub_core::traits::access::{FeatureChecker, PermissionChecker};
use pushhub_core::traits::session::{CurrentSession, HostSession};
use pushhub_core::traits::settings::SettingLookup;
pub use pushhub_core::config;
pub use pushhub_core::error::{AppError, ErrorKind};
pub use pushhub_core::types::entity::EntityReference;
pub use pushhub_core::types::paging::Paging;
pub use pushhub_core::types::user::UserIdentifier;
pub use pushhub_dispatch::{
    NullPushProvider, ProviderDispatcher, ProviderRegistry, PublishOptions,
    PushDefinitionProvider, PushDefinitionRegistry, PushProvider, PushRequestDistributor,
    PushRequestPublisher, PushSubscriptionManager, SubscriptionResolver,
};
pub use pushhub_entity::definition::PushDefinition;
pub use pushhub_entity::payload::{PayloadRegistry, PushPayload};
pub use pushhub_entity::request::{PushRequest, PushRequestPriority};
pub use pushhub_entity::subscription::PushRequestSubscription;
pub use pushhub_store::{MemoryPushRequestStore, PushRequestStore};
pub use pushhub_worker::{DistributionWorker, MemoryJobQueue};

pub mod access;

use access::OpenAccess;

/// Initialize tracing from the logging configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Assembled PushHub system.
///
/// Built once at startup via [`PushHub::builder`]; every component handle
/// is cheaply cloneable and safe to share across tasks.
pub struct PushHub {
    config: AppConfig,
    store: Arc<dyn PushRequestStore>,
    queue: Arc<MemoryJobQueue>,
    distributor: Arc<PushRequestDistributor>,
    publisher: Arc<PushRequestPublisher>,
    subscriptions: Arc<PushSubscriptionManager>,
}

impl PushHub {
    /// Start building a PushHub instance from configuration.
    pub fn builder(config: AppConfig) -> PushHubBuilder {
        PushHubBuilder::new(config)
    }

    /// The push request publisher.
    pub fn publisher(&self) -> &PushRequestPublisher {
        &self.publisher
    }

    /// The subscription manager.
    pub fn subscriptions(&self) -> &PushSubscriptionManager {
        &self.subscriptions
    }

    /// The distributor, for hosts that run distribution jobs themselves.
    pub fn distributor(&self) -> Arc<PushRequestDistributor> {
        Arc::clone(&self.distributor)
    }

    /// The underlying store.
    pub fn store(&self) -> Arc<dyn PushRequestStore> {
        Arc::clone(&self.store)
    }

    /// The background job queue.
    pub fn queue(&self) -> Arc<MemoryJobQueue> {
        Arc::clone(&self.queue)
    }

    /// Spawn the background distribution worker.
    ///
    /// Returns the shutdown sender and the worker task handle. Send `true`
    /// to stop the worker; it finishes in-flight distributions first.
    pub fn start_worker(&self) -> (watch::Sender<bool>, JoinHandle<()>) {
        let worker = DistributionWorker::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.distributor),
            self.config.worker.clone(),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });
        (shutdown_tx, handle)
    }
}

impl std::fmt::Debug for PushHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushHub").finish_non_exhaustive()
    }
}

/// Builder for [`PushHub`].
///
/// All collaborators default to permissive null objects backed by the
/// in-memory store, so a bare `PushHub::builder(config).build()` yields a
/// working single-process system.
pub struct PushHubBuilder {
    config: AppConfig,
    store: Option<Arc<dyn PushRequestStore>>,
    definition_providers: Vec<Box<dyn PushDefinitionProvider>>,
    provider_registry: ProviderRegistry,
    permissions: Option<Arc<dyn PermissionChecker>>,
    features: Option<Arc<dyn FeatureChecker>>,
    settings: Option<Arc<dyn SettingLookup>>,
    session: Option<Arc<dyn CurrentSession>>,
}

impl PushHubBuilder {
    fn new(config: AppConfig) -> Self {
        let mut provider_registry = ProviderRegistry::new();
        provider_registry.register("null", || {
            Box::<NullPushProvider>::default() as Box<dyn PushProvider>
        });
        Self {
            config,
            store: None,
            definition_providers: Vec::new(),
            provider_registry,
            permissions: None,
            features: None,
            settings: None,
            session: None,
        }
    }

    /// Use a custom store instead of the in-memory one.
    pub fn store(mut self, store: Arc<dyn PushRequestStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Contribute push definitions.
    pub fn definitions(mut self, provider: impl PushDefinitionProvider + 'static) -> Self {
        self.definition_providers.push(Box::new(provider));
        self
    }

    /// Register a delivery provider kind. The `"null"` kind is registered
    /// out of the box.
    pub fn provider_kind(
        mut self,
        kind: impl Into<String>,
        factory: impl Fn() -> Box<dyn PushProvider> + Send + Sync + 'static,
    ) -> Self {
        self.provider_registry.register(kind, factory);
        self
    }

    /// Use the hosting application's permission checker.
    pub fn permissions(mut self, permissions: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Use the hosting application's feature checker.
    pub fn features(mut self, features: Arc<dyn FeatureChecker>) -> Self {
        self.features = Some(features);
        self
    }

    /// Use the hosting application's setting lookup.
    pub fn settings(mut self, settings: Arc<dyn SettingLookup>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Use the hosting application's ambient session.
    pub fn session(mut self, session: Arc<dyn CurrentSession>) -> Self {
        self.session = Some(session);
        self
    }

    /// Assemble the system.
    ///
    /// Fails with a configuration error on duplicate definition names.
    pub fn build(self) -> AppResult<PushHub> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryPushRequestStore::new()));
        let permissions = self.permissions.unwrap_or_else(|| Arc::new(OpenAccess));
        let features = self.features.unwrap_or_else(|| Arc::new(OpenAccess));
        let settings = self.settings.unwrap_or_else(|| Arc::new(OpenAccess));
        let session = self.session.unwrap_or_else(|| Arc::new(HostSession));

        let definitions = Arc::new(PushDefinitionRegistry::build(
            &self.definition_providers,
            permissions,
            features,
        )?);

        let resolver =
            SubscriptionResolver::new(Arc::clone(&store), Arc::clone(&definitions), settings);
        let dispatcher =
            ProviderDispatcher::new(self.provider_registry, self.config.push.providers.clone());
        let distributor = Arc::new(PushRequestDistributor::new(
            Arc::clone(&store),
            resolver,
            dispatcher,
        ));

        let queue = Arc::new(MemoryJobQueue::new());
        let publisher = Arc::new(PushRequestPublisher::new(
            Arc::clone(&store),
            queue.clone(),
            Arc::clone(&distributor),
            session,
            self.config.push.clone(),
        ));
        let subscriptions = Arc::new(PushSubscriptionManager::new(
            Arc::clone(&store),
            definitions,
        ));

        Ok(PushHub {
            config: self.config,
            store,
            queue,
            distributor,
            publisher,
            subscriptions,
        })
    }
}

impl std::fmt::Debug for PushHubBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushHubBuilder").finish_non_exhaustive()
    }
}
