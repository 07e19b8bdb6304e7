//! Shared test doubles for the dispatch crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use pushhub_core::config::push::{ProviderInfo, PushConfig};
use pushhub_core::error::AppError;
use pushhub_core::result::AppResult;
use pushhub_core::traits::access::{FeatureChecker, PermissionChecker};
use pushhub_core::traits::jobs::{BackgroundJobQueue, DistributionJobArgs};
use pushhub_core::traits::session::CurrentSession;
use pushhub_core::traits::settings::SettingLookup;
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::definition::PushDefinition;
use pushhub_entity::request::PushRequest;
use pushhub_store::{MemoryPushRequestStore, PushRequestStore};

use crate::definitions::{PushDefinitionProvider, PushDefinitionRegistry};
use crate::distributor::PushRequestDistributor;
use crate::provider::{ProviderDispatcher, ProviderRegistry, PushProvider};
use crate::publisher::PushRequestPublisher;
use crate::resolver::SubscriptionResolver;

/// Setting lookup with a fixed set of muted users.
#[derive(Debug, Clone, Default)]
pub(crate) struct StaticSettings {
    disabled: Vec<UserIdentifier>,
}

impl StaticSettings {
    pub(crate) fn all_enabled() -> Self {
        Self::default()
    }

    pub(crate) fn with_disabled(disabled: Vec<UserIdentifier>) -> Self {
        Self { disabled }
    }
}

#[async_trait]
impl SettingLookup for StaticSettings {
    async fn get_user_setting(
        &self,
        _name: &str,
        tenant_id: Option<i32>,
        user_id: i64,
    ) -> AppResult<bool> {
        let user = UserIdentifier::new(tenant_id, user_id);
        Ok(!self.disabled.contains(&user))
    }
}

/// Permission checker that answers the same for every query.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StaticPermissions {
    granted: bool,
}

impl StaticPermissions {
    pub(crate) fn allow_all() -> Self {
        Self { granted: true }
    }

    pub(crate) fn deny_all() -> Self {
        Self { granted: false }
    }
}

#[async_trait]
impl PermissionChecker for StaticPermissions {
    async fn is_granted(&self, _permission: &str, _user: UserIdentifier) -> AppResult<bool> {
        Ok(self.granted)
    }
}

/// Feature checker that answers the same for every query.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StaticFeatures {
    enabled: bool,
}

impl StaticFeatures {
    pub(crate) fn all_enabled() -> Self {
        Self { enabled: true }
    }

    pub(crate) fn all_disabled() -> Self {
        Self { enabled: false }
    }
}

#[async_trait]
impl FeatureChecker for StaticFeatures {
    async fn is_enabled(&self, _feature: &str, _tenant_id: Option<i32>) -> AppResult<bool> {
        Ok(self.enabled)
    }
}

/// Definition provider backed by a fixed list.
pub(crate) struct StaticDefinitions(pub(crate) Vec<PushDefinition>);

impl PushDefinitionProvider for StaticDefinitions {
    fn definitions(&self) -> Vec<PushDefinition> {
        self.0.clone()
    }
}

/// One recorded provider invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Delivery {
    pub(crate) provider: String,
    pub(crate) client_id: Option<String>,
    pub(crate) recipients: Vec<UserIdentifier>,
    pub(crate) request_id: Uuid,
}

/// Shared log of everything the recording providers delivered.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeliveryLog {
    entries: Arc<Mutex<Vec<Delivery>>>,
}

impl DeliveryLog {
    pub(crate) fn deliveries(&self) -> Vec<Delivery> {
        self.entries.lock().unwrap().clone()
    }

    fn record(&self, delivery: Delivery) {
        self.entries.lock().unwrap().push(delivery);
    }
}

/// Provider that records every push into a [`DeliveryLog`].
#[derive(Debug)]
pub(crate) struct RecordingProvider {
    log: DeliveryLog,
    info: Option<ProviderInfo>,
}

impl RecordingProvider {
    pub(crate) fn new(log: DeliveryLog) -> Self {
        Self { log, info: None }
    }
}

#[async_trait]
impl PushProvider for RecordingProvider {
    fn initialize(&mut self, info: &ProviderInfo) -> AppResult<()> {
        self.info = Some(info.clone());
        Ok(())
    }

    async fn push(&self, recipients: &[UserIdentifier], request: &PushRequest) -> AppResult<()> {
        let info = self.info.as_ref().ok_or_else(|| {
            AppError::provider("Recording provider used before initialization")
        })?;
        self.log.record(Delivery {
            provider: info.name.clone(),
            client_id: info.client_id.clone(),
            recipients: recipients.to_vec(),
            request_id: request.id,
        });
        Ok(())
    }
}

/// Provider whose every push fails.
#[derive(Debug, Default)]
struct FailingProvider;

#[async_trait]
impl PushProvider for FailingProvider {
    fn initialize(&mut self, _info: &ProviderInfo) -> AppResult<()> {
        Ok(())
    }

    async fn push(&self, _recipients: &[UserIdentifier], _request: &PushRequest) -> AppResult<()> {
        Err(AppError::provider("Delivery backend unavailable"))
    }
}

/// Job queue that records enqueued jobs instead of running them.
#[derive(Debug, Default)]
pub(crate) struct RecordingQueue {
    jobs: Mutex<Vec<DistributionJobArgs>>,
}

impl RecordingQueue {
    pub(crate) fn jobs(&self) -> Vec<DistributionJobArgs> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackgroundJobQueue for RecordingQueue {
    async fn enqueue(&self, args: DistributionJobArgs) -> AppResult<()> {
        self.jobs.lock().unwrap().push(args);
        Ok(())
    }
}

/// Session pinned to a fixed tenant.
#[derive(Debug, Clone, Copy)]
struct FixedSession {
    tenant_id: Option<i32>,
}

impl CurrentSession for FixedSession {
    fn tenant_id(&self) -> Option<i32> {
        self.tenant_id
    }

    fn user_id(&self) -> Option<i64> {
        None
    }
}

fn registry(
    definitions: Vec<PushDefinition>,
    permissions: StaticPermissions,
    features: StaticFeatures,
) -> Arc<PushDefinitionRegistry> {
    let providers: Vec<Box<dyn PushDefinitionProvider>> =
        vec![Box::new(StaticDefinitions(definitions))];
    let registry =
        PushDefinitionRegistry::build(&providers, Arc::new(permissions), Arc::new(features))
            .expect("test registry should build");
    Arc::new(registry)
}

fn provider_registry(log: &DeliveryLog) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    let record_log = log.clone();
    registry.register("recording", move || {
        Box::new(RecordingProvider::new(record_log.clone())) as Box<dyn PushProvider>
    });
    registry.register("failing", || {
        Box::<FailingProvider>::default() as Box<dyn PushProvider>
    });
    registry
}

pub(crate) fn resolver(
    store: Arc<dyn PushRequestStore>,
    definitions: Vec<PushDefinition>,
    settings: StaticSettings,
) -> SubscriptionResolver {
    SubscriptionResolver::new(
        store,
        registry(
            definitions,
            StaticPermissions::allow_all(),
            StaticFeatures::all_enabled(),
        ),
        Arc::new(settings),
    )
}

pub(crate) fn resolver_with_denied_permissions(
    store: Arc<dyn PushRequestStore>,
    definitions: Vec<PushDefinition>,
    settings: StaticSettings,
) -> SubscriptionResolver {
    SubscriptionResolver::new(
        store,
        registry(
            definitions,
            StaticPermissions::deny_all(),
            StaticFeatures::all_enabled(),
        ),
        Arc::new(settings),
    )
}

pub(crate) fn distributor(
    store: Arc<dyn PushRequestStore>,
    definitions: Vec<PushDefinition>,
    settings: StaticSettings,
    providers: Vec<ProviderInfo>,
) -> (PushRequestDistributor, DeliveryLog) {
    let log = DeliveryLog::default();
    let dispatcher = ProviderDispatcher::new(provider_registry(&log), providers);
    let distributor = PushRequestDistributor::new(
        store.clone(),
        resolver(store, definitions, settings),
        dispatcher,
    );
    (distributor, log)
}

pub(crate) fn publisher(
    store: Arc<MemoryPushRequestStore>,
    providers: Vec<ProviderInfo>,
) -> (PushRequestPublisher, Arc<RecordingQueue>, DeliveryLog) {
    let store: Arc<dyn PushRequestStore> = store;
    let (distributor, log) = distributor(
        store.clone(),
        vec![],
        StaticSettings::all_enabled(),
        providers.clone(),
    );
    let queue = Arc::new(RecordingQueue::default());
    let config = PushConfig {
        providers,
        ..PushConfig::default()
    };
    let publisher = PushRequestPublisher::new(
        store,
        queue.clone(),
        Arc::new(distributor),
        Arc::new(FixedSession {
            tenant_id: Some(9),
        }),
        config,
    );
    (publisher, queue, log)
}
