//! Shared helpers for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use pushhub::config::AppConfig;
use pushhub::config::push::ProviderInfo;
use pushhub::{
    AppError, PushDefinition, PushDefinitionProvider, PushHub, PushProvider, PushRequest,
    UserIdentifier,
};
use pushhub_core::result::AppResult;
use pushhub_core::traits::access::PermissionChecker;
use pushhub_core::traits::session::CurrentSession;
use pushhub_core::traits::settings::SettingLookup;

/// One recorded provider invocation.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub provider: String,
    pub recipients: Vec<UserIdentifier>,
    pub request_id: Uuid,
    pub request_name: String,
}

/// Shared log of everything the recording provider delivered.
#[derive(Debug, Clone, Default)]
pub struct DeliveryLog {
    entries: Arc<Mutex<Vec<Delivery>>>,
}

impl DeliveryLog {
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.entries.lock().unwrap().clone()
    }

    /// All recipients across every recorded delivery.
    pub fn recipients(&self) -> Vec<UserIdentifier> {
        self.deliveries()
            .into_iter()
            .flat_map(|delivery| delivery.recipients)
            .collect()
    }

    /// Poll until at least `count` deliveries are recorded.
    pub async fn wait_for_deliveries(&self, count: usize) {
        for _ in 0..200 {
            if self.deliveries().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} deliveries, got {}",
            count,
            self.deliveries().len()
        );
    }
}

/// Provider that records every push into a [`DeliveryLog`].
#[derive(Debug)]
pub struct RecordingProvider {
    log: DeliveryLog,
    info: Option<ProviderInfo>,
}

impl RecordingProvider {
    pub fn new(log: DeliveryLog) -> Self {
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
        let name = self
            .info
            .as_ref()
            .map(|info| info.name.clone())
            .unwrap_or_default();
        self.log.entries.lock().unwrap().push(Delivery {
            provider: name,
            recipients: recipients.to_vec(),
            request_id: request.id,
            request_name: request.name.clone(),
        });
        Ok(())
    }
}

/// Provider whose every push fails.
#[derive(Debug, Default)]
pub struct FailingProvider;

#[async_trait]
impl PushProvider for FailingProvider {
    fn initialize(&mut self, _info: &ProviderInfo) -> AppResult<()> {
        Ok(())
    }

    async fn push(&self, _recipients: &[UserIdentifier], _request: &PushRequest) -> AppResult<()> {
        Err(AppError::provider("Delivery backend unavailable"))
    }
}

/// Setting lookup with a fixed set of muted users.
#[derive(Debug, Clone, Default)]
pub struct MutedSettings {
    muted: Vec<UserIdentifier>,
}

impl MutedSettings {
    pub fn new(muted: Vec<UserIdentifier>) -> Self {
        Self { muted }
    }
}

#[async_trait]
impl SettingLookup for MutedSettings {
    async fn get_user_setting(
        &self,
        _name: &str,
        tenant_id: Option<i32>,
        user_id: i64,
    ) -> AppResult<bool> {
        Ok(!self.muted.contains(&UserIdentifier::new(tenant_id, user_id)))
    }
}

/// Permission checker that denies a fixed set of users.
#[derive(Debug, Clone, Default)]
pub struct DenyUsers {
    denied: Vec<UserIdentifier>,
}

impl DenyUsers {
    pub fn new(denied: Vec<UserIdentifier>) -> Self {
        Self { denied }
    }
}

#[async_trait]
impl PermissionChecker for DenyUsers {
    async fn is_granted(&self, _permission: &str, user: UserIdentifier) -> AppResult<bool> {
        Ok(!self.denied.contains(&user))
    }
}

/// Session pinned to a fixed tenant.
#[derive(Debug, Clone, Copy)]
pub struct TenantSession(pub Option<i32>);

impl CurrentSession for TenantSession {
    fn tenant_id(&self) -> Option<i32> {
        self.0
    }

    fn user_id(&self) -> Option<i64> {
        None
    }
}

/// Definition provider backed by a fixed list.
pub struct Definitions(pub Vec<PushDefinition>);

impl PushDefinitionProvider for Definitions {
    fn definitions(&self) -> Vec<PushDefinition> {
        self.0.clone()
    }
}

/// Configuration with one recording provider named "main".
pub fn recording_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.push.providers = vec![ProviderInfo::new("main", "recording")];
    config
}

/// Hub builder with the "recording" and "failing" kinds registered.
pub fn hub_builder(config: AppConfig, log: &DeliveryLog) -> pushhub::PushHubBuilder {
    let record_log = log.clone();
    PushHub::builder(config)
        .provider_kind("recording", move || {
            Box::new(RecordingProvider::new(record_log.clone())) as Box<dyn PushProvider>
        })
        .provider_kind("failing", || {
            Box::<FailingProvider>::default() as Box<dyn PushProvider>
        })
}
