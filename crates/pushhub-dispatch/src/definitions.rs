//! Push definition registry.
//!
//! Definitions are contributed by [`PushDefinitionProvider`]s once at
//! startup; the registry is read-only afterwards and is shared by handle,
//! never through a hidden global.

use std::collections::HashMap;
use std::sync::Arc;

use pushhub_core::error::AppError;
use pushhub_core::result::AppResult;
use pushhub_core::traits::access::{FeatureChecker, PermissionChecker};
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::definition::PushDefinition;

/// Contributes push definitions during registry initialization.
pub trait PushDefinitionProvider: Send + Sync {
    /// The definitions this provider registers.
    fn definitions(&self) -> Vec<PushDefinition>;
}

/// Write-once registry of push request types.
pub struct PushDefinitionRegistry {
    definitions: HashMap<String, PushDefinition>,
    permissions: Arc<dyn PermissionChecker>,
    features: Arc<dyn FeatureChecker>,
}

impl PushDefinitionRegistry {
    /// Build the registry from the registered definition providers.
    ///
    /// Fails with a configuration error on duplicate definition names.
    pub fn build(
        providers: &[Box<dyn PushDefinitionProvider>],
        permissions: Arc<dyn PermissionChecker>,
        features: Arc<dyn FeatureChecker>,
    ) -> AppResult<Self> {
        let mut definitions = HashMap::new();
        for provider in providers {
            for definition in provider.definitions() {
                if definitions.contains_key(&definition.name) {
                    return Err(AppError::configuration(format!(
                        "There is already a push definition with name '{}'; push names must be unique",
                        definition.name
                    )));
                }
                tracing::debug!("Registered push definition '{}'", definition.name);
                definitions.insert(definition.name.clone(), definition);
            }
        }
        Ok(Self {
            definitions,
            permissions,
            features,
        })
    }

    /// Get a definition by name.
    pub fn get(&self, name: &str) -> AppResult<&PushDefinition> {
        self.get_or_none(name).ok_or_else(|| {
            AppError::not_found(format!("There is no push definition with name '{name}'"))
        })
    }

    /// Get a definition by name, or `None` when it is not registered.
    pub fn get_or_none(&self, name: &str) -> Option<&PushDefinition> {
        self.definitions.get(name)
    }

    /// All registered definitions.
    pub fn all(&self) -> Vec<&PushDefinition> {
        self.definitions.values().collect()
    }

    /// Whether a push request type is available to a user.
    ///
    /// Applies the definition's feature dependency (tenant users only) and
    /// permission dependency. An unregistered name is treated as available,
    /// leaving ad-hoc request types ungated.
    pub async fn is_available(&self, name: &str, user: UserIdentifier) -> AppResult<bool> {
        let Some(definition) = self.get_or_none(name) else {
            return Ok(true);
        };

        if let Some(feature) = definition.feature.as_deref() {
            if user.tenant_id.is_some() && !self.features.is_enabled(feature, user.tenant_id).await?
            {
                return Ok(false);
            }
        }

        if let Some(permission) = definition.permission.as_deref() {
            if !self.permissions.is_granted(permission, user).await? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// All definitions available to a user.
    pub async fn all_available(&self, user: UserIdentifier) -> AppResult<Vec<PushDefinition>> {
        let mut available = Vec::new();
        for definition in self.definitions.values() {
            if self.is_available(&definition.name, user).await? {
                available.push(definition.clone());
            }
        }
        Ok(available)
    }
}

impl std::fmt::Debug for PushDefinitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushDefinitionRegistry")
            .field("names", &self.definitions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticFeatures, StaticPermissions, StaticDefinitions};

    fn registry_with(
        definitions: Vec<PushDefinition>,
        permissions: StaticPermissions,
        features: StaticFeatures,
    ) -> PushDefinitionRegistry {
        let providers: Vec<Box<dyn PushDefinitionProvider>> =
            vec![Box::new(StaticDefinitions(definitions))];
        PushDefinitionRegistry::build(&providers, Arc::new(permissions), Arc::new(features))
            .expect("registry should build")
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let providers: Vec<Box<dyn PushDefinitionProvider>> = vec![
            Box::new(StaticDefinitions(vec![PushDefinition::new("News")])),
            Box::new(StaticDefinitions(vec![PushDefinition::new("News")])),
        ];
        let result = PushDefinitionRegistry::build(
            &providers,
            Arc::new(StaticPermissions::allow_all()),
            Arc::new(StaticFeatures::all_enabled()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let registry = registry_with(
            vec![],
            StaticPermissions::allow_all(),
            StaticFeatures::all_enabled(),
        );
        assert!(registry.get("Nope").is_err());
        assert!(registry.get_or_none("Nope").is_none());
    }

    #[tokio::test]
    async fn test_unknown_name_is_available() {
        let registry = registry_with(
            vec![],
            StaticPermissions::allow_all(),
            StaticFeatures::all_enabled(),
        );
        assert!(registry
            .is_available("AdHoc", UserIdentifier::host(1))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_permission_gating() {
        let registry = registry_with(
            vec![PushDefinition::new("Secure").with_permission("secure.read")],
            StaticPermissions::deny_all(),
            StaticFeatures::all_enabled(),
        );
        assert!(!registry
            .is_available("Secure", UserIdentifier::new(Some(1), 2))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_feature_gating_skips_host_users() {
        let registry = registry_with(
            vec![PushDefinition::new("Premium").with_feature("premium")],
            StaticPermissions::allow_all(),
            StaticFeatures::all_disabled(),
        );
        // tenant user blocked by the disabled feature
        assert!(!registry
            .is_available("Premium", UserIdentifier::new(Some(1), 2))
            .await
            .unwrap());
        // host user is not feature-gated
        assert!(registry
            .is_available("Premium", UserIdentifier::host(2))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_all_available_filters() {
        let registry = registry_with(
            vec![
                PushDefinition::new("Open"),
                PushDefinition::new("Secure").with_permission("secure.read"),
            ],
            StaticPermissions::deny_all(),
            StaticFeatures::all_enabled(),
        );
        let available = registry
            .all_available(UserIdentifier::new(Some(1), 2))
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Open");
    }
}
