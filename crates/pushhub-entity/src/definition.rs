//! Push definition metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Startup-registered metadata for one push request type.
///
/// Definitions are contributed by definition providers during registry
/// initialization and are read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushDefinition {
    /// Unique push request type name.
    pub name: String,
    /// Entity type name, when the push request type is entity-scoped.
    pub entity_type_name: Option<String>,
    /// Permission a user must hold to receive this push request type.
    pub permission: Option<String>,
    /// Feature that must be enabled for the user's tenant.
    pub feature: Option<String>,
    /// Free-form attribute bag for hosting-application metadata.
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl PushDefinition {
    /// Create a definition with no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type_name: None,
            permission: None,
            feature: None,
            attributes: HashMap::new(),
        }
    }

    /// Scope the definition to an entity type.
    pub fn with_entity_type(mut self, entity_type_name: impl Into<String>) -> Self {
        self.entity_type_name = Some(entity_type_name.into());
        self
    }

    /// Require a permission for availability.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Require a tenant feature for availability.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Attach a metadata attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}
