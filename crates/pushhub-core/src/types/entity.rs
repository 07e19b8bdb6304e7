//! Entity scoping reference.

use serde::{Deserialize, Serialize};

/// Names a domain entity instance for entity-level push requests and
/// subscriptions.
///
/// The entity id is kept in its serialized string form so the push system
/// stays agnostic of the hosting application's key types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityReference {
    /// Fully qualified entity type name.
    pub type_name: String,
    /// Serialized primary key of the entity.
    pub entity_id: String,
}

impl EntityReference {
    /// Create a new entity reference.
    pub fn new(type_name: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            entity_id: entity_id.into(),
        }
    }
}
