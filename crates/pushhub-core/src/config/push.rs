//! Push distribution configuration.

use serde::{Deserialize, Serialize};

/// Push distribution configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Largest explicit recipient count a publish call distributes inline.
    /// Larger (or subscription-based) fan-outs go through the background
    /// job queue.
    #[serde(default = "default_foreground_count")]
    pub max_user_count_for_foreground_distribution: usize,
    /// Configured delivery providers. Every push request is dispatched to
    /// every provider in this list.
    #[serde(default)]
    pub providers: Vec<ProviderInfo>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            max_user_count_for_foreground_distribution: default_foreground_count(),
            providers: Vec::new(),
        }
    }
}

/// Static description of one configured delivery provider.
///
/// Immutable after startup; safe for concurrent reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Unique provider name referenced during dispatch.
    pub name: String,
    /// Provider implementation selector, resolved against the factory
    /// registry (e.g. "null", "webhook").
    pub kind: String,
    /// Optional client id credential.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Optional client secret credential.
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl ProviderInfo {
    /// Create a provider description without credentials.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            client_id: None,
            client_secret: None,
        }
    }

    /// Attach credentials to the provider description.
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }
}

fn default_foreground_count() -> usize {
    5
}
