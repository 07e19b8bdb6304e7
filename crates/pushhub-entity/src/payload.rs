//! Tagged push payloads and the decode registry.
//!
//! A payload travels as a JSON body plus a string kind tag. The hosting
//! application registers a decode function per kind at startup; decoding
//! validates the tag against the registry before touching the body, so an
//! unknown tag fails fast instead of producing a half-decoded value.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use pushhub_core::error::AppError;
use pushhub_core::result::AppResult;

/// A serialized push payload with its type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    /// Registry tag identifying the payload type.
    pub kind: String,
    /// JSON-serialized payload body.
    pub body: serde_json::Value,
}

impl PushPayload {
    /// Serialize a value into a tagged payload.
    pub fn encode<T: Serialize>(kind: impl Into<String>, value: &T) -> AppResult<Self> {
        Ok(Self {
            kind: kind.into(),
            body: serde_json::to_value(value)?,
        })
    }
}

type DecodeFn = Arc<dyn Fn(&serde_json::Value) -> AppResult<Box<dyn Any + Send>> + Send + Sync>;

/// Maps payload kind tags to decode functions.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct PayloadRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl PayloadRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload type under a kind tag.
    pub fn register<T>(&mut self, kind: impl Into<String>)
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.decoders.insert(
            kind.into(),
            Arc::new(|body| {
                let value: T = serde_json::from_value(body.clone())?;
                Ok(Box::new(value) as Box<dyn Any + Send>)
            }),
        );
    }

    /// Whether a kind tag is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.decoders.contains_key(kind)
    }

    /// Decode a payload into its registered type.
    ///
    /// Fails with a serialization error when the kind tag is unknown.
    pub fn decode(&self, payload: &PushPayload) -> AppResult<Box<dyn Any + Send>> {
        let decoder = self.decoders.get(&payload.kind).ok_or_else(|| {
            AppError::serialization(format!("Unknown payload kind '{}'", payload.kind))
        })?;
        decoder(&payload.body)
    }

    /// Decode a payload and downcast it to a concrete type.
    pub fn decode_as<T: 'static>(&self, payload: &PushPayload) -> AppResult<T> {
        let decoded = self.decode(payload)?;
        decoded.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            AppError::serialization(format!(
                "Payload kind '{}' does not decode to the requested type",
                payload.kind
            ))
        })
    }
}

impl fmt::Debug for PayloadRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadRegistry")
            .field("kinds", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}
