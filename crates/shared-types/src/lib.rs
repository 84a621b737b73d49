//! Shared types for the Football Predictor page runtime
//!
//! This crate contains the plain data passed between the page components,
//! the storage layer and the browser bridge. Nothing in here touches the DOM.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub mod chart_config;
pub mod errors;
pub mod events;
pub mod tooltip;

pub use errors::{PredictorError, PredictorResult};

/// Field name to value record for one form.
///
/// Serialized as a flat JSON object so the persisted layout stays
/// `{"name": "value", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    fields: BTreeMap<String, String>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field value. A repeated name replaces the earlier value,
    /// matching how a form-data walk overwrites plain object keys.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode to the single string blob written to storage
    pub fn to_json(&self) -> PredictorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored blob
    pub fn from_json(json: &str) -> PredictorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K, V> FromIterator<(K, V)> for FormSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = FormSnapshot::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

/// Descriptor of one tracked click, forwarded to analytics and discarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Lowercase tag name of the matched element
    pub element: String,
    /// Trimmed text content, cut to the configured number of characters
    pub text: String,
    /// ISO-8601 UTC timestamp with millisecond precision
    pub timestamp: String,
    /// Path of the current page
    pub url: String,
}

impl InteractionRecord {
    pub fn new(
        tag_name: &str,
        text_content: &str,
        at: DateTime<Utc>,
        path: &str,
        max_text_chars: usize,
    ) -> Self {
        Self {
            element: tag_name.to_lowercase(),
            text: text_content.trim().chars().take(max_text_chars).collect(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            url: path.to_string(),
        }
    }
}
