//! Resource payload and its provider-private metadata.
//!
//! The platform sends the resource as JSON with a free-form `properties`
//! object. Everything in it is passed through untouched except
//! `internalMetadata`, which belongs to this provider and is never shown to
//! end users.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, WebhookError};

/// Key of the provider-private sub-object inside `properties`.
pub const INTERNAL_METADATA_KEY: &str = "internalMetadata";

const DESCRIPTION_KEY: &str = "description";
const CREATED_TIME_KEY: &str = "createdTime";
const LAST_UPDATED_TIME_KEY: &str = "lastUpdatedTime";

/// The resource being provisioned or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Free-form resource properties.
    pub properties: PropertyBag,
    /// Any other top-level keys (id, name, type, location...), kept in order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    /// Parse a request body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(WebhookError::MalformedBody)
    }
}

/// Ordered string-keyed bag of arbitrary JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(Map<String, Value>);

impl PropertyBag {
    /// Look up a property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Typed view of `internalMetadata`, if present and well-formed.
    pub fn internal_metadata(&self) -> Option<InternalMetadata> {
        self.get(INTERNAL_METADATA_KEY)
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Create or refresh `internalMetadata`.
    ///
    /// A missing or null entry is replaced by fresh metadata stamped with `now`.
    /// An existing object only gets `lastUpdatedTime` rewritten; every other key
    /// keeps the exact value the caller sent. `lastUpdatedTime` never moves
    /// before the stored `createdTime` or `lastUpdatedTime`.
    pub fn stamp_internal_metadata(
        &mut self,
        now: DateTime<Utc>,
        description: &str,
    ) -> Result<MetadataStamp> {
        match self.0.get_mut(INTERNAL_METADATA_KEY) {
            None | Some(Value::Null) => {
                let fresh = InternalMetadata::new(description, now);
                self.0.insert(INTERNAL_METADATA_KEY.to_string(), fresh.to_value());
                Ok(MetadataStamp::Created)
            }
            Some(Value::Object(existing)) => {
                let stamped = [CREATED_TIME_KEY, LAST_UPDATED_TIME_KEY]
                    .iter()
                    .filter_map(|key| existing.get(*key).and_then(parse_timestamp))
                    .fold(now, DateTime::max);
                existing.insert(LAST_UPDATED_TIME_KEY.to_string(), timestamp_value(stamped));
                Ok(MetadataStamp::Updated)
            }
            Some(other) => Err(WebhookError::InvalidInternalMetadata {
                found: json_type_name(other),
            }),
        }
    }
}

/// What [`PropertyBag::stamp_internal_metadata`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStamp {
    /// Metadata did not exist and was created.
    Created,
    /// Existing metadata had its update time refreshed.
    Updated,
}

/// Provider-private data attached to a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalMetadata {
    /// Free-text description.
    pub description: String,
    /// When the metadata was first created.
    pub created_time: DateTime<Utc>,
    /// When the metadata was last touched.
    pub last_updated_time: DateTime<Utc>,
}

impl InternalMetadata {
    /// Fresh metadata with both timestamps set to `now`.
    pub fn new(description: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            description: description.into(),
            created_time: now,
            last_updated_time: now,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(DESCRIPTION_KEY.to_string(), Value::String(self.description.clone()));
        map.insert(CREATED_TIME_KEY.to_string(), timestamp_value(self.created_time));
        map.insert(
            LAST_UPDATED_TIME_KEY.to_string(),
            timestamp_value(self.last_updated_time),
        );
        Value::Object(map)
    }
}

fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
