//! Queue messages and the records decoded from them.

use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{DecodeError, DeliveryError};

/// Unparsed body of one queue record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    /// Queue-assigned message id (diagnostics only)
    pub message_id: Option<String>,

    /// Message body, expected to be a JSON record
    pub body: String,
}

impl RawMessage {
    /// Create a message with no id
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            message_id: None,
            body: body.into(),
        }
    }

    /// Attach a queue message id
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }
}

/// Decoded message payload
///
/// Keys match field names ignoring ASCII case. Absent fields decode as empty
/// strings, a `null` value leaves the field untouched, a repeated key
/// overwrites the earlier value, and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: String,
    pub title: String,
}

impl Record {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Decode the message at `index` of its batch.
    ///
    /// A top-level `null` body decodes as an empty record.
    ///
    /// # Errors
    /// Malformed JSON, a non-object body, or a field of the wrong type.
    pub fn decode(message: &RawMessage, index: usize) -> Result<Self, DecodeError> {
        serde_json::from_str::<Option<Self>>(&message.body)
            .map(Option::unwrap_or_default)
            .map_err(|source| DecodeError {
                index,
                message_id: message.message_id.clone(),
                source,
            })
    }

    /// Serialize to the body sent to the sink
    pub fn to_wire(&self) -> Result<Vec<u8>, DeliveryError> {
        serde_json::to_vec(self).map_err(|source| DeliveryError::Serialization {
            record_id: self.id.clone(),
            source,
        })
    }
}

enum Field {
    Id,
    Title,
    Unknown,
}

impl Field {
    fn from_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("id") {
            Self::Id
        } else if key.eq_ignore_ascii_case("title") {
            Self::Title
        } else {
            Self::Unknown
        }
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object with string fields `id` and `title`")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Record, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut record = Record::default();
        while let Some(key) = map.next_key::<String>()? {
            let slot = match Field::from_key(&key) {
                Field::Id => &mut record.id,
                Field::Title => &mut record.title,
                Field::Unknown => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            if let Some(value) = map.next_value::<Option<String>>()? {
                *slot = value;
            }
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}
