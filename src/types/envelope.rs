//! On-disk record format
//!
//! Every line of an event or snapshot log is one JSON envelope:
//!
//! ```text
//! {"id":"6f1c...","typeTag":"name_changed","payload":{...}}
//! ```

use serde::{Deserialize, Serialize};

/// Aggregate key, payload type tag and the encoded payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<K, P = serde_json::Value> {
    pub id: K,
    #[serde(rename = "typeTag")]
    pub type_tag: String,
    pub payload: P,
}

impl<K, P> Envelope<K, P> {
    pub fn new(id: K, type_tag: impl Into<String>, payload: P) -> Self {
        Self {
            id,
            type_tag: type_tag.into(),
            payload,
        }
    }
}
