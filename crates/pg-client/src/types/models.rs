use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCapabilities {
    #[serde(deserialize_with = "null_as_default")]
    pub chat_completion: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub chat_with_image: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub completion: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub embedding: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub embedding_with_image: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tokenize: bool,
}

/// Description of one served model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelData {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    /// RFC3339 on the wire, unlike the epoch seconds of other endpoints
    #[serde(deserialize_with = "null_as_default")]
    pub created: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub owned_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub max_context_length: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub prompt_format: String,
    #[serde(deserialize_with = "null_as_default")]
    pub capabilities: ModelCapabilities,
}

/// Result of a capability lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<ModelData>,
}
