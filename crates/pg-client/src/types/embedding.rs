use crate::image::ImageSource;
use crate::time::Time;
use crate::tokens::Direction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use super::null_as_default;

/// Text, image, or both, to embed together
#[derive(Debug, Clone, Default)]
pub struct EmbeddingItem {
    pub text: String,
    pub image: Option<Arc<dyn ImageSource>>,
}

impl EmbeddingItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl ImageSource + 'static) -> Self {
        self.image = Some(Arc::new(image));
        self
    }
}

/// Input of an embedding call
#[derive(Debug, Clone)]
pub enum EmbeddingInput {
    Items(Vec<EmbeddingItem>),
    /// Pre-tokenized input, one token list per item
    Tokens(Vec<Vec<i64>>),
}

impl From<Vec<EmbeddingItem>> for EmbeddingInput {
    fn from(value: Vec<EmbeddingItem>) -> Self {
        EmbeddingInput::Items(value)
    }
}

impl From<Vec<Vec<i64>>> for EmbeddingInput {
    fn from(value: Vec<Vec<i64>>) -> Self {
        EmbeddingInput::Tokens(value)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EncodedItem {
    pub text: String,
    pub image: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum EncodedInput {
    Items(Vec<EncodedItem>),
    Tokens(Vec<Vec<i64>>),
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingBody<'a> {
    pub model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_direction: Option<Direction>,
    pub input: EncodedInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingData {
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub embedding: Vec<f64>,
}

/// Result of an embedding call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embedding {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: Time,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<EmbeddingData>,
}
