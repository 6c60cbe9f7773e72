use crate::time::Time;
use crate::tokens::Language;
use serde::{Deserialize, Serialize};
use super::null_as_default;

#[derive(Debug, Serialize)]
pub(crate) struct TranslateBody<'a> {
    pub text: &'a str,
    pub source_lang: Language,
    pub target_lang: Language,
    pub use_third_party_engine: bool,
}

/// Candidate produced by one translation engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translation {
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub translation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// Result of a translate call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translate {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: Time,
    #[serde(deserialize_with = "null_as_default")]
    pub best_translation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub best_translation_model: String,
    #[serde(rename = "best_score")]
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub translations: Vec<Translation>,
}
