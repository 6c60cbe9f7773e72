//! Factuality, toxicity, prompt injection and PII checks.

use crate::time::Time;
use crate::tokens::ReplaceMethod;
use serde::{Deserialize, Serialize};
use super::null_as_default;

#[derive(Debug, Serialize)]
pub(crate) struct FactualityBody<'a> {
    pub reference: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ToxicityBody<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct InjectionBody<'a> {
    pub prompt: &'a str,
    pub detect: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplacePiiBody<'a> {
    pub prompt: &'a str,
    pub replace: bool,
    pub replace_method: ReplaceMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactualityCheck {
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// Result of a factuality check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Factuality {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: Time,
    #[serde(deserialize_with = "null_as_default")]
    pub checks: Vec<FactualityCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToxicityCheck {
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// Result of a toxicity check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toxicity {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: Time,
    #[serde(deserialize_with = "null_as_default")]
    pub checks: Vec<ToxicityCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionCheck {
    #[serde(deserialize_with = "null_as_default")]
    pub probability: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// Result of a prompt injection check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Injection {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: Time,
    #[serde(deserialize_with = "null_as_default")]
    pub checks: Vec<InjectionCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacePiiCheck {
    #[serde(deserialize_with = "null_as_default")]
    pub new_prompt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// Result of a PII replacement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacePii {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: Time,
    #[serde(deserialize_with = "null_as_default")]
    pub checks: Vec<ReplacePiiCheck>,
}
