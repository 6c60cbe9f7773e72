//! Closed sets of string tokens accepted by the API.
//!
//! Each kind is an enum whose members map one-to-one onto wire strings. A
//! lookup table per kind is built once on first use and only read afterwards.
//! Parsing an unknown string fails with [`PgError::InvalidToken`], and so does
//! deserializing one, so an invalid wire value never lands in a token field.

use crate::error::PgError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, IntoStaticStr};

macro_rules! token_registry {
    ($kind:ident, $label:literal) => {
        impl $kind {
            /// Look up a wire string in the registry
            pub fn parse(value: &str) -> Result<Self, PgError> {
                static REGISTRY: Lazy<HashMap<&'static str, $kind>> =
                    Lazy::new(|| $kind::iter().map(|token| (token.as_str(), token)).collect());

                REGISTRY
                    .get(value)
                    .copied()
                    .ok_or_else(|| PgError::invalid_token($label, value))
            }

            /// Wire representation
            pub fn as_str(&self) -> &'static str {
                self.into()
            }

            /// Every member of the registry
            pub fn all() -> Vec<Self> {
                Self::iter().collect()
            }
        }

        impl FromStr for $kind {
            type Err = PgError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value)
            }
        }

        impl Serialize for $kind {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $kind {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Self::parse(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Models served by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display, IntoStaticStr)]
pub enum Model {
    #[strum(serialize = "bridgetower-large-itm-mlm-itc")]
    BridgetowerLargeItmMlmItc,
    #[strum(serialize = "deepseek-coder-6.7b-instruct")]
    DeepseekCoder67BInstruct,
    #[strum(serialize = "Hermes-2-Pro-Llama-3-8B")]
    Hermes2ProLlama38B,
    #[strum(serialize = "Hermes-2-Pro-Mistral-7B")]
    Hermes2ProMistral7B,
    #[strum(serialize = "llama-3-sqlcoder-8b")]
    Llama3SqlCoder8B,
    #[strum(serialize = "llava-1.5-7b-hf")]
    Llava157BHf,
    #[strum(serialize = "Neural-Chat-7B")]
    NeuralChat7B,
    #[strum(serialize = "Nous-Hermes-Llama-213B")]
    NousHermesLlama213B,
}

token_registry!(Model, "model");

impl Model {
    /// Models accepted by `/chat/completions` for text chat
    pub const CHAT: &'static [Model] = &[
        Model::DeepseekCoder67BInstruct,
        Model::Hermes2ProLlama38B,
        Model::Hermes2ProMistral7B,
        Model::Llama3SqlCoder8B,
        Model::Llava157BHf,
        Model::NeuralChat7B,
    ];

    /// Models accepted by `/completions`
    pub const COMPLETION: &'static [Model] = &[
        Model::DeepseekCoder67BInstruct,
        Model::Hermes2ProLlama38B,
        Model::Hermes2ProMistral7B,
        Model::NeuralChat7B,
        Model::NousHermesLlama213B,
    ];

    /// Models accepted by `/chat/completions` with an image part
    pub const VISION: &'static [Model] = &[Model::Llava157BHf];

    /// Fail with the "not supported" validation error unless `self` is in `supported`
    pub fn ensure_in(self, supported: &[Model]) -> Result<Self, PgError> {
        if supported.contains(&self) {
            Ok(self)
        } else {
            Err(PgError::model_not_supported())
        }
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display, IntoStaticStr)]
pub enum Role {
    #[strum(serialize = "assistant")]
    Assistant,
    #[strum(serialize = "user")]
    User,
    #[strum(serialize = "system")]
    System,
}

token_registry!(Role, "role");

/// Model capability used to list models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display, IntoStaticStr)]
pub enum Capability {
    #[strum(serialize = "chat-completion")]
    ChatCompletion,
    #[strum(serialize = "chat-with-image")]
    ChatWithImage,
    #[strum(serialize = "completion")]
    Completion,
    #[strum(serialize = "embedding")]
    Embedding,
    #[strum(serialize = "embedding-with-image")]
    EmbeddingWithImage,
    #[strum(serialize = "tokenize")]
    Tokenize,
}

token_registry!(Capability, "capability");

/// How detected personal information is rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display, IntoStaticStr)]
pub enum ReplaceMethod {
    #[strum(serialize = "random")]
    Random,
    #[strum(serialize = "fake")]
    Fake,
    #[strum(serialize = "category")]
    Category,
    #[strum(serialize = "mask")]
    Mask,
}

token_registry!(ReplaceMethod, "replace method");

/// What a chat request does with personal information in its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display, IntoStaticStr)]
pub enum Pii {
    #[strum(serialize = "block")]
    Block,
    #[strum(serialize = "replace")]
    Replace,
}

token_registry!(Pii, "pii");

/// Side an embedding input is truncated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display, IntoStaticStr)]
pub enum Direction {
    #[strum(serialize = "Right")]
    Right,
    #[strum(serialize = "Left")]
    Left,
}

token_registry!(Direction, "direction");

/// ISO-639-3 language codes accepted by `/translate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display, IntoStaticStr)]
pub enum Language {
    #[strum(serialize = "afr")]
    Afrikaans,
    #[strum(serialize = "amh")]
    Amharic,
    #[strum(serialize = "ara")]
    Arabic,
    #[strum(serialize = "hye")]
    Armenian,
    #[strum(serialize = "aze")]
    Azerbaijani,
    #[strum(serialize = "eus")]
    Basque,
    #[strum(serialize = "bel")]
    Belarusian,
    #[strum(serialize = "ben")]
    Bengali,
    #[strum(serialize = "bos")]
    Bosnian,
    #[strum(serialize = "cat")]
    Catalan,
    #[strum(serialize = "che")]
    Chechen,
    #[strum(serialize = "chr")]
    Cherokee,
    #[strum(serialize = "zho")]
    Chinese,
    #[strum(serialize = "hrv")]
    Croatian,
    #[strum(serialize = "ces")]
    Czech,
    #[strum(serialize = "dan")]
    Danish,
    #[strum(serialize = "nld")]
    Dutch,
    #[strum(serialize = "eng")]
    English,
    #[strum(serialize = "est")]
    Estonian,
    #[strum(serialize = "fij")]
    Fijian,
    #[strum(serialize = "fil")]
    Filipino,
    #[strum(serialize = "fin")]
    Finnish,
    #[strum(serialize = "fra")]
    French,
    #[strum(serialize = "glg")]
    Galician,
    #[strum(serialize = "kat")]
    Georgian,
    #[strum(serialize = "deu")]
    German,
    #[strum(serialize = "ell")]
    Greek,
    #[strum(serialize = "guj")]
    Gujarati,
    #[strum(serialize = "hat")]
    Haitian,
    #[strum(serialize = "heb")]
    Hebrew,
    #[strum(serialize = "hin")]
    Hindi,
    #[strum(serialize = "hun")]
    Hungarian,
    #[strum(serialize = "isl")]
    Icelandic,
    #[strum(serialize = "ind")]
    Indonesian,
    #[strum(serialize = "gle")]
    Irish,
    #[strum(serialize = "ita")]
    Italian,
    #[strum(serialize = "jpn")]
    Japanese,
    #[strum(serialize = "kan")]
    Kannada,
    #[strum(serialize = "kaz")]
    Kazakh,
    #[strum(serialize = "kor")]
    Korean,
    #[strum(serialize = "lav")]
    Latvian,
    #[strum(serialize = "lit")]
    Lithuanian,
    #[strum(serialize = "mkd")]
    Macedonian,
    /// Macrolanguage code
    #[strum(serialize = "msa")]
    Malay,
    /// Standard Malay
    #[strum(serialize = "zlm")]
    MalayStandard,
    #[strum(serialize = "mal")]
    Malayalam,
    #[strum(serialize = "mlt")]
    Maltese,
    #[strum(serialize = "mar")]
    Marathi,
    #[strum(serialize = "nep")]
    Nepali,
    #[strum(serialize = "nor")]
    Norwegian,
    #[strum(serialize = "fas")]
    Persian,
    #[strum(serialize = "pol")]
    Polish,
    #[strum(serialize = "por")]
    Portuguese,
    #[strum(serialize = "ron")]
    Romanian,
    #[strum(serialize = "rus")]
    Russian,
    #[strum(serialize = "smo")]
    Samoan,
    #[strum(serialize = "srp")]
    Serbian,
    #[strum(serialize = "slk")]
    Slovak,
    #[strum(serialize = "slv")]
    Slovenian,
    #[strum(serialize = "chu")]
    Slavonic,
    #[strum(serialize = "spa")]
    Spanish,
    #[strum(serialize = "swh")]
    Swahili,
    #[strum(serialize = "swe")]
    Swedish,
    #[strum(serialize = "tam")]
    Tamil,
    #[strum(serialize = "tel")]
    Telugu,
    #[strum(serialize = "tha")]
    Thai,
    #[strum(serialize = "tur")]
    Turkish,
    #[strum(serialize = "ukr")]
    Ukrainian,
    #[strum(serialize = "urd")]
    Urdu,
    #[strum(serialize = "cym")]
    Welsh,
    #[strum(serialize = "vie")]
    Vietnamese,
}

token_registry!(Language, "language");

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trips<T>(all: Vec<T>)
    where
        T: Copy + PartialEq + std::fmt::Debug + FromStr<Err = PgError> + AsRef<str> + Serialize,
        for<'de> T: Deserialize<'de>,
    {
        assert!(!all.is_empty());
        for token in all {
            let parsed: T = token.as_ref().parse().unwrap();
            assert_eq!(parsed, token);

            let json = serde_json::to_string(&token).unwrap();
            assert_eq!(json, format!("\"{}\"", token.as_ref()));
            let decoded: T = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, token);
        }
    }

    #[test]
    fn every_registry_round_trips() {
        assert_round_trips(Model::all());
        assert_round_trips(Role::all());
        assert_round_trips(Capability::all());
        assert_round_trips(ReplaceMethod::all());
        assert_round_trips(Pii::all());
        assert_round_trips(Direction::all());
        assert_round_trips(Language::all());
    }

    #[test]
    fn registry_sizes() {
        assert_eq!(Model::all().len(), 8);
        assert_eq!(Role::all().len(), 3);
        assert_eq!(Capability::all().len(), 6);
        assert_eq!(ReplaceMethod::all().len(), 4);
        assert_eq!(Pii::all().len(), 2);
        assert_eq!(Direction::all().len(), 2);
        assert_eq!(Language::all().len(), 71);
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let cases: Vec<(PgError, &str)> = vec![
            (Role::parse("wizard").unwrap_err(), r#"invalid role "wizard""#),
            (Model::parse("gpt-4").unwrap_err(), r#"invalid model "gpt-4""#),
            (Language::parse("xx").unwrap_err(), r#"invalid language "xx""#),
            (
                ReplaceMethod::parse("").unwrap_err(),
                r#"invalid replace method """#,
            ),
            (Pii::parse("Block").unwrap_err(), r#"invalid pii "Block""#),
            (Direction::parse("right").unwrap_err(), r#"invalid direction "right""#),
            (
                Capability::parse("chat").unwrap_err(),
                r#"invalid capability "chat""#,
            ),
        ];

        for (err, expected) in cases {
            assert!(matches!(err, PgError::InvalidToken { .. }));
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn invalid_wire_strings_fail_deserialization() {
        let err = serde_json::from_str::<Role>(r#""wizard""#).unwrap_err();
        assert!(err.to_string().contains(r#"invalid role "wizard""#));
    }

    #[test]
    fn display_matches_wire_string() {
        assert_eq!(Language::English.to_string(), "eng");
        assert_eq!(Model::NeuralChat7B.to_string(), "Neural-Chat-7B");
        assert_eq!(Capability::ChatWithImage.as_str(), "chat-with-image");
    }

    #[test]
    fn support_sets() {
        assert!(Model::NeuralChat7B.ensure_in(Model::CHAT).is_ok());
        assert!(Model::NousHermesLlama213B.ensure_in(Model::COMPLETION).is_ok());

        let err = Model::BridgetowerLargeItmMlmItc
            .ensure_in(Model::CHAT)
            .unwrap_err();
        assert_eq!(err.to_string(), "model specified is not supported");
        assert!(Model::NeuralChat7B.ensure_in(Model::VISION).is_err());
    }
}
