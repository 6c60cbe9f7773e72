//! Request and response shapes, one module per capability.

pub mod chat;
pub mod checks;
pub mod completion;
pub mod embedding;
pub mod models;
pub mod rerank;
pub mod tokenize;
pub mod translate;

use serde::{Deserialize, Deserializer};

pub use chat::{
    Chat, ChatChoice, ChatInputMessage, ChatMessage, ChatMessages, ChatRequest, ChatSse,
    ChatSseChoice, ChatSseDelta, ChatVision, ChatVisionRequest, InputExtension, OutputExtension,
};
pub use checks::{
    Factuality, FactualityCheck, Injection, InjectionCheck, ReplacePii, ReplacePiiCheck, Toxicity,
    ToxicityCheck,
};
pub use completion::{Completion, CompletionChoice, CompletionRequest};
pub use embedding::{Embedding, EmbeddingData, EmbeddingInput, EmbeddingItem};
pub use models::{ModelCapabilities, ModelData, ModelResponse};
pub use rerank::{Rerank, RerankRequest, RerankResult};
pub use tokenize::{TokenData, Tokenize, TokenizeRequest};
pub use translate::{Translate, Translation};

/// Decode a field, reading `null` as the type's default.
///
/// `#[serde(default)]` only covers absent fields; servers also send explicit
/// nulls for strings, lists and counters.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
