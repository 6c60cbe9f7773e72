use crate::image::ImageSource;
use crate::time::Time;
use crate::tokens::{Model, Pii, ReplaceMethod, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use super::null_as_default;

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatInputMessage {
    pub role: Role,
    pub content: String,
}

impl ChatInputMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Messages of a chat request: a single prompt or a full conversation.
///
/// A single prompt is sent as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatMessages {
    Text(String),
    List(Vec<ChatInputMessage>),
}

impl From<&str> for ChatMessages {
    fn from(value: &str) -> Self {
        ChatMessages::Text(value.to_string())
    }
}

impl From<String> for ChatMessages {
    fn from(value: String) -> Self {
        ChatMessages::Text(value)
    }
}

impl From<Vec<ChatInputMessage>> for ChatMessages {
    fn from(value: Vec<ChatInputMessage>) -> Self {
        ChatMessages::List(value)
    }
}

/// Processing applied to the prompt before the model sees it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputExtension {
    pub block_prompt_injection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii: Option<Pii>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii_replace_method: Option<ReplaceMethod>,
}

/// Checks run against the model's answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputExtension {
    pub factuality: bool,
    pub toxicity: bool,
}

/// Request for `/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: Model,
    pub messages: ChatMessages,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<f64>,
    #[serde(rename = "input", skip_serializing_if = "Option::is_none")]
    pub input_extension: Option<InputExtension>,
    #[serde(rename = "output", skip_serializing_if = "Option::is_none")]
    pub output_extension: Option<OutputExtension>,
}

impl ChatRequest {
    pub fn new(model: Model, messages: impl Into<ChatMessages>) -> Self {
        Self {
            model,
            messages: messages.into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            top_k: None,
            input_extension: None,
            output_extension: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: f64) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_input_extension(mut self, extension: InputExtension) -> Self {
        self.input_extension = Some(extension);
        self
    }

    pub fn with_output_extension(mut self, extension: OutputExtension) -> Self {
        self.output_extension = Some(extension);
        self
    }
}

/// Request body with streaming switched on
#[derive(Serialize)]
pub(crate) struct Streaming<'a, R> {
    #[serde(flatten)]
    pub request: &'a R,
    pub stream: bool,
}

/// Question about an image
#[derive(Debug, Clone)]
pub struct ChatVisionRequest {
    pub model: Model,
    pub role: Role,
    pub question: String,
    pub image: Arc<dyn ImageSource>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f64>,
    pub top_k: Option<f64>,
}

impl ChatVisionRequest {
    pub fn new(
        model: Model,
        question: impl Into<String>,
        image: impl ImageSource + 'static,
    ) -> Self {
        Self {
            model,
            role: Role::User,
            question: question.into(),
            image: Arc::new(image),
            max_tokens: None,
            temperature: None,
            top_p: None,
            top_k: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: f64) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct VisionBody<'a> {
    pub model: Model,
    pub messages: [VisionMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VisionMessage<'a> {
    pub role: Role,
    pub content: [ContentPart<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

impl<'a> VisionBody<'a> {
    pub fn new(request: &'a ChatVisionRequest, base64: &str) -> Self {
        Self {
            model: request.model,
            messages: [VisionMessage {
                role: request.role,
                content: [
                    ContentPart::Text {
                        text: &request.question,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{base64}"),
                        },
                    },
                ],
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            top_k: request.top_k,
        }
    }
}

/// Message in a chat answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatChoice {
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub message: ChatMessage,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// Result of a chat call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chat {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: Time,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub choices: Vec<ChatChoice>,
}

/// Result of a vision chat call
pub type ChatVision = Chat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSseDelta {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSseChoice {
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub delta: ChatSseDelta,
    pub generated_text: Option<String>,
    pub logprobs: Option<f32>,
    pub finish_reason: Option<String>,
}

/// One event of a streaming chat call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: Time,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub choices: Vec<ChatSseChoice>,
    /// Set when the server aborts the stream
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageBase64;
    use serde_json::json;

    #[test]
    fn single_prompt_is_a_bare_string() {
        let request = ChatRequest::new(Model::NeuralChat7B, "hello");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"model": "Neural-Chat-7B", "messages": "hello"})
        );
    }

    #[test]
    fn full_request_body() {
        let request = ChatRequest::new(
            Model::Hermes2ProLlama38B,
            vec![
                ChatInputMessage::system("be brief"),
                ChatInputMessage::user("hi"),
            ],
        )
        .with_max_tokens(1000)
        .with_temperature(0.5)
        .with_top_p(0.25)
        .with_top_k(50.0)
        .with_input_extension(InputExtension {
            block_prompt_injection: true,
            pii: Some(Pii::Replace),
            pii_replace_method: Some(ReplaceMethod::Random),
        })
        .with_output_extension(OutputExtension {
            factuality: true,
            toxicity: false,
        });

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "Hermes-2-Pro-Llama-3-8B",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 1000,
                "temperature": 0.5,
                "top_p": 0.25,
                "top_k": 50.0,
                "input": {
                    "block_prompt_injection": true,
                    "pii": "replace",
                    "pii_replace_method": "random"
                },
                "output": {"factuality": true, "toxicity": false}
            })
        );
    }

    #[test]
    fn streaming_body_adds_flag() {
        let request = ChatRequest::new(Model::NeuralChat7B, "hi");
        let body = Streaming {
            request: &request,
            stream: true,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["stream"], json!(true));
        assert_eq!(value["model"], json!("Neural-Chat-7B"));
    }

    #[test]
    fn vision_body_embeds_data_url() {
        let request = ChatVisionRequest::new(
            Model::Llava157BHf,
            "Is there a deer in this picture?",
            ImageBase64::new("aGVsbG8="),
        )
        .with_max_tokens(300);

        let value = serde_json::to_value(VisionBody::new(&request, "aGVsbG8=")).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "llava-1.5-7b-hf",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "Is there a deer in this picture?"},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,aGVsbG8="}}
                    ]
                }],
                "max_tokens": 300
            })
        );
    }

    #[test]
    fn sse_event_with_nulls() {
        let event: ChatSse = serde_json::from_str(
            r#"{"id":"chat-1","object":"chat.completion.chunk","created":1715734993,"model":"neural-chat-7b-v3-3","choices":[{"index":0,"delta":{"content":" I"},"generated_text":null,"logprobs":0,"finish_reason":null}]}"#,
        )
        .unwrap();

        assert_eq!(event.created.unix(), 1715734993);
        assert_eq!(event.choices[0].delta.content.as_deref(), Some(" I"));
        assert_eq!(event.choices[0].finish_reason, None);
        assert_eq!(event.error, None);
    }

    #[test]
    fn chat_answer_with_null_output() {
        let chat: Chat = serde_json::from_str(
            r#"{"id":"chat-1","object":"chat.completion","created":1717441090,"model":"llava-1.5-7b-hf","choices":[{"index":0,"message":{"role":"assistant","content":"No deer.","output":null},"status":"success"}]}"#,
        )
        .unwrap();

        assert_eq!(chat.choices[0].message.content, "No deer.");
        assert_eq!(chat.choices[0].message.output, None);
    }
}
