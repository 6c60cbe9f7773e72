//! Shared fixtures for the HTTP-level tests: a client pointed at a wiremock
//! server and the canned bodies the hosted API returns.

#![allow(dead_code)]

use pg_client::{Client, ClientConfig, Logger};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

pub const CAPABILITY: &str = r#"{"object":"list","data":[{"id":"llava-1.5-7b-hf","object":"model","created":"2024-10-31T00:00:00Z","owned_by":"llava hugging face","description":"Open-source multimodal chatbot trained by fine-tuning LLaMa/Vicuna.","max_context_length":8192,"prompt_format":"llava","capabilities":{"chat_completion":true,"chat_with_image":true,"completion":false,"embedding":false,"embedding_with_image":false,"tokenize":false}}]}"#;

pub const CHAT: &str = r#"{"id":"chat-ShL1yk0N0h1lzmrJDQCpCz3WQFQh9","object":"chat.completion","created":1715628729,"model":"neural-chat-7b-v3-3","choices":[{"index":0,"message":{"role":"assistant","content":"The world, in general, is full of both beauty and challenges.","output":null},"status":"success"}]}"#;

pub const CHAT_VISION: &str = r#"{"id":"chat-1qKp6k5y1I4McppJvyHqNkaTeJUtT","object":"chat.completion","created":1717441090,"model":"llava-1.5-7b-hf","choices":[{"index":0,"message":{"role":"assistant","content":"No, there is no deer in this picture. The image features a man wearing a hat and glasses, smiling for the camera.","output":null},"status":"success"}]}"#;

pub const CHAT_SSE: &str = concat!(
    r#"data: {"id":"chat-OoNijY7ZAkVt4t5Zu8nVDHlW8RAJe","object":"chat.completion.chunk","created":1715734993,"model":"neural-chat-7b-v3-3","choices":[{"index":0,"delta":{"content":" I"},"generated_text":null,"logprobs":0,"finish_reason":null}]}"#,
    "\n",
    r#"data: {"id":"chat-afH2BnyvKPvon2r16DkUWJygbvePY","object":"chat.completion.chunk","created":1715734993,"model":"neural-chat-7b-v3-3","choices":[{"index":0,"delta":{"content":" believe"},"generated_text":null,"logprobs":-0.8534317,"finish_reason":null}]}"#,
    "\n",
    r#"data: {"id":"chat-Dd6xpFh5TOtLtFeSxALbmfNNGiyvb","object":"chat.completion.chunk","created":1715734995,"model":"neural-chat-7b-v3-3","choices":[{"index":0,"delta":{},"generated_text":"I believe","logprobs":0,"finish_reason":"stop"}]}"#,
    "\n",
    "data: [DONE]\n",
);

pub const COMPLETION: &str = r#"{"id":"cmpl-3gbwD5tLJxklJAljHCjOqMyqUZvv4","object":"text_completion","created":1715632193,"choices":[{"text":"after weight loss surgery? While losing weight can improve the appearance of your hair and make it appear healthier, some people may experience temporary hair loss in the process.","index":0,"status":"success","model":"neural-chat-7b-v3-3"}]}"#;

pub const EMBEDDING: &str = r#"{"id":"emb-0qU4sYEutZvkHskxXwzYDgZVOhtLw","object":"list","created":1717439154,"model":"bridgetower-large-itm-mlm-itc","data":[{"status":"success","index":0,"object":"embedding","embedding":[0.04457271471619606]}]}"#;

pub const FACTUALITY: &str = r#"{"checks":[{"score":0.7879658937454224,"index":0,"status":"success"}],"created":1715730425,"id":"fact-GK9kueuMw0NQLc0sYEIVlkGsPH31R","object":"factuality.check"}"#;

pub const INJECTION: &str = r#"{"checks":[{"probability":0.5,"index":0,"status":"success"}],"created":"1715729859","id":"injection-Nb817UlEMTog2YOe1JHYbq2oUyZAW7Lk","object":"injection_check"}"#;

pub const REPLACE_PII: &str = r#"{"checks":[{"new_prompt":"My email is * and my number is *.","index":0,"status":"success"}],"created":"1715730803","id":"pii-ax9rE9ld3W5yxN1Sz7OKxXkMTMo736jJ","object":"pii_check"}"#;

pub const RERANK: &str = r#"{"id":"rerank-837eef1d-90d1-416a-bf8b-948a42998dd7","object":"list","created":1732230548,"model":"bge-reranker-v2-m3","results":[{"index":0,"relevance_score":0.06572466,"text":"Deep Learning is not pizza."},{"index":1,"relevance_score":0.054098696,"text":"Deep Learning is pizza."}]}"#;

pub const TOKENIZE: &str = r#"{"id": "token-ab046fcf-945f-421c-b9f0-1c75ff355203","object": "tokens","created": 1729871708,"model": "multilingual-e5-large-instruct","data": [{"id": 0,"start": 0,"stop": 0,"text": "<s>"}]}"#;

pub const TOXICITY: &str = r#"{"checks":[{"score":0.7072361707687378,"index":0,"status":"success"}],"created":1715731131,"id":"toxi-vRvkxJHmAiSh3NvuuSc48HQ669g7y","object":"toxicity.check"}"#;

pub const TRANSLATE: &str = r#"{"translations":[{"score":-100,"translation":"","model":"openai","status":"error: couldn't get translation"},{"score":0.5008206963539124,"translation":"La lluvia en España se queda principalmente en la llanura","model":"deepl","status":"success"},{"score":0.5381188988685608,"translation":"La lluvia en España permanece principalmente en la llanura","model":"google","status":"success"},{"score":0.48437628149986267,"translation":"La lluvia en España se queda principalmente en la llanura.","model":"nous_hermes_llama2","status":"success"}],"best_translation":"La lluvia en España permanece principalmente en la llanura","best_score":0.5381188988685608,"best_translation_model":"google","created":1715731416,"id":"translation-0210cae4da704099b58471876ffa3d2e","object":"translation"}"#;

pub fn config(server: &MockServer, api_key: &str) -> ClientConfig {
    ClientConfig::new(api_key).with_base_url(server.uri())
}

pub fn client(server: &MockServer) -> Client {
    Client::new(config(server, "test-key"), Logger::discard()).expect("client")
}

/// Client whose log records are captured as `"<msg>, key: value"` lines
pub fn recording_client(server: &MockServer) -> (Client, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let captured = seen.clone();
    let logger = Logger::new(move |msg, fields| {
        let mut line = msg.to_string();
        for (key, value) in fields {
            line.push_str(&format!(", {key}: {value}"));
        }
        captured.lock().unwrap().push(line);
    });

    let client = Client::new(config(server, "test-key"), logger).expect("client");
    (client, seen)
}
