//! # pg-client - Prediction Guard API client
//!
//! Typed async client for the Prediction Guard LLM API: chat (plain, streaming
//! and vision), completions, embeddings, factuality/toxicity/injection/PII
//! checks, reranking, tokenization, translation and model capability lookup.
//!
//! ## Features
//!
//! - **Typed Endpoints** - One method per capability with typed requests and responses
//! - **Streaming** - Server-sent events decoded on a background task and delivered in order
//! - **Cancellation** - Every call is governed by a [`CancellationToken`]
//! - **Validated Tokens** - Models, roles, languages and friends are closed enums
//! - **Observability** - Pluggable logging sink plus `metrics` counters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pg_client::{CancellationToken, ChatRequest, Client, ClientConfig, Logger, Model};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::new("your-api-key"), Logger::default())?;
//!     let ctx = CancellationToken::new();
//!
//!     let request = ChatRequest::new(Model::NeuralChat7B, "How do you feel about the world?")
//!         .with_max_tokens(1000)
//!         .with_temperature(0.1);
//!
//!     let chat = client.chat(&ctx, &request).await?;
//!     println!("{}", chat.choices[0].message.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! [`Client::chat_sse`] returns an [`EventStream`] once the server accepts the
//! request. A single spawned task owns the response body, decodes each
//! `data:` line and publishes it on a bounded channel. The stream ends with
//! `None`; a failure mid-stream arrives as one final `Err` item first.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use pg_client::{CancellationToken, ChatInputMessage, ChatRequest, Client, Model};
//!
//! # async fn run(client: Client) -> Result<(), pg_client::PgError> {
//! let ctx = CancellationToken::new();
//! let request = ChatRequest::new(
//!     Model::NeuralChat7B,
//!     vec![ChatInputMessage::user("Tell me a story")],
//! );
//!
//! let mut stream = client.chat_sse(&ctx, &request).await?;
//! while let Some(event) = stream.next().await {
//!     for choice in event?.choices {
//!         print!("{}", choice.delta.content.unwrap_or_default());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Cancelling the token, or dropping the stream, stops the task and releases
//! the connection.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, PgError>`](PgError):
//!
//! ```rust,no_run
//! use pg_client::{CancellationToken, Client, PgError};
//!
//! # async fn run(client: Client) {
//! let ctx = CancellationToken::new();
//! match client.toxicity(&ctx, "some text").await {
//!     Ok(toxicity) => println!("score: {}", toxicity.checks[0].score),
//!     Err(PgError::Unauthorized) => println!("Invalid API key"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! # }
//! ```

pub mod client;
pub mod config;
mod decode;
pub mod error;
pub mod image;
pub mod logging;
pub mod stream;
pub mod time;
pub mod tokens;
mod transport;
pub mod types;
pub mod utils;

pub use client::Client;
pub use config::{AuthScheme, ClientConfig, ConfigBuilder, DEFAULT_BASE_URL, TransportConfig};
pub use error::{MODEL_NOT_SUPPORTED, PgError, Result};
pub use image::{ImageBase64, ImageFile, ImageNetwork, ImageSource};
pub use logging::Logger;
pub use stream::{EventStream, OverflowPolicy, StreamConfig};
pub use time::Time;
pub use tokens::{Capability, Direction, Language, Model, Pii, ReplaceMethod, Role};
pub use types::*;

pub use tokio_util::sync::CancellationToken;
