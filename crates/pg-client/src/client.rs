use crate::config::{ClientConfig, ConfigBuilder};
use crate::decode;
use crate::error::PgError;
use crate::logging::Logger;
use crate::stream::{EventStream, StreamConfig};
use crate::tokens::{Capability, Direction, Language, Model, ReplaceMethod};
use crate::transport::{Accept, Transport};
use crate::types::chat::{Streaming, VisionBody};
use crate::types::checks::{FactualityBody, InjectionBody, ReplacePiiBody, ToxicityBody};
use crate::types::embedding::{EmbeddingBody, EncodedInput, EncodedItem};
use crate::types::translate::TranslateBody;
use crate::types::{
    Chat, ChatRequest, ChatSse, ChatVision, ChatVisionRequest, Completion, CompletionRequest,
    Embedding, EmbeddingInput, Factuality, Injection, ModelResponse, ReplacePii, Rerank,
    RerankRequest, Tokenize, TokenizeRequest, Toxicity, Translate,
};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Client for the Prediction Guard API.
///
/// Holds no mutable state: clone it freely and share it across tasks. Every
/// method takes a [`CancellationToken`] that governs the whole call.
#[derive(Clone)]
pub struct Client {
    transport: Transport,
    stream_config: StreamConfig,
}

impl Client {
    /// Create a client, building a pooled HTTP transport from `config`
    pub fn new(config: ClientConfig, logger: Logger) -> Result<Self, PgError> {
        Ok(Self {
            transport: Transport::new(&config, logger)?,
            stream_config: StreamConfig::default(),
        })
    }

    /// Create a client on top of an existing `reqwest::Client`
    pub fn with_http_client(
        config: ClientConfig,
        logger: Logger,
        http: reqwest::Client,
    ) -> Result<Self, PgError> {
        Ok(Self {
            transport: Transport::with_http(&config, logger, http)?,
            stream_config: StreamConfig::default(),
        })
    }

    /// Create a client from `PREDICTIONGUARD_API_KEY` and `PREDICTIONGUARD_URL`
    pub fn from_env() -> Result<Self, PgError> {
        let config = ConfigBuilder::from_env()?;
        Self::new(config, Logger::default())
    }

    /// Channel settings used by streaming calls
    pub fn with_stream_config(mut self, stream_config: StreamConfig) -> Self {
        self.stream_config = stream_config;
        self
    }

    async fn post<B, T>(&self, ctx: &CancellationToken, path: &str, body: &B) -> Result<T, PgError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.transport.url(path);
        let response = self
            .transport
            .send(ctx, Method::POST, &url, Some(body), Accept::Json)
            .await?;
        decode::json(ctx, response).await
    }

    async fn get<T>(&self, ctx: &CancellationToken, path: &str) -> Result<T, PgError>
    where
        T: DeserializeOwned,
    {
        let url = self.transport.url(path);
        let response = self
            .transport
            .send::<()>(ctx, Method::GET, &url, None, Accept::Json)
            .await?;
        decode::json(ctx, response).await
    }

    /// Check that the service is up, returning its raw answer
    pub async fn health_check(&self, ctx: &CancellationToken) -> Result<String, PgError> {
        let url = self.transport.url("");
        let response = self
            .transport
            .send::<()>(ctx, Method::GET, &url, None, Accept::Json)
            .await?;
        decode::text(ctx, response).await
    }

    /// Models that offer `capability`
    pub async fn capability(
        &self,
        ctx: &CancellationToken,
        capability: Capability,
    ) -> Result<ModelResponse, PgError> {
        self.get(ctx, &format!("/models/{capability}")).await
    }

    /// Generate a chat completion from a prompt or conversation
    pub async fn chat(&self, ctx: &CancellationToken, request: &ChatRequest) -> Result<Chat, PgError> {
        request.model.ensure_in(Model::CHAT)?;
        self.post(ctx, "/chat/completions", request).await
    }

    /// Generate a chat completion as a stream of events.
    ///
    /// Returns once the server has accepted the request. Events then arrive on
    /// the returned stream in wire order until it yields `None`; a failure
    /// mid-stream is delivered as a final `Err` item.
    pub async fn chat_sse(
        &self,
        ctx: &CancellationToken,
        request: &ChatRequest,
    ) -> Result<EventStream<ChatSse>, PgError> {
        request.model.ensure_in(Model::CHAT)?;

        let body = Streaming {
            request,
            stream: true,
        };
        let url = self.transport.url("/chat/completions");
        let response = self
            .transport
            .send(ctx, Method::POST, &url, Some(&body), Accept::EventStream)
            .await?;

        Ok(EventStream::spawn(
            ctx,
            Box::pin(response.bytes_stream()),
            self.stream_config,
            self.transport.logger().clone(),
        ))
    }

    /// Ask a question about an image
    pub async fn chat_vision(
        &self,
        ctx: &CancellationToken,
        request: &ChatVisionRequest,
    ) -> Result<ChatVision, PgError> {
        request.model.ensure_in(Model::VISION)?;

        let base64 = request.image.encode_base64(ctx).await?;
        let body = VisionBody::new(request, &base64);
        self.post(ctx, "/chat/completions", &body).await
    }

    /// Complete a prompt
    pub async fn completions(
        &self,
        ctx: &CancellationToken,
        request: &CompletionRequest,
    ) -> Result<Completion, PgError> {
        request.model.ensure_in(Model::COMPLETION)?;
        self.post(ctx, "/completions", request).await
    }

    /// Embed text, images, or token lists
    pub async fn embedding(
        &self,
        ctx: &CancellationToken,
        model: &str,
        input: &EmbeddingInput,
    ) -> Result<Embedding, PgError> {
        self.embed(ctx, model, input, None).await
    }

    /// Embed, letting the server truncate over-long input from `direction`
    pub async fn embedding_with_truncate(
        &self,
        ctx: &CancellationToken,
        model: &str,
        input: &EmbeddingInput,
        direction: Direction,
    ) -> Result<Embedding, PgError> {
        self.embed(ctx, model, input, Some(direction)).await
    }

    async fn embed(
        &self,
        ctx: &CancellationToken,
        model: &str,
        input: &EmbeddingInput,
        direction: Option<Direction>,
    ) -> Result<Embedding, PgError> {
        let input = match input {
            EmbeddingInput::Tokens(tokens) => EncodedInput::Tokens(tokens.clone()),
            EmbeddingInput::Items(items) => {
                let mut encoded = Vec::with_capacity(items.len());
                for item in items {
                    let image = match &item.image {
                        Some(image) => image.encode_base64(ctx).await?,
                        None => String::new(),
                    };
                    encoded.push(EncodedItem {
                        text: item.text.clone(),
                        image,
                    });
                }
                EncodedInput::Items(encoded)
            }
        };

        let body = EmbeddingBody {
            model,
            truncate: direction.map(|_| true),
            truncation_direction: direction,
            input,
        };
        self.post(ctx, "/embeddings", &body).await
    }

    /// Score how well `text` agrees with `reference`
    pub async fn factuality(
        &self,
        ctx: &CancellationToken,
        reference: &str,
        text: &str,
    ) -> Result<Factuality, PgError> {
        self.post(ctx, "/factuality", &FactualityBody { reference, text })
            .await
    }

    /// Estimate the probability that `prompt` is an injection attack
    pub async fn injection(
        &self,
        ctx: &CancellationToken,
        prompt: &str,
    ) -> Result<Injection, PgError> {
        let body = InjectionBody {
            prompt,
            detect: true,
        };
        self.post(ctx, "/injection", &body).await
    }

    /// Rewrite personal information found in `prompt`
    pub async fn replace_pii(
        &self,
        ctx: &CancellationToken,
        prompt: &str,
        method: ReplaceMethod,
    ) -> Result<ReplacePii, PgError> {
        let body = ReplacePiiBody {
            prompt,
            replace: true,
            replace_method: method,
        };
        self.post(ctx, "/PII", &body).await
    }

    /// Order documents by relevance to a query
    pub async fn rerank(
        &self,
        ctx: &CancellationToken,
        request: &RerankRequest,
    ) -> Result<Rerank, PgError> {
        self.post(ctx, "/rerank", request).await
    }

    /// Tokens the model server computes for an input
    pub async fn tokenize(
        &self,
        ctx: &CancellationToken,
        request: &TokenizeRequest,
    ) -> Result<Tokenize, PgError> {
        self.post(ctx, "/tokenize", request).await
    }

    /// Score how toxic `text` is
    pub async fn toxicity(&self, ctx: &CancellationToken, text: &str) -> Result<Toxicity, PgError> {
        self.post(ctx, "/toxicity", &ToxicityBody { text }).await
    }

    /// Translate `text` from `source` to `target`
    pub async fn translate(
        &self,
        ctx: &CancellationToken,
        text: &str,
        source: Language,
        target: Language,
        use_third_party_engine: bool,
    ) -> Result<Translate, PgError> {
        let body = TranslateBody {
            text,
            source_lang: source,
            target_lang: target,
            use_third_party_engine,
        };
        self.post(ctx, "/translate", &body).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("stream_config", &self.stream_config)
            .finish_non_exhaustive()
    }
}
