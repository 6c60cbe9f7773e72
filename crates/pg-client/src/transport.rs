use crate::config::ClientConfig;
use crate::decode;
use crate::error::PgError;
use crate::logging::Logger;
use metrics::{counter, histogram};
use reqwest::header::{
    ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Media type a call expects back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accept {
    Json,
    EventStream,
}

impl Accept {
    fn header(self) -> HeaderValue {
        match self {
            Accept::Json => HeaderValue::from_static("application/json"),
            Accept::EventStream => HeaderValue::from_static("text/event-stream"),
        }
    }
}

/// One HTTP round trip per call over a shared, pooled `reqwest::Client`.
#[derive(Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    logger: Logger,
}

impl Transport {
    pub fn new(config: &ClientConfig, logger: Logger) -> Result<Self, PgError> {
        let transport = &config.transport;
        let http = reqwest::Client::builder()
            .connect_timeout(transport.connect_timeout())
            .tcp_keepalive(transport.tcp_keepalive())
            .pool_idle_timeout(transport.pool_idle_timeout())
            .pool_max_idle_per_host(transport.pool_max_idle_per_host)
            .build()
            .map_err(|e| PgError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Self::with_http(config, logger, http)
    }

    pub fn with_http(
        config: &ClientConfig,
        logger: Logger,
        http: reqwest::Client,
    ) -> Result<Self, PgError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let (name, value) = config.auth.header(&config.api_key);
        headers.insert(
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| PgError::configuration("Invalid auth header name"))?,
            HeaderValue::from_str(&value)
                .map_err(|_| PgError::configuration("API key is not a valid header value"))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| PgError::configuration("User agent is not a valid header value"))?,
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            headers,
            logger,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Send one request and classify its status.
    ///
    /// 200 and 204 hand back the open response. 401 and 403 become
    /// [`PgError::Unauthorized`]. Any other status reads the body as an error
    /// envelope.
    pub async fn send<B>(
        &self,
        ctx: &CancellationToken,
        method: Method,
        url: &str,
        body: Option<&B>,
        accept: Accept,
    ) -> Result<Response, PgError>
    where
        B: Serialize + ?Sized,
    {
        let call = call_name(url);
        self.logger.log(
            "pg-client: request: started",
            &[
                ("method", method.to_string()),
                ("call", call.to_string()),
                ("endpoint", url.to_string()),
            ],
        );

        let started = Instant::now();
        let result = self.execute(ctx, method, url, body, accept).await;

        let status = match &result {
            Ok(response) => response.status().as_u16().to_string(),
            Err(PgError::Cancelled) => "cancelled".to_string(),
            Err(_) => "error".to_string(),
        };
        self.logger.log(
            "pg-client: request: completed",
            &[("call", call.to_string()), ("status", status.clone())],
        );
        counter!("pg_client_requests_total", "call" => call.to_string(), "status" => status)
            .increment(1);
        histogram!("pg_client_request_duration_ms", "call" => call.to_string())
            .record(started.elapsed().as_millis() as f64);

        let response = result?;
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PgError::Unauthorized),
            status => Err(decode::error_response(ctx, status, response).await),
        }
    }

    async fn execute<B>(
        &self,
        ctx: &CancellationToken,
        method: Method,
        url: &str,
        body: Option<&B>,
        accept: Accept,
    ) -> Result<Response, PgError>
    where
        B: Serialize + ?Sized,
    {
        if ctx.is_cancelled() {
            return Err(PgError::Cancelled);
        }

        let mut request = self
            .http
            .request(method, url)
            .headers(self.headers.clone())
            .header(ACCEPT, accept.header());

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(PgError::Cancelled),
            result = request.send() => result.map_err(PgError::from),
        }
    }
}

/// Last path segment of `url`, used to label logs and metrics
fn call_name(url: &str) -> &str {
    let path = url
        .split_once("://")
        .map_or(url, |(_, rest)| rest.split_once('/').map_or("", |(_, path)| path));
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/').rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => "/",
    }
}
