//! Unary decoding of response bodies.

use crate::error::PgError;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Body of a non-success response
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(alias = "message")]
    error: String,
}

/// Read the whole body as text, aborting on cancellation
pub(crate) async fn text(ctx: &CancellationToken, response: Response) -> Result<String, PgError> {
    tokio::select! {
        biased;
        _ = ctx.cancelled() => Err(PgError::Cancelled),
        body = response.text() => body.map_err(|e| PgError::network_with_source("Failed to read response body", e)),
    }
}

/// Read the whole body and decode it as JSON into `T`
pub(crate) async fn json<T>(ctx: &CancellationToken, response: Response) -> Result<T, PgError>
where
    T: DeserializeOwned,
{
    let body = text(ctx, response).await?;
    from_body(body)
}

/// Decode `body` into `T`, keeping the raw text on failure
pub(crate) fn from_body<T>(body: String) -> Result<T, PgError>
where
    T: DeserializeOwned,
{
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(e) => Err(PgError::serialization("Failed to decode response", body, e)),
    }
}

/// Turn a non-success response into the error it describes
pub(crate) async fn error_response(
    ctx: &CancellationToken,
    status: StatusCode,
    response: Response,
) -> PgError {
    match text(ctx, response).await {
        Ok(body) => error_from_body(status, body),
        Err(err) => err,
    }
}

fn error_from_body(status: StatusCode, body: String) -> PgError {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => PgError::api(status.as_u16(), envelope.error),
        Err(e) => PgError::serialization("Failed to decode error response", body, e),
    }
}
