use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{
    dto::validation::validate_session_code,
    error::AppError,
    services::watch_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sessions/{code}/watch",
    tag = "watch",
    params(("code" = String, Path, description = "Session code")),
    responses(
        (status = 200, description = "Session snapshot stream", content_type = "text/event-stream", body = String),
        (status = 400, description = "Malformed session code"),
    )
)]
/// Stream full session snapshots to a watching client.
///
/// Subscribing to a code that does not exist yet is allowed; the stream
/// opens with a `missing` event and flips to snapshots once the document is
/// written.
pub async fn watch_session(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    validate_session_code(&code).map_err(|err| {
        AppError::BadRequest(
            err.message
                .map(|message| message.to_string())
                .unwrap_or_else(|| "invalid session code".into()),
        )
    })?;

    let signals = state
        .store()
        .subscribe(code.clone())
        .await
        .map_err(|err| AppError::ServiceUnavailable(err.to_string()))?;

    info!(code, "new session watch connection");
    Ok(watch_service::to_sse_stream(signals, code))
}

/// Configure the watch endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sessions/{code}/watch", get(watch_session))
}
