//! Session document routes.
//!
//! The node stores whatever well-formed record a client writes. Game rules
//! live in the clients; the only thing checked here is the shape of the
//! request and the format of the session code.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use tracing::info;
use validator::Validate;

use crate::{
    dao::models::{SessionEntity, SessionListItemEntity},
    dto::{session::MemberPatchRequest, validation::validate_session_code},
    error::AppError,
    state::SharedState,
};

fn ensure_code(code: &str) -> Result<(), AppError> {
    validate_session_code(code).map_err(|err| {
        AppError::BadRequest(
            err.message
                .map(|message| message.to_string())
                .unwrap_or_else(|| "invalid session code".into()),
        )
    })
}

#[utoipa::path(
    get,
    path = "/sessions",
    tag = "sessions",
    responses((status = 200, description = "All stored sessions", body = [SessionListItemEntity]))
)]
/// List every stored session with its member list.
pub async fn list_sessions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<SessionListItemEntity>>, AppError> {
    let sessions = state.store().list().await.map_err(|err| {
        AppError::ServiceUnavailable(err.to_string())
    })?;
    Ok(Json(sessions))
}

#[utoipa::path(
    get,
    path = "/sessions/{code}",
    tag = "sessions",
    params(("code" = String, Path, description = "Session code")),
    responses(
        (status = 200, description = "The stored session record", body = SessionEntity),
        (status = 400, description = "Malformed session code"),
        (status = 404, description = "No session with this code"),
    )
)]
/// Read one session record.
pub async fn get_session(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<SessionEntity>, AppError> {
    ensure_code(&code)?;

    let record = state
        .store()
        .get(code.clone())
        .await
        .map_err(|err| AppError::ServiceUnavailable(err.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("no session with code `{code}`")))?;

    Ok(Json(record))
}

#[utoipa::path(
    put,
    path = "/sessions/{code}",
    tag = "sessions",
    params(("code" = String, Path, description = "Session code")),
    request_body = SessionEntity,
    responses(
        (status = 204, description = "Record stored"),
        (status = 400, description = "Malformed session code"),
    )
)]
/// Store a full session record, creating or overwriting it.
pub async fn put_session(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Json(record): Json<SessionEntity>,
) -> Result<StatusCode, AppError> {
    ensure_code(&code)?;

    state
        .store()
        .put(code, record)
        .await
        .map_err(|err| AppError::ServiceUnavailable(err.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/sessions/{code}/members",
    tag = "sessions",
    params(("code" = String, Path, description = "Session code")),
    request_body = MemberPatchRequest,
    responses(
        (status = 204, description = "Membership merged"),
        (status = 400, description = "Malformed code or empty patch"),
        (status = 404, description = "No session with this code"),
    )
)]
/// Merge a membership change into a session record.
pub async fn patch_members(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Json(patch): Json<MemberPatchRequest>,
) -> Result<StatusCode, AppError> {
    ensure_code(&code)?;
    patch.validate()?;

    let found = state
        .store()
        .merge_members(code.clone(), patch.into())
        .await
        .map_err(|err| AppError::ServiceUnavailable(err.to_string()))?;

    if !found {
        return Err(AppError::NotFound(format!("no session with code `{code}`")));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/sessions/{code}",
    tag = "sessions",
    params(("code" = String, Path, description = "Session code")),
    responses(
        (status = 204, description = "Record gone, whether or not it existed"),
        (status = 400, description = "Malformed session code"),
    )
)]
/// Delete a session record. Deleting an absent record succeeds.
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    ensure_code(&code)?;

    let existed = state
        .store()
        .delete(code.clone())
        .await
        .map_err(|err| AppError::ServiceUnavailable(err.to_string()))?;
    if existed {
        info!(code, "session deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Configure the session document routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/sessions", get(list_sessions))
        .route(
            "/sessions/{code}",
            get(get_session).put(put_session).delete(delete_session),
        )
        .route("/sessions/{code}/members", patch(patch_members))
}
