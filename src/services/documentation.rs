use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the session store node.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::session::list_sessions,
        crate::routes::session::get_session,
        crate::routes::session::put_session,
        crate::routes::session::patch_members,
        crate::routes::session::delete_session,
        crate::routes::watch::watch_session,
    ),
    components(
        schemas(
            crate::dao::models::SessionEntity,
            crate::dao::models::SessionListItemEntity,
            crate::dto::health::HealthResponse,
            crate::dto::session::MemberPatchRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sessions", description = "Session document storage"),
        (name = "watch", description = "Server-sent session snapshot streams"),
    )
)]
pub struct ApiDoc;
