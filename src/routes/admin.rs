use axum::{
    Json, Router,
    extract::State,
    routing::{patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        auth::{TokenRequest, TokenResponse},
        buses::ResetSummary,
    },
    error::AppResult,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{auth_service, bus_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(issue_token))
        .route("/reset/{bus_id}", patch(reset_bus))
}

#[utoipa::path(
    post,
    path = "/admin/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Issue a one-hour admin token", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Bad credentials or not an admin"),
    ),
    tag = "Admin"
)]
pub async fn issue_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TokenRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::issue_admin_token(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/admin/reset/{bus_id}",
    params(
        ("bus_id" = Uuid, Path, description = "Bus ID")
    ),
    responses(
        (status = 200, description = "Reopen every ticket of the bus", body = ApiResponse<ResetSummary>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Bus not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reset_bus(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(bus_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<ResetSummary>>> {
    let resp = bus_service::reset_bus(&state, &user, bus_id).await?;
    Ok(Json(resp))
}
