use axum::{Json, Router, extract::State, routing::get};
use uuid::Uuid;

use crate::{
    dto::buses::{BusList, BusSummary},
    error::AppResult,
    extract::AppPath,
    response::ApiResponse,
    routes::tickets,
    services::bus_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_buses))
        .route("/{bus_id}", get(get_bus))
        .merge(tickets::router())
}

#[utoipa::path(
    get,
    path = "/buses",
    responses(
        (status = 200, description = "List every bus with its seat counters", body = ApiResponse<BusList>),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Buses"
)]
pub async fn list_buses(State(state): State<AppState>) -> AppResult<Json<ApiResponse<BusList>>> {
    let resp = bus_service::list_buses(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/buses/{bus_id}",
    params(
        ("bus_id" = Uuid, Path, description = "Bus ID")
    ),
    responses(
        (status = 200, description = "Get bus", body = ApiResponse<BusSummary>),
        (status = 400, description = "Malformed bus id"),
        (status = 404, description = "Bus not found"),
    ),
    tag = "Buses"
)]
pub async fn get_bus(
    State(state): State<AppState>,
    AppPath(bus_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<BusSummary>>> {
    let resp = bus_service::get_bus(&state, bus_id).await?;
    Ok(Json(resp))
}
