use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::tickets::{TicketList, TicketListQuery, UpdateTicketRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    models::{Ticket, User},
    response::ApiResponse,
    services::ticket_service,
    state::AppState,
};

/// Ticket routes, mounted under `/buses`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{bus_id}/tickets", get(list_tickets))
        .route(
            "/{bus_id}/tickets/{seat_number}",
            get(get_ticket).patch(update_ticket),
        )
        .route("/{bus_id}/tickets/{seat_number}/user", get(get_ticket_user))
}

#[utoipa::path(
    get,
    path = "/buses/{bus_id}/tickets",
    params(
        ("bus_id" = Uuid, Path, description = "Bus ID"),
        TicketListQuery
    ),
    responses(
        (status = 200, description = "Tickets of the bus, ordered by seat", body = ApiResponse<TicketList>),
        (status = 400, description = "Invalid status filter"),
        (status = 404, description = "Bus not found"),
    ),
    tag = "Tickets"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    AppPath(bus_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<TicketListQuery>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = ticket_service::list_tickets(&state, bus_id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/buses/{bus_id}/tickets/{seat_number}",
    params(
        ("bus_id" = Uuid, Path, description = "Bus ID"),
        ("seat_number" = i32, Path, description = "Seat number, starting at 1")
    ),
    responses(
        (status = 200, description = "Ticket detail", body = ApiResponse<Ticket>),
        (status = 400, description = "Seat number out of range"),
        (status = 404, description = "Bus or seat not found"),
    ),
    tag = "Tickets"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    AppPath((bus_id, seat_number)): AppPath<(Uuid, i32)>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = ticket_service::get_ticket(&state, bus_id, seat_number).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/buses/{bus_id}/tickets/{seat_number}",
    params(
        ("bus_id" = Uuid, Path, description = "Bus ID"),
        ("seat_number" = i32, Path, description = "Seat number, starting at 1")
    ),
    request_body = UpdateTicketRequest,
    responses(
        (status = 200, description = "Seat booked or released", body = ApiResponse<Ticket>),
        (status = 400, description = "Invalid body or seat number"),
        (status = 401, description = "Admins cannot book seats"),
        (status = 404, description = "User, bus or seat not found"),
        (status = 409, description = "Seat already in the requested state"),
    ),
    tag = "Tickets"
)]
pub async fn update_ticket(
    State(state): State<AppState>,
    AppPath((bus_id, seat_number)): AppPath<(Uuid, i32)>,
    AppJson(payload): AppJson<UpdateTicketRequest>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = ticket_service::update_ticket_status(&state, bus_id, seat_number, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/buses/{bus_id}/tickets/{seat_number}/user",
    params(
        ("bus_id" = Uuid, Path, description = "Bus ID"),
        ("seat_number" = i32, Path, description = "Seat number, starting at 1")
    ),
    responses(
        (status = 200, description = "User holding the seat", body = ApiResponse<User>),
        (status = 400, description = "Seat number out of range"),
        (status = 404, description = "Seat not booked, or bus/seat/user not found"),
    ),
    tag = "Tickets"
)]
pub async fn get_ticket_user(
    State(state): State<AppState>,
    AppPath((bus_id, seat_number)): AppPath<(Uuid, i32)>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = ticket_service::get_ticket_user(&state, bus_id, seat_number).await?;
    Ok(Json(resp))
}
