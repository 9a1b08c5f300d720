use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::tickets::{TicketList, TicketListQuery, UpdateTicketRequest},
    entity::{
        buses::{Column as BusCol, Entity as Buses, Model as BusModel},
        tickets::{Column as TicketCol, Entity as Tickets, Model as TicketModel, TicketStatus},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::{Ticket, User},
    response::{ApiResponse, Meta},
    services::bus_service::find_bus,
    state::AppState,
};

pub async fn list_tickets(
    state: &AppState,
    bus_id: Uuid,
    query: TicketListQuery,
) -> AppResult<ApiResponse<TicketList>> {
    // Validate the filter before touching the store.
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<TicketStatus>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    find_bus(&state.orm, bus_id).await?;

    let mut condition = Condition::all().add(TicketCol::BusId.eq(bus_id));
    if let Some(status) = status {
        condition = condition.add(TicketCol::Status.eq(status));
    }

    let tickets: Vec<Ticket> = Tickets::find()
        .filter(condition)
        .order_by_asc(TicketCol::SeatNumber)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ticket::from)
        .collect();

    let count = tickets.len();
    let message = if count == 0 { "No tickets found" } else { "Tickets" };
    Ok(ApiResponse::success(
        message,
        TicketList { count, tickets },
        Some(Meta::total(count as i64)),
    ))
}

pub async fn get_ticket(
    state: &AppState,
    bus_id: Uuid,
    seat_number: i32,
) -> AppResult<ApiResponse<Ticket>> {
    let bus = find_bus(&state.orm, bus_id).await?;
    ensure_seat_in_range(&bus, seat_number)?;
    let ticket = find_ticket(&state.orm, bus_id, seat_number).await?;
    Ok(ApiResponse::success(
        "Ticket",
        Ticket::from(ticket),
        Some(Meta::empty()),
    ))
}

/// Returns the user holding a closed seat.
pub async fn get_ticket_user(
    state: &AppState,
    bus_id: Uuid,
    seat_number: i32,
) -> AppResult<ApiResponse<User>> {
    let bus = find_bus(&state.orm, bus_id).await?;
    ensure_seat_in_range(&bus, seat_number)?;
    let ticket = find_ticket(&state.orm, bus_id, seat_number).await?;

    let user_id = match (ticket.status, ticket.user_id) {
        (TicketStatus::Closed, Some(user_id)) => user_id,
        _ => {
            return Err(AppError::NotFound(format!(
                "Seat {seat_number} is not booked"
            )));
        }
    };

    let user = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {user_id} does not exist")))?;

    Ok(ApiResponse::success(
        "Booked by",
        User::from(user),
        Some(Meta::empty()),
    ))
}

/// Books (`closed`) or releases (`open`) a seat, keeping the owning bus's
/// `booked_seats` counter in step within one transaction.
pub async fn update_ticket_status(
    state: &AppState,
    bus_id: Uuid,
    seat_number: i32,
    payload: UpdateTicketRequest,
) -> AppResult<ApiResponse<Ticket>> {
    let target = payload
        .status
        .parse::<TicketStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let bus = find_bus(&state.orm, bus_id).await?;
    ensure_seat_in_range(&bus, seat_number)?;

    let user = match payload.user_id {
        Some(user_id) => Some(
            Users::find_by_id(user_id)
                .one(&state.orm)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("User with ID {user_id} does not exist"))
                })?,
        ),
        None => None,
    };

    let booking_user = match target {
        TicketStatus::Closed => {
            let user = user.as_ref().ok_or_else(|| {
                AppError::BadRequest("userId is required to book a seat".into())
            })?;
            if user.is_admin {
                return Err(AppError::Unauthorized("Admins cannot book seats".into()));
            }
            Some(user.id)
        }
        TicketStatus::Open => None,
    };

    let txn = state.orm.begin().await?;
    let ticket = find_ticket(&txn, bus_id, seat_number).await?;

    let (action, actor) = match booking_user {
        Some(user_id) => {
            book(&txn, &bus, &ticket, user_id).await?;
            ("ticket_book", Some(user_id))
        }
        None => {
            release(&txn, &bus, &ticket).await?;
            ("ticket_cancel", user.map(|u| u.id).or(ticket.user_id))
        }
    };

    let ticket = find_ticket(&txn, bus_id, seat_number).await?;
    txn.commit().await?;

    tracing::info!(
        bus_id = %bus_id,
        seat_number,
        status = %ticket.status,
        "ticket status updated"
    );
    audit::record(
        &state.orm,
        actor,
        action,
        "tickets",
        serde_json::json!({ "bus_id": bus_id, "seat_number": seat_number }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Seat {seat_number} is now {}", ticket.status),
        Ticket::from(ticket),
        Some(Meta::empty()),
    ))
}

async fn book<C>(conn: &C, bus: &BusModel, ticket: &TicketModel, user_id: Uuid) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let result = Tickets::update_many()
        .col_expr(TicketCol::Status, Expr::value(TicketStatus::Closed))
        .col_expr(TicketCol::UserId, Expr::value(Some(user_id)))
        .col_expr(TicketCol::BookingDate, Expr::value(Some(now.fixed_offset())))
        .filter(TicketCol::Id.eq(ticket.id))
        .filter(TicketCol::Status.eq(TicketStatus::Open))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(format!(
            "Seat {} is already booked",
            ticket.seat_number
        )));
    }

    let result = Buses::update_many()
        .col_expr(BusCol::BookedSeats, Expr::col(BusCol::BookedSeats).add(1))
        .filter(BusCol::Id.eq(bus.id))
        .filter(Expr::col(BusCol::BookedSeats).lt(Expr::col(BusCol::TotalSeats)))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Internal(anyhow::anyhow!(
            "bus {} booked seat counter is already at capacity",
            bus.id
        )));
    }

    Ok(())
}

async fn release<C>(conn: &C, bus: &BusModel, ticket: &TicketModel) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let result = Tickets::update_many()
        .col_expr(TicketCol::Status, Expr::value(TicketStatus::Open))
        .col_expr(TicketCol::UserId, Expr::value(Option::<Uuid>::None))
        .col_expr(
            TicketCol::BookingDate,
            Expr::value(Option::<chrono::DateTime<chrono::FixedOffset>>::None),
        )
        .filter(TicketCol::Id.eq(ticket.id))
        .filter(TicketCol::Status.eq(TicketStatus::Closed))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(format!(
            "Seat {} is not booked",
            ticket.seat_number
        )));
    }

    let result = Buses::update_many()
        .col_expr(BusCol::BookedSeats, Expr::col(BusCol::BookedSeats).sub(1))
        .filter(BusCol::Id.eq(bus.id))
        .filter(BusCol::BookedSeats.gt(0))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        tracing::warn!(bus_id = %bus.id, "booked seat counter already at zero, clamped");
    }

    Ok(())
}

pub(crate) fn ensure_seat_in_range(bus: &BusModel, seat_number: i32) -> AppResult<()> {
    if seat_number < 1 || seat_number > bus.total_seats {
        return Err(AppError::BadRequest(format!(
            "Seat number must be between 1 and {}",
            bus.total_seats
        )));
    }
    Ok(())
}

async fn find_ticket<C>(conn: &C, bus_id: Uuid, seat_number: i32) -> AppResult<TicketModel>
where
    C: ConnectionTrait,
{
    Tickets::find()
        .filter(TicketCol::BusId.eq(bus_id))
        .filter(TicketCol::SeatNumber.eq(seat_number))
        .one(conn)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Seat {seat_number} does not exist on bus {bus_id}"
            ))
        })
}
