#![allow(dead_code)]

use bus_booking_api::{
    db::run_migrations,
    entity::{
        buses::Entity as Buses,
        tickets::{Column as TicketCol, Entity as Tickets, TicketStatus},
        users::ActiveModel as UserActive,
    },
    services::seed_service::{SeededBus, seed_bus},
    state::AppState,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

pub const JWT_KEY: &str = "integration-test-secret";
pub const PUBLIC_URL: &str = "http://localhost:3000";

/// Fresh in-memory database with the schema applied. A single connection
/// keeps every query on the same SQLite memory database.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, JWT_KEY, PUBLIC_URL))
}

pub async fn create_user(
    state: &AppState,
    email: &str,
    password_hash: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let now = Utc::now();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(email.split('@').next().unwrap_or("user").to_string()),
        email: Set(email.to_string()),
        phone: Set(None),
        password_hash: Set(password_hash.to_string()),
        is_admin: Set(is_admin),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(user.id)
}

pub async fn create_bus(state: &AppState, seats: i32) -> anyhow::Result<SeededBus> {
    Ok(seed_bus(&state.orm, seats, 500).await?)
}

pub async fn booked_seats(state: &AppState, bus_id: Uuid) -> anyhow::Result<i32> {
    let bus = Buses::find_by_id(bus_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("bus {bus_id} missing"))?;
    Ok(bus.booked_seats)
}

pub async fn closed_tickets(state: &AppState, bus_id: Uuid) -> anyhow::Result<u64> {
    Ok(Tickets::find()
        .filter(TicketCol::BusId.eq(bus_id))
        .filter(TicketCol::Status.eq(TicketStatus::Closed))
        .count(&state.orm)
        .await?)
}

/// The bus counter must always match the number of closed tickets.
pub async fn assert_counter_consistent(state: &AppState, bus_id: Uuid) -> anyhow::Result<()> {
    let booked = booked_seats(state, bus_id).await?;
    let closed = closed_tickets(state, bus_id).await?;
    assert_eq!(booked as u64, closed, "bookedSeats out of step with closed tickets");
    Ok(())
}
