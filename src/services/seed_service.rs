use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    entity::{
        buses::{ActiveModel as BusActive, Model as BusModel},
        tickets::{ActiveModel as TicketActive, TicketStatus},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    services::auth_service::hash_password,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SeededBus {
    pub bus: BusModel,
    pub tickets_created: i32,
    pub tickets_failed: i32,
}

/// Creates or promotes the admin account. The password is only set when the
/// account is created.
pub async fn ensure_admin<C>(conn: &C, name: &str, email: &str, password: &str) -> AppResult<Uuid>
where
    C: ConnectionTrait,
{
    let email = email.trim().to_lowercase();
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(conn)
        .await?
    {
        if !existing.is_admin {
            let mut active: UserActive = existing.clone().into();
            active.is_admin = Set(true);
            active.updated_at = Set(Utc::now().into());
            active.update(conn).await?;
            tracing::info!(%email, "promoted existing user to admin");
        }
        return Ok(existing.id);
    }

    let now = Utc::now();
    let admin = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.clone()),
        phone: Set(None),
        password_hash: Set(hash_password(password)?),
        is_admin: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(conn)
    .await?;

    tracing::info!(%email, "admin account created");
    Ok(admin.id)
}

/// Creates a bus with `seats` seats and one open ticket per seat. A ticket
/// that fails to insert is logged and skipped.
pub async fn seed_bus<C>(conn: &C, seats: i32, price: i64) -> AppResult<SeededBus>
where
    C: ConnectionTrait,
{
    if seats <= 0 {
        return Err(AppError::BadRequest("seat count must be positive".into()));
    }

    let bus = BusActive {
        id: Set(Uuid::new_v4()),
        total_seats: Set(seats),
        booked_seats: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    let mut created = 0;
    let mut failed = 0;
    for seat_number in 1..=seats {
        match insert_ticket(conn, bus.id, seat_number, price).await {
            Ok(()) => created += 1,
            Err(err) => {
                failed += 1;
                tracing::warn!(bus_id = %bus.id, seat_number, error = %err, "ticket not seeded");
            }
        }
    }

    tracing::info!(bus_id = %bus.id, seats, created, failed, "bus seeded");
    Ok(SeededBus {
        bus,
        tickets_created: created,
        tickets_failed: failed,
    })
}

/// Inserts one open ticket. A duplicate (bus, seat) pair surfaces as a
/// conflict from the unique index.
pub async fn insert_ticket<C>(conn: &C, bus_id: Uuid, seat_number: i32, price: i64) -> AppResult<()>
where
    C: ConnectionTrait,
{
    TicketActive {
        id: Set(Uuid::new_v4()),
        bus_id: Set(bus_id),
        seat_number: Set(seat_number),
        status: Set(TicketStatus::Open),
        price: Set(price),
        user_id: Set(None),
        booking_date: Set(None),
    }
    .insert(conn)
    .await?;
    Ok(())
}
