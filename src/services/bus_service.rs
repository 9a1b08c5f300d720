use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::buses::{BusList, BusSummary, ResetSummary},
    entity::{
        buses::{Column as BusCol, Entity as Buses, Model as BusModel},
        tickets::{Column as TicketCol, Entity as Tickets, TicketStatus},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Bus,
    response::{ApiResponse, Link, Meta},
    state::AppState,
};

pub async fn list_buses(state: &AppState) -> AppResult<ApiResponse<BusList>> {
    let buses: Vec<BusSummary> = Buses::find()
        .order_by_asc(BusCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| summarize(&state.public_url, model))
        .collect();

    let count = buses.len();
    Ok(ApiResponse::success(
        "Buses",
        BusList { count, buses },
        Some(Meta::total(count as i64)),
    ))
}

pub async fn get_bus(state: &AppState, bus_id: Uuid) -> AppResult<ApiResponse<BusSummary>> {
    let bus = find_bus(&state.orm, bus_id).await?;
    Ok(ApiResponse::success(
        "Bus",
        summarize(&state.public_url, bus),
        Some(Meta::empty()),
    ))
}

/// Reopens every ticket of a bus and zeroes its counter in one transaction.
pub async fn reset_bus(
    state: &AppState,
    user: &AuthUser,
    bus_id: Uuid,
) -> AppResult<ApiResponse<ResetSummary>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    find_bus(&txn, bus_id).await?;

    Buses::update_many()
        .col_expr(BusCol::BookedSeats, Expr::value(0))
        .filter(BusCol::Id.eq(bus_id))
        .exec(&txn)
        .await?;

    let reopened = Tickets::update_many()
        .col_expr(TicketCol::Status, Expr::value(TicketStatus::Open))
        .col_expr(TicketCol::UserId, Expr::value(Option::<Uuid>::None))
        .col_expr(
            TicketCol::BookingDate,
            Expr::value(Option::<chrono::DateTime<chrono::FixedOffset>>::None),
        )
        .filter(TicketCol::BusId.eq(bus_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(%bus_id, tickets = reopened.rows_affected, "bus tickets reset");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "bus_reset",
        "buses",
        serde_json::json!({ "bus_id": bus_id, "tickets": reopened.rows_affected }),
    )
    .await;

    let summary = ResetSummary {
        bus_id,
        tickets_reset: reopened.rows_affected,
        request: Link::get(&state.public_url, format!("/buses/{bus_id}/tickets?status=open")),
    };
    Ok(ApiResponse::success(
        format!("Successfully reset tickets for bus with ID {bus_id}"),
        summary,
        Some(Meta::empty()),
    ))
}

pub(crate) async fn find_bus<C>(conn: &C, bus_id: Uuid) -> AppResult<BusModel>
where
    C: ConnectionTrait,
{
    Buses::find_by_id(bus_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bus with ID {bus_id} does not exist")))
}

fn summarize(public_url: &str, model: BusModel) -> BusSummary {
    let request = Link::get(public_url, format!("/buses/{}", model.id));
    BusSummary {
        bus: Bus::from(model),
        request,
    }
}
