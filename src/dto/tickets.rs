use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::Ticket;

#[derive(Debug, Deserialize, ToSchema, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct TicketListQuery {
    /// `open` or `closed`
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketList {
    pub count: usize,
    pub tickets: Vec<Ticket>,
}

/// Body of a seat status change. `userId` is required when closing a seat.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub user_id: Option<Uuid>,
    pub status: String,
}
