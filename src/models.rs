use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    buses::Model as BusModel,
    tickets::{Model as TicketModel, TicketStatus},
    users::Model as UserModel,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            is_admin: model.is_admin,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: Uuid,
    pub total_seats: i32,
    pub booked_seats: i32,
}

impl From<BusModel> for Bus {
    fn from(model: BusModel) -> Self {
        Self {
            id: model.id,
            total_seats: model.total_seats,
            booked_seats: model.booked_seats,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub seat_number: i32,
    pub status: TicketStatus,
    pub price: i64,
    pub user: Option<Uuid>,
    pub booking_date: Option<DateTime<Utc>>,
}

impl From<TicketModel> for Ticket {
    fn from(model: TicketModel) -> Self {
        Self {
            id: model.id,
            bus_id: model.bus_id,
            seat_number: model.seat_number,
            status: model.status,
            price: model.price,
            user: model.user_id,
            booking_date: model.booking_date.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
