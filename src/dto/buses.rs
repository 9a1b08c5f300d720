use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{models::Bus, response::Link};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusSummary {
    #[serde(flatten)]
    pub bus: Bus,
    pub request: Link,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BusList {
    pub count: usize,
    pub buses: Vec<BusSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub bus_id: Uuid,
    pub tickets_reset: u64,
    pub request: Link,
}
