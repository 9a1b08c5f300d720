use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{TokenRequest, TokenResponse},
        buses::{BusList, BusSummary, ResetSummary},
        tickets::{TicketList, TicketListQuery, UpdateTicketRequest},
        users::{SignupRequest, UpdateUserRequest, UserList},
    },
    entity::tickets::TicketStatus,
    models::{Bus, Ticket, User},
    response::{ApiResponse, Link, Meta},
    routes::{admin, buses, health, params, tickets, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        buses::list_buses,
        buses::get_bus,
        tickets::list_tickets,
        tickets::get_ticket,
        tickets::update_ticket,
        tickets::get_ticket_user,
        admin::issue_token,
        admin::reset_bus,
        users::signup,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user
    ),
    components(
        schemas(
            Bus,
            Ticket,
            TicketStatus,
            User,
            Link,
            BusSummary,
            BusList,
            ResetSummary,
            TicketList,
            TicketListQuery,
            UpdateTicketRequest,
            SignupRequest,
            UpdateUserRequest,
            UserList,
            TokenRequest,
            TokenResponse,
            params::Pagination,
            Meta,
            ApiResponse<BusList>,
            ApiResponse<TicketList>,
            ApiResponse<Ticket>,
            ApiResponse<User>,
            ApiResponse<TokenResponse>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Buses", description = "Bus endpoints"),
        (name = "Tickets", description = "Seat booking endpoints"),
        (name = "Users", description = "User endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
