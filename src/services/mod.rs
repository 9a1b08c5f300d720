pub mod auth_service;
pub mod bus_service;
pub mod seed_service;
pub mod ticket_service;
pub mod user_service;
