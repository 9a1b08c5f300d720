pub mod auth;
pub mod buses;
pub mod tickets;
pub mod users;
