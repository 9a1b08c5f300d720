pub mod audit_logs;
pub mod buses;
pub mod tickets;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use buses::Entity as Buses;
pub use tickets::Entity as Tickets;
pub use users::Entity as Users;
