use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
    sea_query::Index,
};

use crate::entity::{AuditLogs, Buses, Tickets, Users, tickets};

pub type OrmConn = DatabaseConnection;

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Creates every table from its entity definition if it does not exist yet,
/// followed by the per-bus seat uniqueness index.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    create_table(conn, &schema, Users).await?;
    create_table(conn, &schema, Buses).await?;
    create_table(conn, &schema, Tickets).await?;
    create_table(conn, &schema, AuditLogs).await?;

    let seat_index = Index::create()
        .name("idx_tickets_bus_seat")
        .table(Tickets)
        .col(tickets::Column::BusId)
        .col(tickets::Column::SeatNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    conn.execute(backend.build(&seat_index)).await?;

    Ok(())
}

async fn create_table<E>(conn: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let table = entity.table_name().to_owned();
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    conn.execute(conn.get_database_backend().build(&stmt)).await?;
    tracing::debug!(%table, "table ensured");
    Ok(())
}
