use bus_booking_api::{
    config::{AppConfig, SeedConfig},
    db::{create_orm_conn, run_migrations},
    services::seed_service::{ensure_admin, seed_bus},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let config = AppConfig::from_env()?;
    let seed = SeedConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure the schema exists.
    run_migrations(&orm).await?;

    let admin_id = ensure_admin(&orm, &seed.admin_name, &seed.admin_email, &seed.admin_password)
        .await?;
    let seeded = seed_bus(&orm, seed.seats, seed.ticket_price).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Bus ID: {} ({} tickets, {} failed)",
        seeded.bus.id, seeded.tickets_created, seeded.tickets_failed
    );
    orm.close().await?;
    Ok(())
}
