mod common;

use axum::{extract::State, http::StatusCode};
use bus_booking_api::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_database_up() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let (status, response) = health_check(State(state)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "up");
    Ok(())
}

#[tokio::test]
async fn health_check_reports_closed_database() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    state.orm.clone().close().await?;
    let (status, response) = health_check(State(state)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.0.data.expect("health data").database, "down");
    Ok(())
}
