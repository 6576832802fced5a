mod audit;
mod clock;
mod config;
mod db;
mod error;
mod listing;
mod routes;
mod services;
mod state;
mod workflow;
mod workorder;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::workflow::schedule;
use crate::workorder::{InMemoryWorkOrders, PgWorkOrders, WorkOrderRepository};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    let schedules = match &config.schedule_path {
        Some(path) => {
            let loaded = schedule::load_schedules(path).expect("schedule file load failed");
            tracing::info!(path = %path.display(), count = loaded.len(), "schedules loaded");
            loaded
        }
        None => {
            tracing::info!("SCHEDULE_PATH not set — using built-in seed schedule");
            vec![schedule::seed_schedule()]
        }
    };

    let work_orders: Arc<dyn WorkOrderRepository> = match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(url, config.database_max_connections)
                .await
                .expect("database init failed");
            tracing::info!("work orders stored in postgres");
            Arc::new(PgWorkOrders::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set — work orders kept in memory");
            Arc::new(InMemoryWorkOrders::new())
        }
    };

    let port = config.port;
    let state = state::AppState::new(config, schedules, work_orders);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "genba monitor listening");
    axum::serve(listener, app).await.expect("server failed");
}
