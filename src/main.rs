use std::str::FromStr;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::controller::admin_controller::{reset_all_history, reset_user_history};
use crate::controller::login_controller::login;
use crate::controller::omikuji_controller::{draw_omikuji, get_draw_result};
use crate::db::initialize_db;
use crate::model::app_state::AppState;
use crate::model::fortune::FortuneCatalog;
use crate::shared::configuration::CONFIGURATION;
use crate::shared::lucky::DailyLuckyGate;
use crate::shared::scheduler::{initialize_daily_lucky_reset, initialize_weekly_rotation};

mod controller;
mod db;
mod middleware;
mod model;
mod shared;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let log_level =
        tracing::Level::from_str(&CONFIGURATION.log_level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(log_level).init();

    let catalog = FortuneCatalog::load().expect("Failed to load the fortune catalog.");
    let pool = initialize_db()
        .await
        .expect("Failed to initialize database connection.");
    let lucky_gate = Arc::new(DailyLuckyGate::new());

    tokio::spawn(initialize_daily_lucky_reset(lucky_gate.clone()));
    tokio::spawn(initialize_weekly_rotation(pool.clone()));

    let app_state = AppState {
        pool,
        catalog: Arc::new(catalog),
        lucky_gate,
    };

    let router = Router::new()
        .route("/login", post(login))
        .route("/omikuji/:user_id/draw", post(draw_omikuji))
        .route(
            "/omikuji/:user_id",
            get(get_draw_result).delete(reset_user_history),
        )
        .route("/omikuji", delete(reset_all_history))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&CONFIGURATION.server_bind_point).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
