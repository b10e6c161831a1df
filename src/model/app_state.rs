use crate::model::fortune::FortuneCatalog;
use crate::shared::lucky::DailyLuckyGate;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub catalog: Arc<FortuneCatalog>,
    pub lucky_gate: Arc<DailyLuckyGate>,
}
