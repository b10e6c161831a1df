use crate::shared::configuration::CONFIGURATION;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub mod cohort;
pub mod quota;
pub mod results;

pub async fn initialize_db() -> anyhow::Result<Pool<Postgres>> {
    let connection_string = &CONFIGURATION.database_url;
    let pool = PgPoolOptions::new().connect(connection_string).await?;
    create_tables(&pool).await?;
    Ok(pool)
}

async fn create_tables(pool: &Pool<Postgres>) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS omikuji_history (
            user_id BIGINT NOT NULL,
            date DATE NOT NULL,
            count INT NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS omikuji_results (
            user_id BIGINT NOT NULL,
            date DATE NOT NULL,
            result TEXT NOT NULL,
            message TEXT NOT NULL,
            PRIMARY KEY (user_id, date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS omikuji_unlimited_users (
            user_id BIGINT NOT NULL,
            week_start DATE NOT NULL,
            PRIMARY KEY (user_id, week_start)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
