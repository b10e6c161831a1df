use sqlx::{Executor, Pool, Postgres};
use time::Date;

use crate::model::omikuji::DrawResult;

/// Insert-or-replace the single result row for (user, date). A repeat draw
/// on the same day overwrites the earlier outcome; the attempt counter in
/// omikuji_history still reflects every attempt.
pub async fn upsert<'e, E>(
    executor: E,
    user_id: i64,
    date: Date,
    tier_name: &str,
    message: &str,
) -> anyhow::Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO omikuji_results (user_id, date, result, message)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, date) DO UPDATE SET result = $3, message = $4
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(tier_name)
    .bind(message)
    .execute(executor)
    .await?;
    Ok(())
}

/// Point lookup used for the prior two days' narrative context. Absence is
/// a normal outcome, not an error.
pub async fn get(
    pool: &Pool<Postgres>,
    user_id: i64,
    date: Date,
) -> anyhow::Result<Option<DrawResult>> {
    let row = sqlx::query_as::<_, DrawResult>(
        "SELECT result, message FROM omikuji_results WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete_user_results<'e, E>(executor: E, user_id: i64) -> anyhow::Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("DELETE FROM omikuji_results WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn truncate_results<'e, E>(executor: E) -> anyhow::Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("TRUNCATE omikuji_results").execute(executor).await?;
    Ok(())
}
