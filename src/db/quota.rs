use sqlx::{Executor, Pool, Postgres};
use time::Date;

use crate::db::cohort;
use crate::model::omikuji::{evaluate_quota, QuotaEvaluation};
use crate::shared::util::week_start_of;

/// Reads the quota state for one draw event. `lucky_member` is the
/// caller's snapshot of the in-process lucky set; the cohort read sees a
/// fully old or fully new week because rotation replaces it in one
/// transaction.
pub async fn evaluate(
    pool: &Pool<Postgres>,
    user_id: i64,
    date: Date,
    lucky_member: bool,
) -> anyhow::Result<QuotaEvaluation> {
    let prior_count = fetch_count(pool, user_id, date).await?;
    let weekly_member = cohort::contains(pool, user_id, week_start_of(date)).await?;
    Ok(evaluate_quota(prior_count, weekly_member, lucky_member))
}

pub async fn fetch_count(pool: &Pool<Postgres>, user_id: i64, date: Date) -> anyhow::Result<i32> {
    let row = sqlx::query_as::<_, (i32,)>(
        "SELECT count FROM omikuji_history WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(count,)| count).unwrap_or(0))
}

/// Counts one attempt, creating the day's row at 1. A single atomic upsert
/// statement, so concurrent attempts for the same key never lose an
/// update. Returns the new count.
pub async fn record_attempt<'e, E>(executor: E, user_id: i64, date: Date) -> anyhow::Result<i32>
where
    E: Executor<'e, Database = Postgres>,
{
    let (count,) = sqlx::query_as::<_, (i32,)>(
        r#"
        INSERT INTO omikuji_history (user_id, date, count)
        VALUES ($1, $2, 1)
        ON CONFLICT (user_id, date) DO UPDATE SET count = omikuji_history.count + 1
        RETURNING count
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

pub async fn delete_user_history<'e, E>(executor: E, user_id: i64) -> anyhow::Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("DELETE FROM omikuji_history WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn truncate_history<'e, E>(executor: E) -> anyhow::Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("TRUNCATE omikuji_history").execute(executor).await?;
    Ok(())
}
