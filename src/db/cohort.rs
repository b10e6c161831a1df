use sqlx::{Pool, Postgres};
use time::Date;

pub async fn contains(
    pool: &Pool<Postgres>,
    user_id: i64,
    week_start: Date,
) -> anyhow::Result<bool> {
    let row = sqlx::query_as::<_, (i32,)>(
        "SELECT 1 FROM omikuji_unlimited_users WHERE user_id = $1 AND week_start = $2",
    )
    .bind(user_id)
    .bind(week_start)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

/// Replaces the cohort for one week start in a single transaction; a
/// concurrent draw evaluation sees the old rows or the new ones, never a
/// torn mix. Rows for other week starts are left untouched.
pub async fn replace_week(
    pool: &Pool<Postgres>,
    week_start: Date,
    members: &[i64],
) -> anyhow::Result<()> {
    let mut transaction = pool.begin().await?;
    sqlx::query("DELETE FROM omikuji_unlimited_users WHERE week_start = $1")
        .bind(week_start)
        .execute(&mut *transaction)
        .await?;
    for user_id in members.iter() {
        sqlx::query("INSERT INTO omikuji_unlimited_users (user_id, week_start) VALUES ($1, $2)")
            .bind(*user_id)
            .bind(week_start)
            .execute(&mut *transaction)
            .await?;
    }
    transaction.commit().await?;
    Ok(())
}
