use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::{Pool, Postgres};
use time::{Duration, OffsetDateTime};

use crate::db::cohort;
use crate::shared::activity;
use crate::shared::constants::{ACTIVITY_WINDOW_DAYS, WEEKLY_COHORT_SIZE};
use crate::shared::lucky::DailyLuckyGate;
use crate::shared::util::{jst_now, next_daily_occurrence, next_weekly_occurrence, week_start_of};

/// Clears the daily lucky set at every midnight JST. One timer task, never
/// overlapping itself; it only touches draw-handling state through the
/// gate's synchronized accessors.
pub async fn initialize_daily_lucky_reset(lucky_gate: Arc<DailyLuckyGate>) {
    loop {
        sleep_until(next_daily_occurrence(jst_now())).await;
        lucky_gate.reset_daily();
        tracing::info!("Cleared the daily lucky set.");
    }
}

/// Rotates the weekly unlimited cohort at every Monday midnight JST. A
/// failed rotation is logged and retried the following week.
pub async fn initialize_weekly_rotation(pool: Pool<Postgres>) {
    loop {
        sleep_until(next_weekly_occurrence(jst_now())).await;
        if let Err(e) = run_weekly_rotation(&pool).await {
            tracing::error!("Failed to rotate the weekly unlimited cohort: {}", e);
        }
    }
}

/// Replaces this week's unlimited cohort with a random sample of recently
/// active users. An empty candidate set produces an empty cohort.
pub async fn run_weekly_rotation(pool: &Pool<Postgres>) -> anyhow::Result<()> {
    let week_start = week_start_of(jst_now().date());
    let window_start = jst_now() - Duration::days(ACTIVITY_WINDOW_DAYS);
    let candidates = activity::recent_active_user_ids(window_start).await?;
    let members = sample_cohort(&candidates, &mut rand::thread_rng());
    cohort::replace_week(pool, week_start, &members).await?;
    tracing::info!(
        "Replaced the unlimited cohort for {}: {:?}",
        week_start,
        members
    );
    Ok(())
}

/// Uniform sample of `min(3, |candidates|)` distinct users.
pub fn sample_cohort(candidates: &HashSet<i64>, rng: &mut impl Rng) -> Vec<i64> {
    let pool = candidates.iter().copied().collect::<Vec<_>>();
    pool.choose_multiple(rng, WEEKLY_COHORT_SIZE.min(pool.len()))
        .copied()
        .collect()
}

async fn sleep_until(next: OffsetDateTime) {
    let duration = next - OffsetDateTime::now_utc();
    tokio::time::sleep(std::time::Duration::from_secs_f32(
        duration.as_seconds_f32().max(0.0),
    ))
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_three_distinct_members_from_five() {
        let candidates = HashSet::from([1, 2, 3, 4, 5]);
        let mut rng = StdRng::seed_from_u64(42);

        let members = sample_cohort(&candidates, &mut rng);

        assert_eq!(members.len(), 3);
        let distinct = members.iter().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), 3);
        assert!(members.iter().all(|member| candidates.contains(member)));
    }

    #[test]
    fn keeps_every_candidate_when_fewer_than_three() {
        let candidates = HashSet::from([10, 20]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut members = sample_cohort(&candidates, &mut rng);
        members.sort_unstable();

        assert_eq!(members, vec![10, 20]);
    }

    #[test]
    fn empty_candidates_produce_an_empty_cohort() {
        let candidates = HashSet::new();
        let mut rng = StdRng::seed_from_u64(42);
        assert!(sample_cohort(&candidates, &mut rng).is_empty());
    }

    #[test]
    fn disjoint_weeks_share_no_members() {
        let first_week = HashSet::from([1, 2, 3, 4, 5]);
        let second_week = HashSet::from([6, 7, 8, 9, 10]);
        let mut rng = StdRng::seed_from_u64(42);

        let first = sample_cohort(&first_week, &mut rng);
        let second = sample_cohort(&second_week, &mut rng);

        assert!(first.iter().all(|member| !second.contains(member)));
        assert!(second.iter().all(|member| second_week.contains(member)));
    }
}
