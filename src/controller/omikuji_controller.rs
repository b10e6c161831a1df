use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use time::{Date, Duration};

use crate::db::{quota, results};
use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::errors::ServerError;
use crate::model::fortune::FortuneOutcome;
use crate::model::omikuji::{attempt_label, DrawResponse, QuotaState};
use crate::shared::narrative;
use crate::shared::notifier;
use crate::shared::util::jst_today;

const NO_PRIOR_RESULT: &str = "なし";

/// One draw event. The counter increment and the result upsert are the
/// authoritative state transition; commentary and display publishing only
/// run after they have committed.
pub async fn draw_omikuji(
    _claim: Claim,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Response {
    let today = jst_today();

    let lucky_member = state.lucky_gate.contains(user_id);
    let evaluation = match quota::evaluate(&state.pool, user_id, today, lucky_member).await {
        Ok(evaluation) => evaluation,
        Err(e) => return storage_error("Failed to evaluate the draw quota", e),
    };

    if evaluation.state == QuotaState::Blocked {
        return blocked_draw(&state, user_id, today, evaluation.prior_count).await;
    }

    allowed_draw(&state, user_id, today, evaluation.unlimited).await
}

async fn blocked_draw(state: &AppState, user_id: i64, today: Date, prior_count: i32) -> Response {
    let attempt = match quota::record_attempt(&state.pool, user_id, today).await {
        Ok(count) => count,
        Err(e) => return storage_error("Failed to record the blocked attempt", e),
    };

    let comment = narrative::escalation_comment(user_id, attempt_label(prior_count)).await;
    let response = DrawResponse::Blocked { attempt, comment };
    notifier::publish_outcome(user_id, &response);
    (StatusCode::OK, Json(response)).into_response()
}

async fn allowed_draw(state: &AppState, user_id: i64, today: Date, unlimited: bool) -> Response {
    let lucky_granted =
        !unlimited && state.lucky_gate.maybe_grant(user_id, &mut rand::thread_rng());

    let context = futures::try_join!(
        results::get(&state.pool, user_id, today - Duration::days(2)),
        results::get(&state.pool, user_id, today - Duration::days(1)),
    );
    let (two_days_ago, yesterday) = match context {
        Ok(context) => context,
        Err(e) => return storage_error("Failed to read the prior results", e),
    };

    let outcome = FortuneOutcome::draw(&state.catalog, &mut rand::thread_rng());

    if let Err(e) = commit_draw(state, user_id, today, &outcome).await {
        return storage_error("Failed to commit the draw", e);
    }

    let pre_comment = narrative::pre_draw_comment(
        user_id,
        two_days_ago
            .as_ref()
            .map(|prior| prior.result.as_str())
            .unwrap_or(NO_PRIOR_RESULT),
        yesterday
            .as_ref()
            .map(|prior| prior.result.as_str())
            .unwrap_or(NO_PRIOR_RESULT),
    )
    .await;
    let post_comment = narrative::result_comment(user_id, &outcome.tier).await;

    let response = DrawResponse::Drawn {
        lucky_granted,
        pre_comment,
        outcome,
        post_comment,
    };
    notifier::publish_outcome(user_id, &response);
    (StatusCode::OK, Json(response)).into_response()
}

/// Increment and upsert commit or fail together; a storage failure leaves
/// neither write observable.
async fn commit_draw(
    state: &AppState,
    user_id: i64,
    today: Date,
    outcome: &FortuneOutcome,
) -> anyhow::Result<()> {
    let mut transaction = state.pool.begin().await?;
    quota::record_attempt(&mut *transaction, user_id, today).await?;
    results::upsert(
        &mut *transaction,
        user_id,
        today,
        &outcome.tier,
        &outcome.message,
    )
    .await?;
    transaction.commit().await?;
    Ok(())
}

pub async fn get_draw_result(
    _claim: Claim,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Response {
    match results::get(&state.pool, user_id, jst_today()).await {
        Ok(Some(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ServerError::with_message(
                "The user has not drawn an omikuji today.",
            )),
        )
            .into_response(),
        Err(e) => storage_error("Failed to read today's result", e),
    }
}

fn storage_error(action: &str, e: anyhow::Error) -> Response {
    let error_message = format!("{}: {}", action, e);
    tracing::error!("{}", &error_message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ServerError::with_message(error_message)),
    )
        .into_response()
}
