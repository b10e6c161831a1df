use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::db::{quota, results};
use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::errors::ServerError;

/// Destructive reset of one user's counters and results. The frontend is
/// responsible for checking that the requesting chat user is an admin.
pub async fn reset_user_history(
    _claim: Claim,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Response {
    match clear_user(&state, user_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            let error_message = format!("Failed to reset the user's omikuji history: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

/// Destructive reset of every user's counters and results.
pub async fn reset_all_history(_claim: Claim, State(state): State<AppState>) -> Response {
    match clear_all(&state).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            let error_message = format!("Failed to reset all omikuji history: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

async fn clear_user(state: &AppState, user_id: i64) -> anyhow::Result<()> {
    let mut transaction = state.pool.begin().await?;
    quota::delete_user_history(&mut *transaction, user_id).await?;
    results::delete_user_results(&mut *transaction, user_id).await?;
    transaction.commit().await?;
    Ok(())
}

async fn clear_all(state: &AppState) -> anyhow::Result<()> {
    let mut transaction = state.pool.begin().await?;
    quota::truncate_history(&mut *transaction).await?;
    results::truncate_results(&mut *transaction).await?;
    transaction.commit().await?;
    Ok(())
}
