use crate::model::omikuji::{DrawResponse, OutcomePayload};
use crate::shared::configuration::CONFIGURATION;
use crate::shared::HTTP_CLIENT;

/// Pushes a finished outcome to every configured display endpoint. Runs
/// detached, strictly after the draw's authoritative writes have committed;
/// a failed endpoint is logged and skipped.
pub fn publish_outcome(user_id: i64, response: &DrawResponse) {
    let payload = OutcomePayload {
        user_id,
        payload: response.clone(),
    };
    tokio::spawn(async move {
        for endpoint in CONFIGURATION.outcome_publication_endpoints.iter() {
            if let Err(e) = HTTP_CLIENT.post(endpoint).json(&payload).send().await {
                tracing::error!("Failed to publish omikuji outcome: {}", e);
            }
        }
    });
}
