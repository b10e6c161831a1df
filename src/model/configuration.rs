use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone)]
pub struct Configuration {
    pub database_url: String,
    pub jwt_secret: String,
    pub bot_user_name: String,
    pub bot_user_pass: String,
    pub server_bind_point: String,
    pub log_level: String,
    pub openai_api_key: String,
    pub narrative_model: String,
    pub discord_bot_token: String,
    pub weekly_source_channels: Vec<u64>,
    pub outcome_publication_endpoints: Vec<String>,
}
