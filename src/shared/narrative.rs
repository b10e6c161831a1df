use serde::{Deserialize, Serialize};

use crate::shared::configuration::CONFIGURATION;
use crate::shared::HTTP_CLIENT;

const COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Shown whenever the generator fails or times out. Commentary is garnish;
/// it never aborts a draw.
const FALLBACK_COMMENT: &str = "……（AIが黙っとる）";

const ESCALATION_SYSTEM_PROMPT: &str = "あなたは関西弁で煽るおみくじBotです。";
const PRE_DRAW_SYSTEM_PROMPT: &str = "あなたは関西弁で軽妙にツッコむおみくじBotです。";
const RESULT_SYSTEM_PROMPT: &str = "あなたは関西弁で相手をイジるおみくじBotです。";

#[derive(Serialize, Clone, Debug)]
struct ChatCompletionRequest {
    model: String,
    user: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Clone, Debug)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize, Clone, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Clone, Debug)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize, Clone, Debug)]
struct ChatChoiceMessage {
    content: String,
}

pub async fn escalation_comment(user_id: i64, attempt_label: &str) -> String {
    let prompt = format!(
        "ユーザーが今日{}のおみくじを引こうとしている。短い罵倒コメントを1文。",
        attempt_label
    );
    generate_comment(user_id, ESCALATION_SYSTEM_PROMPT, prompt).await
}

pub async fn pre_draw_comment(user_id: i64, two_days_ago: &str, yesterday: &str) -> String {
    let prompt = format!(
        "ユーザーの過去2日間の運勢は『{}』『{}』です。\n1行目: ツッコミ、2行目: 今おみくじ選んでる演出 → 2文で返してください。",
        two_days_ago, yesterday
    );
    generate_comment(user_id, PRE_DRAW_SYSTEM_PROMPT, prompt).await
}

pub async fn result_comment(user_id: i64, tier_name: &str) -> String {
    let prompt = format!(
        "ユーザーが『{}』を引きました。1文の短いコメントを返してください。",
        tier_name
    );
    generate_comment(user_id, RESULT_SYSTEM_PROMPT, prompt).await
}

async fn generate_comment(user_id: i64, system_prompt: &str, user_prompt: String) -> String {
    match request_completion(user_id, system_prompt, user_prompt).await {
        Ok(comment) => comment,
        Err(e) => {
            tracing::error!("Failed to generate a narrative comment: {}", e);
            FALLBACK_COMMENT.to_string()
        }
    }
}

async fn request_completion(
    user_id: i64,
    system_prompt: &str,
    user_prompt: String,
) -> anyhow::Result<String> {
    let payload = ChatCompletionRequest {
        model: CONFIGURATION.narrative_model.clone(),
        user: user_id.to_string(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: "user",
                content: user_prompt,
            },
        ],
        max_tokens: 60,
        temperature: 0.9,
    };

    let response = HTTP_CLIENT
        .post(COMPLETION_ENDPOINT)
        .bearer_auth(&CONFIGURATION.openai_api_key)
        .timeout(REQUEST_TIMEOUT)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json::<ChatCompletionResponse>()
        .await?;

    response
        .choices
        .first()
        .map(|choice| choice.message.content.trim().to_string())
        .ok_or_else(|| anyhow::anyhow!("The completion response contained no choices."))
}
