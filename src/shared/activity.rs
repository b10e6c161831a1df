use std::collections::HashSet;

use anyhow::Context;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::shared::configuration::CONFIGURATION;
use crate::shared::HTTP_CLIENT;

const BASE_URL: &str = "https://discord.com/api/v10";
const PAGE_SIZE: usize = 100;

/// Discord epoch (2015-01-01T00:00:00Z) in milliseconds.
const DISCORD_EPOCH_MS: i128 = 1_420_070_400_000;

#[derive(Deserialize, Clone, Debug)]
struct ChannelMessage {
    id: String,
    author: MessageAuthor,
}

#[derive(Deserialize, Clone, Debug)]
struct MessageAuthor {
    id: String,
    #[serde(default)]
    bot: bool,
}

/// Collects the ids of every non-bot user that posted in one of the
/// configured source channels after `window_start`. An empty result is a
/// quiet week, not an error.
pub async fn recent_active_user_ids(
    window_start: OffsetDateTime,
) -> anyhow::Result<HashSet<i64>> {
    let mut user_ids = HashSet::new();
    for channel_id in CONFIGURATION.weekly_source_channels.iter() {
        collect_channel_activity(*channel_id, window_start, &mut user_ids).await?;
    }
    Ok(user_ids)
}

async fn collect_channel_activity(
    channel_id: u64,
    window_start: OffsetDateTime,
    user_ids: &mut HashSet<i64>,
) -> anyhow::Result<()> {
    let mut after = snowflake_at(window_start);
    loop {
        let url = format!(
            "{}/channels/{}/messages?after={}&limit={}",
            BASE_URL, channel_id, after, PAGE_SIZE
        );
        let messages = HTTP_CLIENT
            .get(&url)
            .header(
                "Authorization",
                format!("Bot {}", &CONFIGURATION.discord_bot_token),
            )
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ChannelMessage>>()
            .await?;

        for message in messages.iter() {
            if !message.author.bot {
                let user_id = message
                    .author
                    .id
                    .parse::<i64>()
                    .context("Discord returned a non-numeric user id.")?;
                user_ids.insert(user_id);
            }
            let message_id = message
                .id
                .parse::<u64>()
                .context("Discord returned a non-numeric message id.")?;
            after = after.max(message_id);
        }

        if messages.len() < PAGE_SIZE {
            return Ok(());
        }
    }
}

/// The snowflake id a message created at `timestamp` would carry. Used as
/// the paging cursor for the trailing activity window.
fn snowflake_at(timestamp: OffsetDateTime) -> u64 {
    let unix_ms = timestamp.unix_timestamp_nanos() / 1_000_000;
    ((unix_ms - DISCORD_EPOCH_MS).max(0) as u64) << 22
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_anchor_to_the_discord_epoch() {
        let epoch = OffsetDateTime::from_unix_timestamp(1_420_070_400).unwrap();
        assert_eq!(snowflake_at(epoch), 0);

        let later = epoch + time::Duration::seconds(1);
        assert_eq!(snowflake_at(later), 1000 << 22);

        // Pre-epoch windows clamp to zero instead of wrapping.
        let earlier = epoch - time::Duration::days(1);
        assert_eq!(snowflake_at(earlier), 0);
    }
}
