use serde::Serialize;
use tracing::warn;

use super::{render_content, WebhookClient, WebhookSender};
use crate::error::NotifyError;
use crate::message::{DiscordEmbed, Message, Target};

/// Execute-webhook body accepted by Discord
#[derive(Debug, Serialize)]
struct DiscordPayload<'a> {
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<&'a DiscordEmbed>,
}

/// Delivers Discord-shaped messages to a Discord channel webhook
pub struct DiscordSender {
    client: WebhookClient,
    webhook_url: String,
}

impl DiscordSender {
    pub fn new(client: WebhookClient, webhook_url: &str) -> Self {
        Self {
            client,
            webhook_url: webhook_url.trim().to_string(),
        }
    }
}

impl WebhookSender for DiscordSender {
    fn target(&self) -> Target {
        Target::Discord
    }

    fn send(&self, message: Message) -> Result<(), NotifyError> {
        let Message::Discord(messages) = &message else {
            warn!(
                "Discord sender received a {} message, skipping delivery",
                message.kind()
            );
            return Ok(());
        };

        if self.webhook_url.is_empty() {
            warn!("Discord webhook URL is not configured, skipping delivery");
            return Ok(());
        }

        let payload = DiscordPayload {
            content: render_content(&message),
            embeds: messages.iter().flat_map(|m| m.embeds.iter()).collect(),
        };
        self.client
            .post_detached(Target::Discord, &self.webhook_url, &payload)
    }
}
