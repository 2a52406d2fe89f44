use serde::Serialize;
use tracing::warn;

use super::{render_content, WebhookClient, WebhookSender};
use crate::error::NotifyError;
use crate::message::{Message, Target};

/// Incoming-webhook body accepted by Slack
#[derive(Debug, Serialize)]
struct SlackPayload {
    text: String,
}

/// Delivers Slack-shaped messages to a Slack incoming webhook
pub struct SlackSender {
    client: WebhookClient,
    webhook_url: String,
}

impl SlackSender {
    pub fn new(client: WebhookClient, webhook_url: &str) -> Self {
        Self {
            client,
            webhook_url: webhook_url.trim().to_string(),
        }
    }
}

impl WebhookSender for SlackSender {
    fn target(&self) -> Target {
        Target::Slack
    }

    fn send(&self, message: Message) -> Result<(), NotifyError> {
        if !matches!(message, Message::Slack(_)) {
            warn!(
                "Slack sender received a {} message, skipping delivery",
                message.kind()
            );
            return Ok(());
        }

        if self.webhook_url.is_empty() {
            warn!("Slack webhook URL is not configured, skipping delivery");
            return Ok(());
        }

        let payload = SlackPayload {
            text: render_content(&message),
        };
        self.client
            .post_detached(Target::Slack, &self.webhook_url, &payload)
    }
}
