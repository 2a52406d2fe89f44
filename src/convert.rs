use crate::error::NotifyError;
use crate::message::{DiscordMessage, Message, SlackMessage, Target};

/// Turns a message into the shape a platform sender expects.
///
/// Already platform-shaped messages pass through untouched; a
/// `CommonMessage` is wrapped into a single platform message.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageConverter;

impl MessageConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(&self, target: Target, message: Message) -> Result<Message, NotifyError> {
        match (target, message) {
            (Target::Slack, Message::Slack(msgs)) => Ok(Message::Slack(msgs)),
            (Target::Slack, Message::Common(common)) => Ok(Message::Slack(vec![SlackMessage {
                title: common.title,
                lines: common.lines,
            }])),
            (Target::Discord, Message::Discord(msgs)) => Ok(Message::Discord(msgs)),
            (Target::Discord, Message::Common(common)) => {
                Ok(Message::Discord(vec![DiscordMessage {
                    title: common.title,
                    lines: common.lines,
                    embeds: Vec::new(),
                }]))
            }
            (Target::All, _) => Err(NotifyError::InvalidRoutingTarget(Target::All)),
            (target, other) => Err(NotifyError::UnsupportedMessageType {
                target,
                kind: other.kind(),
            }),
        }
    }
}
