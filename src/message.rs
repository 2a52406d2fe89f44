use chrono::{DateTime, Utc};
use serde::Serialize;

/// Logical destination of a notification.
///
/// `All` is a dispatch directive: it asks for a broadcast and is never a
/// deliverable target on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Slack,
    Discord,
    All,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Slack => write!(f, "slack"),
            Target::Discord => write!(f, "discord"),
            Target::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for Target {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slack" => Ok(Target::Slack),
            "discord" => Ok(Target::Discord),
            "all" => Ok(Target::All),
            other => anyhow::bail!("Unknown target '{}', expected slack, discord or all", other),
        }
    }
}

/// Platform-agnostic alert content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonMessage {
    pub title: String,
    pub lines: Vec<String>,
}

impl CommonMessage {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackMessage {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordMessage {
    pub title: String,
    pub lines: Vec<String>,
    pub embeds: Vec<DiscordEmbed>,
}

/// A Discord rich embed block. Serializes to the webhook API shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscordEmbed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// RGB colour as a single integer, e.g. `0xE74C3C`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl DiscordEmbed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }
}

/// Every shape a notification can take on its way to a sender.
///
/// Platform variants hold a list so several alerts can be batched into one
/// webhook call; conversion from a `CommonMessage` always yields one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Common(CommonMessage),
    Slack(Vec<SlackMessage>),
    Discord(Vec<DiscordMessage>),
}

impl Message {
    /// Short variant name used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Common(_) => "common",
            Message::Slack(_) => "slack",
            Message::Discord(_) => "discord",
        }
    }

    /// Title and lines of every contained message, in order
    pub fn sections(&self) -> Vec<(&str, &[String])> {
        match self {
            Message::Common(m) => vec![(m.title.as_str(), m.lines.as_slice())],
            Message::Slack(msgs) => msgs
                .iter()
                .map(|m| (m.title.as_str(), m.lines.as_slice()))
                .collect(),
            Message::Discord(msgs) => msgs
                .iter()
                .map(|m| (m.title.as_str(), m.lines.as_slice()))
                .collect(),
        }
    }
}

impl From<CommonMessage> for Message {
    fn from(message: CommonMessage) -> Self {
        Message::Common(message)
    }
}
