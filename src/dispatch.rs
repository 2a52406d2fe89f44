use std::sync::Arc;

use tracing::{debug, error, info_span, warn};
use uuid::Uuid;

use crate::config::WebhookConfig;
use crate::convert::MessageConverter;
use crate::error::NotifyError;
use crate::message::{CommonMessage, DiscordEmbed, DiscordMessage, Message, SlackMessage, Target};
use crate::platform::WebhookSender;
use crate::router::TargetRouter;

/// Entry point for sending notifications.
///
/// Broadcasts (`Target::All`) try every registered sender and only log the
/// legs that fail. Single-target sends return routing and contract errors to
/// the caller. Nothing happens at all while the service is disabled.
pub struct NotificationService {
    enabled: bool,
    router: TargetRouter,
    converter: MessageConverter,
}

impl NotificationService {
    pub fn new(enabled: bool, router: TargetRouter) -> Self {
        Self {
            enabled,
            router,
            converter: MessageConverter::new(),
        }
    }

    pub fn from_config(config: &WebhookConfig, senders: Vec<Arc<dyn WebhookSender>>) -> Self {
        Self::new(config.enabled, TargetRouter::new(senders))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn router(&self) -> &TargetRouter {
        &self.router
    }

    /// Broadcast to every registered platform. Never fails.
    pub fn send_all(&self, title: &str, lines: Vec<String>) {
        let message = Message::Common(CommonMessage::new(title, lines));
        if let Err(e) = self.dispatch(Target::All, message) {
            error!("Broadcast '{}' failed: {}", title, e);
        }
    }

    pub fn send_slack(&self, title: &str, lines: Vec<String>) -> Result<(), NotifyError> {
        let message = Message::Slack(vec![SlackMessage {
            title: title.to_string(),
            lines,
        }]);
        self.dispatch(Target::Slack, message)
    }

    pub fn send_discord(
        &self,
        title: &str,
        lines: Vec<String>,
        embeds: Vec<DiscordEmbed>,
    ) -> Result<(), NotifyError> {
        let message = Message::Discord(vec![DiscordMessage {
            title: title.to_string(),
            lines,
            embeds,
        }]);
        self.dispatch(Target::Discord, message)
    }

    pub fn dispatch(&self, target: Target, message: Message) -> Result<(), NotifyError> {
        if !self.enabled {
            debug!("Webhooks disabled, dropping {} message for {}", message.kind(), target);
            return Ok(());
        }

        let span = info_span!("dispatch", id = %Uuid::new_v4(), %target);
        let _entered = span.enter();

        match target {
            Target::All => self.broadcast(message),
            _ => self.send_to(target, message),
        }
    }

    fn broadcast(&self, message: Message) -> Result<(), NotifyError> {
        let kind = message.kind();
        let Message::Common(common) = message else {
            return Err(NotifyError::UnsupportedMessageType {
                target: Target::All,
                kind,
            });
        };

        for sender in self.router.all() {
            let leg = sender.target();
            let result = self
                .converter
                .convert(leg, Message::Common(common.clone()))
                .and_then(|converted| sender.send(converted));
            if let Err(e) = result {
                error!("Broadcast to {} failed: {}", leg, e);
            }
        }
        Ok(())
    }

    fn send_to(&self, target: Target, message: Message) -> Result<(), NotifyError> {
        let Some(sender) = self.router.route(target)? else {
            warn!("No sender registered for {}, dropping message", target);
            return Ok(());
        };
        let converted = self.converter.convert(target, message)?;
        sender.send(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::test_support::StubSender;

    fn service(enabled: bool, senders: &[Arc<StubSender>]) -> NotificationService {
        let senders = senders
            .iter()
            .map(|s| s.clone() as Arc<dyn WebhookSender>)
            .collect();
        NotificationService::new(enabled, TargetRouter::new(senders))
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_send_all_reaches_every_sender() {
        let slack = StubSender::new(Target::Slack);
        let discord = StubSender::new(Target::Discord);
        let svc = service(true, &[slack.clone(), discord.clone()]);

        svc.send_all("Deploy Complete", lines(&["service A", "service B"]));

        assert_eq!(
            slack.sent(),
            vec![Message::Slack(vec![SlackMessage {
                title: "Deploy Complete".to_string(),
                lines: lines(&["service A", "service B"]),
            }])]
        );
        assert_eq!(
            discord.sent(),
            vec![Message::Discord(vec![DiscordMessage {
                title: "Deploy Complete".to_string(),
                lines: lines(&["service A", "service B"]),
                embeds: vec![],
            }])]
        );
    }

    #[test]
    fn test_broadcast_isolates_failing_sender() {
        let broken = StubSender::failing(Target::Slack);
        let discord = StubSender::new(Target::Discord);
        let svc = service(true, &[broken.clone(), discord.clone()]);

        let result = svc.dispatch(
            Target::All,
            Message::Common(CommonMessage::new("Outage", lines(&["db down"]))),
        );

        assert!(result.is_ok());
        assert!(broken.sent().is_empty());
        assert_eq!(discord.sent().len(), 1);
    }

    #[test]
    fn test_broadcast_requires_common_message() {
        let slack = StubSender::new(Target::Slack);
        let svc = service(true, &[slack.clone()]);

        let err = svc
            .dispatch(Target::All, Message::Slack(vec![]))
            .unwrap_err();
        assert_eq!(
            err,
            NotifyError::UnsupportedMessageType {
                target: Target::All,
                kind: "slack"
            }
        );
        assert!(slack.sent().is_empty());
    }

    #[test]
    fn test_single_target_unregistered_is_silent() {
        let slack = StubSender::new(Target::Slack);
        let svc = service(true, &[slack.clone()]);

        assert!(svc.send_discord("t", lines(&["x"]), vec![]).is_ok());
        assert!(slack.sent().is_empty());
    }

    #[test]
    fn test_single_target_failure_propagates() {
        let broken = StubSender::failing(Target::Slack);
        let svc = service(true, &[broken]);

        let err = svc.send_slack("t", lines(&["x"])).unwrap_err();
        assert_eq!(err, NotifyError::NoRuntime(Target::Slack));
    }

    #[test]
    fn test_single_target_wrong_variant_propagates() {
        let discord = StubSender::new(Target::Discord);
        let svc = service(true, &[discord.clone()]);

        let err = svc
            .dispatch(Target::Discord, Message::Slack(vec![]))
            .unwrap_err();
        assert!(matches!(err, NotifyError::UnsupportedMessageType { .. }));
        assert!(discord.sent().is_empty());
    }

    #[test]
    fn test_send_discord_keeps_embeds() {
        let discord = StubSender::new(Target::Discord);
        let svc = service(true, &[discord.clone()]);

        let embed = DiscordEmbed::new().title("details").field("env", "prod", true);
        svc.send_discord("Release", lines(&["v1.2.0"]), vec![embed.clone()])
            .unwrap();

        match &discord.sent()[0] {
            Message::Discord(msgs) => assert_eq!(msgs[0].embeds, vec![embed]),
            other => panic!("expected discord message, got {}", other.kind()),
        }
    }

    #[test]
    fn test_disabled_service_never_sends() {
        let slack = StubSender::new(Target::Slack);
        let discord = StubSender::new(Target::Discord);
        let broken = StubSender::failing(Target::Slack);
        let svc = service(false, &[slack.clone(), discord.clone(), broken]);

        svc.send_all("t", lines(&["x"]));
        assert!(svc.send_slack("t", lines(&["x"])).is_ok());
        assert!(svc.send_discord("t", lines(&["x"]), vec![]).is_ok());
        // contract violations are not even checked while disabled
        assert!(svc.dispatch(Target::All, Message::Slack(vec![])).is_ok());

        assert!(slack.sent().is_empty());
        assert!(discord.sent().is_empty());
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let slack = StubSender::new(Target::Slack);
        let config = WebhookConfig::default();
        let svc = NotificationService::from_config(&config, vec![slack.clone() as Arc<dyn WebhookSender>]);

        assert!(!svc.is_enabled());
        assert_eq!(svc.router().all().len(), 1);
        svc.send_all("t", vec![]);
        assert!(slack.sent().is_empty());
    }
}
