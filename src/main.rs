use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webhook_notifier::config::Config;
use webhook_notifier::dispatch::NotificationService;
use webhook_notifier::message::{CommonMessage, Message, Target};
use webhook_notifier::platform::{self, WebhookClient};
use webhook_notifier::scheduler::{tasks, NotificationScheduler};

const USAGE: &str = "Usage:
  webhook-notifier [config.toml] send <slack|discord|all> <title> [line...]
  webhook-notifier [config.toml] run";

enum Command {
    Send {
        target: Target,
        title: String,
        lines: Vec<String>,
    },
    Run,
}

fn parse_args(mut args: Vec<String>) -> Result<(PathBuf, Command)> {
    let config_path = match args.first().map(String::as_str) {
        Some("send") | Some("run") | None => PathBuf::from("config.toml"),
        Some(_) => PathBuf::from(args.remove(0)),
    };

    let command = match args.first().map(String::as_str) {
        None | Some("run") => Command::Run,
        Some("send") => {
            let target = args
                .get(1)
                .with_context(|| format!("Missing target\n{}", USAGE))?
                .parse()?;
            let title = args
                .get(2)
                .cloned()
                .with_context(|| format!("Missing title\n{}", USAGE))?;
            Command::Send {
                target,
                title,
                lines: args.iter().skip(3).cloned().collect(),
            }
        }
        Some(other) => anyhow::bail!("Unknown command '{}'\n{}", other, USAGE),
    };

    Ok((config_path, command))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,webhook_notifier=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (config_path, command) = parse_args(std::env::args().skip(1).collect())?;

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Webhooks enabled: {}", config.webhook.enabled);
    info!("  Slack configured: {}", !config.webhook.slack_url.trim().is_empty());
    info!("  Discord configured: {}", !config.webhook.discord_url.trim().is_empty());

    let client = WebhookClient::new(config.webhook.timeout())?;
    let senders = platform::default_senders(&config.webhook, &client);
    let service = Arc::new(NotificationService::from_config(&config.webhook, senders));
    let drain_timeout = config.webhook.timeout() + Duration::from_secs(1);

    match command {
        Command::Send {
            target,
            title,
            lines,
        } => {
            service
                .dispatch(target, Message::Common(CommonMessage::new(title, lines)))
                .with_context(|| format!("Failed to send notification to {}", target))?;
        }
        Command::Run => {
            let mut scheduler = NotificationScheduler::new(service, client.clone()).await?;
            match &config.heartbeat {
                Some(heartbeat) => tasks::register_heartbeat(&scheduler, heartbeat).await?,
                None => info!("No [heartbeat] configured, waiting for shutdown"),
            }
            scheduler.start().await?;

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            info!("Shutting down...");
            scheduler.shutdown(drain_timeout).await?;
            return Ok(());
        }
    }

    if !client.drain(drain_timeout).await {
        warn!(
            "Exiting with {} webhook deliveries still in flight",
            client.in_flight()
        );
    }

    Ok(())
}
