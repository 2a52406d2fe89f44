use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::HeartbeatConfig;
use crate::scheduler::NotificationScheduler;

/// Register the heartbeat broadcast described by `[heartbeat]`
pub async fn register_heartbeat(
    scheduler: &NotificationScheduler,
    config: &HeartbeatConfig,
) -> anyhow::Result<()> {
    let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "webhook-notifier".to_string());

    scheduler
        .add_broadcast(&config.cron, &config.title, move || {
            heartbeat_lines(&host, Utc::now())
        })
        .await
}

fn heartbeat_lines(host: &str, at: DateTime<Utc>) -> Vec<String> {
    vec![
        format!("{} is alive", host),
        at.to_rfc3339_opts(SecondsFormat::Secs, true),
    ]
}
