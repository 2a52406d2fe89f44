use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub heartbeat: Option<HeartbeatConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookConfig {
    /// Master switch; when false every dispatch is a no-op
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub discord_url: String,
    #[serde(default)]
    pub slack_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            discord_url: String::new(),
            slack_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HeartbeatConfig {
    /// Six-field cron expression (seconds first)
    pub cron: String,
    #[serde(default = "default_heartbeat_title")]
    pub title: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_heartbeat_title() -> String {
    "Heartbeat".to_string()
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.webhook.timeout_secs == 0 {
            anyhow::bail!(
                "[webhook] timeout_secs must be at least 1, a zero timeout fails every delivery"
            );
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_disabled() {
        let config = Config::parse("").unwrap();
        assert!(!config.webhook.enabled);
        assert!(config.webhook.discord_url.is_empty());
        assert!(config.webhook.slack_url.is_empty());
        assert_eq!(config.webhook.timeout(), Duration::from_secs(10));
        assert!(config.heartbeat.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [webhook]
            enabled = true
            discord_url = "https://discord.com/api/webhooks/1/abc"
            slack_url = "https://hooks.slack.com/services/T/B/X"
            timeout_secs = 3

            [heartbeat]
            cron = "0 0 * * * *"
            "#,
        )
        .unwrap();
        assert!(config.webhook.enabled);
        assert_eq!(config.webhook.discord_url, "https://discord.com/api/webhooks/1/abc");
        assert_eq!(config.webhook.slack_url, "https://hooks.slack.com/services/T/B/X");
        assert_eq!(config.webhook.timeout(), Duration::from_secs(3));

        let heartbeat = config.heartbeat.unwrap();
        assert_eq!(heartbeat.cron, "0 0 * * * *");
        assert_eq!(heartbeat.title, "Heartbeat");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Config::parse("[webhook]\nenabled = true\ntimeout_secs = 0\n").unwrap_err();
        assert!(format!("{:#}", err).contains("timeout_secs"));
        assert!(Config::parse("[webhook]\ntimeout_secs = 1\n").is_ok());
    }

    #[test]
    fn test_heartbeat_requires_cron() {
        assert!(Config::parse("[heartbeat]\ntitle = \"ping\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[webhook]\nenabled = true\nslack_url = \"http://localhost/hook\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.webhook.enabled);
        assert_eq!(config.webhook.slack_url, "http://localhost/hook");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
