pub mod discord;
pub mod slack;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, Instrument};

use crate::config::WebhookConfig;
use crate::emoji::{resolve_line_emoji, resolve_title_emoji};
use crate::error::NotifyError;
use crate::message::{Message, Target};

pub use discord::DiscordSender;
pub use slack::SlackSender;

/// Delivery to one external platform's webhook endpoint.
///
/// `send` returns as soon as delivery has been started. Remote failures are
/// only ever logged; an `Err` means the sender could not even try.
pub trait WebhookSender: Send + Sync {
    fn target(&self) -> Target;

    fn send(&self, message: Message) -> Result<(), NotifyError>;
}

/// Build the senders used by the binary, in registration order
pub fn default_senders(
    config: &WebhookConfig,
    client: &WebhookClient,
) -> Vec<Arc<dyn WebhookSender>> {
    let slack: Arc<dyn WebhookSender> = Arc::new(SlackSender::new(client.clone(), &config.slack_url));
    let discord: Arc<dyn WebhookSender> =
        Arc::new(DiscordSender::new(client.clone(), &config.discord_url));
    vec![slack, discord]
}

/// Render every message section as one body: a decorated header followed by
/// decorated lines, sections separated by a blank line.
pub fn render_content(message: &Message) -> String {
    message
        .sections()
        .into_iter()
        .map(|(title, lines)| {
            let mut block = format!("{} **[{}]**", resolve_title_emoji(title), title);
            for line in lines {
                block.push('\n');
                block.push_str(&format!("{} {}", resolve_line_emoji(line), line));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Shared HTTP client for all senders, with a count of deliveries still in
/// flight so callers can wait for them before shutting down.
#[derive(Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    in_flight: Arc<watch::Sender<usize>>,
}

/// Decrements the in-flight count when the delivery task ends, even on panic
struct InFlightGuard(Arc<watch::Sender<usize>>);

impl InFlightGuard {
    fn acquire(counter: Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build webhook HTTP client")?;
        let (tx, _rx) = watch::channel(0usize);
        Ok(Self {
            http,
            in_flight: Arc::new(tx),
        })
    }

    /// Number of deliveries started but not yet finished
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait until every started delivery has finished, up to `timeout`.
    /// Returns whether the client went idle. Never cancels deliveries.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let mut rx = self.in_flight.subscribe();
        tokio::time::timeout(timeout, rx.wait_for(|n| *n == 0))
            .await
            .is_ok_and(|r| r.is_ok())
    }

    /// POST `payload` as JSON to `url` on a detached task.
    ///
    /// Completion is logged from the task; nothing is reported back.
    pub fn post_detached<T: Serialize>(
        &self,
        target: Target,
        url: &str,
        payload: &T,
    ) -> Result<(), NotifyError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| NotifyError::NoRuntime(target))?;

        let host = reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "<invalid url>".to_string());
        let request = self.http.post(url).json(payload);
        let guard = InFlightGuard::acquire(self.in_flight.clone());

        runtime.spawn(
            async move {
                let _guard = guard;
                match request.send().await {
                    Ok(response) => {
                        let status = response.status();
                        if status.is_success() {
                            info!("{} webhook delivered to {} ({})", target, host, status);
                        } else {
                            let body = response.text().await.unwrap_or_default();
                            error!(
                                "{} webhook rejected by {} ({}): {}",
                                target, host, status, body
                            );
                        }
                    }
                    Err(e) => {
                        error!(
                            "{} webhook delivery to {} failed: {}",
                            target,
                            host,
                            e.without_url()
                        );
                    }
                }
            }
            .instrument(tracing::Span::current()),
        );

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use tokio::sync::Mutex;

    /// Local webhook endpoint that records every JSON body it receives
    #[derive(Clone)]
    pub struct CaptureServer {
        pub addr: SocketAddr,
        pub bodies: Arc<Mutex<Vec<serde_json::Value>>>,
    }

    impl CaptureServer {
        pub async fn start(status: StatusCode) -> Self {
            let bodies = Arc::new(Mutex::new(Vec::new()));
            let app = Router::new()
                .route(
                    "/hook",
                    post(
                        move |State(bodies): State<Arc<Mutex<Vec<serde_json::Value>>>>,
                              Json(body): Json<serde_json::Value>| async move {
                            bodies.lock().await.push(body);
                            status
                        },
                    ),
                )
                .with_state(bodies.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self { addr, bodies }
        }

        pub fn url(&self) -> String {
            format!("http://{}/hook", self.addr)
        }

        pub async fn received(&self) -> Vec<serde_json::Value> {
            self.bodies.lock().await.clone()
        }
    }
}
