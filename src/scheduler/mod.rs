pub mod tasks;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

use crate::dispatch::NotificationService;
use crate::platform::WebhookClient;

/// Cron-driven broadcasts through a [`NotificationService`].
///
/// Jobs only start deliveries; `shutdown` stops the cron loop and then waits
/// for whatever the jobs left in flight on the shared [`WebhookClient`].
pub struct NotificationScheduler {
    inner: JobScheduler,
    service: Arc<NotificationService>,
    client: WebhookClient,
}

impl NotificationScheduler {
    pub async fn new(service: Arc<NotificationService>, client: WebhookClient) -> Result<Self> {
        let inner = JobScheduler::new()
            .await
            .context("Failed to create job scheduler")?;
        Ok(Self {
            inner,
            service,
            client,
        })
    }

    /// Broadcast `title` with freshly built `lines` on every tick of `cron_expr`
    pub async fn add_broadcast<F>(&self, cron_expr: &str, title: &str, lines: F) -> Result<()>
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        let service = self.service.clone();
        let title = title.to_string();
        let job_title = title.clone();

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let service = service.clone();
            let title = job_title.clone();
            let lines = lines();
            Box::pin(async move {
                info!("Scheduled broadcast: {}", title);
                service.send_all(&title, lines);
            })
        })
        .with_context(|| format!("Invalid cron expression for '{}': {}", title, cron_expr))?;

        self.inner
            .add(job)
            .await
            .with_context(|| format!("Failed to schedule broadcast '{}'", title))?;

        info!("Scheduled broadcast '{}' with cron: {}", title, cron_expr);
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        self.inner
            .start()
            .await
            .context("Failed to start scheduler")?;
        info!("Scheduler started");
        Ok(())
    }

    /// Stop firing jobs, then wait up to `drain_timeout` for deliveries they
    /// started. Returns whether every delivery finished.
    pub async fn shutdown(&mut self, drain_timeout: Duration) -> Result<bool> {
        self.inner
            .shutdown()
            .await
            .context("Failed to shutdown scheduler")?;

        let idle = self.client.drain(drain_timeout).await;
        if !idle {
            warn!(
                "Scheduler stopped with {} webhook deliveries still in flight",
                self.client.in_flight()
            );
        }
        info!("Scheduler stopped");
        Ok(idle)
    }
}
