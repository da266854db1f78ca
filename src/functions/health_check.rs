use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::error::Result;
use crate::slack::{build_health_check_message, SlackNotifier};
use crate::types::HealthStatus;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct HealthCheck {
    notifier: SlackNotifier,
}

impl HealthCheck {
    pub fn new(notifier: SlackNotifier) -> Self {
        Self { notifier }
    }

    pub async fn execute(&self) -> Result<HealthStatus> {
        self.execute_at(Local::now().naive_local()).await
    }

    /// Report health as of `now` (local wall-clock time).
    pub async fn execute_at(&self, now: NaiveDateTime) -> Result<HealthStatus> {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let message = build_health_check_message(&timestamp);
        self.notifier.send_message(&message).await?;
        info!("Health check reported at {}", timestamp);

        Ok(HealthStatus {
            status: "healthy".to_string(),
            timestamp,
        })
    }
}
