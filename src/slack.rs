use chrono::NaiveDate;
use tracing::info;

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestBody};
use crate::types::{ChatMessage, Config, DailyCostResult};

const JSON_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];

/// Posts messages to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    http: HttpClient,
    webhook_url: String,
}

impl SlackNotifier {
    /// `webhook_url` overrides the configured URL. Fails with
    /// `MissingWebhookUrl` when neither is set.
    pub fn new(webhook_url: Option<&str>, cfg: &Config) -> Result<Self> {
        let url = webhook_url
            .or(cfg.slack_webhook_url.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(Error::MissingWebhookUrl)?;
        Ok(Self {
            http: HttpClient::new(),
            webhook_url: url.to_string(),
        })
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub async fn send_message(&self, message: &ChatMessage) -> Result<()> {
        let payload = RequestBody::Json(serde_json::to_value(message)?);
        self.http.post(&self.webhook_url, payload, JSON_HEADERS).await?;
        info!("Message sent to Slack successfully");
        Ok(())
    }

    pub async fn send_text(&self, text: &str) -> Result<()> {
        self.send_message(&ChatMessage::text(text)).await
    }

    pub async fn send_blocks(&self, text: &str, blocks: Vec<serde_json::Value>) -> Result<()> {
        self.send_message(&ChatMessage::with_blocks(text, blocks)).await
    }
}

fn header_block(text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "header",
        "text": {"type": "plain_text", "text": text}
    })
}

fn section_block(text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": text}
    })
}

pub fn format_usd(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn build_cost_report_message(
    date: NaiveDate,
    daily: &DailyCostResult,
    monthly_total: f64,
    top_services: usize,
) -> ChatMessage {
    let date_str = date.format("%Y-%m-%d").to_string();
    let text = format!(
        "AWS Cost Report - {}: daily {}, month to date {}",
        date_str,
        format_usd(daily.total),
        format_usd(monthly_total)
    );

    let mut blocks: Vec<serde_json::Value> = Vec::new();
    blocks.push(header_block(&format!("💰 AWS Cost Report - {}", date_str)));
    blocks.push(section_block(&format!(
        "*Daily total:* {}\n*Month to date:* {}",
        format_usd(daily.total),
        format_usd(monthly_total)
    )));

    let mut service_lines: Vec<String> = daily
        .services
        .iter()
        .take(top_services)
        .map(|s| format!("• `{}` {}", s.service, format_usd(s.cost)))
        .collect();
    let hidden = daily.services.len().saturating_sub(top_services);
    if hidden > 0 {
        service_lines.push(format!("...and {} more", hidden));
    }
    if service_lines.is_empty() {
        service_lines.push("No charges recorded.".to_string());
    }
    blocks.push(section_block(&format!("*Cost by service*\n{}", service_lines.join("\n"))));

    ChatMessage::with_blocks(text, blocks)
}

pub fn build_health_check_message(timestamp: &str) -> ChatMessage {
    let blocks = vec![
        header_block("✅ AWS Lambda Health Check"),
        section_block(&format!(
            "*Status:* Healthy\n*Timestamp:* {}\n*Function:* Health Check Lambda",
            timestamp
        )),
    ];
    ChatMessage::with_blocks(format!("AWS Lambda Health Check - {}", timestamp), blocks)
}
