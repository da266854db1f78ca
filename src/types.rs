use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Config {
    pub slack_webhook_url: Option<String>,
    pub aws_region: String,
    pub top_services: usize,
}

/// Spend attributed to a single AWS service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLineItem {
    pub service: String,
    pub cost: f64,
}

/// One day of spend: the total and the per-service breakdown, most expensive first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyCostResult {
    pub total: f64,
    pub services: Vec<CostLineItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<serde_json::Value>>,
}

impl ChatMessage {
    pub fn text<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            blocks: None,
        }
    }

    pub fn with_blocks<T: Into<String>>(text: T, blocks: Vec<serde_json::Value>) -> Self {
        Self {
            text: text.into(),
            blocks: Some(blocks),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct CostNotificationResult {
    pub date: NaiveDate,
    pub daily: DailyCostResult,
    pub monthly_total: f64,
}

/// Response envelope handed back to the Lambda runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl FunctionResult {
    pub fn new(status_code: u16, body: &serde_json::Value) -> Self {
        Self {
            status_code,
            body: body.to_string(),
        }
    }

    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

// Cost Explorer GetCostAndUsage response, keyed by the API's wire names.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostAndUsage {
    #[serde(default)]
    pub results_by_time: Vec<ResultByTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultByTime {
    #[serde(default)]
    pub groups: Vec<CostGroup>,
    #[serde(default)]
    pub total: HashMap<String, MetricValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostGroup {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub metrics: HashMap<String, MetricValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    pub amount: Option<String>,
    pub unit: Option<String>,
}
