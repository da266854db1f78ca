use chrono::NaiveDate;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{error, info};

use crate::billing::{today, BillingBackend, CostService};
use crate::error::{Error, Result};
use crate::functions::{CostNotification, HealthCheck};
use crate::slack::SlackNotifier;
use crate::types::{Config, FunctionResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FunctionType {
    #[default]
    CostNotification,
    HealthCheck,
}

impl FunctionType {
    pub const ALL: [FunctionType; 2] = [FunctionType::CostNotification, FunctionType::HealthCheck];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionType::CostNotification => "cost_notification",
            FunctionType::HealthCheck => "health_check",
        }
    }

    pub fn available() -> Vec<&'static str> {
        Self::ALL.iter().map(FunctionType::as_str).collect()
    }
}

impl FromStr for FunctionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownFunctionType(s.to_string()))
    }
}

/// Resolve the requested operation. A missing or null `function_type` means
/// the default; anything that is not a known name is rejected.
pub fn function_type_of(event: &Value) -> Result<FunctionType> {
    match event.get("function_type") {
        None | Some(Value::Null) => Ok(FunctionType::default()),
        Some(Value::String(s)) => s.parse(),
        Some(other) => Err(Error::UnknownFunctionType(other.to_string())),
    }
}

/// Routes invocation events to an operation and wraps the outcome in a
/// [`FunctionResult`].
pub struct Handler<B: BillingBackend> {
    config: Config,
    backend: B,
    fixed_date: Option<NaiveDate>,
}

impl<B: BillingBackend> Handler<B> {
    pub fn new(config: Config, backend: B) -> Self {
        Self {
            config,
            backend,
            fixed_date: None,
        }
    }

    /// Use `date` as "today" instead of the local clock.
    pub fn with_fixed_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn handle(&self, event: &Value) -> FunctionResult {
        let function_type = match function_type_of(event) {
            Ok(t) => t,
            Err(e) => {
                return FunctionResult::new(400, &json!({
                    "error": e.to_string(),
                    "available_functions": FunctionType::available(),
                }));
            }
        };
        info!("Dispatching {}", function_type.as_str());

        let outcome = match function_type {
            FunctionType::CostNotification => self.run_cost_notification().await,
            FunctionType::HealthCheck => self.run_health_check().await,
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                error!("Error: {}", e);
                log_error_chain(&e);
                FunctionResult::new(500, &json!({ "error": e.to_string() }))
            }
        }
    }

    async fn run_cost_notification(&self) -> Result<FunctionResult> {
        let notifier = SlackNotifier::new(None, &self.config)?;
        let costs = CostService::new(&self.backend);
        let notification = CostNotification::new(costs, notifier, self.config.top_services);
        let result = notification
            .execute_for(self.fixed_date.unwrap_or_else(today))
            .await?;

        Ok(FunctionResult::new(200, &json!({
            "message": "Cost notification sent successfully",
            "function_type": FunctionType::CostNotification.as_str(),
            "daily_total": result.daily.total,
            "monthly_total": result.monthly_total,
            "services_count": result.daily.services.len(),
        })))
    }

    async fn run_health_check(&self) -> Result<FunctionResult> {
        let notifier = SlackNotifier::new(None, &self.config)?;
        let status = HealthCheck::new(notifier).execute().await?;

        Ok(FunctionResult::new(200, &json!({
            "message": "Health check completed successfully",
            "function_type": FunctionType::HealthCheck.as_str(),
            "status": status.status,
            "timestamp": status.timestamp,
        })))
    }
}

fn log_error_chain(e: &Error) {
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
    }
    error!("{:?}", e);
}
