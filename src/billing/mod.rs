// Billing queries against the cost-and-usage API
pub mod aws;

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

use crate::error::{Error, Result};
use crate::parsing::{aggregate_daily_costs, monthly_total, BLENDED_COST};
use crate::types::{CostAndUsage, DailyCostResult};

pub use aws::AwsCostExplorer;

pub const SERVICE_DIMENSION: &str = "SERVICE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "DAILY",
            Granularity::Monthly => "MONTHLY",
        }
    }
}

/// A single cost-and-usage request. `end` is exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct CostQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
    pub metrics: Vec<String>,
    pub group_by: Option<String>,
}

impl CostQuery {
    /// `[date, date + 1)`, grouped by service.
    pub fn daily(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date + Duration::days(1),
            granularity: Granularity::Daily,
            metrics: vec![BLENDED_COST.to_string()],
            group_by: Some(SERVICE_DIMENSION.to_string()),
        }
    }

    /// `[first of month, date)`, ungrouped.
    pub fn month_to_date(date: NaiveDate) -> Self {
        Self {
            start: first_of_month(date),
            end: date,
            granularity: Granularity::Monthly,
            metrics: vec![BLENDED_COST.to_string()],
            group_by: None,
        }
    }

    pub fn is_empty_range(&self) -> bool {
        self.start >= self.end
    }
}

/// Source of cost-and-usage data.
#[async_trait]
pub trait BillingBackend: Send + Sync {
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<CostAndUsage>;
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn yesterday() -> NaiveDate {
    today() - Duration::days(1)
}

/// Daily and month-to-date spend, built on top of a [`BillingBackend`].
pub struct CostService<'a> {
    backend: &'a dyn BillingBackend,
}

impl<'a> CostService<'a> {
    pub fn new(backend: &'a dyn BillingBackend) -> Self {
        Self { backend }
    }

    pub async fn daily_cost(&self, date: NaiveDate) -> Result<DailyCostResult> {
        let response = self.backend.get_cost_and_usage(&CostQuery::daily(date)).await?;
        let result = aggregate_daily_costs(&response)?;
        info!("Daily cost for {}: {:.2} across {} services", date, result.total, result.services.len());
        Ok(result)
    }

    pub async fn daily_cost_yesterday(&self) -> Result<DailyCostResult> {
        self.daily_cost(yesterday()).await
    }

    /// Spend from the first of `date`'s month up to, not including, `date`.
    /// On the first of the month that range is empty and no query is made.
    pub async fn monthly_cost(&self, date: NaiveDate) -> Result<f64> {
        let query = CostQuery::month_to_date(date);
        if query.is_empty_range() {
            info!("Month-to-date range for {} is empty", date);
            return Ok(0.0);
        }
        let response = self.backend.get_cost_and_usage(&query).await?;
        let total = monthly_total(&response)?;
        info!("Month-to-date cost as of {}: {:.2}", date, total);
        Ok(total)
    }

    pub async fn monthly_cost_to_date(&self) -> Result<f64> {
        self.monthly_cost(today()).await
    }
}

/// Canned backend for testing. Responses are keyed by granularity and every
/// query is recorded.
#[derive(Debug, Default)]
pub struct MockBillingBackend {
    responses: HashMap<Granularity, std::result::Result<CostAndUsage, String>>,
    queries: Mutex<Vec<CostQuery>>,
}

impl MockBillingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, granularity: Granularity, response: CostAndUsage) -> Self {
        self.responses.insert(granularity, Ok(response));
        self
    }

    pub fn with_failure<M: Into<String>>(mut self, granularity: Granularity, message: M) -> Self {
        self.responses.insert(granularity, Err(message.into()));
        self
    }

    pub fn queries(&self) -> Vec<CostQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BillingBackend for MockBillingBackend {
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<CostAndUsage> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        match self.responses.get(&query.granularity) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(Error::BillingQueryFailed(message.clone())),
            None => Ok(CostAndUsage::default()),
        }
    }
}
