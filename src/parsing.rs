use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{CostAndUsage, CostLineItem, DailyCostResult, MetricValue};

pub const BLENDED_COST: &str = "BlendedCost";

pub fn parse_amount(metrics: &HashMap<String, MetricValue>, metric: &str) -> Result<f64> {
    let raw = metrics
        .get(metric)
        .and_then(|m| m.amount.as_deref())
        .ok_or_else(|| Error::BillingQueryFailed(format!("missing {} amount", metric)))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::BillingQueryFailed(format!("invalid {} amount: {:?}", metric, raw)))
}

/// Collapse a service-grouped daily response into a total and a breakdown.
///
/// Only the first time period is read. Groups costing zero or less are
/// dropped. The sort is stable, so services with equal cost keep the order
/// the API returned them in.
pub fn aggregate_daily_costs(response: &CostAndUsage) -> Result<DailyCostResult> {
    let Some(period) = response.results_by_time.first() else {
        return Ok(DailyCostResult::default());
    };

    let mut services = Vec::new();
    for group in &period.groups {
        let cost = parse_amount(&group.metrics, BLENDED_COST)?;
        if cost > 0.0 {
            let service = group.keys.first().cloned().unwrap_or_else(|| "Unknown".to_string());
            services.push(CostLineItem { service, cost });
        }
    }
    services.sort_by(|a, b| b.cost.total_cmp(&a.cost));

    let total = services.iter().map(|s| s.cost).sum();
    Ok(DailyCostResult { total, services })
}

pub fn monthly_total(response: &CostAndUsage) -> Result<f64> {
    match response.results_by_time.first() {
        Some(period) => parse_amount(&period.total, BLENDED_COST),
        None => Ok(0.0),
    }
}
