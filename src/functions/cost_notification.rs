use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::billing::{today, CostService};
use crate::error::Result;
use crate::slack::{build_cost_report_message, SlackNotifier};
use crate::types::CostNotificationResult;

/// Yesterday's per-service spend plus the month-to-date total, posted to Slack.
pub struct CostNotification<'a> {
    costs: CostService<'a>,
    notifier: SlackNotifier,
    top_services: usize,
}

impl<'a> CostNotification<'a> {
    pub fn new(costs: CostService<'a>, notifier: SlackNotifier, top_services: usize) -> Self {
        Self {
            costs,
            notifier,
            top_services,
        }
    }

    pub async fn execute(&self) -> Result<CostNotificationResult> {
        self.execute_for(today()).await
    }

    /// Report the day before `today` and the month up to `today`.
    pub async fn execute_for(&self, today: NaiveDate) -> Result<CostNotificationResult> {
        let date = today - Duration::days(1);
        let daily = self.costs.daily_cost(date).await?;
        let monthly_total = self.costs.monthly_cost(today).await?;

        let message = build_cost_report_message(date, &daily, monthly_total, self.top_services);
        self.notifier.send_message(&message).await?;
        info!("Cost notification sent for {}", date);

        Ok(CostNotificationResult {
            date,
            daily,
            monthly_total,
        })
    }
}
