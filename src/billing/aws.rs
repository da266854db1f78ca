use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity as SdkGranularity, GroupDefinition, GroupDefinitionType,
};
use std::collections::HashMap;
use tracing::{debug, error};

use super::{BillingBackend, CostQuery, Granularity};
use crate::error::{Error, Result};
use crate::types::{CostAndUsage, CostGroup, MetricValue, ResultByTime};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cost Explorer client for a single region.
#[derive(Debug, Clone)]
pub struct AwsCostExplorer {
    client: aws_sdk_costexplorer::Client,
}

impl AwsCostExplorer {
    pub async fn from_region(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: aws_sdk_costexplorer::Client::new(&sdk_config),
        }
    }

    pub fn from_client(client: aws_sdk_costexplorer::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BillingBackend for AwsCostExplorer {
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<CostAndUsage> {
        debug!(
            "GetCostAndUsage {} .. {} ({})",
            query.start,
            query.end,
            query.granularity.as_str()
        );

        let interval = DateInterval::builder()
            .start(query.start.format(DATE_FORMAT).to_string())
            .end(query.end.format(DATE_FORMAT).to_string())
            .build()
            .map_err(|e| Error::BillingQueryFailed(e.to_string()))?;

        let granularity = match query.granularity {
            Granularity::Daily => SdkGranularity::Daily,
            Granularity::Monthly => SdkGranularity::Monthly,
        };

        let mut request = self
            .client
            .get_cost_and_usage()
            .time_period(interval)
            .granularity(granularity)
            .set_metrics(Some(query.metrics.clone()));
        if let Some(key) = &query.group_by {
            request = request.group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key(key)
                    .build(),
            );
        }

        let output = request.send().await.map_err(|e| {
            let message = DisplayErrorContext(&e).to_string();
            error!("Cost Explorer request failed: {}", message);
            Error::BillingQueryFailed(message)
        })?;

        let results_by_time = output
            .results_by_time()
            .iter()
            .map(|r| ResultByTime {
                groups: r
                    .groups()
                    .iter()
                    .map(|g| CostGroup {
                        keys: g.keys().to_vec(),
                        metrics: convert_metrics(g.metrics()),
                    })
                    .collect(),
                total: convert_metrics(r.total()),
            })
            .collect();

        Ok(CostAndUsage { results_by_time })
    }
}

fn convert_metrics(
    metrics: Option<&HashMap<String, aws_sdk_costexplorer::types::MetricValue>>,
) -> HashMap<String, MetricValue> {
    metrics
        .map(|m| {
            m.iter()
                .map(|(name, value)| {
                    (
                        name.clone(),
                        MetricValue {
                            amount: value.amount().map(str::to_string),
                            unit: value.unit().map(str::to_string),
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
