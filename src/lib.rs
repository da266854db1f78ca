// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod parsing;
pub mod http;
pub mod slack;
pub mod billing;
pub mod functions;
pub mod handler;

// Re-export commonly used items
pub use types::*;
pub use error::{Error, Result};
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use parsing::{aggregate_daily_costs, monthly_total, parse_amount};
pub use http::{HttpClient, RequestBody};
pub use slack::{build_cost_report_message, build_health_check_message, SlackNotifier};
pub use billing::{AwsCostExplorer, BillingBackend, CostQuery, CostService, Granularity, MockBillingBackend};
pub use functions::{CostNotification, HealthCheck};
pub use handler::{FunctionType, Handler};
