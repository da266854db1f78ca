// Operations the handler can dispatch to
pub mod cost_notification;
pub mod health_check;

pub use cost_notification::CostNotification;
pub use health_check::HealthCheck;
