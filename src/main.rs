use std::sync::Arc;

use aws_cost_notifier::{load_config, AwsCostExplorer, FunctionResult, Handler};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let cfg = load_config()?;
    info!("region = {}, top services = {}", cfg.aws_region, cfg.top_services);

    let backend = AwsCostExplorer::from_region(&cfg.aws_region).await;
    let handler = Arc::new(Handler::new(cfg, backend));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { Ok::<FunctionResult, Error>(handler.handle(&event.payload).await) }
    }))
    .await
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
