use anyhow::{Context, Result};
use std::collections::HashMap;
use crate::types::Config;

pub const DEFAULT_AWS_REGION: &str = "ap-northeast-1";
pub const DEFAULT_TOP_SERVICES: usize = 10;

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

/// A missing webhook URL is not an error here: it surfaces as
/// `MissingWebhookUrl` when a notifier is built, so the handler can report it.
pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let slack_webhook_url = env.get_var("SLACK_WEBHOOK_URL")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let aws_region = env.get_var("AWS_REGION")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string());

    let top_services: usize = match env.get_var("TOP_SERVICES") {
        Some(v) => v.trim().parse().context("Invalid TOP_SERVICES")?,
        None => DEFAULT_TOP_SERVICES,
    };

    Ok(Config {
        slack_webhook_url,
        aws_region,
        top_services,
    })
}
