use reqwest::{Method, Response};
use tracing::{error, info};

use crate::error::{Error, Result};

/// Body of an outbound request: sent verbatim, or serialized to JSON.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Raw(String),
    Json(serde_json::Value),
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        RequestBody::Raw(value)
    }
}

impl From<&str> for RequestBody {
    fn from(value: &str) -> Self {
        RequestBody::Raw(value.to_string())
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

/// Thin GET/POST client. The URL scheme decides between TLS and plain HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        self.request(Method::GET, url, headers, None).await
    }

    pub async fn post<B: Into<RequestBody>>(
        &self,
        url: &str,
        payload: B,
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        self.request(Method::POST, url, headers, Some(payload.into())).await
    }

    pub async fn request(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<RequestBody>,
    ) -> Result<Response> {
        if method != Method::GET && method != Method::POST {
            return Err(Error::UnsupportedMethod(method.to_string()));
        }

        let mut req = self.inner.request(method, url);
        for (key, value) in headers {
            req = req.header(*key, *value);
        }
        req = match body {
            Some(RequestBody::Raw(raw)) => req.body(raw),
            Some(RequestBody::Json(value)) => req.json(&value),
            None => req,
        };

        let res = req.send().await?;
        check_status(res)
    }
}

/// Only 200 and 201 count as success.
fn check_status(res: Response) -> Result<Response> {
    let status = res.status();
    match status.as_u16() {
        200 | 201 => {
            info!("Request successful: {}", status.as_u16());
            Ok(res)
        }
        code => {
            let message = status.canonical_reason().unwrap_or("Unknown").to_string();
            error!("Request failed: {} {}", code, message);
            Err(Error::RequestFailed { code, message })
        }
    }
}
