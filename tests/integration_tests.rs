use aws_cost_notifier::{
    load_config_with_env, Config, CostAndUsage, Error, Granularity, Handler, HttpClient,
    MockBillingBackend, MockEnvironment, SlackNotifier,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

fn daily_response() -> CostAndUsage {
    serde_json::from_value(json!({
        "ResultsByTime": [{
            "TimePeriod": {"Start": "2024-06-08", "End": "2024-06-09"},
            "Groups": [
                {"Keys": ["EC2"], "Metrics": {"BlendedCost": {"Amount": "12.50", "Unit": "USD"}}},
                {"Keys": ["S3"], "Metrics": {"BlendedCost": {"Amount": "0.00", "Unit": "USD"}}},
                {"Keys": ["Lambda"], "Metrics": {"BlendedCost": {"Amount": "3.25", "Unit": "USD"}}}
            ]
        }]
    }))
    .unwrap()
}

fn monthly_response(amount: &str) -> CostAndUsage {
    serde_json::from_value(json!({
        "ResultsByTime": [{
            "Total": {"BlendedCost": {"Amount": amount, "Unit": "USD"}},
            "Groups": []
        }]
    }))
    .unwrap()
}

fn config_for(url: Option<String>) -> Config {
    let mut env = MockEnvironment::new();
    if let Some(url) = url {
        env.set_var("SLACK_WEBHOOK_URL", url);
    }
    load_config_with_env(&env).unwrap()
}

fn body(result: &aws_cost_notifier::FunctionResult) -> Value {
    result.body_json().unwrap()
}

fn june_9() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()
}

#[tokio::test]
async fn test_cost_notification_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let hook = server
        .mock("POST", "/hook")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Regex("2024-06-08".to_string()))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let backend = MockBillingBackend::new()
        .with_response(Granularity::Daily, daily_response())
        .with_response(Granularity::Monthly, monthly_response("120.5"));
    let handler = Handler::new(config_for(Some(format!("{}/hook", server.url()))), backend)
        .with_fixed_date(june_9());

    let result = handler.handle(&json!({})).await;

    assert_eq!(result.status_code, 200);
    let body = body(&result);
    assert_eq!(body["message"], "Cost notification sent successfully");
    assert_eq!(body["function_type"], "cost_notification");
    assert_eq!(body["daily_total"], 15.75);
    assert_eq!(body["monthly_total"], 120.5);
    assert_eq!(body["services_count"], 2);
    hook.assert_async().await;

    let queries = handler.backend().queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].start, NaiveDate::from_ymd_opt(2024, 6, 8).unwrap());
    assert_eq!(queries[0].end, june_9());
    assert_eq!(queries[1].start, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(queries[1].end, june_9());
}

#[tokio::test]
async fn test_health_check_dispatch() {
    let mut server = mockito::Server::new_async().await;
    let hook = server
        .mock("POST", "/hook")
        .match_body(mockito::Matcher::Regex("AWS Lambda Health Check".to_string()))
        .with_status(201)
        .create_async()
        .await;

    let handler = Handler::new(
        config_for(Some(format!("{}/hook", server.url()))),
        MockBillingBackend::new(),
    );

    let result = handler.handle(&json!({"function_type": "health_check"})).await;

    assert_eq!(result.status_code, 200);
    let body = body(&result);
    assert_eq!(body["function_type"], "health_check");
    assert_eq!(body["status"], "healthy");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok());
    hook.assert_async().await;
    assert!(handler.backend().queries().is_empty());
}

#[tokio::test]
async fn test_unknown_function_type_is_client_error() {
    let handler = Handler::new(config_for(None), MockBillingBackend::new());

    let result = handler.handle(&json!({"function_type": "bogus"})).await;

    assert_eq!(result.status_code, 400);
    let body = body(&result);
    assert_eq!(body["error"], "Unknown function type: bogus");
    assert_eq!(body["available_functions"], json!(["cost_notification", "health_check"]));
}

#[tokio::test]
async fn test_billing_failure_is_server_error() {
    let mut server = mockito::Server::new_async().await;
    let hook = server
        .mock("POST", "/hook")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let backend = MockBillingBackend::new().with_failure(Granularity::Daily, "ExpiredTokenException");
    let handler = Handler::new(config_for(Some(format!("{}/hook", server.url()))), backend)
        .with_fixed_date(june_9());

    let result = handler.handle(&json!({"function_type": "cost_notification"})).await;

    assert_eq!(result.status_code, 500);
    let expected = Error::BillingQueryFailed("ExpiredTokenException".to_string()).to_string();
    assert_eq!(body(&result)["error"], expected.as_str());
    hook.assert_async().await;
}

#[tokio::test]
async fn test_missing_webhook_is_server_error_without_queries() {
    let handler = Handler::new(config_for(None), MockBillingBackend::new());

    let result = handler.handle(&json!({"function_type": "health_check"})).await;
    assert_eq!(result.status_code, 500);
    assert_eq!(body(&result)["error"], "SLACK_WEBHOOK_URL environment variable is not set");

    let result = handler.handle(&json!({})).await;
    assert_eq!(result.status_code, 500);
    assert!(handler.backend().queries().is_empty());
}

#[tokio::test]
async fn test_webhook_rejection_propagates_status() {
    for code in [404u16, 500] {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/hook")
            .with_status(code as usize)
            .create_async()
            .await;

        let cfg = config_for(Some(format!("{}/hook", server.url())));
        let notifier = SlackNotifier::new(None, &cfg).unwrap();
        let err = notifier.send_text("hello").await.unwrap_err();
        assert!(
            matches!(err, Error::RequestFailed { code: c, .. } if c == code),
            "unexpected error for {}: {:?}",
            code,
            err
        );

        let handler = Handler::new(cfg, MockBillingBackend::new());
        let result = handler.handle(&json!({"function_type": "health_check"})).await;
        assert_eq!(result.status_code, 500);
        assert!(body(&result)["error"].as_str().unwrap().contains(&code.to_string()));
    }
}

#[tokio::test]
async fn test_notifier_message_shapes() {
    let mut server = mockito::Server::new_async().await;
    let text_only = server
        .mock("POST", "/hook")
        .match_body(mockito::Matcher::Json(json!({"text": "plain"})))
        .with_status(200)
        .create_async()
        .await;
    let with_blocks = server
        .mock("POST", "/hook")
        .match_body(mockito::Matcher::Json(json!({
            "text": "fallback",
            "blocks": [{"type": "divider"}]
        })))
        .with_status(201)
        .create_async()
        .await;

    let notifier = SlackNotifier::new(Some(&format!("{}/hook", server.url())), &config_for(None)).unwrap();
    notifier.send_text("plain").await.unwrap();
    notifier
        .send_blocks("fallback", vec![json!({"type": "divider"})])
        .await
        .unwrap();

    text_only.assert_async().await;
    with_blocks.assert_async().await;
}

#[tokio::test]
async fn test_http_client_post_json_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api")
        .match_header("authorization", "Bearer t")
        .match_body(mockito::Matcher::Json(json!({"k": [1, 2]})))
        .with_status(200)
        .create_async()
        .await;

    let client = HttpClient::new();
    let res = client
        .post(&format!("{}/api", server.url()), json!({"k": [1, 2]}), &[("Authorization", "Bearer t")])
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    mock.assert_async().await;
}
