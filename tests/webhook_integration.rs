//! Integration tests for the ZingPay webhook

mod common;

use common::{spawn_app, TestApp, WEBHOOK_API_KEY};
use serde_json::{json, Value};

async fn send_webhook(app: &TestApp, auth: Option<&str>, body: Value) -> reqwest::Response {
    let mut request = app.client.post(app.url("/api/zingpay/webhooks")).json(&body);
    if let Some(value) = auth {
        request = request.header("Authorization", value);
    }
    request.send().await.expect("Failed to execute request.")
}

fn upgraded(user_id: &str) -> Value {
    json!({ "event": "user.upgraded", "data": { "user_id": user_id } })
}

#[tokio::test]
async fn upgrade_event_makes_user_premium() {
    let app = spawn_app();
    let user = app.register("ursula@example.com").await;

    let response = send_webhook(
        &app,
        Some(&format!("ApiKey {}", WEBHOOK_API_KEY)),
        upgraded(user["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(204, response.status().as_u16());

    let response = app.login("ursula@example.com", common::PASSWORD).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["is_premium"], true);
}

#[tokio::test]
async fn other_events_are_acknowledged_without_effect() {
    let app = spawn_app();
    let user = app.register("ursula@example.com").await;

    let response = send_webhook(
        &app,
        Some(&format!("ApiKey {}", WEBHOOK_API_KEY)),
        json!({ "event": "user.downgraded", "data": { "user_id": user["id"] } }),
    )
    .await;
    assert_eq!(204, response.status().as_u16());

    let body: Value = app
        .login("ursula@example.com", common::PASSWORD)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["is_premium"], false);
}

#[tokio::test]
async fn webhook_rejects_missing_or_wrong_api_key() {
    let app = spawn_app();
    let user = app.register("ursula@example.com").await;
    let user_id = user["id"].as_str().unwrap();

    let test_cases = vec![
        (None, "no header"),
        (Some("ApiKey wrong-key".to_string()), "wrong key"),
        (Some(format!("Bearer {}", WEBHOOK_API_KEY)), "wrong scheme"),
    ];

    for (auth, description) in test_cases {
        let response = send_webhook(&app, auth.as_deref(), upgraded(user_id)).await;
        assert_eq!(
            401,
            response.status().as_u16(),
            "The API did not return 401 for {}",
            description
        );
    }
}

#[tokio::test]
async fn upgrade_for_unknown_user_returns_404() {
    let app = spawn_app();

    let response = send_webhook(
        &app,
        Some(&format!("ApiKey {}", WEBHOOK_API_KEY)),
        upgraded(&uuid::Uuid::new_v4().to_string()),
    )
    .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn upgrade_with_malformed_user_id_returns_400() {
    let app = spawn_app();

    let response = send_webhook(
        &app,
        Some(&format!("ApiKey {}", WEBHOOK_API_KEY)),
        upgraded("not-a-uuid"),
    )
    .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn api_key_is_checked_before_the_body() {
    let app = spawn_app();

    let test_cases = vec![
        (None, 401, "no key"),
        (Some("ApiKey wrong-key".to_string()), 401, "wrong key"),
        (Some(format!("ApiKey {}", WEBHOOK_API_KEY)), 400, "valid key"),
    ];

    for (auth, expected, description) in test_cases {
        let mut request = app
            .client
            .post(app.url("/api/zingpay/webhooks"))
            .header("Content-Type", "application/json")
            .body("{not json");
        if let Some(value) = auth {
            request = request.header("Authorization", value);
        }
        let response = request.send().await.expect("Failed to execute request.");

        assert_eq!(
            expected,
            response.status().as_u16(),
            "Unexpected status for a malformed body with {}",
            description
        );
    }
}
