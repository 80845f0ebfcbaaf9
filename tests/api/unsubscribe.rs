use crate::helpers::TestApp;

#[tokio::test]
async fn unsubscribe_deactivates_the_subscriber() {
    let test_app = TestApp::spawn_app().await;

    test_app.signup_subscribers(&["a@b.com"]).await;

    let response = test_app
        .post_unsubscribe(serde_json::json!({ "email": "a@b.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let stats: serde_json::Value = test_app.get("/api/stats").await.json().await.unwrap();
    assert_eq!(stats["totalActiveSubscribers"], 0);

    // The record is kept, only flagged inactive
    let stored = test_app.directory.snapshot().await;
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].is_active);
    assert!(stored[0].updated_at.is_some());
}

#[tokio::test]
async fn unsubscribe_returns_400_when_email_is_missing() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![
        (serde_json::json!({}), "missing email"),
        (serde_json::json!({ "email": "   " }), "blank email"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_unsubscribe(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Email is required");
    }
}

#[tokio::test]
async fn unsubscribe_returns_400_when_email_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_unsubscribe(serde_json::json!({ "email": "not-an-email" }))
        .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn unsubscribing_an_unknown_email_returns_200() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_unsubscribe(serde_json::json!({ "email": "ghost@b.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert!(test_app.directory.snapshot().await.is_empty());
}

#[tokio::test]
async fn unsubscribe_without_a_body_reports_the_missing_email() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![(None, "no body"), (Some(""), "empty json body")];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_raw("/api/unsubscribe", invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );

        let body: serde_json::Value = response
            .json()
            .await
            .unwrap_or_else(|_| panic!("Response for {} was not JSON", error_message));
        assert_eq!(body["message"], "Email is required");
    }
}

#[tokio::test]
async fn unsubscribe_answers_malformed_bodies_with_a_json_400() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![
        (r#"{not json"#, "broken json"),
        (r#"{"email": 123}"#, "email that is not a string"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app
            .post_raw("/api/unsubscribe", Some(invalid_body))
            .await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );

        let body: serde_json::Value = response
            .json()
            .await
            .unwrap_or_else(|_| panic!("Response for {} was not JSON", error_message));
        assert_eq!(body["message"], "Please provide a valid email address");
    }
}
