use activity_digest_newsletter::directory::SubscriberDirectory;
use wiremock::matchers::{any, body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

#[tokio::test]
async fn signup_returns_200_and_stores_an_active_subscriber() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_signup(serde_json::json!({ "email": "a@b.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["subscriber"]["email"], "a@b.com");
    assert_eq!(body["subscriber"]["isActive"], true);

    let stored = test_app.directory.snapshot().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email.as_ref(), "a@b.com");
    assert!(stored[0].is_active);
}

#[tokio::test]
async fn signing_up_twice_returns_400_and_keeps_a_single_record() {
    let test_app = TestApp::spawn_app().await;

    test_app.signup_subscribers(&["a@b.com"]).await;

    let response = test_app
        .post_signup(serde_json::json!({ "email": "a@b.com" }))
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Email already subscribed" }));
    assert_eq!(test_app.directory.count_active().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_detection_uses_the_normalized_email() {
    let test_app = TestApp::spawn_app().await;

    test_app.signup_subscribers(&["a@b.com"]).await;

    let response = test_app
        .post_signup(serde_json::json!({ "email": "  A@B.com " }))
        .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(test_app.directory.snapshot().await.len(), 1);
}

#[tokio::test]
async fn signup_returns_400_when_email_is_missing_or_invalid() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (serde_json::json!({}), "missing email"),
        (serde_json::json!({ "email": "" }), "empty email"),
        (serde_json::json!({ "email": "test.com" }), "email without @"),
        (serde_json::json!({ "email": "@test.com" }), "email without subject"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_signup(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Please provide a valid email address");
    }

    assert!(test_app.directory.snapshot().await.is_empty());
}

#[tokio::test]
async fn signup_sends_a_welcome_email() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .and(body_string_contains("Welcome"))
        .and(body_string_contains("a@b.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    test_app
        .post_signup(serde_json::json!({ "email": "a@b.com" }))
        .await;
}

#[tokio::test]
async fn signup_succeeds_when_the_welcome_email_fails() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_signup(serde_json::json!({ "email": "a@b.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(test_app.directory.count_active().await.unwrap(), 1);
}

#[tokio::test]
async fn unsubscribed_email_can_sign_up_again() {
    let test_app = TestApp::spawn_app().await;

    test_app.signup_subscribers(&["a@b.com"]).await;
    test_app
        .post_unsubscribe(serde_json::json!({ "email": "a@b.com" }))
        .await;

    test_app.signup_subscribers(&["a@b.com"]).await;

    let stored = test_app.directory.snapshot().await;
    assert_eq!(stored.len(), 1);
    assert!(stored[0].is_active);
}

#[tokio::test]
async fn signup_answers_unreadable_bodies_with_a_json_400() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![
        (None, "no body"),
        (Some("{not json"), "broken json"),
        (Some(r#"{"email": 123}"#), "email that is not a string"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_raw("/api/signup", invalid_body).await;

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

    assert!(test_app.directory.snapshot().await.is_empty());
}
