use crate::helpers::TestApp;

#[tokio::test]
async fn stats_count_only_active_subscribers() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .signup_subscribers(&["a@b.com", "c@d.com", "e@f.com"])
        .await;
    test_app
        .post_unsubscribe(serde_json::json!({ "email": "c@d.com" }))
        .await;

    let response = test_app.get("/api/stats").await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["totalActiveSubscribers"], 2);
    assert!(body["timestamp"].is_string());
}
