mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_history_records_every_mutation() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    let skill = factory.create_skill(auth.user_id, "Rust", "backend", 2).await;
    let path = format!("/api/skills/{}", skill.id);

    let updates = [
        json!({ "proficiencyLevel": 3 }),
        json!({ "progressPercentage": 40 }),
        json!({ "learningGoal": "Write a web service" }),
    ];
    for update in &updates {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        app.server
            .put(&path)
            .add_header("Authorization", auth.auth_header())
            .json(update)
            .await
            .assert_status_ok();
    }

    let response = app
        .server
        .get(&format!("{}/history", path))
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["count"], 4);
    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        ["updated", "progress_updated", "proficiency_increased", "created"]
    );

    let raised = &body["data"][2];
    assert_eq!(raised["changes"]["before"]["proficiencyLevel"], 2);
    assert_eq!(raised["changes"]["after"]["proficiencyLevel"], 3);
    assert_eq!(raised["skill"], skill.id.to_string());
    assert_eq!(raised["user"], auth.user_id.to_string());
}

#[tokio::test]
async fn test_history_is_owner_only() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let owner = factory.create_user().await;
    let other = factory.create_user().await;
    let skill = factory.create_skill(owner.user_id, "Rust", "backend", 2).await;

    let response = app
        .server
        .get(&format!("/api/skills/{}/history", skill.id))
        .add_header("Authorization", other.auth_header())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .get(&format!("/api/skills/{}/history", Uuid::new_v4()))
        .add_header("Authorization", owner.auth_header())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_update_leaves_no_history() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.create_user().await;
    let skill = factory.create_skill(auth.user_id, "Rust", "backend", 2).await;

    app.server
        .put(&format!("/api/skills/{}", skill.id))
        .add_header("Authorization", auth.auth_header())
        .json(&json!({ "proficiencyLevel": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let body: Value = app
        .server
        .get(&format!("/api/skills/{}/history", skill.id))
        .add_header("Authorization", auth.auth_header())
        .await
        .json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["action"], "created");
}
