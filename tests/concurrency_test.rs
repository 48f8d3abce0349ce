// Parallel requests against a file database with a multi-connection pool

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{error_message, TestApp};

fn block_body(plan_id: i64, name: String, sequence_order: i32) -> Value {
    json!({
        "plan_id": plan_id,
        "name": name,
        "primary_focus": "Strength",
        "duration_weeks": 4,
        "sequence_order": sequence_order
    })
}

/// Post every body at once and collect the responses in submission order.
async fn post_all(app: &TestApp, uri: &str, bodies: Vec<Value>) -> Vec<(StatusCode, Value)> {
    let handles: Vec<_> = bodies
        .into_iter()
        .map(|body| {
            let app = app.clone();
            let uri = uri.to_string();
            tokio::spawn(async move { app.post(&uri, body).await })
        })
        .collect();

    let mut responses = Vec::with_capacity(handles.len());
    for handle in handles {
        responses.push(handle.await.unwrap());
    }
    responses
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creates_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let app = TestApp::on_disk(dir.path()).await;
    let user_id = app.create_user("parallel").await;
    let plan_id = app.create_plan(user_id).await;

    let bodies = (1..=40)
        .map(|order| block_body(plan_id, format!("Block {order}"), order))
        .collect();
    let responses = post_all(&app, "/api/training-blocks", bodies).await;

    for (status, body) in &responses {
        assert_eq!(*status, StatusCode::CREATED, "unexpected response: {body}");
    }

    let (status, blocks) = app
        .get(&format!("/api/training-blocks?plan_id={plan_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<i64> = blocks
        .as_array()
        .unwrap()
        .iter()
        .map(|block| block["sequence_order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, (1..=40).collect::<Vec<i64>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creates_with_same_sequence_order() {
    let dir = tempfile::tempdir().unwrap();
    let app = TestApp::on_disk(dir.path()).await;
    let user_id = app.create_user("racing").await;
    let plan_id = app.create_plan(user_id).await;

    let bodies = (0..20)
        .map(|attempt| block_body(plan_id, format!("Attempt {attempt}"), 1))
        .collect();
    let responses = post_all(&app, "/api/training-blocks", bodies).await;

    let created = responses
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);

    for (status, body) in responses.iter().filter(|(status, _)| *status != StatusCode::CREATED) {
        assert_eq!(*status, StatusCode::CONFLICT, "unexpected response: {body}");
        assert_eq!(
            error_message(body),
            "Training block with this sequence order already exists in plan"
        );
    }

    let (_, blocks) = app
        .get(&format!("/api/training-blocks?plan_id={plan_id}"))
        .await;
    assert_eq!(blocks.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reads_alongside_writes() {
    let dir = tempfile::tempdir().unwrap();
    let app = TestApp::on_disk(dir.path()).await;
    let user_id = app.create_user("busy").await;

    let handles: Vec<_> = (0..30)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                match i % 3 {
                    0 => app.get("/api/users/busy").await.0,
                    1 => app.get(&format!("/api/users/{user_id}/training-plans")).await.0,
                    _ => {
                        app.post(
                            "/api/training-plans",
                            json!({ "user_id": user_id, "name": format!("Plan {i}") }),
                        )
                        .await
                        .0
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        let status = handle.await.unwrap();
        assert!(status.is_success(), "unexpected status {status}");
    }

    let (_, plans) = app
        .get(&format!("/api/users/{user_id}/training-plans"))
        .await;
    assert_eq!(plans.as_array().unwrap().len(), 10);
}
