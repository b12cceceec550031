// tests/quiz_flow_tests.rs

mod common;

use std::sync::Arc;

use ap_prep_backend::config::CHAT_FALLBACK_MESSAGE;
use common::{EchoTutor, TestApp, spawn_app, spawn_app_with_tutor};
use serde_json::{Value, json};

/// Seeds five AP Biology questions tagged [unit-1, unit-1, unit-2, unit-2, unit-2]
/// whose correct answers are A, B, C, C, C.
async fn seed_biology(app: &TestApp) -> Vec<i64> {
    let admin = app.token_for("admin").await;
    let mut ids = Vec::new();
    for (section, correct) in [
        ("unit-1", 0),
        ("unit-1", 1),
        ("unit-2", 2),
        ("unit-2", 2),
        ("unit-2", 2),
    ] {
        let q = app.create_question(&admin, "ap-biology", section, correct).await;
        ids.push(q["id"].as_i64().unwrap());
    }
    ids
}

async fn start_test(app: &TestApp, token: &str, body: Value) -> reqwest::Response {
    app.client
        .post(app.url("/api/user/subjects/ap-biology/start-test"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn test_full_quiz_flow() {
    // Arrange
    let app = spawn_app().await;
    let ids = seed_biology(&app).await;
    let token = app.token_for("user").await;

    // 1. Start a full-length attempt
    let started = start_test(&app, &token, json!({})).await;
    assert_eq!(started.status().as_u16(), 201);
    let started: Value = started.json().await.unwrap();
    let question_ids: Vec<i64> = started["attempt"]["question_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    assert_eq!(question_ids, ids);
    assert!(started["questions"][0].get("correct_index").is_none());
    assert_eq!(started["progress"]["answered"], 0);

    // 2. Answer and flag on the client, then save
    let mut attempt = started["attempt"].clone();
    attempt["answers"] = json!({ "0": "A", "1": "B", "2": "C", "4": "C" });
    attempt["flagged"] = json!([3]);
    attempt["current_index"] = json!(3);
    attempt["elapsed_seconds"] = json!(95);

    let saved = app
        .client
        .post(app.url("/api/user/subjects/ap-biology/save-quiz-progress"))
        .bearer_auth(&token)
        .json(&attempt)
        .send()
        .await
        .unwrap();
    assert_eq!(saved.status().as_u16(), 200);
    let saved: Value = saved.json().await.unwrap();
    assert_eq!(saved["progress"]["answered"], 4);
    assert_eq!(saved["progress"]["flagged"], 1);

    // 3. Resume
    let resumed: Value = app
        .client
        .get(app.url("/api/user/subjects/ap-biology/quiz-progress"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resumed["attempt"]["answers"], attempt["answers"]);
    assert_eq!(resumed["attempt"]["current_index"], 3);
    assert_eq!(resumed["questions"].as_array().unwrap().len(), 5);

    // 4. Submit
    let submitted = app
        .client
        .post(app.url("/api/user/subjects/ap-biology/submit-test"))
        .bearer_auth(&token)
        .json(&json!({ "attempt": resumed["attempt"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(submitted.status().as_u16(), 201);
    let result: Value = submitted.json().await.unwrap();
    let test_id = result["id"].as_i64().unwrap();
    assert_eq!(result["score"]["correct"], 4);
    assert_eq!(result["score"]["total"], 5);
    assert_eq!(result["score"]["percentage"], 80);
    assert_eq!(result["completed"], true);
    assert_eq!(result["elapsed_seconds"], 95);
    assert_eq!(result["section_breakdown"]["unit-1"]["unit_number"], 1);
    assert_eq!(result["section_breakdown"]["unit-1"]["correct"], 2);
    assert_eq!(result["section_breakdown"]["unit-2"]["correct"], 2);
    assert_eq!(result["section_breakdown"]["unit-2"]["total"], 3);

    // Progress is cleared once the result is stored
    let progress = app
        .client
        .get(app.url("/api/user/subjects/ap-biology/quiz-progress"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(progress.status().as_u16(), 404);

    // 5. History
    let history: Vec<Value> = app
        .client
        .get(app.url("/api/user/subjects/ap-biology/test-results"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["id"], test_id);

    // 6. Section review keeps original numbering
    let view: Value = app
        .client
        .get(app.url(&format!(
            "/api/user/subjects/ap-biology/test-results/{}/section/unit-2",
            test_id
        )))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["original_indices"], json!([2, 3, 4]));
    assert_eq!(view["answers"]["0"], json!({ "answer": "C", "original_index": 2 }));
    assert_eq!(view["answers"]["2"], json!({ "answer": "C", "original_index": 4 }));
    assert!(view["answers"].get("1").is_none());
    assert_eq!(view["questions"][1]["question_number"], 4);
    assert_eq!(view["questions"][1]["flagged"], true);
    assert_eq!(view["metadata"]["unit_number"], 2);
    assert_eq!(view["metadata"]["section_name"], "Cell Structure and Function");
    assert_eq!(view["score"]["percentage"], 67);

    // A section with no questions is empty, not an error
    let empty = app
        .client
        .get(app.url(&format!(
            "/api/user/subjects/ap-biology/test-results/{}/section/unit-9",
            test_id
        )))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status().as_u16(), 200);
    let empty: Value = empty.json().await.unwrap();
    assert_eq!(empty["questions"], json!([]));
    assert_eq!(empty["answers"], json!({}));
    assert_eq!(empty["metadata"]["unit_number"], Value::Null);

    let all: Value = app
        .client
        .get(app.url(&format!(
            "/api/user/subjects/ap-biology/test-results/{}/section/all",
            test_id
        )))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all["questions"].as_array().unwrap().len(), 5);
    assert_eq!(all["metadata"]["correct"], 4);

    // 7. Delete
    let deleted = app
        .client
        .delete(app.url(&format!("/api/user/subjects/ap-biology/tests/{}", test_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 200);

    let fetched = app
        .client
        .get(app.url(&format!(
            "/api/user/subjects/ap-biology/test-results/{}",
            test_id
        )))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status().as_u16(), 404);

    let deleted_again = app
        .client
        .delete(app.url(&format!("/api/user/subjects/ap-biology/tests/{}", test_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted_again.status().as_u16(), 404);
}

#[tokio::test]
async fn test_save_rejects_invalid_answers() {
    let app = spawn_app().await;
    seed_biology(&app).await;
    let token = app.token_for("user").await;

    let started: Value = start_test(&app, &token, json!({})).await.json().await.unwrap();

    for answers in [json!({ "9": "A" }), json!({ "0": "E" }), json!({ "0": "b" })] {
        let mut attempt = started["attempt"].clone();
        attempt["answers"] = answers;
        let response = app
            .client
            .post(app.url("/api/user/subjects/ap-biology/save-quiz-progress"))
            .bearer_auth(&token)
            .json(&attempt)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }

    // Attempt posted under another subject
    let response = app
        .client
        .post(app.url("/api/user/subjects/ap-chemistry/save-quiz-progress"))
        .bearer_auth(&token)
        .json(&started["attempt"])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn test_section_attempt_and_paused_result() {
    let app = spawn_app().await;
    seed_biology(&app).await;
    let token = app.token_for("user").await;

    let missing = start_test(&app, &token, json!({ "section": "unit-8" })).await;
    assert_eq!(missing.status().as_u16(), 404);

    let started: Value = start_test(&app, &token, json!({ "section": "unit-2", "count": 2 }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(started["attempt"]["section"], "unit-2");
    assert_eq!(started["questions"].as_array().unwrap().len(), 2);

    let submitted: Value = app
        .client
        .post(app.url("/api/user/subjects/ap-biology/submit-test"))
        .bearer_auth(&token)
        .json(&json!({ "attempt": started["attempt"], "completed": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(submitted["completed"], false);
    assert_eq!(submitted["score"]["percentage"], 0);
}

#[tokio::test]
async fn test_results_are_private() {
    let app = spawn_app().await;
    seed_biology(&app).await;
    let owner = app.token_for("user").await;
    let other = app.token_for("user").await;

    let started: Value = start_test(&app, &owner, json!({})).await.json().await.unwrap();
    let result: Value = app
        .client
        .post(app.url("/api/user/subjects/ap-biology/submit-test"))
        .bearer_auth(&owner)
        .json(&json!({ "attempt": started["attempt"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let test_id = result["id"].as_i64().unwrap();

    let peek = app
        .client
        .get(app.url(&format!(
            "/api/user/subjects/ap-biology/test-results/{}",
            test_id
        )))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(peek.status().as_u16(), 404);

    let delete = app
        .client
        .delete(app.url(&format!("/api/user/subjects/ap-biology/tests/{}", test_id)))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status().as_u16(), 404);
}

#[tokio::test]
async fn test_explanation_chat_appends_turns() {
    let app = spawn_app_with_tutor(Arc::new(EchoTutor)).await;
    let ids = seed_biology(&app).await;
    let token = app.token_for("user").await;

    let response: Value = app
        .client
        .post(app.url("/api/user/explanations/chat"))
        .bearer_auth(&token)
        .json(&json!({
            "question_id": ids[2],
            "user_answer": "A",
            "history": [
                { "role": "user", "content": "Why is it C?" },
                { "role": "assistant", "content": "Because of osmosis." }
            ],
            "message": "Can you say more?"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(response["fallback"], false);
    assert_eq!(response["reply"], "You asked: Can you say more?");
    let history = response["history"].as_array().unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[2], json!({ "role": "user", "content": "Can you say more?" }));
    assert_eq!(history[3]["role"], "assistant");
}

#[tokio::test]
async fn test_explanation_chat_falls_back() {
    let app = spawn_app().await;
    let ids = seed_biology(&app).await;
    let token = app.token_for("user").await;

    let history = json!([
        { "role": "user", "content": "Why is it A?" },
        { "role": "assistant", "content": "It binds the substrate." }
    ]);
    let response = app
        .client
        .post(app.url("/api/user/explanations/chat"))
        .bearer_auth(&token)
        .json(&json!({ "question_id": ids[0], "history": history, "message": "And B?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fallback"], true);
    assert_eq!(body["reply"], CHAT_FALLBACK_MESSAGE);
    assert_eq!(body["history"], history);

    let missing = app
        .client
        .post(app.url("/api/user/explanations/chat"))
        .bearer_auth(&token)
        .json(&json!({ "question_id": 999_999, "message": "Hello?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let bad_label = app
        .client
        .post(app.url("/api/user/explanations/chat"))
        .bearer_auth(&token)
        .json(&json!({ "question_id": ids[0], "user_answer": "Z", "message": "Hello?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_label.status().as_u16(), 400);
}

#[tokio::test]
async fn test_explanation_chat_rejects_absent_choice() {
    let app = spawn_app_with_tutor(Arc::new(EchoTutor)).await;
    let ids = seed_biology(&app).await;
    let token = app.token_for("user").await;

    // Seeded questions carry four choices, A to D
    let absent = app
        .client
        .post(app.url("/api/user/explanations/chat"))
        .bearer_auth(&token)
        .json(&json!({ "question_id": ids[0], "user_answer": "E", "message": "Why?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(absent.status().as_u16(), 400);

    let present = app
        .client
        .post(app.url("/api/user/explanations/chat"))
        .bearer_auth(&token)
        .json(&json!({ "question_id": ids[0], "user_answer": "D", "message": "Why?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(present.status().as_u16(), 200);
}

#[tokio::test]
async fn test_submit_rejects_mislabeled_section() {
    let app = spawn_app().await;
    seed_biology(&app).await;
    let token = app.token_for("user").await;

    let started: Value = start_test(&app, &token, json!({ "section": "unit-2" }))
        .await
        .json()
        .await
        .unwrap();

    let mut attempt = started["attempt"].clone();
    attempt["section"] = json!("unit-1");

    let response = app
        .client
        .post(app.url("/api/user/subjects/ap-biology/submit-test"))
        .bearer_auth(&token)
        .json(&json!({ "attempt": attempt }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let history: Vec<Value> = app
        .client
        .get(app.url("/api/user/subjects/ap-biology/test-results"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(history.is_empty());
}
