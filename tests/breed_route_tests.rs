use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

async fn test_app(label: &str) -> (Router, std::path::PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "dogapi-routes-{label}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let db = dogapi::db::spawn(&database_url)
        .await
        .expect("db actor spawns");
    let state = dogapi::server::DogApiState::new(db);
    let cors = vec!["http://localhost:3000".to_string()];
    (dogapi::server::dogapi_router(state, &cors), temp_path)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

async fn body_json(resp: axum::response::Response) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not JSON")
}

#[tokio::test]
async fn crud_round_trip_over_http() {
    let (app, temp_path) = test_app("crud").await;

    // Create (lowercased) -> 201.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/dogbreeds",
            &json!({"breed": "Bulldog", "subBreed": "FRENCH"}),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key("x-request-id"));
    let created = body_json(resp).await;
    assert_eq!(created["breed"], "bulldog");
    assert_eq!(created["subBreed"], "french");
    let id = created["id"].as_i64().expect("numeric id");

    // Duplicate create -> same record.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/dogbreeds",
            &json!({"breed": "bulldog", "subBreed": "french"}),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["id"].as_i64(), Some(id));

    // Bare breed.
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/dogbreeds", &json!({"breed": "akita"})))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let akita = body_json(resp).await;
    assert_eq!(akita["subBreed"], Value::Null);

    // List.
    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/dogbreeds"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await.as_array().map(Vec::len), Some(2));

    // Get by id.
    let resp = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/dogbreeds/{id}")))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["subBreed"], "french");

    // Update.
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/dogbreeds/{id}"),
            &json!({"breed": "bulldog", "subBreed": "boston"}),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["id"].as_i64(), Some(id));
    assert_eq!(updated["subBreed"], "boston");

    // Delete twice -> 204 both times, then 404 on read.
    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/dogbreeds/{id}")))
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
    let resp = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/dogbreeds/{id}")))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["code"], "NOT_FOUND");

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn update_conflict_and_missing_ids() {
    let (app, temp_path) = test_app("conflict").await;

    let mut ids = Vec::new();
    for sub in ["french", "boston"] {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/dogbreeds",
                &json!({"breed": "bulldog", "subBreed": sub}),
            ))
            .await
            .expect("request failed");
        ids.push(body_json(resp).await["id"].as_i64().expect("numeric id"));
    }

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/dogbreeds/{}", ids[0]),
            &json!({"breed": "bulldog", "subBreed": "boston"}),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["error"]["code"], "CONFLICT");

    // Unchanged after the rejected update.
    let resp = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/dogbreeds/{}", ids[0])))
        .await
        .expect("request failed");
    assert_eq!(body_json(resp).await["subBreed"], "french");

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/dogbreeds/999",
            &json!({"breed": "bulldog", "subBreed": "english"}),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/dogbreeds/999"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn bad_requests_are_rejected() {
    let (app, temp_path) = test_app("bad").await;

    // Field validation: every failing field is reported.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/dogbreeds",
            &json!({"breed": "  ", "subBreed": "two words"}),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(body["error"]["details"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["error"]["details"][0]["field"], "breed");
    assert_eq!(body["error"]["details"][1]["field"], "subBreed");

    // Padded values fail the letters-only rule instead of being trimmed.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/dogbreeds",
            &json!({"breed": " Bulldog "}),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(body["error"]["details"][0]["field"], "breed");

    // Not JSON at all.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/dogbreeds")
                .header("content-type", "application/json")
                .body(Body::from("not-json"))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Non-numeric id.
    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/dogbreeds/abc"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["code"], "BAD_REQUEST");

    // Unknown route.
    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/cats"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Nothing was created along the way.
    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/dogbreeds"))
        .await
        .expect("request failed");
    assert_eq!(body_json(resp).await, json!([]));

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn request_id_is_echoed_on_matched_and_fallback_routes() {
    let (app, temp_path) = test_app("reqid").await;

    for uri in ["/api/dogbreeds/42", "/api/cats"] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    let _ = std::fs::remove_file(&temp_path);
}
