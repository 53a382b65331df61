//! Integration tests for the public academy-portal API
//!
//! Each test gets its own SQLite file in a temp dir with admin auth disabled.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

use academy_portal::db::init_database;
use academy_portal::payments::DisabledProvider;
use academy_portal::{build_router, AppState, ChatLimits};

/// Test helper: fresh database and router (auth disabled)
async fn setup_app() -> (TempDir, axum::Router) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("academy.db")).await.unwrap();
    let state = AppState::new(pool, 0, Arc::new(DisabledProvider));
    (dir, build_router(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "academy-portal");
    assert!(body["version"].is_string());
}

// =============================================================================
// Programs
// =============================================================================

#[tokio::test]
async fn test_seeded_programs_listed() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(get("/api/programs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let slugs: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs.len(), 3);
    assert!(slugs.contains(&"skills-lab"));
    assert!(slugs.contains(&"performance-lab"));
    assert!(slugs.contains(&"private-training"));
}

#[tokio::test]
async fn test_program_search_filters() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(get("/api/programs?q=LAB")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    let programs = body.as_array().unwrap();
    assert_eq!(programs.len(), 2);
    assert!(programs
        .iter()
        .all(|p| p["name"].as_str().unwrap().contains("Lab")));
}

#[tokio::test]
async fn test_program_detail_and_404() {
    let (_dir, app) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/programs/performance-lab"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["price_cents"], 24_500);

    let response = app.oneshot(get("/api/programs/archery")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Quiz & leads
// =============================================================================

#[tokio::test]
async fn test_quiz_recommendation() {
    let (_dir, app) = setup_app().await;

    let request = json_request(
        "POST",
        "/api/quiz/recommend",
        json!({"age": "8-10", "sport": "basketball", "goal": "commit"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["program"], "Performance Lab");
    assert_eq!(body["slug"], "performance-lab");
    assert_eq!(body["price"], "$245");
}

#[tokio::test]
async fn test_quiz_unknown_answer_is_bad_request() {
    let (_dir, app) = setup_app().await;

    let request = json_request(
        "POST",
        "/api/quiz/recommend",
        json!({"age": "toddler", "sport": "basketball", "goal": "commit"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_lead_with_quiz_returns_recommendation() {
    let (_dir, app) = setup_app().await;

    let request = json_request(
        "POST",
        "/api/leads",
        json!({
            "name": "Jordan Lee",
            "email": "Jordan@Example.com",
            "quiz": {"age": "15+", "sport": "soccer", "goal": "tryout-prep"}
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert!(body["id"].is_string());
    assert_eq!(body["recommendation"]["slug"], "private-training");

    let response = app.oneshot(get("/api/admin/leads")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = extract_json(response.into_body()).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["email"], "jordan@example.com");
    assert_eq!(page["items"][0]["recommended_slug"], "private-training");
}

#[tokio::test]
async fn test_invalid_lead_reports_every_field() {
    let (_dir, app) = setup_app().await;

    let request = json_request(
        "POST",
        "/api/leads",
        json!({"name": "J", "email": "not-an-email"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_send_and_read_in_order() {
    let (_dir, app) = setup_app().await;

    for body in ["first", "second", "third"] {
        let request = json_request(
            "POST",
            "/api/chat/rooms/general/messages",
            json!({"author": "Coach T", "body": body}),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get("/api/chat/rooms/general/messages"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let bodies: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, ["first", "second", "third"]);

    // limit keeps the newest messages, still oldest first
    let response = app
        .oneshot(get("/api/chat/rooms/general/messages?limit=2"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let bodies: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, ["second", "third"]);
}

#[tokio::test]
async fn test_chat_history_capped_by_limits() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("academy.db")).await.unwrap();
    let state = AppState::new(pool, 0, Arc::new(DisabledProvider)).with_chat_limits(ChatLimits {
        default_limit: 2,
        max_limit: 3,
    });
    let app = build_router(state);

    for i in 0..5 {
        let request = json_request(
            "POST",
            "/api/chat/rooms/general/messages",
            json!({"author": "Parent", "body": format!("msg {}", i)}),
        );
        app.clone().oneshot(request).await.unwrap();
    }

    let response = app
        .clone()
        .oneshot(get("/api/chat/rooms/general/messages"))
        .await
        .unwrap();
    assert_eq!(extract_json(response.into_body()).await.as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get("/api/chat/rooms/general/messages?limit=100"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2]["body"], "msg 4");
}

#[tokio::test]
async fn test_chat_unknown_room_is_404() {
    let (_dir, app) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/chat/rooms/lobby/messages"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = json_request(
        "POST",
        "/api/chat/rooms/lobby/messages",
        json!({"author": "Parent", "body": "hello"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_chat_message_rejected() {
    let (_dir, app) = setup_app().await;

    let request = json_request(
        "POST",
        "/api/chat/rooms/general/messages",
        json!({"author": "Parent", "body": "   "}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Admin CRUD (auth disabled)
// =============================================================================

#[tokio::test]
async fn test_admin_program_lifecycle() {
    let (_dir, app) = setup_app().await;

    let input = json!({
        "slug": "speed-camp",
        "name": "Speed Camp",
        "description": "Summer speed and agility",
        "price_cents": 15_000,
        "sport": "football"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/programs", input.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate slug
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/programs", input))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Deactivate: hidden from public list and detail
    let update = json!({
        "slug": "speed-camp",
        "name": "Speed Camp",
        "price_cents": 15_000,
        "active": false
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/admin/programs/speed-camp", update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/programs/speed-camp"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get("/api/admin/programs"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 4);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/admin/programs/speed-camp")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/admin/programs/speed-camp")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_gallery_sorted_by_sort_order() {
    let (_dir, app) = setup_app().await;

    for (title, order) in [("Finals", 2), ("Warmups", 1)] {
        let input = json!({
            "title": title,
            "image_url": format!("https://cdn.example.com/{}.jpg", order),
            "sort_order": order
        });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/admin/gallery", input))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/api/gallery")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["title"], "Warmups");
    assert_eq!(body[1]["title"], "Finals");
}

#[tokio::test]
async fn test_testimonial_rating_validated() {
    let (_dir, app) = setup_app().await;

    let input = json!({"author": "Dana P.", "quote": "Great coaches", "rating": 6});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/testimonials", input))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let input = json!({"author": "Dana P.", "quote": "Great coaches", "rating": 5});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/testimonials", input))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/api/testimonials")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["rating"], 5);
}

#[tokio::test]
async fn test_malformed_query_uses_error_envelope() {
    let (_dir, app) = setup_app().await;

    for uri in [
        "/api/chat/rooms/general/messages?limit=abc",
        "/api/admin/leads?page=x",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "{}", uri);
        assert!(body["error"]["message"].is_string());
    }
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_admin_gallery_lifecycle() {
    let (_dir, app) = setup_app().await;

    let input = json!({
        "title": "Spring Showcase",
        "image_url": "/images/showcase.jpg",
        "caption": "Team photo"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/gallery", input))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = extract_json(response.into_body()).await;
    let id = created["id"].as_str().unwrap().to_string();

    let update = json!({
        "title": "Spring Showcase 2026",
        "image_url": "/images/showcase.jpg",
        "sort_order": 3
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/api/admin/gallery/{}", id), update.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/gallery/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["title"], "Spring Showcase 2026");
    assert_eq!(body["sort_order"], 3);

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/admin/gallery/missing", update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/admin/gallery/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/gallery/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(delete_request(&format!("/api/admin/gallery/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_video_lifecycle() {
    let (_dir, app) = setup_app().await;

    for (title, order) in [("Footwork Drills", 2), ("Shooting Form", 1)] {
        let input = json!({
            "title": title,
            "video_url": format!("https://videos.example.com/{}.mp4", order),
            "sort_order": order
        });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/admin/videos", input))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.clone().oneshot(get("/api/videos")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["title"], "Shooting Form");
    let id = body[1]["id"].as_str().unwrap().to_string();

    let update = json!({
        "title": "Footwork Drills",
        "video_url": "https://videos.example.com/footwork.mp4",
        "description": "Ladder and cone work",
        "sort_order": 0
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/api/admin/videos/{}", id), update.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/videos")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["title"], "Footwork Drills");
    assert_eq!(body[0]["description"], "Ladder and cone work");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/videos/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/admin/videos/missing", update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/admin/videos/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/videos/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(delete_request("/api/admin/videos/missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_coach_lifecycle() {
    let (_dir, app) = setup_app().await;

    let input = json!({
        "name": "Marcus Hill",
        "title": "Head Skills Coach",
        "bio": "Former college point guard",
        "photo_url": "/images/coaches/marcus.jpg"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/coaches", input))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = extract_json(response.into_body()).await;
    let id = created["id"].as_str().unwrap().to_string();

    let bad = json!({"name": "Marcus Hill", "title": "Coach", "photo_url": "ftp://x"});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/coaches", bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.clone().oneshot(get("/api/coaches")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Marcus Hill");

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/admin/coaches/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get("/api/coaches")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());

    let response = app
        .oneshot(delete_request(&format!("/api/admin/coaches/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_chat_room_and_moderation() {
    let (_dir, app) = setup_app().await;

    let room = json!({"slug": "parents", "name": "Parents"});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/chat/rooms", room.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/chat/rooms", room))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.clone().oneshot(get("/api/chat/rooms")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["slug"] == "parents"));

    let message = json!({"author": "Coach T", "body": "Practice moved to 6pm"});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/chat/rooms/parents/messages", message))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let sent = extract_json(response.into_body()).await;
    let id = sent["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/admin/chat/messages/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get("/api/chat/rooms/parents/messages"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());

    let response = app
        .oneshot(delete_request(&format!("/api/admin/chat/messages/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
