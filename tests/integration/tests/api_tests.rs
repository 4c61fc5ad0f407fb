//! API integration tests
//!
//! Every test starts its own server on the in-memory backend.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, create_block, TestServer, ADMIN, ALICE, BOB};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health", None).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_memory_backend() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health/ready", None).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "memory");
    assert_eq!(body["checks"]["redis"], "disabled");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/feed", None).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .get("/api/v1/profiles/@me", Some("not-a-token"))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_signed_out_create_is_unauthorized() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post("/api/v1/blocks", None, &json!({"title": "Hello"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Feed
// ============================================================================

#[tokio::test]
async fn test_empty_feed() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/feed", None).await.unwrap();
    let page: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(page["data"], json!([]));
    assert_eq!(page["pagination"]["has_more"], false);
    assert_eq!(page["sort"], "recent");
    assert_eq!(page["time"], "all");
}

#[tokio::test]
async fn test_feed_rejects_unknown_sort() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/feed?sort=hot", None).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_feed_pages_with_cursor() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    for i in 0..12 {
        create_block(&server, &alice, &format!("Block {i}")).await.unwrap();
    }

    let first: Value = assert_json(
        server.get("/api/v1/feed?sort=recent", None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(first["data"].as_array().unwrap().len(), 10);
    assert_eq!(first["pagination"]["has_more"], true);
    // Newest first
    assert_eq!(first["data"][0]["title"], "Block 11");

    let cursor = first["pagination"]["next_cursor"].as_str().unwrap();
    let second: Value = assert_json(
        server
            .get(&format!("/api/v1/feed?sort=recent&cursor={cursor}"), None)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let titles: Vec<&str> = second["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Block 1", "Block 0"]);
    assert_eq!(second["pagination"]["has_more"], false);
}

#[tokio::test]
async fn test_feed_sorted_by_votes() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let bob = server.token(BOB).unwrap();

    create_block(&server, &alice, "Quiet").await.unwrap();
    let popular = create_block(&server, &alice, "Popular").await.unwrap();
    for token in [&alice, &bob] {
        let response = server
            .put(
                &format!("/api/v1/blocks/{popular}/vote"),
                Some(token),
                &json!({"value": 1}),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let page: Value = assert_json(
        server.get("/api/v1/feed?sort=votes", None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(page["data"][0]["title"], "Popular");
    assert_eq!(page["data"][0]["score"], 2);
    assert_eq!(page["data"][1]["title"], "Quiet");
}

// ============================================================================
// Blocks
// ============================================================================

#[tokio::test]
async fn test_block_crud_and_permissions() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let bob = server.token(BOB).unwrap();
    let admin = server.token(ADMIN).unwrap();

    let id = create_block(&server, &alice, "Mine").await.unwrap();
    let path = format!("/api/v1/blocks/{id}");

    let block: Value = assert_json(server.get(&path, None).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(block["owner"], ALICE);
    assert_eq!(block["type"], "default");

    let response = server
        .patch(&path, Some(&bob), &json!({"title": "Stolen"}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");

    let response = server
        .patch(&path, Some(&alice), &json!({"title": "Renamed", "type": "large-image"}))
        .await
        .unwrap();
    let updated: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["type"], "large-image");

    let response = server.delete(&path, Some(&bob)).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.delete(&path, Some(&admin)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&path, None).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_create_block_validation() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();

    let response = server
        .post("/api/v1/blocks", Some(&alice), &json!({"title": ""}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post(
            "/api/v1/blocks",
            Some(&alice),
            &json!({"title": "Odd", "type": "hologram"}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.get("/api/v1/blocks/not-a-number", None).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_card_html_escapes_user_text() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let id = create_block(&server, &alice, "<script>alert(1)</script>")
        .await
        .unwrap();

    let response = server
        .get(&format!("/api/v1/blocks/{id}/card"), None)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let html = response.text().await.unwrap();
    assert!(html.starts_with("<article"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains(r#"data-href="https://example.com/""#));
    // Signed out: vote buttons are disabled
    assert!(html.contains(" disabled"));
}

#[tokio::test]
async fn test_feed_cards_reflect_viewer_vote() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let id = create_block(&server, &alice, "Voted").await.unwrap();
    server
        .put(
            &format!("/api/v1/blocks/{id}/vote"),
            Some(&alice),
            &json!({"value": 1}),
        )
        .await
        .unwrap();

    let page: Value = assert_json(
        server.get("/api/v1/feed/cards", Some(&alice)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let html = page["data"][0]["html"].as_str().unwrap();
    assert!(html.contains("vote--up is-active"));
    assert!(!html.contains("vote--down is-active"));
}

// ============================================================================
// Votes
// ============================================================================

#[tokio::test]
async fn test_toggle_vote_sequence() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let bob = server.token(BOB).unwrap();
    let id = create_block(&server, &alice, "Vote on me").await.unwrap();
    let toggle = format!("/api/v1/blocks/{id}/vote/toggle");

    let expected = [(1, 1, 1, 0), (0, 0, 0, 0), (-1, -1, 0, 1)];
    let mut directions = [1, 1, -1].into_iter();
    for (score, value, upvotes, downvotes) in expected {
        let direction = directions.next().unwrap();
        let response = server
            .post(&toggle, Some(&bob), &json!({"direction": direction}))
            .await
            .unwrap();
        let vote: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(vote["value"], value);
        assert_eq!(vote["score"], score);
        assert_eq!(vote["upvotes"], upvotes);
        assert_eq!(vote["downvotes"], downvotes);
    }

    let current: Value = assert_json(
        server
            .get(&format!("/api/v1/blocks/{id}/vote"), Some(&bob))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(current["value"], -1);

    let block: Value = assert_json(
        server.get(&format!("/api/v1/blocks/{id}"), None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(block["score"], -1);
    assert_eq!(block["downvotes"], 1);
}

#[tokio::test]
async fn test_signed_out_vote_is_noop() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let id = create_block(&server, &alice, "Quiet").await.unwrap();

    let response = server
        .put(&format!("/api/v1/blocks/{id}/vote"), None, &json!({"value": 1}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .put(&format!("/api/v1/blocks/{id}/vote"), Some(&alice), &json!({"value": 5}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let block: Value = assert_json(
        server.get(&format!("/api/v1/blocks/{id}"), None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(block["upvotes"], 0);
}

#[tokio::test]
async fn test_vote_on_missing_block_is_noop() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let response = server
        .put("/api/v1/blocks/12345/vote", Some(&alice), &json!({"value": 1}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_thread() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let bob = server.token(BOB).unwrap();
    let admin = server.token(ADMIN).unwrap();
    let id = create_block(&server, &alice, "Discuss").await.unwrap();
    let comments = format!("/api/v1/blocks/{id}/comments");

    // Blank text and signed-out posts do nothing
    let response = server.post(&comments, Some(&bob), &json!({"text": "   "})).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    let response = server.post(&comments, None, &json!({"text": "hi"})).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    for text in ["one", "two", "three", "four"] {
        let response = server.post(&comments, Some(&bob), &json!({"text": text})).await.unwrap();
        let comment: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(comment["author"], BOB);
    }

    let page: Value = assert_json(server.get(&comments, None).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(page["data"].as_array().unwrap().len(), 3);
    assert_eq!(page["data"][0]["text"], "four");
    assert_eq!(page["can_view_all"], true);

    let all: Value = assert_json(
        server.get(&format!("{comments}?all=true"), None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(all["data"].as_array().unwrap().len(), 4);
    assert_eq!(all["show_all"], true);
    assert_eq!(all["can_view_all"], false);

    let comment_id = page["data"][0]["id"].as_str().unwrap();
    let comment_path = format!("{comments}/{comment_id}");

    // The block owner is not the comment author
    let response = server
        .patch(&comment_path, Some(&alice), &json!({"text": "edited"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .patch(&comment_path, Some(&bob), &json!({"text": "edited"}))
        .await
        .unwrap();
    let edited: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(edited["text"], "edited");
    assert!(edited["edited_at"].is_string());

    let response = server.delete(&comment_path, Some(&admin)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let all: Value = assert_json(
        server.get(&format!("{comments}?all=true"), None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(all["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_comment_on_missing_block() {
    let server = TestServer::start().await.unwrap();
    let bob = server.token(BOB).unwrap();
    let response = server
        .post("/api/v1/blocks/999/comments", Some(&bob), &json!({"text": "hello"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Feed sessions
// ============================================================================

#[tokio::test]
async fn test_session_pager_loads_on_scroll() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    for i in 0..12 {
        create_block(&server, &alice, &format!("Block {i}")).await.unwrap();
    }

    let session: Value = assert_json(
        server.post("/api/v1/sessions", Some(&alice), &json!({})).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(session["signed_in"], true);
    let base = format!("/api/v1/sessions/{}", session["session_id"].as_str().unwrap());

    let pager: Value = assert_json(
        server.post(&format!("{base}/load"), None, &json!({})).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(pager["outcome"], "loaded");
    assert_eq!(pager["items"].as_array().unwrap().len(), 10);
    assert_eq!(pager["has_more"], true);

    let far = json!({"scroll_top": 0.0, "client_height": 800.0, "scroll_height": 4000.0});
    let pager: Value = assert_json(
        server.post(&format!("{base}/scroll"), None, &far).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(pager["outcome"], "not_needed");

    let near = json!({"scroll_top": 3180.0, "client_height": 800.0, "scroll_height": 4000.0});
    let pager: Value = assert_json(
        server.post(&format!("{base}/scroll"), None, &near).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(pager["outcome"], "loaded");
    assert_eq!(pager["items"].as_array().unwrap().len(), 12);
    assert_eq!(pager["has_more"], false);

    let pager: Value = assert_json(
        server.post(&format!("{base}/scroll"), None, &near).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(pager["outcome"], "exhausted");

    let cards: Value = assert_json(
        server.get(&format!("{base}/cards"), None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(cards["data"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_session_filters_reset_items() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let first = create_block(&server, &alice, "First").await.unwrap();
    create_block(&server, &alice, "Second").await.unwrap();
    server
        .put(&format!("/api/v1/blocks/{first}/vote"), Some(&alice), &json!({"value": 1}))
        .await
        .unwrap();

    let session: Value = assert_json(
        server.post("/api/v1/sessions", None, &json!({})).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(session["signed_in"], false);
    let base = format!("/api/v1/sessions/{}", session["session_id"].as_str().unwrap());

    let pager: Value = assert_json(
        server.post(&format!("{base}/load"), None, &json!({})).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(pager["items"][0]["title"], "Second");

    let pager: Value = assert_json(
        server
            .put(&format!("{base}/filters"), None, &json!({"sort": "votes"}))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(pager["sort"], "votes");
    assert_eq!(pager["time"], "all");
    assert_eq!(pager["items"].as_array().unwrap().len(), 2);
    assert_eq!(pager["items"][0]["title"], "First");

    let response = server
        .put(&format!("{base}/filters"), None, &json!({"sort": "hot"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_session_identity_and_close() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();

    let session: Value = assert_json(
        server.post("/api/v1/sessions", None, &json!({})).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let base = format!("/api/v1/sessions/{}", session["session_id"].as_str().unwrap());

    let signed_in: Value = assert_json(
        server
            .put(&format!("{base}/identity"), Some(&alice), &json!({}))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(signed_in["signed_in"], true);

    let signed_out: Value = assert_json(
        server.delete(&format!("{base}/identity"), None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(signed_out["signed_in"], false);

    assert_status(server.delete(&base, None).await.unwrap(), StatusCode::NO_CONTENT)
        .await
        .unwrap();
    let response = server.get(&base, None).await.unwrap();
    let body: Value = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
}

// ============================================================================
// Profiles and navbar
// ============================================================================

#[tokio::test]
async fn test_profile_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let bob = server.token(BOB).unwrap();

    let me: Value = assert_json(
        server.get("/api/v1/profiles/@me", Some(&alice)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(me["user_key"], ALICE);
    assert!(me["profile_href"]
        .as_str()
        .unwrap()
        .starts_with("index.html?profile="));

    let updated: Value = assert_json(
        server
            .patch("/api/v1/profiles/@me", Some(&alice), &json!({"title": "Alice A."}))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(updated["title"], "Alice A.");

    // Bob has no profile yet
    let response = server
        .post("/api/v1/profiles/@me/connections", Some(&alice), &json!({"user_key": BOB}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    server.get("/api/v1/profiles/@me", Some(&bob)).await.unwrap();
    let connected: Value = assert_json(
        server
            .post("/api/v1/profiles/@me/connections", Some(&alice), &json!({"user_key": BOB}))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(connected["connections"], json!([BOB]));

    let public: Value = assert_json(
        server.get(&format!("/api/v1/profiles/{ALICE}"), None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(public["title"], "Alice A.");
}

#[tokio::test]
async fn test_navbar_html() {
    let server = TestServer::start().await.unwrap();
    let admin = server.token(ADMIN).unwrap();

    let html = server.get("/api/v1/navbar/html", None).await.unwrap().text().await.unwrap();
    assert!(html.contains(r#"data-signed-in="false""#));
    assert!(!html.contains("navbar__admin"));

    let html = server
        .get("/api/v1/navbar/html", Some(&admin))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("navbar--desktop"));
    assert!(html.contains("navbar--mobile"));
    assert!(html.contains("navbar__admin"));
}

// ============================================================================
// Admin: collab posts and notifications
// ============================================================================

#[tokio::test]
async fn test_collab_posts() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let bob = server.token(BOB).unwrap();

    let post: Value = assert_json(
        server
            .post(
                "/api/v1/collab-posts",
                Some(&alice),
                &json!({"title": "Need a designer", "description": "Small app"}),
            )
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let path = format!("/api/v1/collab-posts/{}", post["id"].as_str().unwrap());

    let response = server.delete(&path, Some(&bob)).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let list: Value = assert_json(
        server.get("/api/v1/collab-posts", None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    let response = server.delete(&path, Some(&alice)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_broadcast_is_admin_only() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let admin = server.token(ADMIN).unwrap();
    let body = json!({"message": "Maintenance tonight", "recipients": [ALICE, BOB]});

    let response = server
        .post("/api/v1/admin/notifications", Some(&alice), &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let sent: Value = assert_json(
        server
            .post("/api/v1/admin/notifications", Some(&admin), &body)
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(sent["batches"], 1);
    assert_eq!(sent["sent"]["recipient_count"], 2);

    let inbox: Value = assert_json(
        server.get("/api/v1/notifications", Some(&alice)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(inbox.as_array().unwrap().len(), 1);
    assert_eq!(inbox[0]["message"], "Maintenance tonight");
    assert_eq!(inbox[0]["read"], false);

    let id = inbox[0]["id"].as_str().unwrap();
    let response = server
        .post(&format!("/api/v1/notifications/{id}/read"), Some(&alice), &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let log: Value = assert_json(
        server
            .get("/api/v1/admin/notifications/sent", Some(&admin))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(log.as_array().unwrap().len(), 1);
}

// ============================================================================
// Uploads
// ============================================================================

#[tokio::test]
async fn test_upload_and_delete_image() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();
    let bob = server.token(BOB).unwrap();

    let response = server
        .request(reqwest::Method::POST, "/api/v1/uploads?name=cover.png", Some(&alice))
        .header("content-type", "image/png")
        .body(vec![137u8, 80, 78, 71])
        .send()
        .await
        .unwrap();
    let uploaded: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let url = uploaded["url"].as_str().unwrap().to_string();
    let stored = server
        .upload_dir
        .path()
        .join(uploaded["path"].as_str().unwrap());
    assert!(url.contains("?alt=media"));
    assert!(stored.exists());

    let response = server
        .request(reqwest::Method::DELETE, "/api/v1/uploads", Some(&bob))
        .query(&[("url", url.as_str())])
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    assert!(stored.exists());

    let response = server
        .request(reqwest::Method::DELETE, "/api/v1/uploads", Some(&alice))
        .query(&[("url", url.as_str())])
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    assert!(!stored.exists());
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let server = TestServer::start().await.unwrap();
    let alice = server.token(ALICE).unwrap();

    let response = server
        .request(reqwest::Method::POST, "/api/v1/uploads?name=notes.txt", Some(&alice))
        .header("content-type", "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .request(reqwest::Method::POST, "/api/v1/uploads?name=a.png", None)
        .header("content-type", "image/png")
        .body(vec![1u8])
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Globe
// ============================================================================

#[tokio::test]
async fn test_globe_scene_is_seeded() {
    let server = TestServer::start().await.unwrap();

    let a: Value = assert_json(
        server.get("/api/v1/globe/scene?seed=3&stars=25", None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let b: Value = assert_json(
        server.get("/api/v1/globe/scene?seed=3&stars=25", None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(a["stars"]["points"].as_array().unwrap().len(), 25);
    assert_eq!(a, b);
    assert!(a.get("outline").is_none());

    let response = server.get("/api/v1/globe/scene?stars=50000", None).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_globe_scene_serves_loaded_outline() {
    let geojson = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        geojson.path(),
        r#"{"type":"LineString","coordinates":[[0,0],[10,0],[10,10]]}"#,
    )
    .unwrap();
    let path = geojson.path().to_str().unwrap().to_string();

    let server = TestServer::start_with(|config| config.globe.geojson_path = Some(path))
        .await
        .unwrap();
    let scene: Value = assert_json(
        server.get("/api/v1/globe/scene?stars=1", None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(scene["outline"]["lines"][0].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_globe_intro_variants() {
    let server = TestServer::start_with(|config| config.globe.fallback_ms = 5_000)
        .await
        .unwrap();

    let intro: Value = assert_json(
        server.get("/api/v1/globe/intro?variant=interactive", None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(intro["variant"], "interactive");
    assert_eq!(intro["fallback"], 5_000);
    assert_eq!(intro["flight"], 2_500);

    let intro: Value = assert_json(
        server.get("/api/v1/globe/intro", None).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(intro["variant"], "landing");

    let response = server.get("/api/v1/globe/intro?variant=spin", None).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "UNKNOWN_INTRO_VARIANT");
}
