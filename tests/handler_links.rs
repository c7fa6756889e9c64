mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;
use shortly::state::PublicSettings;

// ─── SHORTEN ─────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_shorten_anonymous(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "https://example.com/page" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<Value>();
    assert_eq!(json["success"], true);

    let data = &json["data"];
    let code = data["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(data["short_url"], format!("{}/{}", common::TEST_BASE_URL, code));
    assert_eq!(data["original_url"], "https://example.com/page");
    assert_eq!(data["title"], "Untitled");
    assert_eq!(data["click_count"], 0);
    assert_eq!(data["is_expired"], false);
}

#[sqlx::test]
async fn test_shorten_custom_code(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({
            "original_url": "example.com",
            "custom_code": "my-promo_1",
            "title": "  Spring campaign  "
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let data = &response.json::<Value>()["data"];
    assert_eq!(data["short_code"], "my-promo_1");
    // Stored verbatim; the scheme is added only when redirecting.
    assert_eq!(data["original_url"], "example.com");
    assert_eq!(data["title"], "Spring campaign");

    let redirect = server.get("/my-promo_1").await;
    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header("location"), "https://example.com");
}

#[sqlx::test]
async fn test_shorten_empty_custom_code_generates_one(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "https://example.com", "custom_code": "" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["short_code"].as_str().unwrap().len(), 8);
}

#[sqlx::test]
async fn test_shorten_duplicate_custom_code(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::insert_link(&pool, "taken", "https://example.com", None).await;

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "https://other.example", "custom_code": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "code_taken");
}

#[sqlx::test]
async fn test_shorten_code_of_deleted_link_is_taken(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    common::insert_deleted_link(&pool, "retired", "https://example.com").await;

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "https://example.com", "custom_code": "retired" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[sqlx::test]
async fn test_shorten_invalid_url(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "not a url" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_url");
    assert_eq!(common::link_count(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_unsupported_scheme(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "javascript:alert(1)" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_url");
}

#[sqlx::test]
async fn test_shorten_rejects_control_characters(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "https://example.com/a\u{1}b" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_url");
    assert_eq!(common::link_count(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_reserved_code(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "https://example.com", "custom_code": "health" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "validation_error");
}

#[sqlx::test]
async fn test_shorten_custom_code_bad_charset(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .json(&json!({ "original_url": "https://example.com", "custom_code": "no spaces" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert_eq!(json["code"], "validation_error");
    assert!(json["details"].get("custom_code").is_some());
}

#[sqlx::test]
async fn test_shorten_malformed_json(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .text("{ not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "validation_error");
}

#[sqlx::test]
async fn test_shorten_base_url_from_host_header(pool: PgPool) {
    let settings = PublicSettings {
        base_url: None,
        ..common::test_settings()
    };
    let (state, _rx) = common::create_test_state_with(pool, settings);
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .add_header("Host", "links.example.com:8080")
        .json(&json!({ "original_url": "https://example.com", "custom_code": "hosted" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>()["data"]["short_url"],
        "http://links.example.com:8080/hosted"
    );
}

#[sqlx::test]
async fn test_shorten_authenticated_sets_owner(pool: PgPool) {
    let owner = common::insert_account(&pool, "ann@example.com").await;
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    let token = common::session_token(owner, "ann@example.com");

    let response = server
        .post("/api/urls/shorten")
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["data"]["id"].as_i64().unwrap();

    let stored_owner: Option<i64> = sqlx::query_scalar("SELECT owner_id FROM links WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored_owner, Some(owner));
}

#[sqlx::test]
async fn test_shorten_invalid_token_creates_anonymous_link(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    let response = server
        .post("/api/urls/shorten")
        .add_header("Authorization", "Bearer not-a-jwt")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["data"]["id"].as_i64().unwrap();

    let stored_owner: Option<i64> = sqlx::query_scalar("SELECT owner_id FROM links WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(stored_owner.is_none());
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_list_own_links(pool: PgPool) {
    let owner = common::insert_account(&pool, "ann@example.com").await;
    let other = common::insert_account(&pool, "bob@example.com").await;
    common::insert_link(&pool, "ann1", "https://a.example", Some(owner)).await;
    common::insert_link(&pool, "ann2", "https://b.example", Some(owner)).await;
    common::insert_link(&pool, "bob1", "https://c.example", Some(other)).await;

    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .get("/api/urls/list")
        .add_header(
            "Authorization",
            common::bearer(&common::session_token(owner, "ann@example.com")),
        )
        .await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["total"], 2);
    assert_eq!(data["items"][0]["short_code"], "ann2");
    assert_eq!(data["items"][1]["short_code"], "ann1");
}

#[sqlx::test]
async fn test_list_anonymous_is_empty(pool: PgPool) {
    common::insert_link(&pool, "anon", "https://example.com", None).await;

    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server.get("/api/urls/list").await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["total"], 0);
    assert_eq!(data["items"], json!([]));
}

// ─── UPDATE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_update_title_by_owner(pool: PgPool) {
    let owner = common::insert_account(&pool, "ann@example.com").await;
    let id = common::insert_link(&pool, "mine", "https://example.com", Some(owner)).await;

    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .put(&format!("/api/urls/{id}"))
        .add_header(
            "Authorization",
            common::bearer(&common::session_token(owner, "ann@example.com")),
        )
        .json(&json!({ "title": "Renamed" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["title"], "Renamed");
}

#[sqlx::test]
async fn test_update_title_by_other_owner_is_not_found(pool: PgPool) {
    let owner = common::insert_account(&pool, "ann@example.com").await;
    let other = common::insert_account(&pool, "bob@example.com").await;
    let id = common::insert_link(&pool, "mine", "https://example.com", Some(owner)).await;

    let (state, _rx) = common::create_test_state(pool.clone());
    let server = common::test_server(state);

    let response = server
        .put(&format!("/api/urls/{id}"))
        .add_header(
            "Authorization",
            common::bearer(&common::session_token(other, "bob@example.com")),
        )
        .json(&json!({ "title": "Hijacked" }))
        .await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["code"], "not_found");
    assert_eq!(common::link_title(&pool, id).await, "Untitled");
}

#[sqlx::test]
async fn test_update_blank_title_rejected(pool: PgPool) {
    let id = common::insert_link(&pool, "blank", "https://example.com", None).await;

    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server
        .put(&format!("/api/urls/{id}"))
        .json(&json!({ "title": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "validation_error");
}

#[sqlx::test]
async fn test_update_missing_link(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    server
        .put("/api/urls/999999")
        .json(&json!({ "title": "Nothing" }))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_non_numeric_id_returns_envelope(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let responses = [
        server
            .put("/api/urls/abc")
            .json(&json!({ "title": "Nothing" }))
            .await,
        server.delete("/api/urls/abc").await,
        server.get("/api/urls/abc/stats").await,
    ];

    for response in responses {
        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "validation_error");
        assert!(body["error"].is_string());
    }
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_delete_link_success(pool: PgPool) {
    let owner = common::insert_account(&pool, "ann@example.com").await;
    let id = common::insert_link(&pool, "del001", "https://example.com", Some(owner)).await;

    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);
    let auth = common::bearer(&common::session_token(owner, "ann@example.com"));

    let response = server
        .delete(&format!("/api/urls/{id}"))
        .add_header("Authorization", auth.clone())
        .await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["id"], id);
    assert_eq!(data["deleted"], true);

    // Second delete returns 404: already deleted.
    server
        .delete(&format!("/api/urls/{id}"))
        .add_header("Authorization", auth.clone())
        .await
        .assert_status_not_found();

    // Deleted links disappear from every management operation.
    server
        .get(&format!("/api/urls/{id}/stats"))
        .add_header("Authorization", auth.clone())
        .await
        .assert_status_not_found();
    server
        .put(&format!("/api/urls/{id}"))
        .add_header("Authorization", auth)
        .json(&json!({ "title": "Back" }))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_delete_by_other_owner_is_not_found(pool: PgPool) {
    let owner = common::insert_account(&pool, "ann@example.com").await;
    let other = common::insert_account(&pool, "bob@example.com").await;
    let id = common::insert_link(&pool, "keep", "https://example.com", Some(owner)).await;

    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    server
        .delete(&format!("/api/urls/{id}"))
        .add_header(
            "Authorization",
            common::bearer(&common::session_token(other, "bob@example.com")),
        )
        .await
        .assert_status_not_found();

    server.get("/keep").await.assert_status(StatusCode::FOUND);
}

// ─── STATS ───────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_link_stats(pool: PgPool) {
    let id = common::insert_link(&pool, "stats", "https://example.com", None).await;
    sqlx::query("UPDATE links SET click_count = 7, last_clicked_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server.get(&format!("/api/urls/{id}/stats")).await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["total_clicks"], 7);
    assert!(!data["last_clicked"].is_null());
    assert_eq!(data["link"]["short_code"], "stats");
    assert_eq!(data["link"]["short_url"], "http://sho.rt/stats");
}

#[sqlx::test]
async fn test_link_stats_expired_link_still_reported(pool: PgPool) {
    let id = common::insert_expired_link(&pool, "old", "https://example.com").await;

    let (state, _rx) = common::create_test_state(pool);
    let server = common::test_server(state);

    let response = server.get(&format!("/api/urls/{id}/stats")).await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["total_clicks"], 5);
    assert_eq!(data["link"]["is_expired"], true);
}
