mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use ironlink::domain::slug_allocator::{GENERATED_SLUG_LEN, SLUG_ALPHABET};

#[tokio::test]
async fn test_create_requires_token() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = common::spawn_app();

    let response = app
        .server
        .get("/api/links")
        .authorization_bearer("not-a-real-token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_with_generated_slug() {
    let app = common::spawn_app();
    let (user, token) = app.seed_user("alice@example.com").await;

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "url": "HTTPS://Example.COM/Some/Path#frag", "title": "Example" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    let slug = body["slug"].as_str().unwrap();
    assert_eq!(slug.len(), GENERATED_SLUG_LEN);
    assert!(slug.bytes().all(|b| SLUG_ALPHABET.contains(&b)));
    assert_eq!(body["long_url"], "https://example.com/Some/Path");
    assert_eq!(body["short_url"], format!("{}/{}", common::BASE_URL, slug));
    assert_eq!(body["title"], "Example");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["click_count"], 0);

    let id = body["id"].as_i64().unwrap();
    assert_eq!(app.link(id).unwrap().user_id, user.id);
}

#[tokio::test]
async fn test_create_with_custom_slug_and_conflict() {
    let app = common::spawn_app();
    let (_, token) = app.seed_user("alice@example.com").await;

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "url": "https://example.com", "slug": "my-link" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["slug"], "my-link");

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "url": "https://other.example.com", "slug": "my-link" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let app = common::spawn_app();
    let (_, token) = app.seed_user("alice@example.com").await;

    for body in [
        json!({ "url": "ftp://example.com/file" }),
        json!({ "url": "not a url" }),
        json!({ "url": "https://example.com", "slug": "ab" }),
        json!({ "url": "https://example.com", "slug": "has space" }),
        json!({ "url": "https://example.com", "slug": "Admin" }),
        json!({ "url": "https://example.com", "title": "t".repeat(101) }),
    ] {
        let response = app
            .server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&body)
            .await;
        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"]["code"],
            "validation_error",
            "body: {body}"
        );
    }
}

#[tokio::test]
async fn test_list_is_scoped_and_newest_first() {
    let app = common::spawn_app();
    let (alice, token) = app.seed_user("alice@example.com").await;
    let (bob, _) = app.seed_user("bob@example.com").await;
    app.seed_link(alice.id, "first", "https://example.com/1");
    app.seed_link(bob.id, "bobs", "https://example.com/b");
    app.seed_link(alice.id, "second", "https://example.com/2");

    let response = app.server.get("/api/links").authorization_bearer(&token).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["slug"], "second");
    assert_eq!(body["items"][1]["slug"], "first");
}

#[tokio::test]
async fn test_get_link_with_recent_clicks() {
    let app = common::spawn_app();
    let (alice, token) = app.seed_user("alice@example.com").await;
    let link = app.seed_link(alice.id, "detail", "https://example.com/");
    for i in 0..12 {
        app.seed_click(
            link.id,
            chrono::Utc::now() - chrono::Duration::minutes(i),
            None,
            None,
        );
    }

    let response = app
        .server
        .get(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["slug"], "detail");
    assert_eq!(body["click_count"], 12);
    assert_eq!(body["recent_clicks"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_other_users_link_is_not_found() {
    let app = common::spawn_app();
    let (alice, _) = app.seed_user("alice@example.com").await;
    let (_, bob_token) = app.seed_user("bob@example.com").await;
    let link = app.seed_link(alice.id, "private", "https://example.com/");
    let path = format!("/api/links/{}", link.id);

    app.server
        .get(&path)
        .authorization_bearer(&bob_token)
        .await
        .assert_status_not_found();
    app.server
        .put(&path)
        .authorization_bearer(&bob_token)
        .json(&json!({ "is_active": false }))
        .await
        .assert_status_not_found();
    app.server
        .delete(&path)
        .authorization_bearer(&bob_token)
        .await
        .assert_status_not_found();

    assert!(app.link(link.id).unwrap().is_active);
}

#[tokio::test]
async fn test_update_slug_and_clear_title() {
    let app = common::spawn_app();
    let (alice, token) = app.seed_user("alice@example.com").await;
    let link = app.seed_link(alice.id, "old-slug", "https://example.com/");
    app.store.lock().unwrap().links[0].title = Some("Old".to_string());

    let response = app
        .server
        .put(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .json(&json!({ "slug": "new-slug", "title": null, "url": "https://EXAMPLE.org/x" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["slug"], "new-slug");
    assert_eq!(body["title"], Value::Null);
    assert_eq!(body["long_url"], "https://example.org/x");
    assert_eq!(body["short_url"], format!("{}/new-slug", common::BASE_URL));

    assert_eq!(app.server.get("/new-slug").await.status_code(), 302);
    app.server.get("/old-slug").await.assert_status_not_found();
}

#[tokio::test]
async fn test_update_slug_conflict() {
    let app = common::spawn_app();
    let (alice, token) = app.seed_user("alice@example.com").await;
    let (bob, _) = app.seed_user("bob@example.com").await;
    let link = app.seed_link(alice.id, "mine", "https://example.com/");
    app.seed_link(bob.id, "taken", "https://example.com/");

    let response = app
        .server
        .put(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .json(&json!({ "slug": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(app.link(link.id).unwrap().slug, "mine");
}

#[tokio::test]
async fn test_deactivate_blocks_redirect() {
    let app = common::spawn_app();
    let (alice, token) = app.seed_user("alice@example.com").await;
    let link = app.seed_link(alice.id, "toggle", "https://example.com/");

    app.server
        .put(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .json(&json!({ "is_active": false }))
        .await
        .assert_status_ok();

    app.server.get("/toggle").await.assert_status_bad_request();

    app.server
        .put(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .json(&json!({ "is_active": true }))
        .await
        .assert_status_ok();

    assert_eq!(app.server.get("/toggle").await.status_code(), 302);
}

#[tokio::test]
async fn test_delete_removes_link_and_clicks() {
    let app = common::spawn_app();
    let (alice, token) = app.seed_user("alice@example.com").await;
    let link = app.seed_link(alice.id, "doomed", "https://example.com/");
    app.seed_click(link.id, chrono::Utc::now(), None, None);

    let response = app
        .server
        .delete(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(app.link(link.id).is_none());
    assert!(app.clicks_for(link.id).is_empty());
    app.server.get("/doomed").await.assert_status_not_found();
}

#[tokio::test]
async fn test_link_creation_rate_limit() {
    let app = common::spawn_app();
    let (_, token) = app.seed_user("alice@example.com").await;

    for i in 0..20 {
        app.server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&json!({ "url": format!("https://example.com/{i}") }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "url": "https://example.com/one-more" }))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    // the same user behind another address owns a separate window
    app.server
        .post("/api/links")
        .authorization_bearer(&token)
        .add_header("X-Forwarded-For", "198.51.100.20")
        .json(&json!({ "url": "https://example.com/elsewhere" }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_policies_share_one_window_per_client() {
    let app = common::spawn_app();
    let (_, token) = app.seed_user("alice@example.com").await;

    for i in 0..10 {
        app.server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&json!({ "url": format!("https://example.com/{i}") }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    app.server
        .get("/api/links")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_general_rate_limit_on_listing() {
    let app = common::spawn_app();
    let (_, token) = app.seed_user("alice@example.com").await;

    for _ in 0..10 {
        app.server
            .get("/api/links")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();
    }

    app.server
        .get("/api/links")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_profile_is_not_rate_limited() {
    let app = common::spawn_app();
    let (user, token) = app.seed_user("alice@example.com").await;

    for _ in 0..30 {
        let response = app.server.get("/api/auth/me").authorization_bearer(&token).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["id"], user.id);
        assert_eq!(body["email"], "alice@example.com");
    }
}

#[tokio::test]
async fn test_revoked_token_is_rejected() {
    let app = common::spawn_app();
    let (_, token) = app.seed_user("alice@example.com").await;
    app.store
        .lock()
        .unwrap()
        .tokens
        .iter_mut()
        .for_each(|t| t.revoked_at = Some(chrono::Utc::now()));

    app.server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
