//! API route definitions.

mod blogs;
mod comments;
mod health;
mod login;
mod stats;
mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the complete API router.
///
/// # Route Structure
///
/// - `GET /health` - Health check
/// - `GET|POST /api/blogs` - List / create (create needs a token)
/// - `GET|PUT|DELETE /api/blogs/{id}` - Read / replace / delete (delete needs a token)
/// - `GET|POST /api/blogs/{id}/comments` - Comments of one blog
/// - `GET|POST /api/users` - List / register users
/// - `POST /api/login` - Exchange credentials for a token
/// - `GET /api/stats` - Aggregate blog statistics
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/blogs", get(blogs::list_blogs).post(blogs::create_blog))
        .route(
            "/blogs/{id}",
            get(blogs::get_blog)
                .put(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        .route(
            "/blogs/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/login", post(login::login))
        .route("/stats", get(stats::overview));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .fallback(unknown_endpoint)
        .with_state(state)
}

async fn unknown_endpoint() -> ApiError {
    ApiError::NotFound("unknown endpoint".to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Config;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use bloglist_core::fixtures::reference_blogs;
    use bloglist_core::models::BlogDraft;
    use bloglist_data::store::BlogStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn config(data_file: Option<std::path::PathBuf>) -> Config {
        Config {
            bind_addr: "127.0.0.1:0".to_string(),
            secret: "test-secret".to_string(),
            data_file,
        }
    }

    fn app_with(store: BlogStore) -> Router {
        router(AppState::new(config(None), store))
    }

    fn seeded_store() -> BlogStore {
        let mut store = BlogStore::new();
        for r in reference_blogs() {
            store
                .create_blog(
                    BlogDraft {
                        title: r.title,
                        author: r.author,
                        url: r.url,
                        likes: r.likes,
                    },
                    None,
                )
                .unwrap();
        }
        store
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Register `username` and log in, returning the token.
    async fn login_as(app: &Router, username: &str) -> String {
        let (status, _) = send(
            app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({"username": username, "name": "Test User", "password": "sekret"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": username, "password": "sekret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_blog(app: &Router, token: &str, title: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/blogs",
            Some(token),
            Some(json!({"title": title, "author": "Tester", "url": "http://example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    // ── health / fallback ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let app = app_with(BlogStore::new());
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_endpoint() {
        let app = app_with(BlogStore::new());
        let (status, body) = send(&app, Method::GET, "/api/nothing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "unknown endpoint"}));
    }

    // ── blogs ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_list_blogs_returns_all_in_order() {
        let app = app_with(seeded_store());
        let (status, body) = send(&app, Method::GET, "/api/blogs", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let blogs = body.as_array().unwrap();
        assert_eq!(blogs.len(), 6);
        assert_eq!(blogs[0]["title"], "React patterns");
        assert!(blogs[0]["id"].is_string());
    }

    #[tokio::test]
    async fn test_create_blog_requires_token() {
        let app = app_with(BlogStore::new());
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/blogs",
            None,
            Some(json!({"title": "t", "url": "u"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "token missing or invalid");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/blogs",
            Some("not-a-jwt"),
            Some(json!({"title": "t", "url": "u"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_blog_defaults_likes_and_links_user() {
        let app = app_with(BlogStore::new());
        let token = login_as(&app, "root").await;

        let blog = create_blog(&app, &token, "First").await;
        assert_eq!(blog["likes"], 0);
        assert_eq!(blog["user"]["username"], "root");

        let (_, users) = send(&app, Method::GET, "/api/users", None, None).await;
        assert_eq!(users[0]["blogs"][0]["title"], "First");
        assert!(users[0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_create_blog_missing_url() {
        let app = app_with(BlogStore::new());
        let token = login_as(&app, "root").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/blogs",
            Some(&token),
            Some(json!({"title": "no url"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "title or url missing");
    }

    #[tokio::test]
    async fn test_create_blog_rejects_negative_likes() {
        let app = app_with(BlogStore::new());
        let token = login_as(&app, "root").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/blogs",
            Some(&token),
            Some(json!({"title": "t", "url": "u", "likes": -4})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_excess_likes_rejected_and_stats_stay_exact() {
        let app = app_with(seeded_store());
        let token = login_as(&app, "root").await;

        for likes in [json!(u64::MAX), json!(u64::from(u32::MAX) + 1)] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/blogs",
                Some(&token),
                Some(json!({"title": "t", "url": "u", "likes": likes})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let (status, body) = send(&app, Method::GET, "/api/stats", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["blog_count"], 6);
        assert_eq!(body["total_likes"], 36);
    }

    #[tokio::test]
    async fn test_get_blog_by_id() {
        let store = seeded_store();
        let id = store.blogs()[2].id.clone();
        let app = app_with(store);

        let (status, body) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Canonical string reduction");
    }

    #[tokio::test]
    async fn test_get_blog_missing_and_malformed() {
        let app = app_with(seeded_store());
        let missing = bloglist_data::store::new_id();

        let (status, _) =
            send(&app, Method::GET, &format!("/api/blogs/{missing}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::GET, "/api/blogs/12345", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "malformatted id");
    }

    #[tokio::test]
    async fn test_update_blog() {
        let store = seeded_store();
        let id = store.blogs()[0].id.clone();
        let app = app_with(store);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/blogs/{id}"),
            None,
            Some(json!({"title": "React patterns", "author": "Michael Chan", "url": "https://reactpatterns.com/", "likes": 8})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["likes"], 8);

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/blogs/{}", bloglist_data::store::new_id()),
            None,
            Some(json!({"title": "x", "url": "y"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_blog_only_by_creator() {
        let app = app_with(BlogStore::new());
        let owner = login_as(&app, "owner").await;
        let other = login_as(&app, "other").await;
        let blog = create_blog(&app, &owner, "Mine").await;
        let uri = format!("/api/blogs/{}", blog["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, blogs) = send(&app, Method::GET, "/api/blogs", None, None).await;
        assert!(blogs.as_array().unwrap().is_empty());

        // Deleting again is still a success.
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_ownerless_blog_forbidden() {
        let store = seeded_store();
        let id = store.blogs()[0].id.clone();
        let app = app_with(store);
        let token = login_as(&app, "mallory").await;

        let (status, body) =
            send(&app, Method::DELETE, &format!("/api/blogs/{id}"), Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "only the creator can delete a blog");

        let (_, blogs) = send(&app, Method::GET, "/api/blogs", None, None).await;
        assert_eq!(blogs.as_array().unwrap().len(), 6);
    }

    // ── comments ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_comments_roundtrip() {
        let store = seeded_store();
        let id = store.blogs()[1].id.clone();
        let app = app_with(store);
        let uri = format!("/api/blogs/{id}/comments");

        let (status, comment) =
            send(&app, Method::POST, &uri, None, Some(json!({"content": "classic"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(comment["blog"], id.as_str());

        let (status, comments) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(comments[0]["content"], "classic");

        let (_, blog) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None, None).await;
        assert_eq!(blog["comments"][0], comment["id"]);
    }

    #[tokio::test]
    async fn test_comment_on_missing_blog() {
        let app = app_with(BlogStore::new());
        let uri = format!("/api/blogs/{}/comments", bloglist_data::store::new_id());
        let (status, _) = send(&app, Method::POST, &uri, None, Some(json!({"content": "x"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ── users / login ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_user_password_rules() {
        let app = app_with(BlogStore::new());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({"username": "alice", "name": "Alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "password is required field");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({"username": "alice", "password": " ab "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "password must be minimum 3 characters long");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let app = app_with(BlogStore::new());
        login_as(&app, "alice").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({"username": "alice", "password": "another"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "username must be unique");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = app_with(BlogStore::new());
        login_as(&app, "alice").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "alice", "password": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid username or password");
    }

    // ── stats ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_stats_reference_list() {
        let app = app_with(seeded_store());
        let (status, body) = send(&app, Method::GET, "/api/stats", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_likes"], 36);
        assert_eq!(body["favorite_blog"]["title"], "Canonical string reduction");
        assert!(body["favorite_blog"].get("url").is_none());
        assert_eq!(body["most_blogs"], json!({"author": "Robert C. Martin", "blogs": 3}));
        assert_eq!(body["most_likes"], json!({"author": "Edsger W. Dijkstra", "likes": 17}));
    }

    #[tokio::test]
    async fn test_stats_empty_store() {
        let app = app_with(BlogStore::new());
        let (status, body) = send(&app, Method::GET, "/api/stats", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_likes"], 0);
        assert!(body["favorite_blog"].is_null());
        assert!(body["most_likes"].is_null());
    }

    // ── persistence ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let app = router(AppState::new(config(Some(path.clone())), BlogStore::new()));

        let token = login_as(&app, "root").await;
        create_blog(&app, &token, "Saved").await;

        let reloaded = BlogStore::load_from(&path).unwrap();
        assert_eq!(reloaded.users().len(), 1);
        assert_eq!(reloaded.blogs()[0].title, "Saved");
    }

    #[tokio::test]
    async fn test_failed_save_leaves_store_unchanged() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let app = router(AppState::new(
            config(Some(blocker.join("store.json"))),
            BlogStore::new(),
        ));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({"username": "root", "password": "sekret"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        let (_, users) = send(&app, Method::GET, "/api/users", None, None).await;
        assert!(users.as_array().unwrap().is_empty());
    }
}
