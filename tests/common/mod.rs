use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let router = carnet::build_app(pool.clone(), false).await;

        Self { router, db: pool }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.request(req).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(req).await
    }

    /// POST with no body, for endpoints like /like and /logout.
    pub async fn post_empty(&self, uri: &str) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method("POST")
            .body(Body::empty())
            .unwrap();
        self.request(req).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method("DELETE")
            .body(Body::empty())
            .unwrap();
        self.request(req).await
    }

    /// Create a post through the API and return its id.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        category: Option<&str>,
        tags: &[&str],
    ) -> i64 {
        let resp = self
            .post_json(
                "/api/posts",
                serde_json::json!({
                    "title": title,
                    "content": content,
                    "category": category,
                    "tags": tags,
                }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await["id"].as_i64().unwrap()
    }
}

/// Read the full response body and parse it as JSON.
pub async fn body_json(resp: Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body should be JSON")
}

/// Read the full response body as a String.
pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Titles of a JSON post listing, in response order.
pub fn titles(list: &Value) -> Vec<&str> {
    list.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect()
}
