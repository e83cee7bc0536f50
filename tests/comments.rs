mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn comment_appears_on_post_detail() {
    let app = TestApp::new().await;
    let id = app.create_post("Discussed", "body", None, &[]).await;

    let resp = app
        .post_json(
            &format!("/api/posts/{id}/comments"),
            json!({ "author": "ada", "content": "nice post" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment = body_json(resp).await;
    assert_eq!(comment["author"], "ada");
    assert_eq!(comment["content"], "nice post");

    let resp = app.get(&format!("/api/posts/{id}")).await;
    let post = body_json(resp).await;
    let comments = post["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["author"], "ada");
}

#[tokio::test]
async fn comments_are_absent_from_listings() {
    let app = TestApp::new().await;
    let id = app.create_post("Listed", "body", None, &[]).await;
    app.post_json(
        &format!("/api/posts/{id}/comments"),
        json!({ "author": "ada", "content": "hi" }),
    )
    .await;

    let resp = app.get("/api/posts").await;
    let list = body_json(resp).await;
    assert!(list[0].get("comments").is_none());
}

#[tokio::test]
async fn comment_on_missing_post_returns_404() {
    let app = TestApp::new().await;
    let resp = app
        .post_json(
            "/api/posts/999/comments",
            json!({ "author": "ada", "content": "hello?" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_with_blank_author_is_rejected() {
    let app = TestApp::new().await;
    let id = app.create_post("Strict", "body", None, &[]).await;

    let resp = app
        .post_json(
            &format!("/api/posts/{id}/comments"),
            json!({ "author": " ", "content": "hi" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .post_json(
            &format!("/api/posts/{id}/comments"),
            json!({ "author": "ada" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn commenting_leaves_post_untouched() {
    let app = TestApp::new().await;
    let id = app
        .create_post("Stable", "body", Some("Tech"), &["rust"])
        .await;
    app.post_empty(&format!("/api/posts/{id}/like")).await;

    app.post_json(
        &format!("/api/posts/{id}/comments"),
        json!({ "author": "ada", "content": "hi" }),
    )
    .await;

    let resp = app.get(&format!("/api/posts/{id}")).await;
    let post = body_json(resp).await;
    assert_eq!(post["likes"], 1);
    assert_eq!(post["category"], "Tech");
    assert_eq!(post["tags"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_post_cascades_comments_and_associations() {
    let app = TestApp::new().await;
    let id = app
        .create_post("Doomed", "body", Some("Tech"), &["rust", "axum"])
        .await;
    app.post_json(
        &format!("/api/posts/{id}/comments"),
        json!({ "author": "ada", "content": "one" }),
    )
    .await;
    app.post_json(
        &format!("/api/posts/{id}/comments"),
        json!({ "author": "bob", "content": "two" }),
    )
    .await;

    let resp = app.delete(&format!("/api/posts/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let (comments,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
        .bind(id)
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(comments, 0);

    let (links,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM post_tags WHERE post_id = ?")
        .bind(id)
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(links, 0);

    // The category and tags the post referenced survive, now orphaned.
    let (categories,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(categories, 1);

    let (tags,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags")
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(tags, 2);
}
