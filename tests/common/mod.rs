#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use movie_catalog::{AppState, app, db};

/// Router backed by a fresh SQLite file. The directory lives as long as the
/// value does.
pub struct TestApp {
    router: Router,
    _dir: TempDir,
}

pub async fn spawn() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display());
    let db = db::connect_and_migrate(&url).await.unwrap();
    let state = Arc::new(AppState::new(db, 3));
    TestApp { router: app(state), _dir: dir }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        let request =
            Request::builder().method(Method::DELETE).uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// POSTs `body` and returns the id announced in the confirmation message.
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let response = self.json(Method::POST, uri, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        created_id(response).await
    }

    pub async fn create_movie(&self, title: &str, genre_id: i64, director_id: i64) -> i64 {
        self.create(
            "/movies/",
            serde_json::json!({
                "title": title,
                "description": format!("About {title}"),
                "trailer": "https://www.youtube.com/watch?v=UgHKb_7884o",
                "year": 2010,
                "rating": 7.5,
                "genre_id": genre_id,
                "director_id": director_id,
            }),
        )
        .await
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub async fn created_id(response: Response) -> i64 {
    let message = body_json(response).await;
    let message = message.as_str().expect("confirmation message is a JSON string");
    message
        .split_whitespace()
        .find_map(|word| word.parse().ok())
        .unwrap_or_else(|| panic!("no id in {message:?}"))
}
