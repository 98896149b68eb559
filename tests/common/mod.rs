//! In-process client for the API: one router over a fresh in-memory store,
//! with bearer injection and JSON decoding in one place.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bitskill::{app, config::AppConfig, state::AppState};

pub struct TestClient {
    pub state: AppState,
    router: Router,
}

#[allow(dead_code)]
impl TestClient {
    pub async fn spawn() -> Self {
        Self::with_config(AppConfig::for_tests()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let state = AppState::from_config(config)
            .await
            .expect("test state should construct");
        sqlx::migrate!("./migrations")
            .run(&state.db)
            .await
            .expect("migrations should apply");
        let router = app::build_app(state.clone());
        Self { state, router }
    }

    pub async fn send(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
        forwarded_for: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(ip) = forwarded_for {
            builder = builder.header("x-forwarded-for", ip);
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should collect");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", path, token, None, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.send("POST", path, token, Some(body), None).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("PUT", path, token, Some(body), None).await
    }

    pub async fn patch(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.send("PATCH", path, token, Some(body), None).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("DELETE", path, token, None, None).await
    }

    /// Registers a user and returns their bearer token.
    pub async fn register(&self, email: &str, full_name: &str, role: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "email": email,
                    "fullName": full_name,
                    "password": "Passw0rd!",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["token"].as_str().expect("token in response").to_string()
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": "Passw0rd!" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token in response").to_string()
    }

    /// Inserts a category directly; the API has no write endpoint for them.
    pub async fn seed_category(&self, name: &str) -> i64 {
        sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
            .bind(name)
            .bind("seeded for tests")
            .execute(&self.state.db)
            .await
            .expect("category insert")
            .last_insert_rowid()
    }
}

/// A well-formed gig body against the given category.
#[allow(dead_code)]
pub fn gig_payload(category_id: i64) -> Value {
    json!({
        "title": "Build a landing page",
        "description": "A single-page marketing site with a contact form and responsive layout.",
        "categoryId": category_id,
        "budgetMin": 100.0,
        "budgetMax": 250.0,
        "budgetType": "fixed",
        "deadline": "2026-10-01",
        "difficultyLevel": "beginner",
        "requiredSkills": ["html", "css"],
        "remoteAllowed": true,
    })
}

/// A well-formed application body against the given gig.
#[allow(dead_code)]
pub fn application_payload(gig_id: i64) -> Value {
    json!({
        "gigId": gig_id,
        "coverLetter": "I have shipped a dozen landing pages just like this one and can start right away.",
        "proposedRate": 120.0,
        "proposedTimeline": "Two weeks including revisions",
        "portfolioLinks": ["https://example.com/work"],
    })
}
