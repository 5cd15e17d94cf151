#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use homebook_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub router: Router,
    pub dir: TempDir,
}

pub async fn build_app_with(extra: &[(&str, &str)]) -> TestApp {
    build_app_in(tempfile::tempdir().unwrap(), extra).await
}

async fn build_app_in(dir: TempDir, extra: &[(&str, &str)]) -> TestApp {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(
        "HB_DATA_DIR".to_string(),
        dir.path().to_string_lossy().to_string(),
    );
    vars.insert("HB_SECRET_KEY".to_string(), BASE64.encode([42u8; 32]));
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        dir,
    }
}

pub async fn build_app() -> TestApp {
    build_app_with(&[]).await
}

impl TestApp {
    /// Starts a fresh server on the same data directory, like a restart.
    pub async fn restart(self) -> TestApp {
        build_app_in(self.dir, &[]).await
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn run_setup(&self) -> Value {
        let (status, body) = self
            .post(
                "/setup/start",
                None,
                json!({
                    "instanceName": "Test Home",
                    "adminUsername": ADMIN,
                    "adminPassword": ADMIN_PASSWORD,
                    "defaultLocale": "de-DE",
                    "licensesAccepted": true
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "setup failed: {body}");
        body
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/account/login",
                None,
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    /// Creates a regular user through the admin API and logs it in.
    pub async fn create_user(&self, admin_token: &str, username: &str) -> String {
        let (status, body) = self
            .post(
                "/system/users",
                Some(admin_token),
                json!({ "username": username, "password": "user-password" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
        self.login(username, "user-password").await
    }
}

/// A set-up instance plus an administrator token.
pub async fn ready_app() -> (TestApp, String) {
    let app = build_app().await;
    app.run_setup().await;
    let token = app.login(ADMIN, ADMIN_PASSWORD).await;
    (app, token)
}
