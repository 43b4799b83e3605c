#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use caixinha_server::{api::app_router, build_state, config::Config, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        jwt_secret: Some("abcdefghijklmnopqrstuvwxyz01234!".to_string()),
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    let router = app_router(state.clone(), &config);
    TestApp { router, state, dir }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, token: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.request(Method::GET, uri, token).await
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Registers a user and logs in, returning the bearer token.
    pub async fn register_and_login(&self, name: &str, account_number: &str) -> String {
        let response = self
            .post_json(
                "/api/v1/auth/register",
                None,
                registration(name, account_number),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        self.login(account_number, "segredo1").await
    }

    pub async fn login(&self, account_number: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/api/v1/auth/login",
                None,
                json!({ "accountNumber": account_number, "password": password }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        body["accessToken"].as_str().unwrap().to_string()
    }
}

pub fn registration(name: &str, account_number: &str) -> Value {
    json!({
        "displayName": name,
        "phone": "81984792068",
        "email": "cliente@example.com",
        "nationalId": "123.456.789-01",
        "birthDate": "1990-04-12",
        "password": "segredo1",
        "accountNumber": account_number,
        "acceptPrivacyPolicy": true
    })
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn json_body(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
