#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

use shortly::application::click_worker::ClickQueue;
use shortly::domain::click_event::ClickEvent;
use shortly::domain::identity::IdentityProvider;
use shortly::infrastructure::identity::JwtIdentityProvider;
use shortly::routes::app_routes;
use shortly::state::{AppState, PublicSettings};

pub const TEST_JWT_SECRET: &str = "test-secret-0123456789abcdef0123456789";
pub const TEST_BASE_URL: &str = "http://sho.rt";

pub fn test_identity() -> JwtIdentityProvider {
    JwtIdentityProvider::new(
        TEST_JWT_SECRET,
        chrono::Duration::hours(1),
        chrono::Duration::minutes(15),
    )
}

pub fn test_settings() -> PublicSettings {
    PublicSettings {
        base_url: Some(TEST_BASE_URL.to_string()),
        behind_proxy: false,
        expose_reset_tokens: true,
    }
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_test_state_with(pool, test_settings())
}

pub fn create_test_state_with(
    pool: PgPool,
    settings: PublicSettings,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (click_queue, rx) = ClickQueue::new(100);

    let state = AppState::new(
        Arc::new(pool),
        test_identity(),
        TEST_JWT_SECRET.to_string(),
        click_queue,
        settings,
    );

    (state, rx)
}

/// Full route tree with a fixed peer address, as the rate limiter needs one.
pub fn test_server(state: AppState) -> TestServer {
    let app = app_routes().layer(MockConnectInfoLayer).with_state(state);
    TestServer::new(app).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn session_token(account_id: i64, email: &str) -> String {
    test_identity().issue_session(account_id, email).unwrap()
}

/// Inserts an account row directly. The hash is not a valid password hash, so
/// these accounts cannot log in; use the register endpoint for that.
pub async fn insert_account(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO accounts (email, password_hash) VALUES ($1, 'x') RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_link(pool: &PgPool, code: &str, url: &str, owner_id: Option<i64>) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (short_code, original_url, owner_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_expired_link(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (short_code, original_url, expires_at, click_count) \
         VALUES ($1, $2, NOW() - INTERVAL '1 hour', 5) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_deleted_link(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (short_code, original_url, is_active) VALUES ($1, $2, FALSE) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn click_count(pool: &PgPool, link_id: i64) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM links WHERE id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn link_title(pool: &PgPool, link_id: i64) -> String {
    sqlx::query_scalar("SELECT title FROM links WHERE id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn link_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
