//! Test helpers for SecHub server integration tests
//!
//! - In-memory application state and router
//! - Request builders carrying gateway identity headers
//! - JSON and NDJSON body readers
//! - Audit stores that count or fail queries
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use secchub_server::{
    api::{create_router, AppState},
    audit::{
        AuditEntry, AuditError, AuditFilter, AuditResult, AuditStore, InMemoryAuditStore,
        NewAuditEntry, USER_EMAIL_HEADER, USER_ROLES_HEADER,
    },
    config::Config,
};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

pub const ADMIN_EMAIL: &str = "admin@uni.edu";
pub const PROFESSOR_EMAIL: &str = "prof@uni.edu";

/// Caller identity sent as gateway headers
#[derive(Debug, Clone, Copy)]
pub enum Caller<'a> {
    Anonymous,
    User { email: &'a str, roles: &'a str },
}

pub const ADMIN: Caller<'static> = Caller::User {
    email: ADMIN_EMAIL,
    roles: "ADMIN",
};

pub const PROFESSOR: Caller<'static> = Caller::User {
    email: PROFESSOR_EMAIL,
    roles: "TEACHER",
};

/// Application state and router over an in-memory audit store
pub fn test_app() -> (AppState, Router) {
    app_with_state(AppState::in_memory())
}

pub fn app_with_store(store: Arc<dyn AuditStore>) -> (AppState, Router) {
    app_with_state(AppState::new(store, None))
}

fn app_with_state(state: AppState) -> (AppState, Router) {
    let router = create_router(state.clone(), &Config::default().cors);
    (state, router)
}

pub fn request(method: Method, uri: &str, caller: Caller<'_>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Caller::User { email, roles } = caller {
        builder = builder.header(USER_EMAIL_HEADER, email).header(USER_ROLES_HEADER, roles);
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str, caller: Caller<'_>) -> Request<Body> {
    request(Method::GET, uri, caller, None)
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Parse a newline-delimited JSON body into audit entries
pub async fn body_ndjson(response: Response<Body>) -> Vec<AuditEntry> {
    let bytes = body_bytes(response).await;
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// In-memory store that counts `find` calls
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryAuditStore,
    finds: AtomicUsize,
}

impl CountingStore {
    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditStore for CountingStore {
    async fn append(&self, entry: NewAuditEntry) -> AuditResult<AuditEntry> {
        self.inner.append(entry).await
    }

    async fn find(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(filter).await
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

/// Store whose every operation fails
pub struct UnavailableStore;

#[async_trait]
impl AuditStore for UnavailableStore {
    async fn append(&self, _entry: NewAuditEntry) -> AuditResult<AuditEntry> {
        Err(AuditError::Unavailable("connection refused".into()))
    }

    async fn find(&self, _filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>> {
        Err(AuditError::Unavailable("connection refused".into()))
    }

    fn kind(&self) -> &'static str {
        "unavailable"
    }
}
