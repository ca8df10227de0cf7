//! A deterministic **in‑process stand‑in** for
//! `credsync_core::api::transport::Transport`.
//!
//! *  **From the test’s perspective**
//!    * Script answers with `fake.respond(Method::Get, "/sites", 200, json!(..))`
//!      (paths are given *without* the `/api/{version}` prefix).
//!    * Sign-in and sign-out are answered automatically: every site gets the
//!      token `tok-<contentUrl>` (`tok-root` for the default site) unless it
//!      was passed to `reject_site`.
//!    * Inspect everything the client sent via `fake.requests()`.
//!
//! *  **Why this exists**: It lets integration tests run the real session
//!    client, walker and dispatcher without an HTTP server.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use credsync_core::api::errors::MigrationError;
use credsync_core::api::transport::{ApiRequest, ApiResponse, Method, Transport};
use credsync_core::config::ServerConfig;
use credsync_core::SessionClient;
use serde_json::{json, Value};

pub const API_VERSION: &str = "3.19";

enum Scripted {
    Answer(ApiResponse),
    Unreachable,
}

#[derive(Default)]
pub struct FakeTransport {
    /// Answers per (method, path); the last one keeps being replayed.
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    rejected_sites: Mutex<HashSet<String>>,
    history: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn full_path(suffix: &str) -> String {
        format!("/api/{}{}", API_VERSION, suffix)
    }

    fn push(&self, method: Method, suffix: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, Self::full_path(suffix)))
            .or_default()
            .push_back(scripted);
    }

    pub fn respond(&self, method: Method, suffix: &str, status: u16, body: Value) -> &Self {
        self.push(method, suffix, Scripted::Answer(ApiResponse::new(status, body)));
        self
    }

    /// The next call to this route fails below HTTP (connection refused etc.).
    pub fn unreachable(&self, method: Method, suffix: &str) -> &Self {
        self.push(method, suffix, Scripted::Unreachable);
        self
    }

    /// Sign-in to this content URL answers 401.
    pub fn reject_site(&self, content_url: &str) -> &Self {
        self.rejected_sites
            .lock()
            .unwrap()
            .insert(content_url.to_string());
        self
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.history.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: Method, suffix_fragment: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.contains(suffix_fragment))
            .collect()
    }

    fn sign_in(&self, request: &ApiRequest) -> ApiResponse {
        let site = request
            .body
            .as_ref()
            .and_then(|b| b["credentials"]["site"]["contentUrl"].as_str())
            .unwrap_or_default()
            .to_string();
        if self.rejected_sites.lock().unwrap().contains(&site) {
            return ApiResponse::new(
                401,
                json!({"error": {"code": "401001", "summary": "Signin Error"}}),
            );
        }
        let token = if site.is_empty() {
            "tok-root".to_string()
        } else {
            format!("tok-{site}")
        };
        ApiResponse::new(200, json!({"credentials": {"token": token}}))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, MigrationError> {
        self.history.lock().unwrap().push(request.clone());

        if request.path == Self::full_path("/auth/signin") {
            return Ok(self.sign_in(&request));
        }

        let mut routes = self.routes.lock().unwrap();
        let scripted = match routes.get_mut(&(request.method, request.path.clone())) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().map(|s| match s {
                Scripted::Answer(r) => Scripted::Answer(r.clone()),
                Scripted::Unreachable => Scripted::Unreachable,
            }),
            None => None,
        };

        match scripted {
            Some(Scripted::Answer(response)) => Ok(response),
            Some(Scripted::Unreachable) => Err(MigrationError::Transport(format!(
                "connection refused: {}",
                request.path
            ))),
            None if request.path == Self::full_path("/auth/signout") => {
                Ok(ApiResponse::new(204, Value::Null))
            }
            None => Ok(ApiResponse::new(
                404,
                json!({"error": {"code": "404000", "detail": request.path}}),
            )),
        }
    }
}

/// A `SessionClient` over a fresh fake, with test credentials.
pub fn client() -> SessionClient<FakeTransport> {
    SessionClient::new(
        ServerConfig::new(API_VERSION, "http://tableau.test", "admin", "admin-pw"),
        FakeTransport::new(),
    )
}
