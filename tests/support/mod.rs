//! Mock France Travail API shared by the integration tests
//!
//! Offer search answers depend on the `domaine` parameter:
//!
//! - `D11` - 206, two offers, `Content-Range: offres 0-1/320`
//! - `E50` - 500 with body `boom`
//! - `N00` - 204, empty body
//! - anything else - 200, bare array with one offer, no `Content-Range`

#![allow(dead_code)]

use axum::extract::{Form, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration as ChronoDuration, Utc};
use rome_stats::fetcher::client::FranceTravailClient;
use rome_stats::fetcher::config::{FranceTravailConfig, CATALOG_ENDPOINT, OFFERS_SEARCH_ENDPOINT};
use rome_stats::pipeline::RateLimiter;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TOKEN_PATH: &str = "/connexion/oauth2/access_token";
pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";

#[derive(Clone)]
pub struct MockApi {
    token_requests: Arc<AtomicUsize>,
    search_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    expires_in: i64,
    token_status: StatusCode,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            token_requests: Arc::new(AtomicUsize::new(0)),
            search_queries: Arc::new(Mutex::new(Vec::new())),
            expires_in: 1499,
            token_status: StatusCode::OK,
        }
    }

    /// Lifetime announced by the token endpoint
    pub fn with_expires_in(mut self, expires_in: i64) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Force the token endpoint to answer with this status
    pub fn with_token_status(mut self, status: StatusCode) -> Self {
        self.token_status = status;
        self
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn search_queries(&self) -> Vec<HashMap<String, String>> {
        self.search_queries.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port and return the base URL
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route(TOKEN_PATH, post(token))
            .route(CATALOG_ENDPOINT, get(catalog))
            .route(OFFERS_SEARCH_ENDPOINT, get(search))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }
}

pub fn config_for(base_url: &str) -> FranceTravailConfig {
    FranceTravailConfig::new(CLIENT_ID, CLIENT_SECRET)
        .with_token_url(format!("{base_url}{TOKEN_PATH}?realm=%2Fpartenaire"))
        .with_api_base_url(base_url)
        .with_request_timeout(Duration::from_secs(5))
}

pub fn client_for(base_url: &str, min_interval: Duration) -> FranceTravailClient {
    let limiter = Arc::new(RateLimiter::new(min_interval));
    FranceTravailClient::new(config_for(base_url), limiter).unwrap()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer token-"))
        .unwrap_or(false)
}

async fn token(State(api): State<MockApi>, Form(form): Form<HashMap<String, String>>) -> Response {
    let n = api.token_requests.fetch_add(1, Ordering::SeqCst) + 1;

    if api.token_status != StatusCode::OK {
        return (api.token_status, r#"{"error":"invalid_client"}"#).into_response();
    }

    let valid = form.get("grant_type").map(String::as_str) == Some("client_credentials")
        && form.get("client_id").map(String::as_str) == Some(CLIENT_ID)
        && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET)
        && form.get("scope").map(String::as_str) == Some("api_offresdemploiv2 o2dsoffre");
    if !valid {
        return (StatusCode::BAD_REQUEST, r#"{"error":"invalid_request"}"#).into_response();
    }

    Json(json!({
        "access_token": format!("token-{n}"),
        "token_type": "Bearer",
        "expires_in": api.expires_in,
    }))
    .into_response()
}

async fn catalog(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!([
        {"code": "A11", "libelle": "Engins agricoles et forestiers"},
        {"code": "D11", "libelle": "Commerce alimentaire"},
        {"code": "", "libelle": "Sans code"},
        {"code": "A11", "libelle": "Agriculture et sylviculture"}
    ]))
    .into_response()
}

fn days_ago(days: i64) -> String {
    (Utc::now() - ChronoDuration::days(days)).to_rfc3339()
}

async fn search(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let domaine = params.get("domaine").cloned().unwrap_or_default();
    api.search_queries.lock().unwrap().push(params);

    match domaine.as_str() {
        "D11" => {
            let body: Value = json!({
                "resultats": [
                    {
                        "intitule": "Vendeur en boulangerie URGENT",
                        "description": "Prise de poste rapide",
                        "salaire": {"libelle": "Mensuel de 2000.00 Euros sur 12 mois"},
                        "dateCreation": days_ago(4)
                    },
                    {
                        "intitule": "Caissier",
                        "descriptionOffre": "Poste stable",
                        "salaire": {"libelle": "Annuel de 24000 Euros"},
                        "dateCreation": days_ago(2)
                    }
                ]
            });
            (
                StatusCode::PARTIAL_CONTENT,
                [(header::CONTENT_RANGE, "offres 0-1/320")],
                Json(body),
            )
                .into_response()
        }
        "E50" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "N00" => StatusCode::NO_CONTENT.into_response(),
        _ => Json(json!([
            {"intitule": "Agent polyvalent", "salaire": {"libelle": "Horaire de 12,50 Euros"}}
        ]))
        .into_response(),
    }
}

/// Address nothing listens on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
