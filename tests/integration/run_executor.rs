//! Integration tests for statistics runs

use crate::support::{client_for, MockApi};
use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use rome_stats::fetcher::{FetcherError, FetcherResult, OfferPage, OfferSource};
use rome_stats::pipeline::{CodeOutcome, RunError, RunExecutor};
use rome_stats::store::{JsonFileStore, MemoryStore, StatsStore};
use rome_stats::{ClassificationCode, OfferRecord};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

fn codes(list: &[&str]) -> Vec<ClassificationCode> {
    list.iter().map(|c| ClassificationCode::new(*c, "")).collect()
}

#[tokio::test]
async fn test_run_against_mock_api() {
    let api = MockApi::new();
    let base_url = api.spawn().await;
    let client = client_for(&base_url, Duration::from_millis(1));
    let mut store = MemoryStore::with_codes(codes(&["D11", "E50", "X99"]));

    let report = RunExecutor::new(&client).execute(&mut store).await.unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(report.run.is_finished());
    assert_eq!(report.outcomes[1].code(), "E50");
    assert!(!report.outcomes[1].is_success());

    let snapshots = store.list_snapshots(Some(report.run.id)).unwrap();
    assert_eq!(snapshots.len(), 2);

    let d11 = snapshots.iter().find(|s| s.code == "D11").unwrap();
    assert_eq!(d11.offer_count, 320);
    assert_eq!(d11.avg_salary, Some(Decimal::from_str("2000").unwrap()));
    assert_eq!(d11.urgent_rate, Decimal::from_str("50").unwrap());
    assert_eq!(d11.avg_days_open, Some(Decimal::from_str("3").unwrap()));

    let x99 = snapshots.iter().find(|s| s.code == "X99").unwrap();
    assert_eq!(x99.offer_count, 1);
    assert_eq!(x99.avg_salary, Some(Decimal::from_str("1875").unwrap()));
    assert_eq!(x99.avg_days_open, None);
}

#[tokio::test]
async fn test_auth_failure_aborts_and_leaves_run_unfinished() {
    let api = MockApi::new().with_token_status(StatusCode::UNAUTHORIZED);
    let base_url = api.spawn().await;
    let client = client_for(&base_url, Duration::from_millis(1));
    let mut store = MemoryStore::with_codes(codes(&["D11", "X99"]));

    let err = RunExecutor::new(&client).execute(&mut store).await.unwrap_err();

    match err {
        RunError::Fetcher { code, source } => {
            assert_eq!(code, "D11");
            assert!(matches!(source, FetcherError::AuthError(_)));
        }
        other => panic!("Expected Fetcher error, got {:?}", other),
    }

    let runs = store.list_runs().unwrap();
    assert_eq!(runs.len(), 1);
    assert!(!runs[0].is_finished());
    assert!(store.list_snapshots(None).unwrap().is_empty());
    assert_eq!(api.token_requests(), 1);
}

/// Source answering from a script of per-code results
struct ScriptedSource {
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OfferSource for ScriptedSource {
    async fn fetch_classification_codes(&self) -> FetcherResult<Vec<ClassificationCode>> {
        Ok(Vec::new())
    }

    async fn fetch_offers(&self, code: &str, limit: u32, region: &str) -> FetcherResult<OfferPage> {
        self.calls.lock().unwrap().push(format!("{code}:{limit}:{region}"));
        match code {
            "NET" => Err(FetcherError::NetworkError("connection reset".to_string())),
            "CFG" => Err(FetcherError::ConfigError("client id missing".to_string())),
            "EMPTY" => Ok(OfferPage {
                offers: Vec::new(),
                total: 0,
                total_is_estimate: false,
            }),
            "TINY" => Ok(single_offer(OfferRecord {
                code: code.to_string(),
                title: "Plongeur".to_string(),
                salary_label: Some("Annuel de 0,05 Euros".to_string()),
                ..Default::default()
            })),
            "FUTURE" => Ok(single_offer(OfferRecord {
                code: code.to_string(),
                title: "Serveur".to_string(),
                created_at: Some(Utc::now() + chrono::Duration::hours(73)),
                ..Default::default()
            })),
            "RUSH" => Ok(OfferPage {
                offers: (0..3)
                    .map(|_| OfferRecord {
                        code: code.to_string(),
                        title: "Cuisinier URGENT".to_string(),
                        ..Default::default()
                    })
                    .collect(),
                total: 3,
                total_is_estimate: false,
            }),
            _ => Ok(OfferPage {
                offers: vec![OfferRecord {
                    code: code.to_string(),
                    title: "Soudeur".to_string(),
                    salary_label: Some("Annuel de 30000 Euros".to_string()),
                    ..Default::default()
                }],
                total: 987,
                total_is_estimate: false,
            }),
        }
    }
}

fn single_offer(offer: OfferRecord) -> OfferPage {
    OfferPage {
        offers: vec![offer],
        total: 1,
        total_is_estimate: false,
    }
}

#[tokio::test]
async fn test_network_errors_skip_the_code() {
    let source = ScriptedSource::new();
    let mut store = MemoryStore::with_codes(codes(&["H11", "NET", "EMPTY"]));

    let report = RunExecutor::new(&source)
        .with_limit(20)
        .with_region("11")
        .execute(&mut store)
        .await
        .unwrap();

    assert_eq!(source.calls(), vec!["H11:20:11", "NET:20:11", "EMPTY:20:11"]);
    assert_eq!(report.succeeded(), 2);
    assert!(matches!(
        &report.outcomes[1],
        CodeOutcome::Failure { code, reason } if code == "NET" && reason.contains("connection reset")
    ));

    let snapshots = store.list_snapshots(None).unwrap();
    let h11 = snapshots.iter().find(|s| s.code == "H11").unwrap();
    assert_eq!(h11.offer_count, 987);
    assert_eq!(h11.avg_salary, Some(Decimal::from_str("2500").unwrap()));

    let empty = snapshots.iter().find(|s| s.code == "EMPTY").unwrap();
    assert_eq!(empty.offer_count, 0);
    assert_eq!(empty.avg_salary, None);
    assert_eq!(empty.urgent_rate, Decimal::ZERO);
    assert_eq!(empty.avg_days_open, None);
}

#[tokio::test]
async fn test_config_error_aborts_after_partial_progress() {
    let source = ScriptedSource::new();
    let mut store = MemoryStore::with_codes(codes(&["H11", "CFG", "K22"]));

    let err = RunExecutor::new(&source).execute(&mut store).await.unwrap_err();

    assert!(matches!(err, RunError::Fetcher { ref code, .. } if code == "CFG"));
    assert_eq!(source.calls().len(), 2);
    assert_eq!(store.list_snapshots(None).unwrap().len(), 1);
    assert!(!store.list_runs().unwrap()[0].is_finished());
}

#[tokio::test]
async fn test_run_persisted_in_json_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("rome_stats.json");
    let source = ScriptedSource::new();

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        store.upsert_classification_code("H11", "Soudage").unwrap();
        store.upsert_classification_code("K22", "Nettoyage").unwrap();
        RunExecutor::new(&source).execute(&mut store).await.unwrap();
        RunExecutor::new(&source).execute(&mut store).await.unwrap();
    }

    let store = JsonFileStore::open(&path).unwrap();
    let runs = store.list_runs().unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.is_finished()));
    assert_eq!(store.list_snapshots(Some(runs[1].id)).unwrap().len(), 2);
    assert_eq!(store.list_snapshots(None).unwrap().len(), 4);
}

#[tokio::test]
async fn test_boundary_indicators_are_recorded() {
    let source = ScriptedSource::new();
    let mut store = MemoryStore::with_codes(codes(&["TINY", "FUTURE", "RUSH", "H11"]));

    let report = RunExecutor::new(&source).execute(&mut store).await.unwrap();

    assert_eq!(report.succeeded(), 4);
    assert!(report.run.is_finished());

    let snapshots = store.list_snapshots(Some(report.run.id)).unwrap();
    assert_eq!(snapshots.len(), 4);
    assert!(snapshots.iter().all(|s| s.validate().is_ok()));

    // a positive salary that rounds to zero is still a salary
    let tiny = snapshots.iter().find(|s| s.code == "TINY").unwrap();
    assert_eq!(tiny.avg_salary, Some(Decimal::ZERO));

    let future = snapshots.iter().find(|s| s.code == "FUTURE").unwrap();
    assert_eq!(future.avg_days_open, Some(Decimal::from(-3)));

    let rush = snapshots.iter().find(|s| s.code == "RUSH").unwrap();
    assert_eq!(rush.urgent_rate, Decimal::ONE_HUNDRED);
}

#[tokio::test]
async fn test_rounded_zero_salary_persists_in_json_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("rome_stats.json");
    let source = ScriptedSource::new();

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        store.upsert_classification_code("TINY", "Plonge").unwrap();
        store.upsert_classification_code("H11", "Soudage").unwrap();
        let report = RunExecutor::new(&source).execute(&mut store).await.unwrap();
        assert_eq!(report.succeeded(), 2);
    }

    let store = JsonFileStore::open(&path).unwrap();
    assert!(store.list_runs().unwrap()[0].is_finished());
    assert_eq!(store.list_snapshots(None).unwrap().len(), 2);
}
