//! Integration tests for logging and tracing

use rome_stats::fetcher::parser::parse_date;
use rome_stats::stats::aggregate;
use rome_stats::OfferRecord;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Writer collecting formatted events in memory
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn with_json_logs<F: FnOnce()>(filter: &str, f: F) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[test]
fn test_tracing_subscriber_initialization() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rome_stats=debug")),
        )
        .with_test_writer()
        .try_init();

    // Either succeeds or fails because already initialized (both are OK)
    assert!(result.is_ok() || result.is_err());
}

#[test]
fn test_parse_noise_is_debug_only() {
    let logs = with_json_logs("rome_stats=info", || {
        assert_eq!(parse_date("hier"), None);
    });
    assert!(logs.is_empty());

    let logs = with_json_logs("rome_stats=debug", || {
        assert_eq!(parse_date("hier"), None);
    });
    assert!(logs.contains("Unparseable offer date"));
    assert!(logs.contains("\"level\":\"DEBUG\""));
    assert!(logs.contains("hier"));
}

#[test]
fn test_structured_fields_in_json_output() {
    let offers = vec![OfferRecord {
        code: "D11".to_string(),
        title: "Vendeur urgent".to_string(),
        ..Default::default()
    }];

    let logs = with_json_logs("rome_stats::stats=debug", || {
        aggregate(&offers, Some(12), chrono::Utc::now());
    });

    let line = logs
        .lines()
        .find(|l| l.contains("Aggregated offer sample"))
        .expect("aggregation event");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["fields"]["sample"], 1);
    assert_eq!(event["fields"]["urgent"], 1);
    assert_eq!(event["target"], "rome_stats::stats::aggregate");
}

#[test]
fn test_env_filter_parsing() {
    let _filter = EnvFilter::new("rome_stats=info");
    let _filter = EnvFilter::new("warn,rome_stats::fetcher=debug");
    let _filter = EnvFilter::new("rome_stats::pipeline=trace");
}
