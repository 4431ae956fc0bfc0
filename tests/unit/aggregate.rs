//! Unit tests for per-code aggregation and snapshot conversion

use chrono::{Duration, TimeZone, Utc};
use rome_stats::stats::aggregate;
use rome_stats::{OfferRecord, StatSnapshot};
use rust_decimal::Decimal;
use std::str::FromStr;

fn offer(title: &str) -> OfferRecord {
    OfferRecord {
        code: "N11".to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_urgent_rate_stays_within_bounds() {
    let now = Utc::now();
    for urgent in 0..=5usize {
        let mut offers: Vec<OfferRecord> = (0..urgent).map(|_| offer("Cariste URGENT")).collect();
        offers.extend((urgent..5).map(|_| offer("Cariste")));

        let stats = aggregate(&offers, None, now);
        assert!((0.0..=100.0).contains(&stats.urgent_rate));
        assert_eq!(stats.urgent_rate, urgent as f64 * 20.0);
    }
}

#[test]
fn test_offer_count_independent_of_sample() {
    let now = Utc::now();
    let sample = vec![offer("Magasinier"); 150];
    assert_eq!(aggregate(&sample, Some(4321), now).offer_count, 4321);
    assert_eq!(aggregate(&sample[..10], Some(4321), now).offer_count, 4321);
}

#[test]
fn test_full_sample_to_snapshot() {
    let now = Utc.with_ymd_and_hms(2025, 12, 10, 9, 0, 0).unwrap();
    let offers = vec![
        OfferRecord {
            salary_label: Some("Mensuel de 1923.00 Euros sur 12 mois".to_string()),
            created_at: Some(now - Duration::days(1)),
            ..offer("Préparateur de commandes")
        },
        OfferRecord {
            salary_label: Some("Annuel de 25000 Euros".to_string()),
            description: Some("Démarrage urgent".to_string()),
            created_at: Some(now - Duration::days(6)),
            ..offer("Cariste")
        },
        OfferRecord {
            salary_label: Some("Horaire de 11,88 Euros".to_string()),
            ..offer("Manutentionnaire")
        },
    ];

    let stats = aggregate(&offers, Some(57), now);
    // (1923 + 2083.33 + 1782) / 3
    assert_eq!(stats.avg_salary, Some(1929.44));
    assert_eq!(stats.urgent_rate, 33.33);
    assert_eq!(stats.avg_days_open, Some(3.5));

    let snapshot = StatSnapshot::from_stats(1, "N11", 7, now, &stats);
    assert!(snapshot.validate().is_ok());
    assert_eq!(snapshot.avg_salary, Some(Decimal::from_str("1929.44").unwrap()));
    assert_eq!(snapshot.urgent_rate, Decimal::from_str("33.33").unwrap());
    assert_eq!(snapshot.avg_days_open, Some(Decimal::from_str("3.5").unwrap()));
    assert_eq!(snapshot.offer_count, 57);
}
