//! Combined view: statistics, histogram and categories in one call.

mod common;

use std::sync::Arc;

use common::{approx_eq, engines, CountingStore, FailingStore};
use sales_analytics::models::Statistics;
use sales_analytics::{SalesAnalytics, SalesError};

#[test]
fn combined_equals_independent_queries() {
    for (name, engine) in engines() {
        for month in ["March", "April", "December", "June"] {
            let combined = engine.get_combined(Some(month)).unwrap();

            match engine.get_statistics(Some(month)).unwrap() {
                Statistics::Month(s) => assert_eq!(combined.statistics, s, "{name} {month}"),
                other => panic!("{name}: unexpected {:?}", other),
            }
            assert_eq!(
                combined.histogram,
                engine.get_histogram(Some(month)).unwrap(),
                "{name} {month}"
            );
            assert_eq!(
                combined.categories,
                engine.get_category_breakdown(Some(month)).unwrap(),
                "{name} {month}"
            );
        }
    }
}

#[test]
fn march_combined_view() {
    for (name, engine) in engines() {
        let combined = engine.get_combined(Some("march")).unwrap();
        assert!(approx_eq(combined.statistics.total_sale_amount, 187.0), "{name}");
        assert_eq!(combined.statistics.total_sold, 2, "{name}");
        assert_eq!(combined.statistics.total_not_sold, 3, "{name}");
        assert_eq!(combined.histogram.len(), 10, "{name}");
        assert_eq!(combined.histogram[0].count, 4, "{name}");
        assert_eq!(combined.histogram[1].count, 1, "{name}");
        let total: u64 = combined.categories.iter().map(|c| c.count).sum();
        assert_eq!(total, 5, "{name}");
    }
}

#[test]
fn month_is_required() {
    let store = Arc::new(CountingStore::new(common::sample_records()));
    let engine = SalesAnalytics::builder()
        .shared_store(store.clone())
        .build()
        .unwrap();

    assert!(matches!(engine.get_combined(None), Err(SalesError::MissingMonth)));
    assert!(matches!(engine.get_combined(Some("")), Err(SalesError::MissingMonth)));
    assert!(matches!(
        engine.get_combined(Some("Marchh")),
        Err(SalesError::InvalidMonth(_))
    ));
    assert_eq!(store.call_count(), 0);
}

#[test]
fn one_failing_sub_query_fails_the_whole_view() {
    // Only the category breakdown uses group_by
    let store = Arc::new(CountingStore::failing_group_by(common::sample_records()));
    let engine = SalesAnalytics::builder()
        .shared_store(store.clone())
        .build()
        .unwrap();

    let err = engine.get_combined(Some("March")).unwrap_err();
    assert!(matches!(err, SalesError::Store(ref m) if m == "group_by failed"));

    // Statistics and histogram on their own still succeed
    engine.get_statistics(Some("March")).unwrap();
    engine.get_histogram(Some("March")).unwrap();
}

#[test]
fn failing_store_fails_the_whole_view() {
    let engine = common::engine_over(FailingStore);
    let err = engine.get_combined(Some("April")).unwrap_err();
    assert!(err.is_store_failure());
    assert_eq!(err.to_string(), "Record store error: store unavailable");
}

#[test]
fn combined_serializes_all_three_parts() {
    let (_, engine) = engines().remove(0);
    let json = serde_json::to_value(engine.get_combined(Some("December")).unwrap()).unwrap();
    assert_eq!(json["statistics"]["totalSold"], 1);
    assert_eq!(json["histogram"].as_array().map(Vec::len), Some(10));
    assert_eq!(json["categories"][0]["category"], "electronics");
    assert_eq!(json["categories"][0]["count"], 2);
}

#[test]
fn concurrent_callers_share_one_engine() {
    let engine = Arc::new(engines().remove(0).1);
    let handles: Vec<_> = ["March", "April", "December", "March"]
        .into_iter()
        .map(|month| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.get_combined(Some(month)).map(|c| c.statistics.total_sold))
        })
        .collect();
    let sold: Vec<u64> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(sold, vec![2, 2, 1, 2]);
}

#[test]
fn two_record_march_scenario() {
    let records = vec![
        common::record(1, "Fifty", 50.0, "", "misc", true, common::at(2022, 3, 5, 0, 0, 0)),
        common::record(2, "One fifty", 150.0, "", "misc", false, common::at(2022, 3, 10, 0, 0, 0)),
    ];
    for (name, engine) in common::engines_with(records) {
        let combined = engine.get_combined(Some("March")).unwrap();
        assert_eq!(combined.statistics.total_sale_amount, 50.0, "{name}");
        assert_eq!(combined.statistics.total_sold, 1, "{name}");
        assert_eq!(combined.statistics.total_not_sold, 1, "{name}");
        let counts: Vec<u64> = combined.histogram.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 0, 0, 0, 0, 0, 0], "{name}");
    }
}

#[test]
fn typo_month_fails_every_endpoint() {
    for (name, engine) in engines() {
        assert!(matches!(engine.get_statistics(Some("Marchh")), Err(SalesError::InvalidMonth(_))), "{name}");
        assert!(matches!(engine.get_histogram(Some("Marchh")), Err(SalesError::InvalidMonth(_))), "{name}");
        assert!(matches!(
            engine.get_category_breakdown(Some("Marchh")),
            Err(SalesError::InvalidMonth(_))
        ), "{name}");
        assert!(matches!(engine.get_combined(Some("Marchh")), Err(SalesError::InvalidMonth(_))), "{name}");
    }
}
