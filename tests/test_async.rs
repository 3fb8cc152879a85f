//! Async wrapper tests (requires the `async` feature).

#![cfg(feature = "async")]

mod common;

use std::sync::Arc;

use common::{sample_records, CountingStore, FailingStore};
use sales_analytics::models::Statistics;
use sales_analytics::{AsyncSalesAnalytics, ListingParams, MemoryStore, SalesError};

async fn engine() -> AsyncSalesAnalytics {
    common::init_logging();
    AsyncSalesAnalytics::builder()
        .store(MemoryStore::with_records(sample_records()))
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn combined_matches_sync_engine() {
    let engine = engine().await;
    let combined = engine.get_combined(Some("March")).await.unwrap();
    assert_eq!(combined, engine.engine().get_combined(Some("March")).unwrap());
    assert_eq!(combined.statistics.total_sold, 2);
}

#[tokio::test]
async fn each_operation_runs_off_the_event_loop() {
    let engine = engine().await;

    let page = engine
        .list_records(ListingParams {
            search: Some("monitor".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_items, 2);

    match engine.get_statistics(None).await.unwrap() {
        Statistics::ByMonth(groups) => assert_eq!(groups.len(), 5),
        other => panic!("expected groups, got {:?}", other),
    }

    let histogram = engine.get_histogram(Some("April")).await.unwrap();
    assert_eq!(histogram[9].count, 1);

    let categories = engine.get_category_breakdown(Some("December")).await.unwrap();
    assert_eq!(categories.len(), 1);
}

#[tokio::test]
async fn run_gives_access_to_query_interfaces() {
    let engine = engine().await;
    let april = engine.run(|e| e.statistics().for_month("April")).await.unwrap();
    assert_eq!(april.total_sold, 2);
}

#[tokio::test]
async fn combined_validates_before_any_store_call() {
    let store = Arc::new(CountingStore::new(sample_records()));
    let engine = AsyncSalesAnalytics::builder()
        .shared_store(store.clone())
        .build()
        .await
        .unwrap();

    assert!(matches!(engine.get_combined(None).await, Err(SalesError::MissingMonth)));
    assert!(matches!(
        engine.get_combined(Some("Marchh")).await,
        Err(SalesError::InvalidMonth(_))
    ));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn combined_fails_when_a_sub_query_fails() {
    let engine = AsyncSalesAnalytics::builder()
        .store(CountingStore::failing_group_by(sample_records()))
        .build()
        .await
        .unwrap();
    let err = engine.get_combined(Some("March")).await.unwrap_err();
    assert!(matches!(err, SalesError::Store(_)));

    let engine = AsyncSalesAnalytics::builder()
        .store(FailingStore)
        .build()
        .await
        .unwrap();
    assert!(engine.get_combined(Some("March")).await.unwrap_err().is_store_failure());
}

#[tokio::test]
async fn default_store_is_empty_duckdb() {
    let engine = AsyncSalesAnalytics::builder().build().await.unwrap();
    let page = engine.list_records(ListingParams::default()).await.unwrap();
    assert_eq!(page.total_items, 0);
    assert_eq!(page.total_pages, 0);
}
