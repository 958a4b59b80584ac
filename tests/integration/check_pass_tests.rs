use std::fs;

use pricewatch::config::FailurePolicy;
use pricewatch::core::MessageLanguage;
use pricewatch::store::{CsvRecordStore, RecordStore};
use wiremock::MockServer;

use super::*;

#[tokio::test]
async fn test_notification_failure_leaves_store_untouched() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_line_endpoint(&server, 500).await;
    mount_listing(&server, "/dp/widget", "Widget", "2,200").await;

    let dir = tempfile::tempdir()?;
    let store_path = dir.path().join("prices.csv");
    let original = format!(
        "{HEADER}{}/dp/widget,1980,2024-05-01T09:00:00+00:00\n",
        server.uri()
    );
    fs::write(&store_path, &original)?;

    let checker = create_checker(&server, &store_path, FailurePolicy::Abort, MessageLanguage::En).await?;
    let summary = checker.run_once().await?;

    assert!(summary.aborted);
    assert_eq!(summary.failed(), 1);
    assert!(summary.failures[0].error.contains("Notifier error: line"));
    assert_eq!(fs::read_to_string(&store_path)?, original);
    Ok(())
}

#[tokio::test]
async fn test_skip_policy_updates_the_healthy_items() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_line_endpoint(&server, 200).await;
    mount_listing(&server, "/dp/good", "Gadget", "3,000").await;
    // /dp/gone is not mounted and answers 404

    let dir = tempfile::tempdir()?;
    let store_path = dir.path().join("prices.csv");
    fs::write(
        &store_path,
        format!(
            "{HEADER}{uri}/dp/gone,,\n{uri}/dp/good,2500,2024-05-01T09:00:00+00:00\n",
            uri = server.uri()
        ),
    )?;

    let checker = create_checker(&server, &store_path, FailurePolicy::Skip, MessageLanguage::En).await?;
    let summary = checker.run_once().await?;

    assert!(!summary.aborted);
    assert_eq!(summary.failed(), 1);
    assert!(summary.failures[0].url.ends_with("/dp/gone"));
    assert_eq!(summary.updated, 1);

    let messages = sent_messages(&server).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("\"Gadget\" is now 3000"));
    assert!(messages[0].contains("500 increase"));

    let items = CsvRecordStore::new(&store_path).load()?;
    assert!(items[0].is_unseen());
    assert_eq!(items[1].last_checked_price, Some(3000));
    Ok(())
}

#[tokio::test]
async fn test_blank_title_is_reported_not_recorded() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_line_endpoint(&server, 200).await;
    mount_listing(&server, "/dp/blank", "   ", "100").await;

    let dir = tempfile::tempdir()?;
    let store_path = dir.path().join("prices.csv");
    let store = CsvRecordStore::new(&store_path);
    store.add(&format!("{}/dp/blank", server.uri()))?;

    let checker = create_checker(&server, &store_path, FailurePolicy::Skip, MessageLanguage::En).await?;
    let summary = checker.run_once().await?;

    assert_eq!(summary.failed(), 1);
    assert!(summary.failures[0].error.contains("title is empty"));
    assert!(sent_messages(&server).await.is_empty());
    assert!(store.load()?[0].is_unseen());
    Ok(())
}
