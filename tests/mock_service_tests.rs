// Tests for the mock classification service
//
// These tests run the mock on an ephemeral port and talk to it through the
// real HTTP client.

use anyhow::Result;
use spam_console::mock::classifier;
use spam_console::session::models;
use spam_console::{ClassifierApi, MockServer, ServiceClient, TransportError};

async fn start() -> Result<(MockServer, ServiceClient)> {
    let server = MockServer::start("127.0.0.1:0").await?;
    let client = ServiceClient::new(server.base_url())?;
    Ok((server, client))
}

#[test]
fn test_keyword_hits_make_spam() {
    let (label, confidence) =
        classifier::classify("URGENT: you are a WINNER, claim your FREE prize");
    assert_eq!(label, models::SPAM);
    assert!((confidence - 0.95).abs() < 1e-9, "three hits cap at 0.95");

    let (label, confidence) = classifier::classify("Free offer inside");
    assert_eq!(label, models::SPAM);
    assert!((confidence - 0.9).abs() < 1e-9);
}

#[test]
fn test_ham_confidence_grows_with_length() {
    let (label, confidence) = classifier::classify("hello");
    assert_eq!(label, models::HAM);
    assert!((confidence - 0.61).abs() < 1e-9);

    let long = "a".repeat(500);
    let (_, confidence) = classifier::classify(&long);
    assert!((confidence - 0.9).abs() < 1e-9, "ham confidence caps at 0.9");
}

#[tokio::test]
async fn test_probe_and_single_prediction() -> Result<()> {
    let (server, client) = start().await?;

    let alive = client.probe().await?;
    assert_eq!(alive.status, 200);
    assert_eq!(alive.message.as_deref(), Some("Mock Spam Detection API"));

    let text = "Hi there, coffee this weekend?";
    let result = client.predict_one(text).await?;
    assert_eq!(result.prediction, models::HAM);
    assert_eq!(result.text_length, 30);
    assert_eq!(result.word_count, 5);
    assert_eq!(server.state().len().await, 1);

    Ok(())
}

#[tokio::test]
async fn test_empty_text_is_rejected() -> Result<()> {
    let (server, client) = start().await?;

    let err = client.predict_one("").await.unwrap_err();
    assert_eq!(
        err,
        TransportError::Server {
            status: 400,
            message: "text must not be empty".to_string()
        }
    );
    assert!(server.state().is_empty().await);

    let err = client.predict_batch(&[]).await.unwrap_err();
    assert_eq!(err.status_code(), Some(400));

    Ok(())
}

#[tokio::test]
async fn test_history_is_bounded_and_oldest_first() -> Result<()> {
    let (_server, client) = start().await?;

    for text in ["one", "two", "three"] {
        client.predict_one(text).await?;
    }

    let history = client.fetch_history(2).await?;
    let texts: Vec<&str> = history.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["two", "three"]);
    assert!(history.iter().all(|e| !e.timestamp.is_empty()));

    Ok(())
}

#[tokio::test]
async fn test_batch_results_mirror_input_order() -> Result<()> {
    let (server, client) = start().await?;

    let texts = vec![
        "Lunch at noon?".to_string(),
        "URGENT winner! Click now for your free discount".to_string(),
        "Meeting moved to 3pm".to_string(),
    ];
    let batch = client.predict_batch(&texts).await?;

    assert_eq!(batch.total_processed, 3);
    let returned: Vec<&str> = batch.results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(returned, texts.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(batch.results[1].result, "spam");
    assert_eq!(batch.spam_count(), 1);
    assert_eq!(server.state().len().await, 3);

    Ok(())
}

#[tokio::test]
async fn test_analytics_counts_add_up() -> Result<()> {
    let (_server, client) = start().await?;
    assert_eq!(client.fetch_analytics().await?, None);

    let texts = vec![
        "limited time offer, click now".to_string(),
        "see you tomorrow".to_string(),
        "free discount for every winner".to_string(),
        "thanks for the notes".to_string(),
    ];
    client.predict_batch(&texts).await?;

    let summary = client.fetch_analytics().await?.expect("analytics");
    assert_eq!(summary.total_predictions, 4);
    assert_eq!(summary.spam_count, 2);
    assert_eq!(summary.spam_count + summary.ham_count, summary.total_predictions);
    assert!((summary.spam_percentage - 50.0).abs() < 1e-9);
    assert!(summary.is_consistent());

    Ok(())
}

#[tokio::test]
async fn test_clear_history_resets_everything() -> Result<()> {
    let (server, client) = start().await?;
    client.predict_one("keep this?").await?;

    client.clear_history().await?;

    assert!(client.fetch_history(10).await?.is_empty());
    assert_eq!(client.fetch_analytics().await?, None);
    assert!(server.state().is_empty().await);

    Ok(())
}
