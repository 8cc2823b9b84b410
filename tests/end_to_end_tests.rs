// End-to-end tests: coordinator, HTTP client and mock service together

use anyhow::Result;
use spam_console::{
    ConnectionStatus, Coordinator, ErrorCategory, MockServer, Phase, SessionConfig,
};
use tokio::net::TcpListener;

fn session_for(base_url: String) -> SessionConfig {
    SessionConfig {
        base_url,
        history_limit: 5,
        ..SessionConfig::default()
    }
}

async fn connected() -> Result<(MockServer, Coordinator)> {
    let server = MockServer::start("127.0.0.1:0").await?;
    let coordinator = Coordinator::connect(&session_for(server.base_url()))?;
    coordinator.settle().await;
    assert_eq!(coordinator.phase(), Phase::Ready);
    Ok((server, coordinator))
}

#[tokio::test]
async fn test_coffee_message_is_stored_as_ham() -> Result<()> {
    let (_server, coordinator) = connected().await?;

    let state = coordinator.snapshot().await;
    assert!(state.is_connected());
    assert!(state.history.is_empty());
    assert!(state.analytics.is_none(), "no predictions yet means no analytics");

    let result = coordinator.predict("Hi there, coffee this weekend?").await?;
    assert_eq!(result.prediction, 0);
    assert_eq!(result.text_length, 30);
    assert_eq!(result.word_count, 5);

    let state = coordinator.snapshot().await;
    assert_eq!(state.prediction, Some(result));
    assert!(state.error.is_none());

    Ok(())
}

#[tokio::test]
async fn test_history_eventually_shows_latest_prediction() -> Result<()> {
    let (_server, coordinator) = connected().await?;

    coordinator.predict("first note").await?;
    coordinator
        .predict("Congratulations WINNER, claim your free offer")
        .await?;
    coordinator.settle().await;

    let state = coordinator.snapshot().await;
    let latest = state.latest_history_entry().expect("history entry");
    assert_eq!(latest.text, "Congratulations WINNER, claim your free offer");
    assert_eq!(latest.prediction, 1);

    let analytics = state.analytics.expect("analytics");
    assert_eq!(analytics.total_predictions, 2);
    assert_eq!(analytics.spam_count + analytics.ham_count, 2);

    Ok(())
}

#[tokio::test]
async fn test_batch_skips_blank_entries_end_to_end() -> Result<()> {
    let (server, coordinator) = connected().await?;

    let batch = coordinator.predict_batch(&["", "  ", "Win now!!!"]).await?;
    assert_eq!(batch.total_processed, 1);
    assert_eq!(batch.results[0].text, "Win now!!!");
    assert_eq!(server.state().len().await, 1);

    Ok(())
}

#[tokio::test]
async fn test_clear_history_empties_both_sides() -> Result<()> {
    let (server, coordinator) = connected().await?;
    coordinator.predict("something to forget").await?;
    coordinator.settle().await;
    assert_eq!(coordinator.snapshot().await.history.len(), 1);

    coordinator.clear_history().await?;
    let state = coordinator.snapshot().await;
    assert!(state.history.is_empty());
    assert!(state.analytics.is_none());

    coordinator.settle().await;
    assert!(server.state().is_empty().await);

    // Nothing resurfaces on the next refresh
    coordinator.refresh().await?;
    assert!(coordinator.snapshot().await.history.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_retry_connects_once_service_is_up() -> Result<()> {
    // Reserve a port, then free it so the first probe finds nothing there
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let coordinator = Coordinator::connect(&session_for(format!("http://{}", addr)))?;
    coordinator.settle().await;

    let state = coordinator.snapshot().await;
    assert_eq!(coordinator.phase(), Phase::Disconnected);
    assert_eq!(state.connection, ConnectionStatus::Disconnected);
    assert!(!state.is_connected());
    assert_eq!(
        state.error.map(|e| e.category),
        Some(ErrorCategory::Unreachable)
    );

    let _server = MockServer::start(&addr.to_string()).await?;

    assert_eq!(
        coordinator.retry_connection().await?,
        ConnectionStatus::Connected
    );
    coordinator.predict("back online").await?;
    coordinator.settle().await;

    let state = coordinator.snapshot().await;
    assert!(state.error.is_none());
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.analytics.map(|a| a.total_predictions), Some(1));

    Ok(())
}
