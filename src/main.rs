use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use spam_console::{
    mock, BatchResult, Config, ConnectionStatus, Coordinator, Phase, PredictionResult, SessionState,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "spam-console", version, about = "Client for a spam classification service")]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, global = true, default_value = "config/spam-console")]
    config: String,

    /// Override the service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check connectivity and show the current session state
    Status,
    /// Classify a single message
    Predict { text: String },
    /// Classify several messages (arguments, or one per line of --file)
    Batch {
        #[arg(long)]
        file: Option<PathBuf>,
        texts: Vec<String>,
    },
    /// Show recent predictions
    History,
    /// Show aggregate analytics
    Analytics,
    /// Clear prediction history
    ClearHistory,
    /// Interactive session
    Console,
    /// Run the mock classification service
    ServeMock {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    info!("Loaded config: {}", cfg.service.name);

    if let Command::ServeMock { bind } = &cli.command {
        let addr = bind.clone().unwrap_or_else(|| cfg.mock_addr());
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        return mock::serve(listener, mock::MockState::new()).await;
    }

    let mut session = cfg.session_config();
    if let Some(base_url) = cli.base_url {
        session.base_url = base_url;
    }

    let coordinator = Coordinator::connect(&session)?;
    info!("Session {} against {}", coordinator.session_id(), session.base_url);
    coordinator.settle().await;

    let result = run(&coordinator, cli.command).await;
    coordinator.settle().await;
    coordinator.shutdown();
    result
}

async fn run(coordinator: &Coordinator, command: Command) -> Result<()> {
    match command {
        Command::Status => {
            let state = coordinator.snapshot().await;
            print_connection(&state);
            print_analytics(&state);
            Ok(())
        }
        Command::Predict { text } => {
            ensure_ready(coordinator).await?;
            if coordinator.predict(&text).await.is_err() {
                return fail(coordinator).await;
            }
            coordinator.settle().await;
            print_session(&coordinator.snapshot().await);
            Ok(())
        }
        Command::Batch { file, texts } => {
            ensure_ready(coordinator).await?;
            let outcome = match file {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    coordinator.predict_batch_text(&raw).await
                }
                None => coordinator.predict_batch(texts.as_slice()).await,
            };
            match outcome {
                Ok(batch) => {
                    print_batch(&batch);
                    Ok(())
                }
                Err(_) => fail(coordinator).await,
            }
        }
        Command::History => {
            ensure_ready(coordinator).await?;
            print_history(&coordinator.snapshot().await);
            Ok(())
        }
        Command::Analytics => {
            ensure_ready(coordinator).await?;
            print_analytics(&coordinator.snapshot().await);
            Ok(())
        }
        Command::ClearHistory => {
            if coordinator.clear_history().await.is_err() {
                bail!("Cannot clear history while {:?}", coordinator.phase());
            }
            println!("History cleared");
            Ok(())
        }
        Command::Console => console(coordinator).await,
        Command::ServeMock { .. } => Ok(()),
    }
}

async fn ensure_ready(coordinator: &Coordinator) -> Result<()> {
    if coordinator.phase() == Phase::Ready {
        return Ok(());
    }
    fail(coordinator).await
}

async fn fail(coordinator: &Coordinator) -> Result<()> {
    let message = coordinator
        .user_error_message()
        .await
        .unwrap_or_else(|| format!("Operation failed while {:?}", coordinator.phase()));
    bail!(message)
}

const CONSOLE_HELP: &str = "\
Type a message to classify it, or:
  :batch a | b | c   classify several messages
  :retry             retry the connection
  :refresh           refresh history and analytics
  :history           show recent predictions
  :analytics         show analytics
  :clear             clear history
  :quit              exit";

async fn console(coordinator: &Coordinator) -> Result<()> {
    print_connection(&coordinator.snapshot().await);
    println!("{}", CONSOLE_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();
        coordinator.clear_validation_error().await;

        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest)) {
            (":quit", _) | (":q", _) => break,
            (":help", _) => println!("{}", CONSOLE_HELP),
            (":retry", _) => {
                let _ = coordinator.retry_connection().await;
                coordinator.settle().await;
                print_connection(&coordinator.snapshot().await);
            }
            (":refresh", _) => {
                let _ = coordinator.refresh().await;
                print_history(&coordinator.snapshot().await);
            }
            (":history", _) => print_history(&coordinator.snapshot().await),
            (":analytics", _) => print_analytics(&coordinator.snapshot().await),
            (":clear", _) => {
                if coordinator.clear_history().await.is_ok() {
                    println!("History cleared");
                }
            }
            (":batch", rest) => {
                let texts: Vec<&str> = rest.split('|').map(str::trim).collect();
                if let Ok(batch) = coordinator.predict_batch(texts.as_slice()).await {
                    print_batch(&batch);
                }
            }
            _ => {
                if let Ok(prediction) = coordinator.predict(line).await {
                    print_prediction(&prediction);
                }
            }
        }

        let state = coordinator.snapshot().await;
        print_alerts(&state);
    }

    Ok(())
}

fn print_connection(state: &SessionState) {
    match state.connection {
        ConnectionStatus::Checking => println!("Connection: checking"),
        ConnectionStatus::Connected => println!("Connection: connected"),
        ConnectionStatus::Disconnected => println!("Connection: disconnected"),
    }
    print_alerts(state);
}

fn print_alerts(state: &SessionState) {
    if let Some(error) = &state.error {
        println!("Error: {}", error.message);
    }
    if let Some(warning) = &state.warning {
        println!("Warning: {}", warning);
    }
}

fn print_prediction(prediction: &PredictionResult) {
    let verdict = if prediction.is_spam() {
        "SPAM DETECTED"
    } else {
        "NOT SPAM"
    };
    println!(
        "{} ({:.1}% confidence, {} chars, {} words)",
        verdict,
        prediction.confidence * 100.0,
        prediction.text_length,
        prediction.word_count
    );
}

fn print_batch(batch: &BatchResult) {
    println!(
        "Processed {} messages, {} spam",
        batch.total_processed,
        batch.spam_count()
    );
    for (index, item) in batch.results.iter().enumerate() {
        println!(
            "{:>3}. {:<4} {:>5.1}%  {}",
            index + 1,
            item.result,
            item.confidence * 100.0,
            item.text
        );
    }
}

fn print_session(state: &SessionState) {
    if let Some(prediction) = &state.prediction {
        print_prediction(prediction);
    }
    print_alerts(state);
}

fn print_history(state: &SessionState) {
    if state.history.is_empty() {
        println!("No predictions yet");
        return;
    }
    // Newest first
    for entry in state.history.iter().rev() {
        println!(
            "{}  {:<4} {:>5.1}%  {}",
            entry.timestamp,
            spam_console::session::models::label_for(entry.prediction),
            entry.confidence * 100.0,
            entry.text
        );
    }
}

fn print_analytics(state: &SessionState) {
    match &state.analytics {
        Some(summary) => {
            println!("Total predictions: {}", summary.total_predictions);
            println!(
                "Spam: {} ({:.1}%)  Ham: {}",
                summary.spam_count, summary.spam_percentage, summary.ham_count
            );
            println!("Average confidence: {:.1}%", summary.average_confidence * 100.0);
            println!("Average length: {:.1} chars", summary.average_text_length);
        }
        None => println!("No analytics yet"),
    }
}
