//! Interactive terminal driver for the cart.
//!
//! Reads one command per line from stdin, persists the cart to a JSON file
//! and prints checkout links instead of opening them. Type `help` for the
//! command list.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use storefront_cart::command::HELP;
use storefront_cart::{
    CartAction, CartConfig, CartEnvironment, CartReducer, Command, FileStorage,
    LoggingLink, TerminalDisplay, describe_metrics,
};
use storefront_core::environment::SystemClock;
use storefront_runtime::metrics::MetricsRecorder;
use storefront_runtime::{EffectHandle, Store, StoreError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound on waiting for a command's effects before printing.
/// Adds leave a notification hide pending that should not block the prompt.
const SETTLE: Duration = Duration::from_millis(200);

async fn settle(mut handle: EffectHandle) {
    if let Err(StoreError::Timeout) = handle.wait_with_timeout(SETTLE).await {
        tracing::trace!(pending = handle.pending(), "Effects still running");
    }
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_cart=info,storefront_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let recorder = MetricsRecorder::install()?;
    describe_metrics();

    let config = CartConfig::from_env();
    let storage = Arc::new(FileStorage::new(&config.storage_dir, &config.storage_key));
    tracing::info!(path = %storage.path().display(), "Using cart file");

    let display = Arc::new(TerminalDisplay::new());
    let env = CartEnvironment::new(
        storage,
        display.clone(),
        Arc::new(LoggingLink),
        Arc::new(SystemClock),
        config,
    );
    let store = Store::new(env.restore_state(), CartReducer::new(), env);

    settle(store.send(CartAction::Render).await?).await;
    println!("=== Storefront Cart ===\n");
    println!("{}\n", display.snapshot());
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt()?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Dispatch(action)) => {
                let before = store.state(|s| s.last_message.clone()).await;
                settle(store.send(action).await?).await;

                let notices = display.drain_notices();
                for notice in &notices {
                    println!("* {notice}");
                }
                // Rejected indices only record a message, they don't render
                let after = store.state(|s| s.last_message.clone()).await;
                let fresh = after.filter(|m| before.as_ref() != Some(m) && !notices.contains(m));
                if let Some(message) = fresh {
                    println!("* {message}");
                }
                println!("{}", display.snapshot());
            },
            Ok(Command::Show) => println!("{}", display.snapshot()),
            Ok(Command::Metrics) => match recorder.render() {
                Some(text) => println!("{text}"),
                None => println!("Metrics recorder not available"),
            },
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(error) => println!("{error}"),
        }

        prompt()?;
    }

    // Pending notification hides fire, their actions are rejected
    store.shutdown(Duration::from_secs(5)).await?;
    println!("Bye!");
    Ok(())
}
