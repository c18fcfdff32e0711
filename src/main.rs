//! bounded_cache - line-oriented driver for the bounded cache
//!
//! Reads one command per line from stdin and prints one JSON reply per line
//! to stdout. Logs go to stderr.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bounded_cache::{Command, Config, Response, Session};

/// # Startup Sequence
/// 1. Initialize tracing subscriber on stderr
/// 2. Load configuration from environment variables
/// 3. Create the session (cache + pin delegate)
/// 4. Execute stdin commands until EOF, `quit` or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bounded_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: count_limit={}, time_to_live={:?}, time_to_idle={:?}",
        config.count_limit, config.time_to_live, config.time_to_idle
    );

    let mut session = Session::new(&config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        };

        let Some(line) = line else {
            info!("End of input, shutting down");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let (response, quit) = match Command::parse(&line) {
            Ok(command) => {
                let quit = command == Command::Quit;
                (session.execute(command), quit)
            }
            Err(err) => {
                warn!("Rejected input: {}", err);
                (Response::from(err), false)
            }
        };

        let mut out = serde_json::to_string(&response).context("failed to encode reply")?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;

        if quit {
            break;
        }
    }

    info!(stats = ?session.cache().stats(), "Session finished");
    Ok(())
}
