use chatdesk::cli::{parse_args, run_cli_command, run_shell, CliCommand};
use chatdesk::config::ClientConfig;
use chatdesk::store::HttpChatStore;

use color_eyre::Result;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr so the shell output on stdout stays clean.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args());
    if let Some(result) = run_cli_command(&command) {
        return result;
    }
    let CliCommand::Run(options) = command else {
        return Ok(());
    };

    init_tracing();

    let config = options.apply(ClientConfig::from_env()?);
    tracing::info!(
        base_url = %config.base_url,
        mock_mode = config.mock_mode,
        reply_source = ?config.reply_source,
        "starting chatdesk"
    );

    let store = HttpChatStore::from_config(config)?;
    let stdin = BufReader::new(tokio::io::stdin());
    run_shell(&store, stdin, tokio::io::stdout()).await?;

    let cancelled = store.cancel_pending_replies();
    tracing::debug!(cancelled, "shell closed");
    Ok(())
}
