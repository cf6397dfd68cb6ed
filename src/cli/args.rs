//! Command-line argument parsing for the chatdesk binary.

use crate::config::ClientConfig;

/// Options that override the environment configuration for an interactive run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Synthesize sends and thread creation locally
    pub mock: bool,
    /// Backend base URL
    pub base_url: Option<String>,
}

impl RunOptions {
    /// Layer these options over a config loaded from the environment.
    pub fn apply(&self, config: ClientConfig) -> ClientConfig {
        let config = if self.mock {
            config.with_mock_mode(true)
        } else {
            config
        };
        match &self.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Arguments could not be understood
    Invalid(String),
    /// Start the interactive shell (default)
    Run(RunOptions),
}

/// Parse command-line arguments and return the appropriate command.
///
/// The first item is the program name and is skipped. `--version` and
/// `--help` win over everything else; unknown flags are rejected.
///
/// # Examples
///
/// ```
/// use chatdesk::cli::args::{parse_args, CliCommand, RunOptions};
///
/// let args = vec!["chatdesk".to_string(), "--mock".to_string()];
/// let expected = RunOptions { mock: true, base_url: None };
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Run(expected));
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--mock" => options.mock = true,
            "--base-url" => match args.next() {
                Some(url) if !url.starts_with("--") => options.base_url = Some(url),
                _ => return CliCommand::Invalid("--base-url requires a value".to_string()),
            },
            other => {
                if let Some(url) = other.strip_prefix("--base-url=") {
                    options.base_url = Some(url.to_string());
                } else {
                    return CliCommand::Invalid(format!("unknown argument: {}", other));
                }
            }
        }
    }
    CliCommand::Run(options)
}

/// Usage text for `--help`.
pub fn usage() -> String {
    [
        "Usage: chatdesk [OPTIONS]",
        "",
        "Options:",
        "  --base-url <url>  Backend base URL (default from CHATDESK_API_BASE_URL)",
        "  --mock            Create threads and send messages without a server",
        "  -V, --version     Print version",
        "  -h, --help        Print this help",
    ]
    .join("\n")
}
