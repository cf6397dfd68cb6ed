//! CLI module for chatdesk.
//!
//! This module provides the command-line surface:
//! - Argument parsing
//! - Version and help display
//! - The interactive shell that drives a chat store
//!
//! # Usage
//!
//! ```ignore
//! use chatdesk::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(&command) {
//!     return result;
//! }
//! // CliCommand::Run: start the shell
//! ```

pub mod args;
pub mod shell;
pub mod version;

pub use args::{parse_args, usage, CliCommand, RunOptions};
pub use shell::{execute, parse_line, run_shell, ShellCommand, ShellError, Step};
pub use version::{handle_version_command, version_string, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Run a CLI command if applicable.
///
/// # Returns
///
/// * `None` - If the command is `Run` (the shell should start)
/// * `Some(Ok(()))` - If a one-shot command completed
/// * `Some(Err(e))` - If the arguments were invalid
///
/// The `Version` command never returns as it calls `std::process::exit(0)`.
pub fn run_cli_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", usage());
            Some(Ok(()))
        }
        CliCommand::Invalid(message) => Some(Err(eyre!("{}\n\n{}", message, usage()))),
        CliCommand::Run(_) => None,
    }
}
