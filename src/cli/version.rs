//! Version command for the chatdesk binary.

/// The current version of chatdesk, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version line as printed by `--version`.
pub fn version_string() -> String {
    format!("chatdesk {}", VERSION)
}

/// Handle the --version command.
///
/// Prints the version string and exits successfully.
pub fn handle_version_command() -> ! {
    println!("{}", version_string());
    std::process::exit(0)
}
