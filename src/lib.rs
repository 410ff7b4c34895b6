//! Now Playing Backend Library
//!
//! This library keeps a single Spotify credential set alive and exposes the
//! currently playing track of the authorized account over HTTP. It covers the
//! whole credential lifecycle: authorization, persistence, periodic refresh.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for authorization, refresh and the now-playing query
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Credential store and token lifecycle management
//! - `schedule` - Periodic token refresh trigger
//! - `server` - HTTP server and router assembly
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use nowplaying::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> nowplaying::Res<()> {
//!     config::load_env().await;
//!     let config = config::Config::from_env()?;
//!     cli::serve(config).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod schedule;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the command-line boundary where the concrete error type no longer
/// matters and only its message is shown to the user.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Every line carries a local timestamp since the server runs unattended and
/// its output is usually read from a log file.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "{} [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      "o".blue().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("The access token has been refreshed");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "{} [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      "✓".green().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal startup conditions such as a missing configuration value or
/// a port that cannot be bound. Runtime failures go through [`warning!`].
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "{} [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      "!".red().bold(),
      std::format_args!($($arg)*)
    );
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures, for instance a scheduled refresh that the
/// upstream rejected. The process keeps running.
///
/// # Example
///
/// ```
/// warning!("Could not refresh access token: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "{} [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      "!".yellow().bold(),
      std::format_args!($($arg)*)
    );
  })
}
