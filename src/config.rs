//! Configuration management for the now-playing backend.
//!
//! Configuration is read once at startup from the process environment, which
//! may be seeded from `.env` files. The configuration system follows a
//! hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env.local` and `.env` in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)
//!
//! Nothing is reloaded at runtime.

use std::{env, fmt, net::SocketAddr, path::PathBuf};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Scopes requested during authorization: the currently playing track and
/// the private profile of the user.
pub const SCOPES: [&str; 2] = ["user-read-private", "user-read-currently-playing"];

/// Loads environment variables from the known `.env` locations.
///
/// Earlier files win because `dotenv` never overrides a variable that is
/// already set. Missing files are skipped silently; a malformed file only
/// produces a warning since the variables may still come from the process
/// environment.
pub async fn load_env() {
    let mut candidates = vec![PathBuf::from(".env.local"), PathBuf::from(".env")];
    if let Some(mut path) = dirs::data_local_dir() {
        path.push("nowplaying/.env");
        candidates.push(path);
    }

    for path in candidates {
        if !path.is_file() {
            continue;
        }
        if let Err(e) = dotenv::from_path(&path) {
            crate::warning!("Cannot load {}: {}", path.display(), e);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => {
                write!(f, "{key} has an invalid value: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Static application identity registered with Spotify.
///
/// Immutable for the lifetime of the process and merged into every record the
/// authorization exchange writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub identity: Identity,
    pub host: String,
    pub port: u16,
    pub store_path: PathBuf,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any of `SPOTIFY_CLIENT_ID`,
    /// `SPOTIFY_CLIENT_SECRET` or `SPOTIFY_REDIRECT_URI` is missing or empty,
    /// or if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// [`Config::from_env`] is a thin wrapper over this; tests pass a map
    /// lookup instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let identity = Identity {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
        };

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let store_path = get("NOWPLAYING_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(default_store_path);

        Ok(Self {
            identity,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            store_path,
            auth_url: get("SPOTIFY_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Returns the address the HTTP server binds to.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `HOST` is not an IP address.
    pub fn server_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "HOST",
                value: self.host.clone(),
            })
    }
}

/// Default location of the credential record.
///
/// - Linux: `~/.local/share/nowplaying/database.json`
/// - macOS: `~/Library/Application Support/nowplaying/database.json`
/// - Windows: `%LOCALAPPDATA%/nowplaying/database.json`
pub fn default_store_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("nowplaying/database.json");
    path
}
