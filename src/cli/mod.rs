//! # CLI Module
//!
//! User-facing commands of the `nowplaying` binary.
//!
//! - [`serve`] - runs the HTTP server together with the refresh schedule
//! - [`auth`] - prints and opens the Spotify authorization page
//! - [`refresh`] - refreshes the access token once and exits
//! - [`status`] - shows the stored credential record with secrets masked
//!
//! Every command receives the [`Config`](crate::config::Config) loaded at
//! startup and builds its own [`TokenManager`] through [`manager`].

mod auth;
mod refresh;
mod serve;
mod status;

pub use auth::auth;
pub use refresh::refresh;
pub use serve::serve;
pub use status::{status, status_rows};

use crate::{
    config::Config,
    management::{CredentialStore, TokenManager},
    spotify::SpotifyClient,
};

/// Wires the store and the HTTP client into a manager for `config`.
pub fn manager(config: &Config) -> TokenManager<SpotifyClient> {
    TokenManager::new(
        config.identity.clone(),
        config.auth_url.clone(),
        CredentialStore::new(config.store_path.clone()),
        SpotifyClient::from_config(config),
    )
}
