//! # Spotify Integration Module
//!
//! The upstream boundary of the backend. [`SpotifyApi`] is the contract the
//! token lifecycle depends on; [`SpotifyClient`] implements it over HTTP with
//! `reqwest`.
//!
//! ```text
//! TokenManager
//!      ↓
//! SpotifyApi (trait)
//!      ├── auth   - authorization-code and refresh-token grants
//!      └── player - currently playing track
//!      ↓
//! Spotify Web API
//! ```
//!
//! Calls carry the tokens they need as arguments. The client itself holds no
//! credential state, so one instance can be shared by every request.
//!
//! Failures are not classified beyond [`UpstreamError`]; nothing is retried.

pub mod auth;
pub mod player;

use std::{fmt, future::Future};

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

use crate::{
    config::{Config, Identity},
    types::{CurrentlyPlaying, TokenResponse},
};

#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    Transport(String),
    /// Spotify answered with a non-success status; `body` is its JSON payload.
    Rejected { status: u16, body: Value },
    /// A success response whose body could not be decoded.
    Decode(String),
}

impl UpstreamError {
    /// Builds a [`UpstreamError::Rejected`] from a failed response.
    ///
    /// Spotify answers with JSON error objects; anything else is wrapped as a
    /// JSON string so the body can still be relayed verbatim.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text));
        UpstreamError::Rejected { status, body }
    }

    /// HTTP status to relay to callers.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    /// JSON body to relay to callers.
    pub fn body(&self) -> Value {
        match self {
            UpstreamError::Rejected { body, .. } => body.clone(),
            other => json!({
                "error": {
                    "status": StatusCode::BAD_GATEWAY.as_u16(),
                    "message": other.to_string(),
                }
            }),
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Transport(msg) => write!(f, "request to Spotify failed: {msg}"),
            UpstreamError::Rejected { status, body } => {
                write!(f, "Spotify rejected the request ({status}): {body}")
            }
            UpstreamError::Decode(msg) => write!(f, "unexpected response from Spotify: {msg}"),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// Operations the token lifecycle needs from Spotify.
///
/// The futures are `Send` so implementations can be driven from axum handlers
/// and spawned tasks.
pub trait SpotifyApi: Send + Sync + 'static {
    fn exchange_authorization_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<TokenResponse, UpstreamError>> + Send;

    fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenResponse, UpstreamError>> + Send;

    fn currently_playing(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<CurrentlyPlaying, UpstreamError>> + Send;
}

/// `reqwest` implementation of [`SpotifyApi`].
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    identity: Identity,
    token_url: String,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(identity: Identity, token_url: String, api_url: String) -> Self {
        Self {
            http: Client::new(),
            identity,
            token_url,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.identity.clone(),
            config.token_url.clone(),
            config.api_url.clone(),
        )
    }
}

impl SpotifyApi for SpotifyClient {
    async fn exchange_authorization_code(&self, code: &str) -> Result<TokenResponse, UpstreamError> {
        auth::exchange_code(self, code).await
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, UpstreamError> {
        auth::refresh_token(self, refresh_token).await
    }

    async fn currently_playing(&self, access_token: &str) -> Result<CurrentlyPlaying, UpstreamError> {
        player::currently_playing(self, access_token).await
    }
}
