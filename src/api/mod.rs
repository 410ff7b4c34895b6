//! # API Module
//!
//! HTTP handlers of the backend. Each one is a thin wrapper that calls into
//! the [`TokenManager`](crate::management::TokenManager) and turns the result
//! into a JSON envelope.
//!
//! ## Endpoints
//!
//! - [`authorize`] - `GET /`, redirects to Spotify's authorization page
//! - [`callback`] - `GET /callback?code=..`, completes the authorization
//! - [`now_playing`] - `GET /get`, the track currently playing
//! - [`refresh`] - `GET /refresh`, forces a token refresh
//! - [`health`] - `GET /health`, liveness and authorization status
//!
//! ## Responses
//!
//! Successes use the `{"data": .., "status": ..}` envelope. Upstream failures
//! are relayed with Spotify's own status and JSON body; local failures use
//! `{"error": {"status": .., "message": ..}}`.
//!
//! Handlers are generic over [`SpotifyApi`](crate::spotify::SpotifyApi) and
//! take the manager from an `Extension` layer.

mod authorize;
mod callback;
mod health;
mod now_playing;
mod refresh;
pub mod response;

pub use authorize::authorize;
pub use callback::callback;
pub use health::health;
pub use now_playing::now_playing;
pub use refresh::refresh;
