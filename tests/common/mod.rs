#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::Path,
    sync::{Arc, Mutex},
};

use nowplaying::{
    config::Identity,
    management::{CredentialStore, TokenManager},
    spotify::{SpotifyApi, UpstreamError},
    types::{CurrentlyPlaying, TokenResponse},
};

/// Scripted stand-in for the Spotify API.
///
/// Each call pops the next queued response; calls are recorded so tests can
/// check which tokens were sent.
#[derive(Default)]
pub struct MockSpotify {
    pub code_responses: Mutex<VecDeque<Result<TokenResponse, UpstreamError>>>,
    pub refresh_responses: Mutex<VecDeque<Result<TokenResponse, UpstreamError>>>,
    pub playing_responses: Mutex<VecDeque<Result<CurrentlyPlaying, UpstreamError>>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockSpotify {
    pub fn on_code(self, response: Result<TokenResponse, UpstreamError>) -> Self {
        self.code_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_refresh(self, response: Result<TokenResponse, UpstreamError>) -> Self {
        self.refresh_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_playing(self, response: Result<CurrentlyPlaying, UpstreamError>) -> Self {
        self.playing_responses.lock().unwrap().push_back(response);
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unscripted() -> UpstreamError {
    UpstreamError::Transport("no scripted response".to_string())
}

impl SpotifyApi for MockSpotify {
    async fn exchange_authorization_code(&self, code: &str) -> Result<TokenResponse, UpstreamError> {
        self.record(format!("code:{code}"));
        let next = self.code_responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unscripted()))
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenResponse, UpstreamError> {
        self.record(format!("refresh:{refresh_token}"));
        let next = self.refresh_responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unscripted()))
    }

    async fn currently_playing(&self, access_token: &str) -> Result<CurrentlyPlaying, UpstreamError> {
        self.record(format!("playing:{access_token}"));
        let next = self.playing_responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unscripted()))
    }
}

pub fn identity() -> Identity {
    Identity {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://localhost:5000/callback".to_string(),
    }
}

pub fn token(access: &str, refresh: Option<&str>, expires_in: u64) -> TokenResponse {
    TokenResponse {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_in,
        scope: None,
        token_type: None,
    }
}

pub fn manager(path: &Path, mock: MockSpotify) -> Arc<TokenManager<MockSpotify>> {
    Arc::new(TokenManager::new(
        identity(),
        "https://accounts.spotify.com/authorize".to_string(),
        CredentialStore::new(path.to_path_buf()),
        mock,
    ))
}

/// Writes `json` as the store content.
pub fn seed(path: &Path, json: &str) {
    std::fs::write(path, json).unwrap();
}
