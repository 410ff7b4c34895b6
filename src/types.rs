use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// Typed view over the persisted credential record.
///
/// The record on disk is a plain JSON object and may contain keys this struct
/// does not know about; the store merges raw objects so those keys survive.
/// Every field is optional because the record starts out empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Unix seconds at which the current access token was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obtained_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl CredentialSet {
    /// True once an authorization exchange has written a token pair.
    pub fn is_authorized(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
            || self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Absolute expiry in unix seconds, if the issuance time is known.
    pub fn expires_at(&self) -> Option<u64> {
        Some(self.obtained_at? + self.expires_in?)
    }

    /// Whether the access token is past its expiry at `now`.
    ///
    /// Returns `None` for records written without an issuance time, where
    /// validity cannot be determined.
    pub fn is_expired(&self, now: u64) -> Option<bool> {
        self.expires_at().map(|at| now >= at)
    }
}

/// Body of a successful response from the Spotify token endpoint.
///
/// Used for both the authorization-code and the refresh-token grant; a
/// refresh response only carries `refresh_token` when Spotify rotates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Converts the response into the partial record merged into the store.
    ///
    /// Absent optional fields are left out of the update so the previously
    /// stored values are preserved.
    pub fn to_update(&self, obtained_at: u64) -> Map<String, Value> {
        let mut update = Map::new();
        update.insert("access_token".into(), Value::from(self.access_token.clone()));
        update.insert("expires_in".into(), Value::from(self.expires_in));
        update.insert("obtained_at".into(), Value::from(obtained_at));
        if let Some(refresh_token) = &self.refresh_token {
            update.insert("refresh_token".into(), Value::from(refresh_token.clone()));
        }
        if let Some(scope) = &self.scope {
            update.insert("scope".into(), Value::from(scope.clone()));
        }
        if let Some(token_type) = &self.token_type {
            update.insert("token_type".into(), Value::from(token_type.clone()));
        }
        update
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Track object as returned by the player endpoint.
///
/// Artists and album are relayed verbatim to HTTP callers, so they are kept
/// as raw JSON instead of being modelled field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub artists: Vec<Value>,
    #[serde(default)]
    pub album: Value,
}

/// Response of `GET /me/player/currently-playing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub item: Option<Track>,
    #[serde(default)]
    pub is_playing: bool,
}

/// Normalized snapshot of the playing track handed to HTTP callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub id: Option<String>,
    pub preview_url: Option<String>,
    pub name: String,
    pub href: Option<String>,
    pub artists: Vec<Value>,
    pub album: Value,
    pub is_playing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NowPlaying {
    Playing(TrackSnapshot),
    Empty,
}

impl From<CurrentlyPlaying> for NowPlaying {
    fn from(playing: CurrentlyPlaying) -> Self {
        match playing.item {
            Some(track) => NowPlaying::Playing(TrackSnapshot {
                id: track.id,
                preview_url: track.preview_url,
                name: track.name,
                href: track.external_urls.spotify,
                artists: track.artists,
                album: track.album,
                is_playing: playing.is_playing,
            }),
            None => NowPlaying::Empty,
        }
    }
}

/// Row of the `status` table.
#[derive(Tabled)]
pub struct CredentialTableRow {
    pub field: String,
    pub value: String,
}
