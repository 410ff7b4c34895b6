use reqwest::StatusCode;

use crate::types::CurrentlyPlaying;

use super::{SpotifyClient, UpstreamError};

/// Fetches the track currently playing on the user's account.
///
/// Spotify answers `204 No Content` when nothing is playing; that is mapped
/// to a [`CurrentlyPlaying`] without an item rather than to an error. An
/// expired or revoked access token surfaces as a rejected request, no refresh
/// is attempted here.
pub async fn currently_playing(
    client: &SpotifyClient,
    access_token: &str,
) -> Result<CurrentlyPlaying, UpstreamError> {
    let url = format!("{api}/me/player/currently-playing", api = client.api_url);

    let res = client.http.get(&url).bearer_auth(access_token).send().await?;

    if res.status() == StatusCode::NO_CONTENT {
        return Ok(CurrentlyPlaying::default());
    }
    if !res.status().is_success() {
        return Err(UpstreamError::from_response(res).await);
    }

    let body = res.text().await?;
    if body.trim().is_empty() {
        return Ok(CurrentlyPlaying::default());
    }

    serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
}
