use url::Url;

use crate::{config::Identity, types::TokenResponse};

use super::{SpotifyClient, UpstreamError};

/// Builds the URL of Spotify's authorization page.
///
/// Embeds the client id, the redirect URI, `response_type=code` and the
/// requested scopes. Query values are percent-encoded.
///
/// # Errors
///
/// Returns the parse error if `auth_url` is not an absolute URL.
///
/// # Example
///
/// ```
/// let url = authorize_url("https://accounts.spotify.com/authorize", &identity, &SCOPES)?;
/// ```
pub fn authorize_url(
    auth_url: &str,
    identity: &Identity,
    scopes: &[&str],
) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        auth_url,
        &[
            ("client_id", identity.client_id.as_str()),
            ("redirect_uri", identity.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scopes.join(" ").as_str()),
        ],
    )
}

/// Exchanges an authorization code from the callback for a token pair.
///
/// The client authenticates with HTTP basic auth and must send the same
/// redirect URI that was used on the authorization page. The code is
/// single-use; a failed exchange is not retried.
pub async fn exchange_code(
    client: &SpotifyClient,
    code: &str,
) -> Result<TokenResponse, UpstreamError> {
    request_token(
        client,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", client.identity.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Mints a new access token from a refresh token.
///
/// The response only carries a `refresh_token` when Spotify rotates it.
pub async fn refresh_token(
    client: &SpotifyClient,
    refresh_token: &str,
) -> Result<TokenResponse, UpstreamError> {
    request_token(
        client,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn request_token(
    client: &SpotifyClient,
    form: &[(&str, &str)],
) -> Result<TokenResponse, UpstreamError> {
    let res = client
        .http
        .post(&client.token_url)
        .basic_auth(
            &client.identity.client_id,
            Some(&client.identity.client_secret),
        )
        .form(form)
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(UpstreamError::from_response(res).await);
    }

    Ok(res.json::<TokenResponse>().await?)
}
