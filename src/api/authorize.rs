use std::sync::Arc;

use axum::{
    Extension, Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{management::TokenManager, spotify::SpotifyApi, warning};

/// Redirects the browser to Spotify's authorization page with a `302 Found`.
pub async fn authorize<C: SpotifyApi>(
    Extension(manager): Extension<Arc<TokenManager<C>>>,
) -> Response {
    match manager.authorize_url() {
        Ok(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        Err(e) => {
            warning!("Cannot build authorization URL: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": {
                        "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                        "message": format!("invalid authorization URL: {e}"),
                    }
                })),
            )
                .into_response()
        }
    }
}
