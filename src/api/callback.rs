use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    api::response,
    management::{LifecycleError, TokenManager},
    spotify::SpotifyApi,
    warning,
};

/// Completes the authorization with the code Spotify appends to the redirect.
///
/// A callback without a code gets a `400` instead of being left hanging. When
/// the user declined access, Spotify sends `error=access_denied`, which is
/// reported the same way.
pub async fn callback<C: SpotifyApi>(
    Query(params): Query<HashMap<String, String>>,
    Extension(manager): Extension<Arc<TokenManager<C>>>,
) -> Response {
    if let Some(reason) = params.get("error") {
        warning!("Authorization was declined: {}", reason);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "status": StatusCode::BAD_REQUEST.as_u16(),
                    "message": format!("authorization failed: {reason}"),
                }
            })),
        )
            .into_response();
    }

    let code = params.get("code").map(String::as_str).unwrap_or_default();
    match manager.complete_authorization(code).await {
        Ok(_) => {
            response::confirmation("The access token has been set and the store updated!")
                .into_response()
        }
        Err(e) => {
            if !matches!(e, LifecycleError::MissingCode) {
                warning!("Authorization code exchange failed: {}", e);
            }
            e.into_response()
        }
    }
}
