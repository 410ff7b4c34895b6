use std::sync::Arc;

use axum::{
    Extension,
    response::{IntoResponse, Response},
};

use crate::{api::response, management::TokenManager, spotify::SpotifyApi, warning};

pub async fn now_playing<C: SpotifyApi>(
    Extension(manager): Extension<Arc<TokenManager<C>>>,
) -> Response {
    match manager.currently_playing().await {
        Ok(playing) => response::now_playing(playing).into_response(),
        Err(e) => {
            warning!("Cannot get the currently playing track: {}", e);
            e.into_response()
        }
    }
}
