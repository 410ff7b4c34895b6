use std::sync::Arc;

use axum::{
    Extension,
    response::{IntoResponse, Response},
};

use crate::{api::response, management::TokenManager, spotify::SpotifyApi, warning};

/// Forces a token refresh outside the hourly schedule.
pub async fn refresh<C: SpotifyApi>(
    Extension(manager): Extension<Arc<TokenManager<C>>>,
) -> Response {
    match manager.refresh().await {
        Ok(_) => response::confirmation("The access token has been refreshed!").into_response(),
        Err(e) => {
            warning!("Could not refresh access token: {}", e);
            e.into_response()
        }
    }
}
