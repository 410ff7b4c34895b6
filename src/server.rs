use std::{net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{api, info, management::TokenManager, spotify::SpotifyApi};

/// Assembles the HTTP routes around a shared [`TokenManager`].
pub fn router<C: SpotifyApi>(manager: Arc<TokenManager<C>>) -> Router {
    Router::new()
        .route("/", get(api::authorize::<C>))
        .route("/callback", get(api::callback::<C>))
        .route("/get", get(api::now_playing::<C>))
        .route("/refresh", get(api::refresh::<C>))
        .route("/health", get(api::health::<C>))
        .layer(Extension(manager))
        .layer(CorsLayer::permissive())
}

/// Binds `addr` and serves the router until the process ends.
pub async fn start_api_server<C: SpotifyApi>(
    addr: SocketAddr,
    manager: Arc<TokenManager<C>>,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running → {}", listener.local_addr()?);
    axum::serve(listener, router(manager)).await
}
