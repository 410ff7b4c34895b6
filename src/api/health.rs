use std::sync::Arc;

use axum::{Extension, response::Json};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{management::TokenManager, spotify::SpotifyApi};

pub async fn health<C: SpotifyApi>(
    Extension(manager): Extension<Arc<TokenManager<C>>>,
) -> Json<Value> {
    let record = manager.store().read().await.unwrap_or_default();
    let now = Utc::now().timestamp().max(0) as u64;

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": record.is_authorized(),
        "expires_at": record.expires_at(),
        "expired": record.is_expired(now),
    }))
}
