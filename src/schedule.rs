//! Periodic token refresh.
//!
//! Refreshes once right away and then at the top of every hour. A failed run
//! is logged and otherwise ignored; the next run simply tries again.

use std::sync::Arc;

use chrono::Local;
use tokio::task::JoinHandle;

use crate::{
    info,
    management::{LifecycleError, TokenManager},
    spotify::SpotifyApi,
    utils, warning,
};

/// Spawns the refresh loop on the runtime.
pub fn spawn_refresh_schedule<C: SpotifyApi>(manager: Arc<TokenManager<C>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_refresh(&manager).await;

        loop {
            let wait = utils::until_next_hour(Local::now());
            // a negative or out-of-range delta only happens around clock jumps
            let wait = wait.to_std().unwrap_or(std::time::Duration::from_secs(60));
            tokio::time::sleep(wait).await;
            run_refresh(&manager).await;
        }
    })
}

/// One scheduled refresh. Never fails; problems end up in the log.
pub async fn run_refresh<C: SpotifyApi>(manager: &TokenManager<C>) {
    match manager.refresh().await {
        Ok(_) => {}
        Err(LifecycleError::NotAuthorized) => {
            info!("Skipping scheduled refresh, no credentials stored yet");
        }
        Err(e) => warning!("Could not refresh access token: {}", e),
    }
}
