use std::sync::Arc;

use crate::{config::Config, error, info, schedule, server};

pub async fn serve(config: Config) {
    let addr = match config.server_addr() {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let manager = Arc::new(super::manager(&config));
    info!("Using credential store {}", manager.store().path().display());

    schedule::spawn_refresh_schedule(Arc::clone(&manager));

    if let Err(e) = server::start_api_server(addr, manager).await {
        error!("Server stopped: {}", e);
    }
}
