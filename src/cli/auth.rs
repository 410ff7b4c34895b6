use crate::{config::Config, error, info, warning};

/// Prints the authorization URL and tries to open it in the browser.
///
/// The redirect URI points at the running server, so `serve` has to be up
/// for the callback to complete the authorization.
pub async fn auth(config: Config) {
    let url = match super::manager(&config).authorize_url() {
        Ok(url) => url,
        Err(e) => error!("Cannot build authorization URL: {}", e),
    };

    info!("Authorize the application at:\n{}", url);
    if webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually.");
    }
}
