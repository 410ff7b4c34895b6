use crate::{Res, config::Config, info, utils};

/// Refreshes the access token once.
pub async fn refresh(config: Config) -> Res<()> {
    let record = super::manager(&config).refresh().await?;
    if let Some(expires_at) = record.expires_at() {
        info!("New access token valid until {}", utils::format_timestamp(expires_at));
    }
    Ok(())
}
