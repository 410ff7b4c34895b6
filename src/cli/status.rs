use chrono::Utc;
use tabled::Table;

use crate::{
    Res,
    config::Config,
    management::{CredentialStore, StoreError},
    types::{CredentialSet, CredentialTableRow},
    utils, warning,
};

/// Prints the stored credential record as a table.
pub async fn status(config: Config) -> Res<()> {
    let store = CredentialStore::new(config.store_path.clone());
    let record = match store.read().await {
        Ok(record) => record,
        Err(StoreError::Missing(path)) => {
            warning!("No credentials stored at {}, run `nowplaying auth`", path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let now = Utc::now().timestamp().max(0) as u64;
    println!("{}", Table::new(status_rows(&record, now)));
    Ok(())
}

/// Table rows for `record`, secrets masked.
pub fn status_rows(record: &CredentialSet, now: u64) -> Vec<CredentialTableRow> {
    let plain = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let masked = |v: &Option<String>| {
        v.as_deref()
            .map(utils::mask_secret)
            .unwrap_or_else(|| "-".to_string())
    };

    let expiry = match (record.expires_at(), record.is_expired(now)) {
        (Some(at), Some(true)) => format!("{} (expired)", utils::format_timestamp(at)),
        (Some(at), _) => utils::format_timestamp(at),
        (None, _) => "unknown".to_string(),
    };

    [
        ("client_id", plain(&record.client_id)),
        ("client_secret", masked(&record.client_secret)),
        ("redirect_uri", plain(&record.redirect_uri)),
        ("access_token", masked(&record.access_token)),
        ("refresh_token", masked(&record.refresh_token)),
        ("scope", plain(&record.scope)),
        ("expires_at", expiry),
    ]
    .into_iter()
    .map(|(field, value)| CredentialTableRow {
        field: field.to_string(),
        value,
    })
    .collect()
}
