use std::fmt;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{
    config::{Identity, SCOPES},
    info,
    management::store::{CredentialStore, StoreError},
    spotify::{self, SpotifyApi, UpstreamError},
    success,
    types::{CredentialSet, NowPlaying},
    utils,
};

#[derive(Debug)]
pub enum LifecycleError {
    Store(StoreError),
    Upstream(UpstreamError),
    /// No refresh or access token has been stored yet.
    NotAuthorized,
    /// The authorization callback arrived without a code.
    MissingCode,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::Store(e) => write!(f, "{e}"),
            LifecycleError::Upstream(e) => write!(f, "{e}"),
            LifecycleError::NotAuthorized => {
                write!(f, "not authorized yet, open the authorization page first")
            }
            LifecycleError::MissingCode => write!(f, "missing authorization code"),
        }
    }
}

impl std::error::Error for LifecycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifecycleError::Store(e) => Some(e),
            LifecycleError::Upstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        LifecycleError::Store(err)
    }
}

impl From<UpstreamError> for LifecycleError {
    fn from(err: UpstreamError) -> Self {
        LifecycleError::Upstream(err)
    }
}

/// Tokens last handed to the upstream client.
///
/// Reloaded from the store right before every upstream call; the store stays
/// the source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Owns the credential lifecycle of the single authorized account.
///
/// The only writer of the credential record. States run
/// `UNAUTHORIZED → AUTHORIZED → AUTHORIZED (stale) → AUTHORIZED → ...`; a
/// failed refresh leaves the stored tokens untouched and is retried by the
/// next scheduled run.
///
/// Expiry is tracked (`obtained_at` + `expires_in`) but upstream calls are not
/// gated on it. Keeping the access token valid is the job of the hourly
/// refresh schedule.
pub struct TokenManager<C: SpotifyApi> {
    identity: Identity,
    auth_url: String,
    store: CredentialStore,
    client: C,
    session: RwLock<Session>,
}

impl<C: SpotifyApi> TokenManager<C> {
    pub fn new(identity: Identity, auth_url: String, store: CredentialStore, client: C) -> Self {
        Self {
            identity,
            auth_url,
            store,
            client,
            session: RwLock::new(Session::default()),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// URL of the Spotify authorization page the user is redirected to.
    ///
    /// Pure function of the static configuration.
    pub fn authorize_url(&self) -> Result<String, url::ParseError> {
        spotify::auth::authorize_url(&self.auth_url, &self.identity, &SCOPES).map(String::from)
    }

    /// Trades an authorization code for a token pair and persists it.
    ///
    /// The record receives the tokens, `expires_in` and the application
    /// identity, merged over whatever was stored before. Upstream failures
    /// are returned as is and not retried.
    pub async fn complete_authorization(&self, code: &str) -> Result<CredentialSet, LifecycleError> {
        if code.trim().is_empty() {
            return Err(LifecycleError::MissingCode);
        }

        let token = self.client.exchange_authorization_code(code).await?;
        info!("The token expires in {}", token.expires_in);

        {
            let mut session = self.session.write().await;
            session.access_token = Some(token.access_token.clone());
            if let Some(refresh_token) = &token.refresh_token {
                session.refresh_token = Some(refresh_token.clone());
            }
        }

        let mut update = token.to_update(now());
        update.extend(self.identity_update());
        let record = self.store.update(update).await?;

        success!("The access token has been set and the store updated");
        Ok(record)
    }

    /// Mints a new access token from the stored refresh token.
    ///
    /// Writes `access_token` and `expires_in`; the refresh token is only
    /// replaced when Spotify returns a new one.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotAuthorized`] if no refresh token is stored,
    /// otherwise the store or upstream error.
    pub async fn refresh(&self) -> Result<CredentialSet, LifecycleError> {
        let session = self.load_session().await?;
        let Some(refresh_token) = session.refresh_token else {
            return Err(LifecycleError::NotAuthorized);
        };

        let token = self.client.exchange_refresh_token(&refresh_token).await?;

        {
            let mut session = self.session.write().await;
            session.access_token = Some(token.access_token.clone());
            if let Some(rotated) = &token.refresh_token {
                session.refresh_token = Some(rotated.clone());
            }
        }

        let record = self.store.update(token.to_update(now())).await?;
        success!(
            "The access token has been refreshed ({})",
            utils::mask_secret(&token.access_token)
        );
        Ok(record)
    }

    /// Queries the track currently playing with the stored access token.
    ///
    /// Returns [`NowPlaying::Empty`] when nothing is playing. An expired
    /// token is reported as the upstream rejection; no refresh happens here.
    pub async fn currently_playing(&self) -> Result<NowPlaying, LifecycleError> {
        let session = self.load_session().await?;
        let Some(access_token) = session.access_token else {
            return Err(LifecycleError::NotAuthorized);
        };

        let playing = self.client.currently_playing(&access_token).await?;
        Ok(NowPlaying::from(playing))
    }

    /// Sets the session from the last-known stored tokens.
    ///
    /// The session is overwritten on every call. A missing store file or an
    /// absent field clears the corresponding token.
    async fn load_session(&self) -> Result<Session, LifecycleError> {
        let record = match self.store.read().await {
            Ok(record) => record,
            Err(StoreError::Missing(_)) => CredentialSet::default(),
            Err(e) => return Err(e.into()),
        };

        let loaded = Session {
            access_token: record.access_token.filter(|t| !t.is_empty()),
            refresh_token: record.refresh_token.filter(|t| !t.is_empty()),
        };
        *self.session.write().await = loaded.clone();
        Ok(loaded)
    }

    fn identity_update(&self) -> Map<String, Value> {
        let mut update = Map::new();
        update.insert("client_id".into(), Value::from(self.identity.client_id.clone()));
        update.insert(
            "client_secret".into(),
            Value::from(self.identity.client_secret.clone()),
        );
        update.insert(
            "redirect_uri".into(),
            Value::from(self.identity.redirect_uri.clone()),
        );
        update
    }
}

fn now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
