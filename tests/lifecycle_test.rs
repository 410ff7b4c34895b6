mod common;

use common::{MockSpotify, manager, seed, token};
use nowplaying::{
    management::LifecycleError,
    spotify::UpstreamError,
    types::{CurrentlyPlaying, ExternalUrls, NowPlaying, Track},
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn playing_track() -> CurrentlyPlaying {
    CurrentlyPlaying {
        item: Some(Track {
            id: Some("track-1".to_string()),
            name: "Song".to_string(),
            preview_url: Some("https://p.scdn.co/preview".to_string()),
            external_urls: ExternalUrls {
                spotify: Some("https://open.spotify.com/track/track-1".to_string()),
            },
            artists: vec![json!({"name": "Artist"})],
            album: json!({"name": "Album"}),
        }),
        is_playing: true,
    }
}

#[test]
fn test_authorize_url_embeds_identity_and_scopes() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir.path().join("database.json"), MockSpotify::default());

    let url = manager.authorize_url().unwrap();

    assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(url.contains("client_id=client-id"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5000%2Fcallback"));
    assert!(url.contains("user-read-private"));
    assert!(url.contains("user-read-currently-playing"));
}

#[tokio::test]
async fn test_authorization_then_refresh_scenario() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, "{}");

    let mock = MockSpotify::default()
        .on_code(Ok(token("AT1", Some("RT1"), 3600)))
        .on_refresh(Ok(token("AT2", None, 3600)));
    let manager = manager(&path, mock);

    manager.complete_authorization("abc123").await.unwrap();
    let record = manager.store().read().await.unwrap();
    assert_eq!(record.client_id.as_deref(), Some("client-id"));
    assert_eq!(record.client_secret.as_deref(), Some("client-secret"));
    assert_eq!(
        record.redirect_uri.as_deref(),
        Some("http://localhost:5000/callback")
    );
    assert_eq!(record.access_token.as_deref(), Some("AT1"));
    assert_eq!(record.refresh_token.as_deref(), Some("RT1"));
    assert_eq!(record.expires_in, Some(3600));

    manager.refresh().await.unwrap();
    let refreshed = manager.store().read().await.unwrap();
    assert_eq!(refreshed.access_token.as_deref(), Some("AT2"));
    assert_eq!(refreshed.refresh_token.as_deref(), Some("RT1"));
    assert_eq!(refreshed.client_id, record.client_id);
    assert_eq!(refreshed.client_secret, record.client_secret);
    assert_eq!(refreshed.redirect_uri, record.redirect_uri);
    assert_eq!(refreshed.expires_in, Some(3600));

    let calls = manager.client().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["code:abc123", "refresh:RT1"]);
}

#[tokio::test]
async fn test_authorization_records_issuance_time() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    let mock = MockSpotify::default().on_code(Ok(token("AT1", Some("RT1"), 3600)));
    let manager = manager(&path, mock);

    let before = chrono::Utc::now().timestamp() as u64;
    let record = manager.complete_authorization("abc123").await.unwrap();

    let obtained_at = record.obtained_at.unwrap();
    assert!(obtained_at >= before);
    assert_eq!(record.expires_at(), Some(obtained_at + 3600));
    assert_eq!(record.is_expired(obtained_at), Some(false));
    assert_eq!(record.is_expired(obtained_at + 3600), Some(true));
}

#[tokio::test]
async fn test_authorization_without_code_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    let manager = manager(&path, MockSpotify::default());

    let result = manager.complete_authorization("").await;

    assert!(matches!(result, Err(LifecycleError::MissingCode)));
    assert!(manager.client().calls.lock().unwrap().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_failed_authorization_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"custom":"value"}"#);

    let rejection = UpstreamError::Rejected {
        status: 400,
        body: json!({"error": "invalid_grant", "error_description": "Invalid authorization code"}),
    };
    let manager = manager(&path, MockSpotify::default().on_code(Err(rejection.clone())));

    match manager.complete_authorization("expired").await {
        Err(LifecycleError::Upstream(e)) => assert_eq!(e, rejection),
        other => panic!("expected upstream error, got {other:?}"),
    }

    let raw = manager.store().read_raw().await.unwrap();
    assert_eq!(Value::Object(raw), json!({"custom": "value"}));
}

#[tokio::test]
async fn test_refresh_without_refresh_token_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, "{}");
    let manager = manager(&path, MockSpotify::default());

    let result = manager.refresh().await;

    assert!(matches!(result, Err(LifecycleError::NotAuthorized)));
    assert!(manager.client().calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_without_store_file_fails() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir.path().join("database.json"), MockSpotify::default());

    assert!(matches!(
        manager.refresh().await,
        Err(LifecycleError::NotAuthorized)
    ));
}

#[tokio::test]
async fn test_refresh_with_corrupt_store_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, "{");
    let manager = manager(&path, MockSpotify::default());

    assert!(matches!(
        manager.refresh().await,
        Err(LifecycleError::Store(_))
    ));
}

#[tokio::test]
async fn test_refresh_after_store_reset_does_not_reuse_old_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    let manager = manager(
        &path,
        MockSpotify::default().on_code(Ok(token("AT1", Some("RT1"), 3600))),
    );

    manager.complete_authorization("abc").await.unwrap();
    seed(&path, "{}");

    assert!(matches!(
        manager.refresh().await,
        Err(LifecycleError::NotAuthorized)
    ));
    assert!(matches!(
        manager.currently_playing().await,
        Err(LifecycleError::NotAuthorized)
    ));
    assert_eq!(manager.session().await, Default::default());

    let calls = manager.client().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["code:abc"]);
}

#[tokio::test]
async fn test_refresh_after_store_file_removed_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    let manager = manager(
        &path,
        MockSpotify::default().on_code(Ok(token("AT1", Some("RT1"), 3600))),
    );

    manager.complete_authorization("abc").await.unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        manager.refresh().await,
        Err(LifecycleError::NotAuthorized)
    ));
    let calls = manager.client().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["code:abc"]);
}

#[tokio::test]
async fn test_refresh_with_refresh_token_only_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"refresh_token":"RT1"}"#);
    let manager = manager(
        &path,
        MockSpotify::default().on_refresh(Ok(token("AT2", None, 3600))),
    );

    manager.refresh().await.unwrap();

    let record = manager.store().read().await.unwrap();
    assert_eq!(record.access_token.as_deref(), Some("AT2"));
    assert_eq!(record.refresh_token.as_deref(), Some("RT1"));
    let calls = manager.client().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["refresh:RT1"]);
}

#[tokio::test]
async fn test_refresh_twice_overwrites_access_token_each_time() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(
        &path,
        r#"{"client_id":"cid","client_secret":"secret","redirect_uri":"uri",
            "access_token":"AT1","refresh_token":"RT1","expires_in":3600}"#,
    );
    let mock = MockSpotify::default()
        .on_refresh(Ok(token("AT2", None, 3500)))
        .on_refresh(Ok(token("AT3", None, 3400)));
    let manager = manager(&path, mock);

    manager.refresh().await.unwrap();
    let first = manager.store().read().await.unwrap();
    manager.refresh().await.unwrap();
    let second = manager.store().read().await.unwrap();

    assert_eq!(first.access_token.as_deref(), Some("AT2"));
    assert_eq!(first.expires_in, Some(3500));
    assert_eq!(second.access_token.as_deref(), Some("AT3"));
    assert_eq!(second.expires_in, Some(3400));
    for record in [&first, &second] {
        assert_eq!(record.client_id.as_deref(), Some("cid"));
        assert_eq!(record.client_secret.as_deref(), Some("secret"));
        assert_eq!(record.redirect_uri.as_deref(), Some("uri"));
        assert_eq!(record.refresh_token.as_deref(), Some("RT1"));
    }

    let calls = manager.client().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["refresh:RT1", "refresh:RT1"]);
}

#[tokio::test]
async fn test_refresh_stores_rotated_refresh_token() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"access_token":"AT1","refresh_token":"RT1"}"#);
    let manager = manager(
        &path,
        MockSpotify::default().on_refresh(Ok(token("AT2", Some("RT2"), 3600))),
    );

    manager.refresh().await.unwrap();

    let record = manager.store().read().await.unwrap();
    assert_eq!(record.refresh_token.as_deref(), Some("RT2"));
    let session = manager.session().await;
    assert_eq!(session.access_token.as_deref(), Some("AT2"));
    assert_eq!(session.refresh_token.as_deref(), Some("RT2"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_stale_credentials() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    let seeded = r#"{"access_token":"AT1","refresh_token":"RT1","expires_in":3600}"#;
    seed(&path, seeded);
    let manager = manager(
        &path,
        MockSpotify::default().on_refresh(Err(UpstreamError::Transport("timed out".into()))),
    );

    assert!(matches!(
        manager.refresh().await,
        Err(LifecycleError::Upstream(UpstreamError::Transport(_)))
    ));

    let record = manager.store().read().await.unwrap();
    assert_eq!(record.access_token.as_deref(), Some("AT1"));
    assert_eq!(record.refresh_token.as_deref(), Some("RT1"));
}

#[tokio::test]
async fn test_currently_playing_returns_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"access_token":"AT1","refresh_token":"RT1"}"#);
    let manager = manager(&path, MockSpotify::default().on_playing(Ok(playing_track())));

    match manager.currently_playing().await.unwrap() {
        NowPlaying::Playing(track) => {
            assert_eq!(track.id.as_deref(), Some("track-1"));
            assert_eq!(track.name, "Song");
            assert_eq!(
                track.href.as_deref(),
                Some("https://open.spotify.com/track/track-1")
            );
            assert_eq!(track.artists, vec![json!({"name": "Artist"})]);
            assert_eq!(track.album, json!({"name": "Album"}));
            assert!(track.is_playing);
        }
        NowPlaying::Empty => panic!("expected a playing track"),
    }

    let calls = manager.client().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["playing:AT1"]);
}

#[tokio::test]
async fn test_currently_playing_without_item_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"access_token":"AT1","refresh_token":"RT1"}"#);
    let manager = manager(
        &path,
        MockSpotify::default().on_playing(Ok(CurrentlyPlaying {
            item: None,
            is_playing: false,
        })),
    );

    assert_eq!(manager.currently_playing().await.unwrap(), NowPlaying::Empty);
}

#[tokio::test]
async fn test_currently_playing_relays_upstream_rejection_without_refreshing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"access_token":"expired","refresh_token":"RT1"}"#);
    let rejection = UpstreamError::Rejected {
        status: 401,
        body: json!({"error": {"status": 401, "message": "The access token expired"}}),
    };
    let manager = manager(
        &path,
        MockSpotify::default().on_playing(Err(rejection.clone())),
    );

    match manager.currently_playing().await {
        Err(LifecycleError::Upstream(e)) => assert_eq!(e, rejection),
        other => panic!("expected upstream error, got {other:?}"),
    }

    let calls = manager.client().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["playing:expired"]);
}

#[tokio::test]
async fn test_currently_playing_uses_latest_stored_token() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"access_token":"AT1","refresh_token":"RT1"}"#);
    let manager = manager(
        &path,
        MockSpotify::default()
            .on_playing(Ok(CurrentlyPlaying::default()))
            .on_playing(Ok(CurrentlyPlaying::default())),
    );

    manager.currently_playing().await.unwrap();
    // another writer replaced the token on disk
    seed(&path, r#"{"access_token":"AT9","refresh_token":"RT1"}"#);
    manager.currently_playing().await.unwrap();

    let calls = manager.client().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["playing:AT1", "playing:AT9"]);
}

#[tokio::test]
async fn test_scheduled_refresh_swallows_failures() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"access_token":"AT1","refresh_token":"RT1"}"#);
    let manager = manager(
        &path,
        MockSpotify::default().on_refresh(Err(UpstreamError::Rejected {
            status: 400,
            body: json!({"error": "invalid_grant"}),
        })),
    );

    nowplaying::schedule::run_refresh(&manager).await;

    let record = manager.store().read().await.unwrap();
    assert_eq!(record.access_token.as_deref(), Some("AT1"));
}

#[tokio::test]
async fn test_scheduled_refresh_applies_new_token() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.json");
    seed(&path, r#"{"access_token":"AT1","refresh_token":"RT1"}"#);
    let manager = manager(
        &path,
        MockSpotify::default().on_refresh(Ok(token("AT2", None, 3600))),
    );

    nowplaying::schedule::run_refresh(&manager).await;

    let record = manager.store().read().await.unwrap();
    assert_eq!(record.access_token.as_deref(), Some("AT2"));
}
