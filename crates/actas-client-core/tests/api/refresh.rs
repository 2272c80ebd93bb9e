use crate::helpers::{api_error, bearer, no_cb, spawn_app, TestAppExt};
use actas_client_core::{CredentialStore, SessionState};
use actas_shared::{errors::ApiError, user::BasicUserProfile, user::Role};
use actas_test_helper::{sample_actas, MSG_REFRESH_REJECTED};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

#[tokio::test]
async fn expired_access_token_is_refreshed_and_request_retried_once() {
    // Arrange
    let app = spawn_app().await;
    let original = app.start_session();
    app.backend.expire_access_tokens();

    // Act
    let actas = app.core_client.list_actas(no_cb).await.unwrap();

    // Assert - Caller only sees the successful retry
    assert_eq!(actas.unwrap(), sample_actas());
    assert_eq!(app.backend.refresh_calls(), 1);
    assert_eq!(app.backend.actas_calls(), 2);

    // Assert - Retry used the new token which is now in session and store
    let refreshed = app.session().snapshot();
    let new_access = refreshed.access_token.clone().unwrap();
    assert_ne!(new_access, original.access_token);
    assert_ne!(refreshed.refresh_token.unwrap(), original.refresh_token);
    assert_eq!(
        app.backend.authorization_headers(),
        vec![
            bearer(&original),
            Some(new_access.bearer_header_value())
        ]
    );
    assert_eq!(app.session().store().get_access_token(), Some(new_access));
    assert!(refreshed.user.is_some(), "profile survives a refresh");
}

#[tokio::test]
async fn valid_token_does_not_refresh() {
    // Arrange
    let app = spawn_app().await;
    let credentials = app.start_session();

    // Act
    let actas = app.core_client.list_actas(no_cb).await.unwrap();

    // Assert
    assert!(actas.is_ok());
    assert_eq!(app.backend.refresh_calls(), 0);
    assert_eq!(app.backend.authorization_headers(), vec![bearer(&credentials)]);
}

#[tokio::test]
async fn missing_refresh_token_logs_out_without_refreshing() {
    // Arrange - Stored profile and access token but no refresh token
    let store = CredentialStore::in_memory();
    store.set_access_token(&"stale".into());
    store.set_basic_user_data(&BasicUserProfile {
        id: "1".to_string(),
        name: "Ana".to_string(),
        role: Role::PaidPro,
    });
    let app = actas_test_helper::spawn_app(
        actas_test_helper::TestUser::generate(Role::PaidPro),
        |address| actas_client_core::Client::new(address, SessionState::hydrate(store.clone())),
    )
    .await;

    // Act
    let err = app.core_client.list_actas(no_cb).await.unwrap().unwrap_err();

    // Assert - Original 401 comes back and the storage was cleared
    assert!(api_error(&err).is_unauthorized());
    assert_eq!(app.backend.refresh_calls(), 0);
    assert_eq!(app.backend.actas_calls(), 1);
    assert!(store.get_access_token().is_none());
    assert!(store.get_basic_user_data().is_none());
}

#[tokio::test]
async fn second_401_is_returned_without_another_refresh() {
    // Arrange
    let app = spawn_app().await;
    app.start_session();
    app.backend.reject_all_access();

    // Act
    let err = app.core_client.list_actas(no_cb).await.unwrap().unwrap_err();

    // Assert
    assert!(matches!(api_error(&err), ApiError::Status { .. }));
    assert!(api_error(&err).is_unauthorized());
    assert_eq!(app.backend.refresh_calls(), 1);
    assert_eq!(app.backend.actas_calls(), 2);
    assert!(
        app.session().is_authenticated(),
        "a rejected retry does not end the session, only a failed refresh does"
    );
}

#[tokio::test]
async fn failed_refresh_logs_out_and_returns_refresh_error() {
    // Arrange
    let app = spawn_app().await;
    app.start_session();
    let logouts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&logouts);
    let watched = app.session().clone();
    app.session().subscribe(move || {
        if !watched.is_authenticated() {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    app.backend.expire_access_tokens();
    app.backend.reject_refresh();

    // Act
    let err = app.core_client.list_actas(no_cb).await.unwrap().unwrap_err();

    // Assert - The refresh error, not the original 401
    match api_error(&err) {
        ApiError::RefreshFailed { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, MSG_REFRESH_REJECTED);
        }
        other => panic!("expected refresh failure but got: {other:?}"),
    }
    assert_eq!(app.backend.refresh_calls(), 1);
    assert_eq!(app.backend.actas_calls(), 1, "no retry after failed refresh");
    assert!(!app.session().is_authenticated());
    assert!(!app.session().store().get_is_authenticated());
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_errors_pass_through_unchanged() {
    // Arrange
    let app = spawn_app().await;
    app.start_session();
    app.backend.force_actas_status(500);

    // Act
    let err = app.core_client.list_actas(no_cb).await.unwrap().unwrap_err();

    // Assert
    assert_eq!(api_error(&err).status().as_u16(), 500);
    assert!(err.to_string().starts_with("forced status 500"), "{err}");
    assert_eq!(app.backend.refresh_calls(), 0);
    assert_eq!(app.backend.actas_calls(), 1);
    assert!(app.session().is_authenticated());
}

#[tokio::test]
async fn explicit_authorization_header_is_not_replaced() {
    // Arrange - Session has no token, the caller brings its own
    let app = spawn_app().await;
    let credentials = app.backend.issue_credentials();
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&credentials.access_token.bearer_header_value()).unwrap(),
    );

    // Act
    let actas: anyhow::Result<Vec<actas_shared::acta::Acta>> = app
        .core_client
        .send_json_request(
            actas_shared::const_config::path::PATH_API_ACTAS,
            &actas_client_core::DUMMY_ARGUMENT,
            headers,
            no_cb,
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(actas.unwrap().len(), 3);
    assert_eq!(app.backend.authorization_headers(), vec![bearer(&credentials)]);
}

#[tokio::test]
async fn no_session_no_authorization_header() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let err = app.core_client.list_actas(no_cb).await.unwrap().unwrap_err();

    // Assert
    assert!(api_error(&err).is_unauthorized());
    assert_eq!(app.backend.authorization_headers(), vec![None]);
    assert_eq!(app.backend.refresh_calls(), 0);
}
