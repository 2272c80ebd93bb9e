use crate::helpers::{api_error, no_cb, spawn_app, TestAppExt};
use actas_shared::acta::ActaStatus;

#[tokio::test]
async fn get_acta_by_id() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();

    // Act
    let acta = app
        .core_client
        .get_acta(2_u64.into(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(&*acta.folio, "AE-2024-002");
    assert_eq!(acta.status, ActaStatus::InReview);
}

#[tokio::test]
async fn missing_acta_is_not_found() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();

    // Act
    let err = app
        .core_client
        .get_acta(99_u64.into(), no_cb)
        .await
        .unwrap()
        .unwrap_err();

    // Assert
    assert_eq!(api_error(&err).status().as_u16(), 404);
    assert_eq!(err.to_string(), "acta not found");
    assert_eq!(app.backend.refresh_calls(), 0);
}

#[tokio::test]
async fn lookup_refreshes_expired_token_too() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    app.backend.expire_access_tokens();

    // Act
    let acta = app.core_client.get_acta(1_u64.into(), no_cb).await.unwrap();

    // Assert
    assert_eq!(acta.unwrap().status, ActaStatus::Signed);
    assert_eq!(app.backend.refresh_calls(), 1);
}
