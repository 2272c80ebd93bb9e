use crate::helpers::{api_error, no_cb, spawn_app, spawn_app_with_role, TestAppExt};
use actas_client_core::{GuardView, Navigator, RouteGuard};
use actas_shared::{
    const_config::route::{ROUTE_DASHBOARD_PRO, ROUTE_LOGIN},
    user::{DashboardVariant, Role},
};
use actas_test_helper::MSG_INVALID_CREDENTIALS;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingNavigator {
    redirects: Mutex<Vec<&'static str>>,
}

impl Navigator for RecordingNavigator {
    fn replace(&self, route: &'static str) {
        self.redirects.lock().unwrap().push(route);
    }
}

#[tokio::test]
async fn login_failure_invalid_password() {
    // Arrange
    let app = spawn_app().await;
    let login_args = app
        .test_user
        .login_args()
        .password("random-password".to_string().into());

    // Act
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    let err = outcome.unwrap_err();
    assert_eq!(api_error(&err).status().as_u16(), 401);
    assert_eq!(err.to_string(), MSG_INVALID_CREDENTIALS);
    assert!(!app.core_client.is_logged_in());
    assert_eq!(
        app.backend.refresh_calls(),
        0,
        "login is not part of the refresh flow"
    );
}

#[tokio::test]
async fn login_stores_session() {
    // Arrange
    let app = spawn_app().await;
    let store = app.session().store();
    assert!(!store.get_is_authenticated());

    // Act
    let variant = app.login().await.unwrap();

    // Assert
    assert_eq!(variant, DashboardVariant::Express);
    assert!(app.core_client.is_logged_in());
    assert!(store.get_is_authenticated());
    assert_eq!(
        store.get_basic_user_data().unwrap().role,
        app.test_user.role
    );
    let access_token = app.session().access_token().unwrap();
    assert!(app.backend.is_access_token_valid(access_token.as_str()));
}

#[tokio::test]
async fn pro_user_is_sent_to_pro_dashboard() {
    // Arrange
    let app = spawn_app_with_role(Role::PaidPro).await;
    let navigator = RecordingNavigator::default();

    // Act
    let variant = app.login().await.unwrap();
    let mut login_page_guard = RouteGuard::auth_page();
    let view = login_page_guard.mount(&app.session().store(), &navigator);

    // Assert
    assert_eq!(variant, DashboardVariant::Pro);
    assert_eq!(view, GuardView::Placeholder);
    assert_eq!(*navigator.redirects.lock().unwrap(), vec![ROUTE_DASHBOARD_PRO]);
}

#[tokio::test]
async fn login_logout_round_trip() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    let actas = app.core_client.list_actas(no_cb).await.unwrap();
    assert!(actas.is_ok(), "should be able to read actas after login");

    // Act
    app.core_client.logout();

    // Assert
    assert!(!app.core_client.is_logged_in());
    assert!(app.core_client.user_info().is_none());
    let err = app.core_client.list_actas(no_cb).await.unwrap().unwrap_err();
    assert!(api_error(&err).is_unauthorized());
    assert_eq!(app.backend.refresh_calls(), 0);

    let navigator = RecordingNavigator::default();
    RouteGuard::protected().mount(&app.session().store(), &navigator);
    assert_eq!(*navigator.redirects.lock().unwrap(), vec![ROUTE_LOGIN]);
}

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;
    let outcome = app.core_client.health_check(no_cb).await.unwrap();
    assert!(outcome.is_ok(), "{outcome:?}");
}
