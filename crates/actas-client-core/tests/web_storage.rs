//! Runs only in a browser. From the folder "crates/actas-client-core" run one
//! of the following to execute the tests
//! - `wasm-pack test --headless --firefox`
//! - `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use actas_client_core::{CredentialStore, GuardView, Navigator, RouteGuard, SessionState};
use actas_shared::{
    const_config::route::ROUTE_DASHBOARD_PRO,
    token::CredentialPair,
    user::{BasicUserProfile, Role},
};
use std::cell::RefCell;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Default)]
struct RecordingNavigator {
    redirects: RefCell<Vec<&'static str>>,
}

impl Navigator for RecordingNavigator {
    fn replace(&self, route: &'static str) {
        self.redirects.borrow_mut().push(route);
    }
}

#[wasm_bindgen_test]
fn session_survives_reload() {
    // Arrange
    let store = CredentialStore::browser();
    assert!(!store.is_detached(), "local storage should exist in a browser");
    store.clear_auth_storage();
    let session = SessionState::hydrate(store);
    session.login(
        CredentialPair::new("a", "r"),
        BasicUserProfile {
            id: "1".to_string(),
            name: "Ana".to_string(),
            role: Role::PaidPro,
        },
    );

    // Act - A new store reads the same localStorage as after a page reload
    let reloaded = CredentialStore::browser();
    let navigator = RecordingNavigator::default();
    let view = RouteGuard::auth_page().mount(&reloaded, &navigator);

    // Assert
    assert!(reloaded.get_is_authenticated());
    assert_eq!(view, GuardView::Placeholder);
    assert_eq!(*navigator.redirects.borrow(), vec![ROUTE_DASHBOARD_PRO]);

    reloaded.clear_auth_storage();
    assert!(!reloaded.get_is_authenticated());
}
