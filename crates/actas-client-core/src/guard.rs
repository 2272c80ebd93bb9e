//! Decides whether a page may render based on the persisted credentials
//!
//! A guard starts in [`GuardState::Checking`] and makes exactly one decision
//! the first time it is mounted. After that it stays where it is, a new
//! decision needs a new guard (a remount of the page).

use actas_shared::{
    const_config::route::{ROUTE_LOGIN, ROUTE_REGISTER},
    user::{BasicUserProfile, DashboardVariant},
};
use tracing::{info, instrument};

use crate::store::CredentialStore;

/// Client side navigation as provided by the UI framework
pub trait Navigator {
    /// Replace the current location with `route`
    fn replace(&self, route: &'static str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    /// A redirect was issued, the placeholder stays up until the navigation
    /// unmounts the page
    Redirecting {
        target: &'static str,
    },
    /// Protected page with a stored session
    Authenticated,
    /// Auth page (login/register) without a stored session
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    Placeholder,
    Children,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Pages that need a session, everybody else goes to the login page
    Protected,
    /// Login and register. Users with a session go to their dashboard
    AuthPage,
}

#[derive(Debug)]
pub struct RouteGuard {
    kind: GuardKind,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(kind: GuardKind) -> Self {
        Self {
            kind,
            state: GuardState::Checking,
        }
    }

    pub fn protected() -> Self {
        Self::new(GuardKind::Protected)
    }

    pub fn auth_page() -> Self {
        Self::new(GuardKind::AuthPage)
    }

    /// Login and register get the reverse guard, every other page is
    /// protected
    pub fn for_route(route: &str) -> Self {
        if [ROUTE_LOGIN, ROUTE_REGISTER].contains(&route) {
            Self::auth_page()
        } else {
            Self::protected()
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn view(&self) -> GuardView {
        match self.state {
            GuardState::Checking | GuardState::Redirecting { .. } => GuardView::Placeholder,
            GuardState::Authenticated | GuardState::Anonymous => GuardView::Children,
        }
    }

    /// Reads the stored session synchronously and, the first time only,
    /// transitions out of [`GuardState::Checking`] issuing at most one
    /// redirect. Later calls just report the current view
    #[instrument(skip(store, navigator))]
    pub fn mount<N: Navigator + ?Sized>(
        &mut self,
        store: &CredentialStore,
        navigator: &N,
    ) -> GuardView {
        if self.state == GuardState::Checking {
            self.state = decide(self.kind, store);
            if let GuardState::Redirecting { target } = self.state {
                info!(?target, "redirecting");
                navigator.replace(target);
            }
        }
        self.view()
    }
}

fn decide(kind: GuardKind, store: &CredentialStore) -> GuardState {
    let is_authenticated = store.get_is_authenticated();
    match (kind, is_authenticated) {
        (GuardKind::Protected, true) => GuardState::Authenticated,
        (GuardKind::Protected, false) => GuardState::Redirecting {
            target: ROUTE_LOGIN,
        },
        (GuardKind::AuthPage, true) => GuardState::Redirecting {
            target: dashboard_route(store.get_basic_user_data().as_ref()),
        },
        (GuardKind::AuthPage, false) => GuardState::Anonymous,
    }
}

/// Users without a readable profile get the default dashboard
pub fn dashboard_route(profile: Option<&BasicUserProfile>) -> &'static str {
    profile
        .map(BasicUserProfile::dashboard_variant)
        .unwrap_or(DashboardVariant::Express)
        .route()
}
