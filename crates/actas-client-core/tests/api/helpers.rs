use actas_client_core::{Client, CredentialStore, SessionState};
use actas_shared::{
    errors::ApiError,
    token::CredentialPair,
    user::{BasicUserProfile, DashboardVariant, Role},
};
use actas_test_helper::TestUser;

pub use actas_test_helper::{no_cb, TestApp};

pub async fn spawn_app() -> TestApp<Client> {
    spawn_app_with_role(Role::Other("FREE".to_string())).await
}

pub async fn spawn_app_with_role(role: Role) -> TestApp<Client> {
    actas_test_helper::spawn_app(TestUser::generate(role), |address| {
        Client::new(address, SessionState::hydrate(CredentialStore::in_memory()))
    })
    .await
}

pub trait TestAppExt {
    async fn login(&self) -> anyhow::Result<DashboardVariant>;

    /// Puts a valid session straight into the client without going through
    /// the login endpoint
    fn start_session(&self) -> CredentialPair;

    fn session(&self) -> &SessionState;
}

impl TestAppExt for TestApp<Client> {
    async fn login(&self) -> anyhow::Result<DashboardVariant> {
        self.core_client
            .login(self.test_user.login_args(), no_cb)
            .await
            .expect("failed to receive on rx")
    }

    fn start_session(&self) -> CredentialPair {
        let credentials = self.backend.issue_credentials();
        let profile = BasicUserProfile {
            id: self.test_user.id.clone(),
            name: self.test_user.name.clone(),
            role: self.test_user.role.clone(),
        };
        self.session().login(credentials.clone(), profile);
        credentials
    }

    fn session(&self) -> &SessionState {
        self.core_client.session()
    }
}

pub fn bearer(credentials: &CredentialPair) -> Option<String> {
    Some(credentials.access_token.bearer_header_value())
}

/// Panics if the error was not caused by an [`ApiError`]
pub fn api_error(err: &anyhow::Error) -> &ApiError {
    err.downcast_ref::<ApiError>()
        .unwrap_or_else(|| panic!("expected an ApiError but got: {err:?}"))
}
