#![warn(unused_crate_dependencies)]

use actas_shared::{
    req_args::LoginReqArgs,
    telemetry::{self, get_subscriber, init_subscriber},
    user::Role,
};
use anyhow::Context;
use std::fmt::Debug;
use std::net::TcpListener;
use std::ops::Deref;
use std::sync::{Arc, LazyLock};
use uuid::Uuid;

mod backend;

pub use backend::{sample_actas, BackendState, MSG_INVALID_CREDENTIALS, MSG_REFRESH_REJECTED};

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

pub struct TestApp<C> {
    pub address: String,
    pub backend: Arc<BackendState>,
    pub test_user: TestUser,
    pub core_client: C,
}

impl<C> Debug for TestApp<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .field("test_user", &self.test_user)
            .finish()
    }
}

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

pub fn port_to_test_address(application_port: u16) -> String {
    format!("http://127.0.0.1:{application_port}")
}

/// Starts a mock backend on a random port with one registered user and builds
/// the client under test pointed at it
///
/// Must be called from inside a tokio runtime
pub async fn spawn_app<C, F>(test_user: TestUser, build_client: F) -> TestApp<C>
where
    F: FnOnce(String) -> C,
{
    start_tracing();
    let backend = Arc::new(BackendState::new(&test_user));
    let application_port = start_backend_in_background(Arc::clone(&backend))
        .expect("failed to start mock backend");
    let address = port_to_test_address(application_port);
    let core_client = build_client(address.clone());
    TestApp {
        address,
        backend,
        test_user,
        core_client,
    }
}

fn start_backend_in_background(backend: Arc<BackendState>) -> anyhow::Result<u16> {
    // Use a random OS port
    let listener = TcpListener::bind("127.0.0.1:0").context("failed to bind random port")?;
    let application_port = listener
        .local_addr()
        .context("failed to get local address")?
        .port();
    let server = backend::build_server(listener, backend)?;
    // Detached so the server keeps running for the rest of the test
    tokio::spawn(server);
    Ok(application_port)
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl TestUser {
    pub fn generate(role: Role) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            email: format!("user-{}@actas.test", &id[..8]),
            name: "Usuario de Prueba".to_string(),
            password: Uuid::new_v4().to_string(),
            id,
            role,
        }
    }

    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(self.email.clone(), self.password.clone().into())
    }
}
