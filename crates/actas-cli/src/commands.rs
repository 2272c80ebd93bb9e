use std::sync::Mutex;

use actas_client_core::{Client, CredentialStore, GuardView, Navigator, RouteGuard, SessionState};
use actas_shared::{
    acta::Acta,
    const_config::route::{ROUTE_DASHBOARD, ROUTE_LOGIN},
    req_args::LoginReqArgs,
};
use anyhow::Context as _;
use tracing::{info, instrument};

use crate::{cli::Command, configuration::Configuration};

/// Nothing to render in a terminal, remembers where the guard wanted to go so
/// the command can tell the user
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    target: Mutex<Option<&'static str>>,
}

impl TerminalNavigator {
    pub fn target(&self) -> Option<&'static str> {
        *self.target.lock().expect("mutex poisoned")
    }
}

impl Navigator for TerminalNavigator {
    fn replace(&self, route: &'static str) {
        info!(?route, "navigation requested");
        *self.target.lock().expect("mutex poisoned") = Some(route);
    }
}

fn no_cb() {}

#[instrument(skip(configuration))]
pub async fn run(command: Command, configuration: &Configuration) -> anyhow::Result<()> {
    let store = CredentialStore::file(configuration.storage_path.clone())
        .context("failed to open session storage")?;
    let session = SessionState::hydrate(store.clone());
    let client = Client::new(configuration.base_url.clone(), session);

    match command {
        Command::Login { email, password } => {
            let navigator = TerminalNavigator::default();
            let view = RouteGuard::for_route(ROUTE_LOGIN).mount(&store, &navigator);
            if view == GuardView::Placeholder {
                println!(
                    "Already logged in. Dashboard: {}",
                    navigator.target().unwrap_or_default()
                );
                return Ok(());
            }
            let variant = client
                .login(LoginReqArgs::new(email, password), no_cb)
                .await
                .context("login request was canceled")??;
            println!("Logged in. Dashboard: {} ({variant})", variant.route());
        }
        Command::Logout => {
            client.logout();
            println!("Logged out");
        }
        Command::Status => {
            let navigator = TerminalNavigator::default();
            match RouteGuard::for_route(ROUTE_DASHBOARD).mount(&store, &navigator) {
                GuardView::Children => {
                    let user = client.user_info();
                    let name = user.as_ref().map(|u| u.name.as_str()).unwrap_or("unknown");
                    let role = user
                        .as_ref()
                        .map(|u| u.role.to_string())
                        .unwrap_or_default();
                    let route = actas_client_core::guard::dashboard_route(user.as_ref());
                    println!("Logged in as {name} ({role}). Dashboard: {route}");
                }
                GuardView::Placeholder => {
                    println!(
                        "Not logged in. Go to {}",
                        navigator.target().unwrap_or_default()
                    );
                }
            }
        }
        Command::Actas => {
            let actas = client
                .list_actas(no_cb)
                .await
                .context("request was canceled")??;
            print_actas(&actas);
        }
        Command::Acta { id } => {
            let acta = client
                .get_acta(id.into(), no_cb)
                .await
                .context("request was canceled")??;
            print_actas(std::slice::from_ref(&acta));
        }
        Command::Health => {
            client
                .health_check(no_cb)
                .await
                .context("request was canceled")??;
            println!("Backend at {} is up", client.server_address());
        }
    }
    Ok(())
}

fn print_actas(actas: &[Acta]) {
    for line in format_actas(actas) {
        println!("{line}");
    }
}

fn format_actas(actas: &[Acta]) -> Vec<String> {
    let mut result = vec![format!(
        "{:>5}  {:<12}  {:<10}  {:<10}  {}",
        "ID", "FOLIO", "FECHA", "ESTADO", "ENTIDAD"
    )];
    result.extend(actas.iter().map(|acta| {
        format!(
            "{:>5}  {:<12}  {:<10}  {:<10}  {}",
            acta.id,
            &*acta.folio,
            acta.delivery_date,
            acta.status,
            acta.entity_name
        )
    }));
    result
}
