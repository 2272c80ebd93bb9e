//! A stand-in for the real backend with just enough behaviour to exercise the
//! session handling of the clients. Every knob the tests need is on
//! [`BackendState`]

use std::{
    collections::HashSet,
    net::TcpListener,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use actas_shared::{
    acta::{Acta, ActaStatus},
    req_args::{ActaLookupReqArgs, RefreshReqArgs},
    token::CredentialPair,
    user::{BasicUserProfile, LoginResponse},
};
use actix_web::{
    dev::Server,
    http::{header::AUTHORIZATION, StatusCode},
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use anyhow::Context as _;
use chrono::NaiveDate;
use tracing::info;
use tracing_actix_web::TracingLogger;
use uuid::Uuid;

use crate::TestUser;

pub const MSG_INVALID_CREDENTIALS: &str = "invalid email or password";
pub const MSG_REFRESH_REJECTED: &str = "refresh token rejected";
const MSG_TOKEN_EXPIRED: &str = "access token expired";

#[derive(Debug)]
pub struct BackendState {
    user: TestUser,
    access_tokens: Mutex<HashSet<String>>,
    refresh_tokens: Mutex<HashSet<String>>,
    refresh_calls: AtomicUsize,
    actas_calls: AtomicUsize,
    authorization_headers: Mutex<Vec<Option<String>>>,
    reject_refresh: AtomicBool,
    reject_all_access: AtomicBool,
    forced_actas_status: Mutex<Option<u16>>,
}

impl BackendState {
    pub fn new(user: &TestUser) -> Self {
        Self {
            user: user.clone(),
            access_tokens: Default::default(),
            refresh_tokens: Default::default(),
            refresh_calls: Default::default(),
            actas_calls: Default::default(),
            authorization_headers: Default::default(),
            reject_refresh: Default::default(),
            reject_all_access: Default::default(),
            forced_actas_status: Default::default(),
        }
    }

    /// Registers and returns a fresh valid pair, as a login would
    pub fn issue_credentials(&self) -> CredentialPair {
        let access = format!("access-{}", Uuid::new_v4());
        let refresh = format!("refresh-{}", Uuid::new_v4());
        self.access_tokens
            .lock()
            .expect("mutex poisoned")
            .insert(access.clone());
        self.refresh_tokens
            .lock()
            .expect("mutex poisoned")
            .insert(refresh.clone());
        CredentialPair::new(access, refresh)
    }

    /// Every access token issued so far stops being accepted
    pub fn expire_access_tokens(&self) {
        self.access_tokens.lock().expect("mutex poisoned").clear();
    }

    pub fn reject_refresh(&self) {
        self.reject_refresh.store(true, Ordering::SeqCst);
    }

    /// Even freshly refreshed tokens get a 401
    pub fn reject_all_access(&self) {
        self.reject_all_access.store(true, Ordering::SeqCst);
    }

    /// Every request to the actas endpoints gets `status` regardless of the
    /// token presented
    pub fn force_actas_status(&self, status: u16) {
        *self.forced_actas_status.lock().expect("mutex poisoned") = Some(status);
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn actas_calls(&self) -> usize {
        self.actas_calls.load(Ordering::SeqCst)
    }

    /// The `Authorization` header of every request to the actas endpoints in
    /// the order received
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        self.authorization_headers
            .lock()
            .expect("mutex poisoned")
            .clone()
    }

    pub fn is_access_token_valid(&self, token: &str) -> bool {
        self.access_tokens
            .lock()
            .expect("mutex poisoned")
            .contains(token)
    }

    /// Returns the error response if the request may not see protected data
    fn check_access(&self, req: &HttpRequest) -> Option<HttpResponse> {
        self.actas_calls.fetch_add(1, Ordering::SeqCst);
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorization_headers
            .lock()
            .expect("mutex poisoned")
            .push(header.clone());

        if let Some(status) = *self.forced_actas_status.lock().expect("mutex poisoned") {
            let status = StatusCode::from_u16(status).expect("tests only force valid codes");
            return Some(HttpResponse::build(status).body(format!("forced status {status}")));
        }
        let is_valid = header
            .as_deref()
            .and_then(|h| h.strip_prefix("Bearer "))
            .is_some_and(|token| self.is_access_token_valid(token));
        if self.reject_all_access.load(Ordering::SeqCst) || !is_valid {
            return Some(HttpResponse::Unauthorized().body(MSG_TOKEN_EXPIRED));
        }
        None
    }
}

pub fn sample_actas() -> Vec<Acta> {
    let acta = |id: u64, folio: &str, status, day| Acta {
        id: id.into(),
        folio: folio.to_string().try_into().expect("valid folio"),
        entity_name: "Ayuntamiento de Tlaquepaque".to_string(),
        delivering_official: "Luis Pérez".to_string(),
        receiving_official: "Marta Díaz".to_string(),
        delivery_date: NaiveDate::from_ymd_opt(2024, 10, day).expect("valid date"),
        status,
    };
    vec![
        acta(1, "AE-2024-001", ActaStatus::Signed, 1),
        acta(2, "AE-2024-002", ActaStatus::InReview, 15),
        acta(3, "AE-2024-003", ActaStatus::Draft, 30),
    ]
}

#[derive(serde::Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(body: web::Json<LoginBody>, state: web::Data<BackendState>) -> HttpResponse {
    let user = &state.user;
    if body.email != user.email || body.password != user.password {
        return HttpResponse::Unauthorized().body(MSG_INVALID_CREDENTIALS);
    }
    let response = LoginResponse {
        credentials: state.issue_credentials(),
        user: BasicUserProfile {
            id: user.id.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        },
    };
    HttpResponse::Ok().json(response)
}

async fn refresh(body: web::Json<RefreshReqArgs>, state: web::Data<BackendState>) -> HttpResponse {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let presented = body.refresh_token.as_str().to_string();
    // Rotation: a refresh token is only good once
    let was_known = state
        .refresh_tokens
        .lock()
        .expect("mutex poisoned")
        .remove(&presented);
    if state.reject_refresh.load(Ordering::SeqCst) || !was_known {
        return HttpResponse::Unauthorized().body(MSG_REFRESH_REJECTED);
    }
    info!("refresh token exchanged");
    HttpResponse::Ok().json(state.issue_credentials())
}

async fn list_actas(req: HttpRequest, state: web::Data<BackendState>) -> HttpResponse {
    if let Some(denied) = state.check_access(&req) {
        return denied;
    }
    HttpResponse::Ok().json(sample_actas())
}

async fn acta_lookup(
    req: HttpRequest,
    args: web::Query<ActaLookupReqArgs>,
    state: web::Data<BackendState>,
) -> HttpResponse {
    if let Some(denied) = state.check_access(&req) {
        return denied;
    }
    match sample_actas().into_iter().find(|a| a.id == args.id) {
        Some(acta) => HttpResponse::Ok().json(acta),
        None => HttpResponse::NotFound().body("acta not found"),
    }
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub(crate) fn build_server(
    listener: TcpListener,
    state: Arc<BackendState>,
) -> anyhow::Result<Server> {
    let state = web::Data::from(state);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/auth/login", web::post().to(login))
            .route("/auth/refresh", web::post().to(refresh))
            .route("/actas", web::get().to(list_actas))
            .route("/actas/lookup", web::get().to(acta_lookup))
            .app_data(state.clone())
    })
    .workers(1)
    .listen(listener)
    .context("failed to listen on provided listener")?
    .run();
    Ok(server)
}
