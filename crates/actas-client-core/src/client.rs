use actas_shared::{
    const_config::{
        client::CLIENT_DEFAULT_BASE_URL,
        path::{PathSpec, PATH_AUTH_LOGIN, PATH_HEALTH_CHECK},
    },
    errors::ApiError,
    req_args::LoginReqArgs,
    user::{BasicUserProfile, DashboardVariant, LoginResponse},
};
use anyhow::Context;
use closure_traits::{AuthCallBack, ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use reqwest::{header::HeaderMap, StatusCode};
use secrecy::ExposeSecret as _;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::session::SessionState;

pub mod api;
mod pipeline;

pub const DUMMY_ARGUMENT: &[(&str, &str)] = &[("", "")];

/// Talks to the backend on behalf of one [`SessionState`]
///
/// Requests to protected endpoints carry the session's access token and
/// transparently refresh it once if the server answers 401
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    inner: Arc<Mutex<ClientInner>>,
    session: SessionState,
}

#[derive(Debug)]
struct ClientInner {
    server_address: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(CLIENT_DEFAULT_BASE_URL.to_string(), SessionState::default())
    }
}

impl ClientInner {
    #[tracing::instrument]
    fn new(server_address: String) -> Self {
        let server_address = server_address.trim_end_matches('/').to_string();
        Self { server_address }
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE")]
    pub fn new(server_address: String, session: SessionState) -> Self {
        let api_client = reqwest::Client::builder()
            .build()
            .expect("Unable to create reqwest client");
        Self {
            api_client,
            inner: Arc::new(Mutex::new(ClientInner::new(server_address))),
            session,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn server_address(&self) -> String {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .server_address
            .clone()
    }

    /// On success the session holds the new tokens and profile and the
    /// dashboard the user should land on is returned
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<DashboardVariant>> {
        let (tx, rx) = oneshot::channel();
        let args = serde_json::json!({
            "email": args.email,
            "password": args.password.expose_secret(),
        });
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_login(resp.context("failed to send request"), client).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };

        self.initiate_request(PATH_AUTH_LOGIN, &args, on_done);
        rx
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn health_check<F>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>>
    where
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_empty(resp.context("failed to send request")).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(PATH_HEALTH_CHECK, &DUMMY_ARGUMENT, on_done);
        rx
    }

    /// Sends a request to an endpoint that requires a session and parses a
    /// json body. `headers` are added as is, an `Authorization` header in
    /// there takes the place of the session's token for the first attempt
    #[tracing::instrument(skip(args, headers, ui_notify))]
    pub fn send_json_request<F, T, U>(
        &self,
        path_spec: PathSpec,
        args: &T,
        headers: HeaderMap,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        T: serde::Serialize + Debug,
        F: UiCallBack,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: anyhow::Result<reqwest::Response>| async {
            let msg = process_json_body(resp).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_authenticated_request(path_spec, args, headers, on_done);
        rx
    }

    fn request_builder<T>(&self, path_spec: PathSpec, args: &T) -> reqwest::RequestBuilder
    where
        T: serde::Serialize + Debug,
    {
        let is_get_method = path_spec.is_get();
        let request = self
            .api_client
            .request(path_spec.method, self.path_to_url(path_spec.path));
        if is_get_method {
            request.query(&args)
        } else {
            request.json(&args)
        }
    }

    /// For endpoints that do not need a session (login, refresh, health)
    #[tracing::instrument(skip(args, on_done))]
    // WARNING: Must skip args as it my contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(&self, path_spec: PathSpec, args: &T, on_done: F)
    where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let request = self.request_builder(path_spec, args);
        reqwest_cross::fetch(request, on_done)
    }

    /// For endpoints that need a session. See [`pipeline`] for the stages
    #[tracing::instrument(skip(args, headers, on_done))]
    fn initiate_authenticated_request<T, F, O>(
        &self,
        path_spec: PathSpec,
        args: &T,
        headers: HeaderMap,
        on_done: F,
    ) where
        T: serde::Serialize + Debug,
        F: AuthCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let request = self.request_builder(path_spec, args).build();
        let mut request = match request.context("failed to build request") {
            Ok(request) => request,
            Err(e) => {
                // Completes without suspending as there is no response to read
                futures::executor::block_on(on_done(Err(e)));
                return;
            }
        };
        request.headers_mut().extend(headers);
        if let Err(e) = pipeline::attach_bearer(&mut request, self.session.access_token().as_ref())
        {
            futures::executor::block_on(on_done(Err(e)));
            return;
        }
        let attempt = pipeline::Attempt::new(&request);
        let client = self.clone();
        let on_response = move |resp: reqwest::Result<reqwest::Response>| async move {
            let result = client.handle_response(resp, attempt).await;
            on_done(result).await;
        };
        reqwest_cross::fetch(
            reqwest::RequestBuilder::from_parts(self.api_client.clone(), request),
            on_response,
        );
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!(
            "{}{path}",
            &self
                .inner
                .lock()
                .expect("failed to unlock client mutex")
                .server_address
        )
    }

    pub fn user_info(&self) -> Option<BasicUserProfile> {
        self.session.user()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_authenticated()
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_empty(response: anyhow::Result<reqwest::Response>) -> anyhow::Result<()> {
    let (response, status) = extract_response(response)?;
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(handle_error(response).await)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_json_body<T>(response: anyhow::Result<reqwest::Response>) -> anyhow::Result<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    match status {
        StatusCode::OK => Ok(response
            .json()
            .await
            .context("failed to parse result as json")?),
        _ => Err(handle_error(response).await),
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_login(
    response: anyhow::Result<reqwest::Response>,
    client: Client,
) -> anyhow::Result<DashboardVariant> {
    let (response, status) = extract_response(response)?;
    match status {
        StatusCode::OK => {
            let login_response: LoginResponse = response
                .json()
                .await
                .context("failed to parse result as json")?;
            let variant = login_response.user.dashboard_variant();
            client
                .session
                .login(login_response.credentials, login_response.user);
            Ok(variant)
        }
        _ => Err(handle_error(response).await),
    }
}

#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let body = response.text().await.unwrap_or_default();
    ApiError::Status { status, body }.into()
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: anyhow::Result<reqwest::Response>,
) -> anyhow::Result<(reqwest::Response, StatusCode)> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    /// Receives the final outcome of the authenticated pipeline (after any
    /// refresh and retry)
    pub trait AuthCallBack<O>:
        'static + Send + FnOnce(anyhow::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> AuthCallBack<O> for T where
        T: 'static + Send + FnOnce(anyhow::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait AuthCallBack<O>: 'static + FnOnce(anyhow::Result<reqwest::Response>) -> O {}
    impl<T, O> AuthCallBack<O> for T where
        T: 'static + FnOnce(anyhow::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
