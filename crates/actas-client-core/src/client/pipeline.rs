//! The two stages wrapped around every request to a protected endpoint
//!
//! - Request stage ([`attach_bearer`]): add `Bearer <access token>` unless the
//!   request already carries an `Authorization` header.
//! - Response stage ([`Client::handle_response`]): on 401, and only once per
//!   request, exchange the refresh token for a new pair and resend the request
//!   with the new access token. If there is no refresh token, or the exchange
//!   fails, the session is ended.
//!
//! Simultaneous requests that all get a 401 each run their own refresh. They
//! are not coalesced into a single exchange.

use actas_shared::{
    const_config::path::PATH_AUTH_REFRESH,
    errors::ApiError,
    req_args::RefreshReqArgs,
    token::{AccessToken, CredentialPair, RefreshToken},
};
use anyhow::{bail, Context as _};
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Request, Response, StatusCode,
};
use tracing::{debug, instrument, warn};

use crate::Client;

/// Leaves requests that already have an `Authorization` header untouched
pub(super) fn attach_bearer(
    request: &mut Request,
    access_token: Option<&AccessToken>,
) -> anyhow::Result<()> {
    if request.headers().contains_key(AUTHORIZATION) {
        debug!("explicit authorization header kept");
        return Ok(());
    }
    if let Some(token) = access_token {
        set_bearer(request, token)?;
    }
    Ok(())
}

fn set_bearer(request: &mut Request, token: &AccessToken) -> anyhow::Result<()> {
    let mut value = HeaderValue::from_str(&token.bearer_header_value())
        .context("access token is not a valid header value")?;
    value.set_sensitive(true);
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}

/// Tracks the single retry a request is allowed
#[derive(Debug)]
pub(super) struct Attempt {
    /// Copy of the original request kept for the retry. `None` once used (or
    /// if the body could not be cloned)
    retry_copy: Option<Request>,
    retried: bool,
}

impl Attempt {
    pub(super) fn new(request: &Request) -> Self {
        Self {
            retry_copy: request.try_clone(),
            retried: false,
        }
    }

    /// Returns `false` if the retry was already used
    fn mark_retried(&mut self) -> bool {
        !std::mem::replace(&mut self.retried, true)
    }

    fn take_copy(&mut self) -> Option<Request> {
        self.retry_copy.take()
    }
}

impl Client {
    /// A 401 that is not recovered is returned as a normal response so it
    /// reaches the caller as the original error
    #[instrument(skip(self, response))]
    pub(super) async fn handle_response(
        &self,
        response: reqwest::Result<Response>,
        mut attempt: Attempt,
    ) -> anyhow::Result<Response> {
        let mut response = response.context("failed to send request")?;
        loop {
            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }
            if !attempt.mark_retried() {
                debug!("401 after retry, giving up");
                return Ok(response);
            }
            let Some(refresh_token) = self.session.refresh_token() else {
                warn!("401 without a refresh token, ending session");
                self.session.logout();
                return Ok(response);
            };
            let credentials = match self.refresh(refresh_token).await {
                Ok(credentials) => credentials,
                Err(e) => {
                    warn!("refresh failed, ending session: {e:?}");
                    self.session.logout();
                    return Err(e);
                }
            };
            let access_token = credentials.access_token.clone();
            self.session.set_tokens(credentials);
            let Some(mut retry) = attempt.take_copy() else {
                warn!("request body cannot be resent, returning the original response");
                return Ok(response);
            };
            set_bearer(&mut retry, &access_token)?;
            debug!("resending request with refreshed token");
            response = self
                .api_client
                .execute(retry)
                .await
                .context("failed to resend request after refresh")?;
        }
    }

    #[instrument(skip(self), err(Debug))]
    async fn refresh(&self, refresh_token: RefreshToken) -> anyhow::Result<CredentialPair> {
        let args = RefreshReqArgs { refresh_token };
        let response = self
            .api_client
            .request(
                PATH_AUTH_REFRESH.method,
                self.path_to_url(PATH_AUTH_REFRESH.path),
            )
            .json(&args)
            .send()
            .await
            .context("failed to send refresh request")?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RefreshFailed { status, body }.into());
        }
        let credentials: CredentialPair = response
            .json()
            .await
            .context("failed to parse refresh response as json")?;
        if credentials.access_token.is_empty() || credentials.refresh_token.is_empty() {
            bail!("refresh response did not include both tokens");
        }
        Ok(credentials)
    }
}
