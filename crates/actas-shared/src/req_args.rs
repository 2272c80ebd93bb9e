//! This module stores the expected format of the arguments for the requests.
//! Some structs are not serializable but are still included here to know what
//! needs to be sent

use crate::{id::DbId, token::RefreshToken};
use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

#[derive(Clone)]
pub struct LoginReqArgs {
    pub email: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(email: S, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReqArgs {
    pub refresh_token: RefreshToken,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ActaLookupReqArgs {
    pub id: DbId,
}
