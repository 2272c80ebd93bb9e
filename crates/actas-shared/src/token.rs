//! Opaque credentials issued by the backend
//!
//! Neither token type prints its value when debug formatted so they are safe
//! to pass through `tracing::instrument`

use std::fmt::Debug;

macro_rules! opaque_token {
    ($name:ident) => {
        #[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("len", &self.0.len())
                    .finish()
            }
        }
    };
}

opaque_token!(AccessToken);
opaque_token!(RefreshToken);

impl AccessToken {
    /// Value to use for the `Authorization` header
    pub fn bearer_header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

/// Both tokens returned by a successful login or refresh
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl CredentialPair {
    pub fn new<A: Into<AccessToken>, R: Into<RefreshToken>>(access: A, refresh: R) -> Self {
        Self {
            access_token: access.into(),
            refresh_token: refresh.into(),
        }
    }
}
