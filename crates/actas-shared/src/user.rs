//! The minimal user profile cached next to the credentials

use crate::{
    const_config::route::{ROUTE_DASHBOARD, ROUTE_DASHBOARD_PRO},
    token::CredentialPair,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Role as sent by the backend. Only the paid tier changes client behaviour so
/// every other value is kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    PaidPro,
    Other(String),
}

impl Role {
    pub const PAID_PRO: &'static str = "PAID_PRO";

    pub fn is_paid_pro(&self) -> bool {
        matches!(self, Self::PaidPro)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == Self::PAID_PRO {
            Self::PaidPro
        } else {
            Self::Other(value)
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::PaidPro => Role::PAID_PRO.to_string(),
            Role::Other(s) => s,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::PaidPro => write!(f, "{}", Self::PAID_PRO),
            Role::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Which dashboard (and navigation set) a user gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum DashboardVariant {
    Express,
    Pro,
}

impl DashboardVariant {
    pub fn route(&self) -> &'static str {
        match self {
            DashboardVariant::Express => ROUTE_DASHBOARD,
            DashboardVariant::Pro => ROUTE_DASHBOARD_PRO,
        }
    }
}

impl From<&Role> for DashboardVariant {
    fn from(value: &Role) -> Self {
        if value.is_paid_pro() {
            Self::Pro
        } else {
            Self::Express
        }
    }
}

/// Stored under `BasicUserData`. The backend may send more fields, they are
/// ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicUserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
}

impl BasicUserProfile {
    pub fn dashboard_variant(&self) -> DashboardVariant {
        (&self.role).into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub credentials: CredentialPair,
    pub user: BasicUserProfile,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::paid_pro("PAID_PRO", DashboardVariant::Pro, ROUTE_DASHBOARD_PRO)]
    #[case::free("FREE", DashboardVariant::Express, ROUTE_DASHBOARD)]
    #[case::lower_case_is_not_pro("paid_pro", DashboardVariant::Express, ROUTE_DASHBOARD)]
    #[case::empty("", DashboardVariant::Express, ROUTE_DASHBOARD)]
    fn role_selects_dashboard(
        #[case] role: &str,
        #[case] expected: DashboardVariant,
        #[case] route: &str,
    ) {
        // Arrange
        let json = format!(r#"{{"id":"7","name":"Ana","role":"{role}"}}"#);

        // Act
        let profile: BasicUserProfile = serde_json::from_str(&json).unwrap();

        // Assert
        assert_eq!(profile.dashboard_variant(), expected);
        assert_eq!(profile.dashboard_variant().route(), route);
    }

    #[test]
    fn profile_only_needs_role() {
        let profile: BasicUserProfile = serde_json::from_str(r#"{"role":"PAID_PRO"}"#).unwrap();
        assert_eq!(profile.role, Role::PaidPro);
        assert!(profile.name.is_empty());
    }

    #[test]
    fn role_keeps_unknown_values() {
        let json = serde_json::to_string(&Role::Other("EXPRESS".into())).unwrap();
        assert_eq!(json, r#""EXPRESS""#);
    }

    #[test]
    fn login_response_reads_flat_tokens() {
        let body = r#"{"accessToken":"a","refreshToken":"r","user":{"id":"1","name":"Ana","role":"PAID_PRO","email":"a@b.c"}}"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.credentials, CredentialPair::new("a", "r"));
        assert_eq!(response.user.dashboard_variant(), DashboardVariant::Pro);
    }
}
