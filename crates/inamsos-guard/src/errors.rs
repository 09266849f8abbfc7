//! Error types for access decisions and policy loading.

use crate::principal::{Permission, Role};
use crate::route::HttpMethod;
use std::collections::BTreeSet;
use thiserror::Error;

/// Stable machine-readable reason codes attached to denials.
pub mod reason_codes {
    pub const A_NOT_AUTHENTICATED: &str = "A_NOT_AUTHENTICATED";
    pub const A_INSUFFICIENT_PERMISSIONS: &str = "A_INSUFFICIENT_PERMISSIONS";
    pub const A_ROLE_NOT_AUTHORIZED: &str = "A_ROLE_NOT_AUTHORIZED";
    pub const A_CROSS_CENTER: &str = "A_CROSS_CENTER";
}

/// Sentinel rendered in place of an empty permission set.
pub const NO_PERMISSIONS: &str = "none";

/// A denied access decision.
///
/// Every variant maps to HTTP 403. The `Display` impl is the reason string
/// returned to the client as `message`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("User not authenticated")]
    NotAuthenticated,

    #[error(
        "Insufficient permissions. Missing: {}. User has: {}",
        render_permissions(.missing),
        render_permissions(.actual)
    )]
    InsufficientPermissions {
        missing: BTreeSet<Permission>,
        actual: BTreeSet<Permission>,
    },

    #[error(
        "Role {role} is not authorized for {method} {path}. Allowed roles: {}",
        render_roles(.allowed)
    )]
    RoleNotAuthorizedForRoute {
        role: Role,
        method: HttpMethod,
        path: String,
        pattern: String,
        allowed: BTreeSet<Role>,
    },

    // Never names either center.
    #[error("Cross-center access denied")]
    CrossCenterAccessDenied,
}

impl AccessDenied {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => reason_codes::A_NOT_AUTHENTICATED,
            Self::InsufficientPermissions { .. } => reason_codes::A_INSUFFICIENT_PERMISSIONS,
            Self::RoleNotAuthorizedForRoute { .. } => reason_codes::A_ROLE_NOT_AUTHORIZED,
            Self::CrossCenterAccessDenied => reason_codes::A_CROSS_CENTER,
        }
    }
}

pub(crate) fn render_permissions(set: &BTreeSet<Permission>) -> String {
    if set.is_empty() {
        return NO_PERMISSIONS.to_string();
    }
    set.iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_roles(set: &BTreeSet<Role>) -> String {
    set.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}

/// Policy/configuration loading errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Failed to read policy file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse policy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown HTTP method '{0}'")]
    UnknownMethod(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Unknown permission '{0}'")]
    UnknownPermission(String),

    #[error("Route pattern must not be empty")]
    EmptyPattern,

    #[error("Invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Route {method} {path} registered more than once")]
    DuplicateRoute { method: HttpMethod, path: String },

    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },
}
