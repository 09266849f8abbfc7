//! Authenticated principal and the closed role/permission vocabulary.

use crate::errors::PolicyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Coarse-grained user category used for route-level restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// System administrator.
    Admin,
    NationalAdmin,
    CenterAdmin,
    Doctor,
    Nurse,
    DataEntry,
    Researcher,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Self::Admin,
        Self::NationalAdmin,
        Self::CenterAdmin,
        Self::Doctor,
        Self::Nurse,
        Self::DataEntry,
        Self::Researcher,
        Self::Viewer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::NationalAdmin => "NATIONAL_ADMIN",
            Self::CenterAdmin => "CENTER_ADMIN",
            Self::Doctor => "DOCTOR",
            Self::Nurse => "NURSE",
            Self::DataEntry => "DATA_ENTRY",
            Self::Researcher => "RESEARCHER",
            Self::Viewer => "VIEWER",
        }
    }

    /// Global roles see every center's data; center isolation does not apply.
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Admin | Self::NationalAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| PolicyError::UnknownRole(s.to_string()))
    }
}

/// Atomic capability a principal may hold.
///
/// Declaration order is the rendering order in denial messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    PatientRead,
    PatientWrite,
    PatientDelete,
    CenterRead,
    CenterWrite,
    ResearchRead,
    ResearchWrite,
    ResearchApprove,
    ReportRead,
    ReportWrite,
    ReportExport,
    AnalyticsRead,
    UserRead,
    UserWrite,
    AuditRead,
    SystemConfig,
    BackupManage,
}

impl Permission {
    pub const ALL: [Permission; 17] = [
        Self::PatientRead,
        Self::PatientWrite,
        Self::PatientDelete,
        Self::CenterRead,
        Self::CenterWrite,
        Self::ResearchRead,
        Self::ResearchWrite,
        Self::ResearchApprove,
        Self::ReportRead,
        Self::ReportWrite,
        Self::ReportExport,
        Self::AnalyticsRead,
        Self::UserRead,
        Self::UserWrite,
        Self::AuditRead,
        Self::SystemConfig,
        Self::BackupManage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientRead => "PATIENT_READ",
            Self::PatientWrite => "PATIENT_WRITE",
            Self::PatientDelete => "PATIENT_DELETE",
            Self::CenterRead => "CENTER_READ",
            Self::CenterWrite => "CENTER_WRITE",
            Self::ResearchRead => "RESEARCH_READ",
            Self::ResearchWrite => "RESEARCH_WRITE",
            Self::ResearchApprove => "RESEARCH_APPROVE",
            Self::ReportRead => "REPORT_READ",
            Self::ReportWrite => "REPORT_WRITE",
            Self::ReportExport => "REPORT_EXPORT",
            Self::AnalyticsRead => "ANALYTICS_READ",
            Self::UserRead => "USER_READ",
            Self::UserWrite => "USER_WRITE",
            Self::AuditRead => "AUDIT_READ",
            Self::SystemConfig => "SYSTEM_CONFIG",
            Self::BackupManage => "BACKUP_MANAGE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PolicyError::UnknownPermission(s.to_string()))
    }
}

/// Identity attached to a request by the upstream authentication step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
    pub center_id: Option<String>,
    pub permissions: BTreeSet<Permission>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            center_id: None,
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_center(mut self, center_id: impl Into<String>) -> Self {
        self.center_id = Some(center_id.into());
        self
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Loosely-typed principal payload as produced by the authentication layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalClaims {
    pub user_id: String,
    pub role: String,
    #[serde(default)]
    pub center_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl TryFrom<PrincipalClaims> for Principal {
    type Error = PolicyError;

    fn try_from(claims: PrincipalClaims) -> Result<Self, Self::Error> {
        let role: Role = claims.role.parse()?;

        let mut permissions = BTreeSet::new();
        for raw in &claims.permissions {
            match raw.parse::<Permission>() {
                Ok(p) => {
                    permissions.insert(p);
                }
                Err(_) => {
                    tracing::warn!(
                        user_id = %claims.user_id,
                        permission = %raw,
                        "dropping unknown permission from principal claims"
                    );
                }
            }
        }

        Ok(Self {
            user_id: claims.user_id,
            role,
            center_id: claims.center_id.filter(|c| !c.is_empty()),
            permissions,
        })
    }
}
