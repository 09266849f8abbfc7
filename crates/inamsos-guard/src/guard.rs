//! HTTP-facing guard: route requirement lookup, engine call, logging and
//! the 403 response shape.

use crate::engine;
use crate::errors::AccessDenied;
use crate::policy::AccessPolicy;
use crate::principal::Principal;
use crate::request::RequestContext;
use crate::route::RouteTable;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const FORBIDDEN_STATUS: u16 = 403;

/// Status and JSON body the HTTP layer sends for a denied request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForbiddenResponse {
    pub status: u16,
    pub body: Value,
}

impl AccessDenied {
    /// Same body shape as a NestJS `ForbiddenException`.
    pub fn to_response(&self) -> ForbiddenResponse {
        ForbiddenResponse {
            status: FORBIDDEN_STATUS,
            body: serde_json::json!({
                "statusCode": FORBIDDEN_STATUS,
                "message": self.to_string(),
                "error": "Forbidden",
            }),
        }
    }
}

/// Serializable summary of one decision, for tooling and audit output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub allowed: bool,
    pub reason_code: String,
    pub message: String,
}

impl Verdict {
    pub const ALLOW_CODE: &'static str = "OK";

    pub fn from_result(result: &Result<(), AccessDenied>) -> Self {
        match result {
            Ok(()) => Self {
                allowed: true,
                reason_code: Self::ALLOW_CODE.to_string(),
                message: String::new(),
            },
            Err(denied) => Self {
                allowed: false,
                reason_code: denied.reason_code().to_string(),
                message: denied.to_string(),
            },
        }
    }
}

/// Guard bound to the process-wide policy and route registry.
///
/// Cheap to clone; both tables are shared read-only.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    policy: Arc<AccessPolicy>,
    routes: Arc<RouteTable>,
}

impl AccessGuard {
    pub fn new(policy: AccessPolicy, routes: RouteTable) -> Self {
        Self {
            policy: Arc::new(policy),
            routes: Arc::new(routes),
        }
    }

    pub fn from_shared(policy: Arc<AccessPolicy>, routes: Arc<RouteTable>) -> Self {
        Self { policy, routes }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn check(
        &self,
        principal: Option<&Principal>,
        request: &RequestContext,
    ) -> Result<(), AccessDenied> {
        let requirement = self.routes.requirement(request.method, request.route_key());
        let result = engine::decide(&self.policy, principal, requirement, request);

        let (user_id, role) = principal
            .map(|p| (p.user_id.as_str(), p.role.as_str()))
            .unwrap_or(("-", "-"));
        match &result {
            Ok(()) => tracing::debug!(
                user_id,
                role,
                method = %request.method,
                path = %request.route_path,
                "access granted"
            ),
            Err(denied) => tracing::warn!(
                user_id,
                role,
                method = %request.method,
                path = %request.route_path,
                reason_code = denied.reason_code(),
                "access denied: {}",
                denied
            ),
        }

        result
    }

    /// Like [`check`](Self::check), but returns the 403 response on denial.
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        request: &RequestContext,
    ) -> Result<(), ForbiddenResponse> {
        self.check(principal, request)
            .map_err(|denied| denied.to_response())
    }
}
