//! Access decision engine.
//!
//! Flow (short-circuits on the first failure):
//! 0. Principal present
//! 1. Required permissions ⊆ principal permissions
//! 2. Role admitted by every role rule matching method + route path
//! 3. Center isolation, unless the role is global; cross-center GETs on
//!    read-only exempt routes pass
//!
//! The engine is a pure function of its arguments: no I/O, no logging, no
//! shared state. Logging belongs to [`crate::guard::AccessGuard`].

use crate::errors::AccessDenied;
use crate::policy::AccessPolicy;
use crate::principal::Principal;
use crate::request::RequestContext;
use crate::route::RouteRequirement;

#[path = "engine_internal/mod.rs"]
mod engine_internal;

/// Decide whether `principal` may perform `request` on a route declaring
/// `requirement`.
pub fn decide(
    policy: &AccessPolicy,
    principal: Option<&Principal>,
    requirement: &RouteRequirement,
    request: &RequestContext,
) -> Result<(), AccessDenied> {
    engine_internal::run::decide_impl(policy, principal, requirement, request)
}

/// Stateless engine bound to one policy.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine<'a> {
    policy: &'a AccessPolicy,
}

impl<'a> DecisionEngine<'a> {
    pub fn new(policy: &'a AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn decide(
        &self,
        principal: Option<&Principal>,
        requirement: &RouteRequirement,
        request: &RequestContext,
    ) -> Result<(), AccessDenied> {
        decide(self.policy, principal, requirement, request)
    }

    pub fn check_permissions(
        &self,
        principal: &Principal,
        requirement: &RouteRequirement,
    ) -> Result<(), AccessDenied> {
        engine_internal::checks::check_permissions_impl(principal, requirement)
    }

    pub fn check_role_restrictions(
        &self,
        principal: &Principal,
        request: &RequestContext,
    ) -> Result<(), AccessDenied> {
        engine_internal::checks::check_role_restrictions_impl(self.policy, principal, request)
    }

    pub fn check_center_isolation(
        &self,
        principal: &Principal,
        request: &RequestContext,
    ) -> Result<(), AccessDenied> {
        engine_internal::checks::check_center_isolation_impl(self.policy, principal, request)
    }
}
