use super::checks;
use crate::errors::AccessDenied;
use crate::policy::AccessPolicy;
use crate::principal::Principal;
use crate::request::RequestContext;
use crate::route::RouteRequirement;

pub(crate) fn decide_impl(
    policy: &AccessPolicy,
    principal: Option<&Principal>,
    requirement: &RouteRequirement,
    request: &RequestContext,
) -> Result<(), AccessDenied> {
    let principal = principal.ok_or(AccessDenied::NotAuthenticated)?;

    checks::check_permissions_impl(principal, requirement)?;
    checks::check_role_restrictions_impl(policy, principal, request)?;
    checks::check_center_isolation_impl(policy, principal, request)?;

    Ok(())
}
