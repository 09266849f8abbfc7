use crate::errors::AccessDenied;
use crate::policy::AccessPolicy;
use crate::principal::{Permission, Principal};
use crate::request::RequestContext;
use crate::route::{HttpMethod, RouteRequirement};
use std::collections::BTreeSet;

pub(crate) fn check_permissions_impl(
    principal: &Principal,
    requirement: &RouteRequirement,
) -> Result<(), AccessDenied> {
    let missing: BTreeSet<Permission> = requirement
        .required_permissions
        .difference(&principal.permissions)
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(AccessDenied::InsufficientPermissions {
            missing,
            actual: principal.permissions.clone(),
        });
    }
    Ok(())
}

pub(crate) fn check_role_restrictions_impl(
    policy: &AccessPolicy,
    principal: &Principal,
    request: &RequestContext,
) -> Result<(), AccessDenied> {
    let Some(rules) = policy.role_restrictions.rules_for(request.method) else {
        return Ok(());
    };

    for rule in rules {
        if rule.pattern.matches(&request.route_path) && !rule.allowed.contains(&principal.role) {
            return Err(AccessDenied::RoleNotAuthorizedForRoute {
                role: principal.role,
                method: request.method,
                path: request.route_path.clone(),
                pattern: rule.pattern.as_str().to_string(),
                allowed: rule.allowed.clone(),
            });
        }
    }
    Ok(())
}

pub(crate) fn check_center_isolation_impl(
    policy: &AccessPolicy,
    principal: &Principal,
    request: &RequestContext,
) -> Result<(), AccessDenied> {
    if principal.role.is_global() {
        return Ok(());
    }

    let Some(target) = request.target_center() else {
        return Ok(());
    };

    if principal.center_id.as_deref() == Some(target.center_id.as_str()) {
        return Ok(());
    }

    if request.method == HttpMethod::Get
        && policy.read_only_exemptions.exempts(&request.route_path)
    {
        return Ok(());
    }

    Err(AccessDenied::CrossCenterAccessDenied)
}
