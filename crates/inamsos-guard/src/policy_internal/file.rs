use super::super::{AccessPolicy, PolicyFile, ReadOnlyExemptions, RoleRestrictionTable};
use crate::errors::PolicyError;
use crate::principal::{Permission, Role};
use crate::route::{HttpMethod, RouteTable};
use serde::Deserialize;
use std::collections::BTreeMap;

/// On-disk shape. Names stay as strings here so unknown values surface as
/// typed `PolicyError`s instead of generic YAML errors.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicyFile {
    #[serde(default)]
    role_restrictions: BTreeMap<String, serde_yaml::Mapping>,

    #[serde(default)]
    read_only_exemptions: Vec<String>,

    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRoute {
    method: String,
    path: String,
    #[serde(default)]
    permissions: Vec<String>,
}

pub(crate) fn parse_policy_file_impl(yaml: &str) -> Result<PolicyFile, PolicyError> {
    // An empty document deserializes to unit, not to a map.
    let raw: RawPolicyFile = if yaml.trim().is_empty() {
        RawPolicyFile::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    let mut role_restrictions = RoleRestrictionTable::new();
    for (method, rules) in raw.role_restrictions {
        let method: HttpMethod = method.parse()?;
        // serde_yaml::Mapping keeps document order.
        for (pattern, roles) in rules {
            let pattern: String = serde_yaml::from_value(pattern)?;
            let roles: Vec<String> = serde_yaml::from_value(roles)?;
            let roles = roles
                .iter()
                .map(|r| r.parse::<Role>())
                .collect::<Result<Vec<_>, _>>()?;
            role_restrictions.restrict(method, &pattern, roles)?;
        }
    }

    let mut read_only_exemptions = ReadOnlyExemptions::default();
    for pattern in &raw.read_only_exemptions {
        read_only_exemptions.push(pattern)?;
    }

    let mut routes = RouteTable::builder();
    for route in raw.routes {
        let method: HttpMethod = route.method.parse()?;
        let permissions = route
            .permissions
            .iter()
            .map(|p| p.parse::<Permission>())
            .collect::<Result<Vec<_>, _>>()?;
        routes = routes.route(method, route.path, permissions);
    }

    Ok(PolicyFile {
        policy: AccessPolicy {
            role_restrictions,
            read_only_exemptions,
        },
        routes: routes.build()?,
    })
}
