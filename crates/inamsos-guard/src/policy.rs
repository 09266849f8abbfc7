//! Static access-policy tables.
//!
//! Two process-wide tables feed the decision engine:
//!
//! - [`RoleRestrictionTable`]: HTTP method → ordered `(pattern, allowed roles)`
//!   rules. Every rule whose pattern matches the route path must admit the
//!   principal's role.
//! - [`ReadOnlyExemptions`]: patterns under which a GET may read another
//!   center's data (aggregate statistics, dashboards).
//!
//! Both use [`RoutePattern`] matching. Tables are built once (either
//! [`AccessPolicy::builtin`] or a YAML file) and never mutated afterwards.

use crate::errors::PolicyError;
use crate::principal::Role;
use crate::route::{HttpMethod, RoutePattern, RouteTable};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[path = "policy_internal/mod.rs"]
mod policy_internal;

/// A single role restriction: requests matching `pattern` need one of `allowed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRule {
    pub pattern: RoutePattern,
    pub allowed: BTreeSet<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRestrictionTable {
    by_method: BTreeMap<HttpMethod, Vec<RoleRule>>,
}

impl RoleRestrictionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule for `method`. Rule order is kept for diagnostics.
    pub fn restrict(
        &mut self,
        method: HttpMethod,
        pattern: &str,
        allowed: impl IntoIterator<Item = Role>,
    ) -> Result<(), PolicyError> {
        let rule = RoleRule {
            pattern: RoutePattern::new(pattern)?,
            allowed: allowed.into_iter().collect(),
        };
        self.by_method.entry(method).or_default().push(rule);
        Ok(())
    }

    /// Rules for `method`, or `None` when the method is unrestricted.
    pub fn rules_for(&self, method: HttpMethod) -> Option<&[RoleRule]> {
        self.by_method.get(&method).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (HttpMethod, &RoleRule)> {
        self.by_method
            .iter()
            .flat_map(|(method, rules)| rules.iter().map(move |r| (*method, r)))
    }

    pub fn len(&self) -> usize {
        self.by_method.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extend(&mut self, other: RoleRestrictionTable) {
        for (method, rules) in other.by_method {
            self.by_method.entry(method).or_default().extend(rules);
        }
    }
}

/// Patterns that allow cross-center GET access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOnlyExemptions {
    patterns: Vec<RoutePattern>,
}

impl ReadOnlyExemptions {
    pub fn new(patterns: &[&str]) -> Result<Self, PolicyError> {
        let patterns = patterns
            .iter()
            .map(|p| RoutePattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn push(&mut self, pattern: &str) -> Result<(), PolicyError> {
        self.patterns.push(RoutePattern::new(pattern)?);
        Ok(())
    }

    pub fn exempts(&self, route_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(route_path))
    }

    pub fn patterns(&self) -> &[RoutePattern] {
        &self.patterns
    }

    pub fn extend(&mut self, other: ReadOnlyExemptions) {
        self.patterns.extend(other.patterns);
    }
}

/// Both static tables, as consumed by the decision engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    pub role_restrictions: RoleRestrictionTable,
    pub read_only_exemptions: ReadOnlyExemptions,
}

impl AccessPolicy {
    /// The INAMSOS default tables.
    pub fn builtin() -> Self {
        policy_internal::builtin::builtin_policy_impl()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, PolicyError> {
        PolicyFile::from_yaml_str(yaml).map(|f| f.policy)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        PolicyFile::from_path(path).map(|f| f.policy)
    }

    /// Appends `other`'s restriction rules and exemptions after this policy's.
    pub fn extend(&mut self, other: AccessPolicy) {
        self.role_restrictions.extend(other.role_restrictions);
        self.read_only_exemptions.extend(other.read_only_exemptions);
    }
}

/// A compiled policy file: access tables plus declared route requirements.
#[derive(Debug, Clone, Default)]
pub struct PolicyFile {
    pub policy: AccessPolicy,
    pub routes: RouteTable,
}

impl PolicyFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PolicyError> {
        policy_internal::file::parse_policy_file_impl(yaml)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}
