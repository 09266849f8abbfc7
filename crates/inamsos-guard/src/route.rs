//! HTTP methods, wildcard route patterns and per-route permission requirements.

use crate::errors::PolicyError;
use crate::principal::Permission;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = PolicyError;

    /// Method tokens arrive in whatever case the HTTP layer hands over.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PolicyError::UnknownMethod(s.to_string()))
    }
}

/// A route path template where `*` matches any run of characters
/// (including `/`). All other characters match literally and the whole
/// path must match.
///
/// `/research/*` matches `/research/abc` and `/research/123/approve` but not
/// `/research`.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
}

impl RoutePattern {
    pub fn new(pattern: &str) -> Result<Self, PolicyError> {
        if pattern.is_empty() {
            return Err(PolicyError::EmptyPattern);
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^{body}$")).map_err(|source| {
            PolicyError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RoutePattern {}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Permissions a route handler declares. Empty means "authenticated only".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequirement {
    #[serde(default)]
    pub required_permissions: BTreeSet<Permission>,
}

impl RouteRequirement {
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            required_permissions: permissions.into_iter().collect(),
        }
    }

    pub fn none() -> &'static RouteRequirement {
        static EMPTY: RouteRequirement = RouteRequirement {
            required_permissions: BTreeSet::new(),
        };
        &EMPTY
    }

    pub fn is_empty(&self) -> bool {
        self.required_permissions.is_empty()
    }
}

/// Route identifier: method plus the route template the router matched.
pub type RouteKey = (HttpMethod, String);

/// Whether a concrete path fits a route template segment by segment.
/// `:name` segments match any single non-empty segment.
fn template_matches(template: &str, path: &str) -> bool {
    let mut template = template.split('/');
    let mut path = path.split('/');
    loop {
        match (template.next(), path.next()) {
            (None, None) => return true,
            (Some(t), Some(p)) if t.starts_with(':') => {
                if p.is_empty() {
                    return false;
                }
            }
            (Some(t), Some(p)) if t == p => {}
            _ => return false,
        }
    }
}

fn literal_segments(template: &str) -> usize {
    template.split('/').filter(|s| !s.starts_with(':')).count()
}

/// Startup-built registry of route requirements.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<RouteKey, RouteRequirement>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Requirement for a route template or a concrete path.
    ///
    /// An exact template key wins. Otherwise the registered template that
    /// fits `path` with the most literal segments applies, so `/patients/55`
    /// resolves to `/patients/:id`. Paths no template fits require nothing.
    pub fn requirement(&self, method: HttpMethod, path: &str) -> &RouteRequirement {
        if let Some(requirement) = self.routes.get(&(method, path.to_string())) {
            return requirement;
        }
        self.routes
            .iter()
            .filter(|((m, template), _)| *m == method && template_matches(template, path))
            .max_by_key(|((_, template), _)| literal_segments(template))
            .map(|(_, requirement)| requirement)
            .unwrap_or(RouteRequirement::none())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouteKey, &RouteRequirement)> {
        self.routes.iter()
    }
}

#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    entries: Vec<(RouteKey, RouteRequirement)>,
}

impl RouteTableBuilder {
    pub fn route(
        mut self,
        method: HttpMethod,
        path: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.entries
            .push(((method, path.into()), RouteRequirement::new(permissions)));
        self
    }

    pub fn build(self) -> Result<RouteTable, PolicyError> {
        let mut routes = BTreeMap::new();
        for (key, requirement) in self.entries {
            if routes.contains_key(&key) {
                return Err(PolicyError::DuplicateRoute {
                    method: key.0,
                    path: key.1,
                });
            }
            routes.insert(key, requirement);
        }
        Ok(RouteTable { routes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(p: &str) -> RoutePattern {
        RoutePattern::new(p).unwrap()
    }

    #[test]
    fn test_wildcard_requires_trailing_segment() {
        let p = pat("/research/*");
        assert!(p.matches("/research/123/approve"));
        assert!(p.matches("/research/abc"));
        assert!(!p.matches("/research"));
    }

    #[test]
    fn test_pattern_is_anchored_both_ends() {
        let p = pat("/patients/*");
        assert!(!p.matches("/api/patients/1"));
        assert!(p.matches("/patients/1"));

        let exact = pat("/users");
        assert!(exact.matches("/users"));
        assert!(!exact.matches("/users/"));
        assert!(!exact.matches("/users2"));
    }

    #[test]
    fn test_pattern_literals_are_not_regex() {
        let p = pat("/reports/v1.0/*");
        assert!(p.matches("/reports/v1.0/x"));
        assert!(!p.matches("/reports/v1x0/x"));

        let q = pat("/search?(q)*");
        assert!(q.matches("/search?(q)=1"));
        assert!(!q.matches("/searc(q)=1"));
    }

    #[test]
    fn test_pattern_is_case_sensitive() {
        assert!(!pat("/Patients/*").matches("/patients/1"));
    }

    #[test]
    fn test_inner_wildcard() {
        let p = pat("/research/*/approve");
        assert!(p.matches("/research/42/approve"));
        assert!(p.matches("/research/a/b/approve"));
        assert!(!p.matches("/research/42/reject"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(matches!(RoutePattern::new(""), Err(PolicyError::EmptyPattern)));
    }

    #[test]
    fn test_method_parse_ignores_case() {
        assert_eq!("delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert!(matches!(
            "FETCH".parse::<HttpMethod>(),
            Err(PolicyError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_route_table_lookup_and_default() {
        let table = RouteTable::builder()
            .route(HttpMethod::Get, "/patients/:id", [Permission::PatientRead])
            .build()
            .unwrap();

        assert_eq!(
            table.requirement(HttpMethod::Get, "/patients/:id"),
            &RouteRequirement::new([Permission::PatientRead])
        );
        assert!(table.requirement(HttpMethod::Delete, "/patients/:id").is_empty());
        assert!(table.requirement(HttpMethod::Get, "/unknown").is_empty());
    }

    #[test]
    fn test_concrete_path_resolves_to_template() {
        let table = RouteTable::builder()
            .route(HttpMethod::Delete, "/patients/:id", [Permission::PatientDelete])
            .route(HttpMethod::Get, "/patients/:id", [Permission::PatientRead])
            .route(HttpMethod::Post, "/research/:id/:action", [Permission::ResearchWrite])
            .route(HttpMethod::Post, "/research/:id/approve", [Permission::ResearchApprove])
            .build()
            .unwrap();

        assert_eq!(
            table.requirement(HttpMethod::Delete, "/patients/55"),
            &RouteRequirement::new([Permission::PatientDelete])
        );
        assert_eq!(
            table.requirement(HttpMethod::Get, "/patients/55"),
            &RouteRequirement::new([Permission::PatientRead])
        );
        // Literal segments beat parameters.
        assert_eq!(
            table.requirement(HttpMethod::Post, "/research/7/approve"),
            &RouteRequirement::new([Permission::ResearchApprove])
        );
        assert_eq!(
            table.requirement(HttpMethod::Post, "/research/7/close"),
            &RouteRequirement::new([Permission::ResearchWrite])
        );
        assert!(table.requirement(HttpMethod::Delete, "/patients/").is_empty());
        assert!(table.requirement(HttpMethod::Delete, "/patients/55/x").is_empty());
        assert!(table.requirement(HttpMethod::Put, "/patients/55").is_empty());
    }

    #[test]
    fn test_route_table_rejects_duplicates() {
        let result = RouteTable::builder()
            .route(HttpMethod::Get, "/patients", [Permission::PatientRead])
            .route(HttpMethod::Get, "/patients", [Permission::PatientWrite])
            .build();
        assert!(matches!(result, Err(PolicyError::DuplicateRoute { .. })));
    }
}
