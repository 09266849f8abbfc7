//! Per-request context handed to the guard by the HTTP layer.

use crate::route::HttpMethod;
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Parameter name carrying the tenant (center) a request targets.
pub const CENTER_ID_PARAM: &str = "centerId";

/// Where a target center id was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSource {
    Path,
    Body,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterClaim {
    pub center_id: String,
    pub source: ParamSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub method: HttpMethod,
    /// Request path; role restrictions and exemptions match against it.
    pub route_path: String,
    /// Route template the router matched (`/patients/:id`), when known.
    pub route_template: Option<String>,
    pub path_params: BTreeMap<String, String>,
    pub body: Value,
    pub query_params: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new(method: HttpMethod, route_path: impl Into<String>) -> Self {
        Self {
            method,
            route_path: route_path.into(),
            route_template: None,
            path_params: BTreeMap::new(),
            body: Value::Null,
            query_params: BTreeMap::new(),
        }
    }

    pub fn with_route_template(mut self, template: impl Into<String>) -> Self {
        self.route_template = Some(template.into());
        self
    }

    /// Key for the route requirement lookup: the template if the router
    /// supplied one, else the path itself.
    pub fn route_key(&self) -> &str {
        self.route_template.as_deref().unwrap_or(&self.route_path)
    }

    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Center the request claims to act on.
    ///
    /// Sources are consulted in order path, body, query; the first non-empty
    /// `centerId` wins. Body values may be strings or numbers.
    pub fn target_center(&self) -> Option<CenterClaim> {
        let from_map = |map: &BTreeMap<String, String>| {
            map.get(CENTER_ID_PARAM)
                .filter(|v| !v.is_empty())
                .cloned()
        };

        if let Some(center_id) = from_map(&self.path_params) {
            return Some(CenterClaim {
                center_id,
                source: ParamSource::Path,
            });
        }
        if let Some(center_id) = body_center_id(&self.body) {
            return Some(CenterClaim {
                center_id,
                source: ParamSource::Body,
            });
        }
        from_map(&self.query_params).map(|center_id| CenterClaim {
            center_id,
            source: ParamSource::Query,
        })
    }
}

fn body_center_id(body: &Value) -> Option<String> {
    match body.get(CENTER_ID_PARAM)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(render_center_number(n)),
        _ => None,
    }
}

/// `1.0` and `1` name the same center.
fn render_center_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_center_anywhere() {
        let req = RequestContext::new(HttpMethod::Get, "/patients");
        assert_eq!(req.target_center(), None);
    }

    #[test]
    fn test_path_beats_body_beats_query() {
        let req = RequestContext::new(HttpMethod::Put, "/centers/:centerId")
            .with_path_param("centerId", "P")
            .with_body(json!({ "centerId": "B" }))
            .with_query_param("centerId", "Q");
        assert_eq!(
            req.target_center(),
            Some(CenterClaim {
                center_id: "P".into(),
                source: ParamSource::Path
            })
        );

        let req = RequestContext::new(HttpMethod::Put, "/patients")
            .with_body(json!({ "centerId": "B" }))
            .with_query_param("centerId", "Q");
        assert_eq!(req.target_center().unwrap().source, ParamSource::Body);

        let req = RequestContext::new(HttpMethod::Get, "/patients")
            .with_query_param("centerId", "Q");
        assert_eq!(req.target_center().unwrap().center_id, "Q");
    }

    #[test]
    fn test_empty_values_fall_through() {
        let req = RequestContext::new(HttpMethod::Post, "/patients")
            .with_path_param("centerId", "")
            .with_body(json!({ "centerId": "" }))
            .with_query_param("centerId", "Q");
        assert_eq!(req.target_center().unwrap().source, ParamSource::Query);
    }

    #[test]
    fn test_numeric_body_center() {
        let req = RequestContext::new(HttpMethod::Post, "/patients")
            .with_body(json!({ "centerId": 17 }));
        assert_eq!(req.target_center().unwrap().center_id, "17");
    }

    #[test]
    fn test_integral_float_body_center_matches_integer() {
        let req = RequestContext::new(HttpMethod::Post, "/patients")
            .with_body(json!({ "centerId": 1.0 }));
        assert_eq!(req.target_center().unwrap().center_id, "1");

        let req = RequestContext::new(HttpMethod::Post, "/patients")
            .with_body(json!({ "centerId": -3.0 }));
        assert_eq!(req.target_center().unwrap().center_id, "-3");

        let req = RequestContext::new(HttpMethod::Post, "/patients")
            .with_body(json!({ "centerId": 1.5 }));
        assert_eq!(req.target_center().unwrap().center_id, "1.5");
    }

    #[test]
    fn test_route_key_prefers_template() {
        let req = RequestContext::new(HttpMethod::Get, "/patients/55");
        assert_eq!(req.route_key(), "/patients/55");

        let req = req.with_route_template("/patients/:id");
        assert_eq!(req.route_key(), "/patients/:id");
        assert_eq!(req.route_path, "/patients/55");
    }

    #[test]
    fn test_non_object_body_ignored() {
        let req = RequestContext::new(HttpMethod::Post, "/patients")
            .with_body(json!(["centerId", "X"]));
        assert_eq!(req.target_center(), None);
    }
}
