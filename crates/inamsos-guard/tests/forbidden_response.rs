use inamsos_guard::{
    AccessDenied, AccessGuard, AccessPolicy, HttpMethod, Permission, Principal, RequestContext,
    Role, RouteTable, Verdict,
};
use serde_json::json;

#[test]
fn denial_maps_to_nest_style_forbidden_body() {
    let response = AccessDenied::CrossCenterAccessDenied.to_response();
    assert_eq!(response.status, 403);
    assert_eq!(
        response.body,
        json!({
            "statusCode": 403,
            "message": "Cross-center access denied",
            "error": "Forbidden"
        })
    );
}

#[test]
fn authorize_returns_response_with_engine_reason() {
    let routes = RouteTable::builder()
        .route(HttpMethod::Get, "/reports", [Permission::ReportRead])
        .build()
        .unwrap();
    let guard = AccessGuard::new(AccessPolicy::builtin(), routes);
    let viewer = Principal::new("u-1", Role::Viewer).with_center("C1");

    let response = guard
        .authorize(Some(&viewer), &RequestContext::new(HttpMethod::Get, "/reports"))
        .unwrap_err();
    assert_eq!(response.status, 403);
    assert_eq!(
        response.body["message"],
        "Insufficient permissions. Missing: REPORT_READ. User has: none"
    );
}

#[test]
fn unauthenticated_body_is_distinct_from_permission_failure() {
    let guard = AccessGuard::new(AccessPolicy::builtin(), RouteTable::default());
    let response = guard
        .authorize(None, &RequestContext::new(HttpMethod::Get, "/reports"))
        .unwrap_err();
    assert_eq!(response.body["message"], "User not authenticated");
}

#[test]
fn verdict_summarises_both_outcomes() {
    let allow = Verdict::from_result(&Ok(()));
    assert!(allow.allowed);
    assert_eq!(allow.reason_code, "OK");

    let deny = Verdict::from_result(&Err(AccessDenied::NotAuthenticated));
    assert!(!deny.allowed);
    assert_eq!(deny.reason_code, "A_NOT_AUTHENTICATED");
    assert_eq!(deny.message, "User not authenticated");

    let round: Verdict = serde_json::from_value(serde_json::to_value(&deny).unwrap()).unwrap();
    assert_eq!(round, deny);
}
