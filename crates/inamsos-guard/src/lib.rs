//! Access control for the INAMSOS registry API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         HTTP layer                               │
//! │  ┌──────────────┐    ┌──────────────┐    ┌────────────────────┐  │
//! │  │ Auth (token) │───▶│ AccessGuard  │───▶│ Route handler      │  │
//! │  └──────────────┘    └──────┬───────┘    └────────────────────┘  │
//! │                             │ deny → 403 {"message": ...}        │
//! │              ┌──────────────┼──────────────┐                     │
//! │      ┌───────▼──────┐ ┌─────▼──────┐ ┌─────▼──────────┐          │
//! │      │ RouteTable   │ │ decide()   │ │ AccessPolicy   │          │
//! │      │ (perms/route)│ │ (pure)     │ │ (roles, exempt)│          │
//! │      └──────────────┘ └────────────┘ └────────────────┘          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`engine::decide`] applies, in order: permission coverage, role
//! restrictions by method and route pattern, and center (tenant) isolation.

pub mod config;
pub mod engine;
pub mod errors;
pub mod guard;
pub mod policy;
pub mod principal;
pub mod request;
pub mod route;

pub use config::{GuardConfig, MergeMode};
pub use engine::{decide, DecisionEngine};
pub use errors::{reason_codes, AccessDenied, PolicyError};
pub use guard::{AccessGuard, ForbiddenResponse, Verdict};
pub use policy::{AccessPolicy, PolicyFile, ReadOnlyExemptions, RoleRestrictionTable, RoleRule};
pub use principal::{Permission, Principal, PrincipalClaims, Role};
pub use request::{CenterClaim, ParamSource, RequestContext, CENTER_ID_PARAM};
pub use route::{HttpMethod, RoutePattern, RouteRequirement, RouteTable, RouteTableBuilder};
