use super::super::{AccessPolicy, ReadOnlyExemptions, RoleRestrictionTable};
use crate::principal::Role::{self, Admin, CenterAdmin, Doctor, NationalAdmin};
use crate::route::HttpMethod::{self, Delete, Get, Patch, Post, Put};

pub(crate) const BUILTIN_ROLE_RESTRICTIONS: &[(HttpMethod, &str, &[Role])] = &[
    (Delete, "/patients/*", &[Admin, NationalAdmin, CenterAdmin, Doctor]),
    (Delete, "/users/*", &[Admin, NationalAdmin]),
    (Delete, "/centers/*", &[Admin, NationalAdmin]),
    (Delete, "/research/*", &[Admin, NationalAdmin, CenterAdmin]),
    (Post, "/users*", &[Admin, NationalAdmin, CenterAdmin]),
    (Post, "/centers*", &[Admin, NationalAdmin]),
    (Post, "/research/*/approve", &[Admin, NationalAdmin]),
    (Post, "/system/*", &[Admin]),
    (Put, "/users/*", &[Admin, NationalAdmin, CenterAdmin]),
    (Put, "/centers/*", &[Admin, NationalAdmin]),
    (Put, "/research/*/approve", &[Admin, NationalAdmin]),
    (Put, "/system/*", &[Admin]),
    (Patch, "/users/*", &[Admin, NationalAdmin, CenterAdmin]),
    (Patch, "/centers/*", &[Admin, NationalAdmin]),
    (Get, "/system/*", &[Admin]),
    (Get, "/audit*", &[Admin, NationalAdmin]),
];

pub(crate) const BUILTIN_READ_ONLY_EXEMPTIONS: &[&str] = &[
    "*/analytics/statistics*",
    "*/analytics/dashboard*",
    "*/analytics/national*",
    "*/analytics/trends*",
];

pub(crate) fn builtin_policy_impl() -> AccessPolicy {
    let mut role_restrictions = RoleRestrictionTable::new();
    for (method, pattern, roles) in BUILTIN_ROLE_RESTRICTIONS {
        role_restrictions
            .restrict(*method, pattern, roles.iter().copied())
            .expect("built-in role restriction pattern compiles");
    }

    let read_only_exemptions = ReadOnlyExemptions::new(BUILTIN_READ_ONLY_EXEMPTIONS)
        .expect("built-in exemption pattern compiles");

    AccessPolicy {
        role_restrictions,
        read_only_exemptions,
    }
}
