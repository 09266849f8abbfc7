use crate::cli::args::{OutputFormat, PolicyShowArgs};
use crate::exit_codes;
use anyhow::{Context, Result};
use inamsos_guard::{AccessPolicy, RouteTable};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RoleRuleView {
    method: String,
    pattern: String,
    allowed: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RouteView {
    method: String,
    path: String,
    permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PolicyView {
    role_restrictions: Vec<RoleRuleView>,
    read_only_exemptions: Vec<String>,
    routes: Vec<RouteView>,
}

fn view(policy: &AccessPolicy, routes: &RouteTable) -> PolicyView {
    PolicyView {
        role_restrictions: policy
            .role_restrictions
            .iter()
            .map(|(method, rule)| RoleRuleView {
                method: method.to_string(),
                pattern: rule.pattern.to_string(),
                allowed: rule.allowed.iter().map(|r| r.to_string()).collect(),
            })
            .collect(),
        read_only_exemptions: policy
            .read_only_exemptions
            .patterns()
            .iter()
            .map(|p| p.to_string())
            .collect(),
        routes: routes
            .iter()
            .map(|((method, path), req)| RouteView {
                method: method.to_string(),
                path: path.clone(),
                permissions: req
                    .required_permissions
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
            })
            .collect(),
    }
}

fn render_text(v: &PolicyView) -> String {
    let mut out = String::from("Role restrictions:\n");
    for r in &v.role_restrictions {
        out.push_str(&format!(
            "  {:<7} {:<24} {}\n",
            r.method,
            r.pattern,
            r.allowed.join(", ")
        ));
    }
    out.push_str("Read-only exemptions (GET):\n");
    for p in &v.read_only_exemptions {
        out.push_str(&format!("  {p}\n"));
    }
    if !v.routes.is_empty() {
        out.push_str("Routes:\n");
        for r in &v.routes {
            let perms = if r.permissions.is_empty() {
                "-".to_string()
            } else {
                r.permissions.join(", ")
            };
            out.push_str(&format!("  {:<7} {:<24} {}\n", r.method, r.path, perms));
        }
    }
    out
}

pub fn run(args: PolicyShowArgs) -> Result<i32> {
    let (policy, routes) = super::super::guard_config(&args.source)?
        .load()
        .context("failed to load access policy")?;
    let v = view(&policy, &routes);

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&v)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&v)?),
    }
    Ok(exit_codes::SUCCESS)
}
