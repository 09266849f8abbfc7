use crate::cli::args::CheckArgs;
use crate::exit_codes;
use anyhow::{Context, Result};
use inamsos_guard::{HttpMethod, Principal, PrincipalClaims, RequestContext, Verdict};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Request description accepted by `inamsos check`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct CheckInput {
    #[serde(default)]
    pub principal: Option<PrincipalClaims>,
    pub method: String,
    pub path: String,
    /// Route template the path was matched against, e.g. `/patients/:id`.
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub path_params: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub query_params: BTreeMap<String, String>,
}

impl CheckInput {
    fn into_parts(self) -> Result<(Option<Principal>, RequestContext)> {
        let principal = self
            .principal
            .map(Principal::try_from)
            .transpose()
            .context("invalid principal")?;
        let method: HttpMethod = self.method.parse()?;

        let request = RequestContext {
            method,
            route_path: self.path,
            route_template: self.route,
            path_params: self.path_params,
            body: self.body,
            query_params: self.query_params,
        };
        Ok((principal, request))
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))
}

pub fn run(args: CheckArgs) -> Result<i32> {
    let guard = super::guard_config(&args.source)?
        .build_guard()
        .context("failed to load access policy")?;

    let raw = read_input(&args.request)?;
    let input: CheckInput = serde_json::from_str(&raw).context("failed to parse request JSON")?;
    let (principal, request) = input.into_parts()?;

    let result = guard.check(principal.as_ref(), &request);
    let verdict = Verdict::from_result(&result);
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    Ok(if verdict.allowed {
        exit_codes::SUCCESS
    } else {
        exit_codes::DENIED
    })
}
