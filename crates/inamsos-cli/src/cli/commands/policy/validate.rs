use crate::cli::args::PolicyValidateArgs;
use crate::exit_codes;
use anyhow::{Context, Result};
use inamsos_guard::PolicyFile;

pub fn run(args: PolicyValidateArgs) -> Result<i32> {
    // Loading compiles every pattern, so bad patterns fail here rather than per request.
    let file = PolicyFile::from_path(&args.input)
        .with_context(|| format!("failed to load policy {}", args.input.display()))?;

    eprintln!(
        "✔ Policy OK: {} ({} role rules, {} exemptions, {} routes)",
        args.input.display(),
        file.policy.role_restrictions.len(),
        file.policy.read_only_exemptions.patterns().len(),
        file.routes.len()
    );
    Ok(exit_codes::SUCCESS)
}
