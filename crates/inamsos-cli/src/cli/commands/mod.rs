pub mod check;
pub mod dispatch;
pub mod policy;

pub use dispatch::dispatch;

use crate::cli::args::PolicySourceArgs;
use inamsos_guard::{GuardConfig, MergeMode};

/// Explicit `--policy` wins over the environment.
pub(crate) fn guard_config(source: &PolicySourceArgs) -> anyhow::Result<GuardConfig> {
    match &source.policy {
        Some(path) => Ok(GuardConfig {
            policy_file: Some(path.clone()),
            merge: if source.extend {
                MergeMode::Extend
            } else {
                MergeMode::Replace
            },
        }),
        None => Ok(GuardConfig::from_env()?),
    }
}
