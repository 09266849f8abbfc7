use crate::errors::PolicyError;
use crate::guard::AccessGuard;
use crate::policy::{AccessPolicy, PolicyFile};
use crate::route::RouteTable;
use std::env;
use std::path::PathBuf;

pub const ENV_POLICY_FILE: &str = "INAMSOS_POLICY_FILE";
pub const ENV_POLICY_MERGE: &str = "INAMSOS_POLICY_MERGE";

/// How a policy file combines with the built-in tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// The file's tables are the whole policy.
    #[default]
    Replace,
    /// The file's rules and exemptions are appended to the built-in ones.
    Extend,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardConfig {
    pub policy_file: Option<PathBuf>,
    pub merge: MergeMode,
}

impl GuardConfig {
    pub fn from_env() -> Result<Self, PolicyError> {
        let mut cfg = Self::default();

        if let Ok(v) = env::var(ENV_POLICY_FILE) {
            if !v.trim().is_empty() {
                cfg.policy_file = Some(PathBuf::from(v));
            }
        }

        if let Ok(v) = env::var(ENV_POLICY_MERGE) {
            cfg.merge = match v.to_lowercase().as_str() {
                "" | "replace" => MergeMode::Replace,
                "extend" => MergeMode::Extend,
                _ => {
                    return Err(PolicyError::InvalidEnv {
                        var: ENV_POLICY_MERGE,
                        value: v,
                    })
                }
            };
        }

        Ok(cfg)
    }

    /// Loads the effective policy and route table.
    ///
    /// Without a policy file the built-in tables apply and no route declares
    /// permissions.
    pub fn load(&self) -> Result<(AccessPolicy, RouteTable), PolicyError> {
        let Some(path) = &self.policy_file else {
            tracing::info!("no policy file configured, using built-in access policy");
            return Ok((AccessPolicy::builtin(), RouteTable::default()));
        };

        let file = PolicyFile::from_path(path)?;
        let policy = match self.merge {
            MergeMode::Replace => file.policy,
            MergeMode::Extend => {
                let mut policy = AccessPolicy::builtin();
                policy.extend(file.policy);
                policy
            }
        };

        tracing::info!(
            path = %path.display(),
            merge = ?self.merge,
            role_rules = policy.role_restrictions.len(),
            exemptions = policy.read_only_exemptions.patterns().len(),
            routes = file.routes.len(),
            "loaded access policy"
        );
        Ok((policy, file.routes))
    }

    pub fn build_guard(&self) -> Result<AccessGuard, PolicyError> {
        let (policy, routes) = self.load()?;
        Ok(AccessGuard::new(policy, routes))
    }
}
