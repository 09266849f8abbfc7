use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "inamsos",
    version,
    about = "Access-control tooling for the INAMSOS registry API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate one request description against the access policy
    Check(CheckArgs),
    /// Inspect and validate access policy files
    Policy(PolicyArgs),
    /// Print the inamsos version
    Version,
}

/// Where the effective policy comes from.
#[derive(Args, Clone, Debug)]
pub struct PolicySourceArgs {
    /// Policy file (YAML). Defaults to INAMSOS_POLICY_FILE, then the built-in policy
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Append the file's rules to the built-in policy instead of replacing it
    #[arg(long, requires = "policy")]
    pub extend: bool,
}

#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    /// Request description (JSON); `-` reads stdin
    #[arg(short, long)]
    pub request: PathBuf,

    #[command(flatten)]
    pub source: PolicySourceArgs,
}

#[derive(Args, Clone, Debug)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub cmd: PolicyCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum PolicyCommand {
    /// Load and compile a policy file
    Validate(PolicyValidateArgs),

    /// Print the effective role restrictions, exemptions and routes
    Show(PolicyShowArgs),
}

#[derive(Args, Clone, Debug)]
pub struct PolicyValidateArgs {
    /// Policy file path (YAML)
    #[arg(short, long)]
    pub input: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct PolicyShowArgs {
    #[command(flatten)]
    pub source: PolicySourceArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
