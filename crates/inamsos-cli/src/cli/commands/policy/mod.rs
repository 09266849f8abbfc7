pub mod show;
pub mod validate;

use crate::cli::args::{PolicyArgs, PolicyCommand};

pub fn run(args: PolicyArgs) -> anyhow::Result<i32> {
    match args.cmd {
        PolicyCommand::Validate(a) => validate::run(a),
        PolicyCommand::Show(a) => show::run(a),
    }
}
