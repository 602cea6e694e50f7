//! `berth printenv` — Show persisted environment variables.

use berth_compose::project::LocalProject;
use clap::Args;

use crate::output;

/// Arguments for the `printenv` command.
#[derive(Args, Debug)]
pub struct PrintenvArgs {}

/// Executes the `printenv` command.
///
/// # Errors
///
/// Returns an error if the state file cannot be read.
pub fn execute(project: &LocalProject, _args: &PrintenvArgs) -> anyhow::Result<()> {
    let vars = project.env()?;
    println!("Environment Variables:");
    for line in output::format_env_vars(&vars) {
        println!("{line}");
    }
    Ok(())
}
