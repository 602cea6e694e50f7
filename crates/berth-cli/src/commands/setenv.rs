//! `berth setenv` — Set or remove persisted environment variables.

use berth_compose::project::LocalProject;
use clap::Args;

/// Arguments for the `setenv` command.
#[derive(Args, Debug)]
pub struct SetenvArgs {
    /// `NAME=VALUE` pairs to set, or `NAME=` to remove a variable.
    #[arg(required = true)]
    pub tokens: Vec<String>,
}

/// Executes the `setenv` command.
///
/// # Errors
///
/// Returns an error if a token is malformed or the state cannot be updated.
/// A malformed token leaves the state untouched.
pub fn execute(project: &LocalProject, args: &SetenvArgs) -> anyhow::Result<()> {
    project.set_env(&args.tokens)?;
    println!(
        "Updated {}",
        project.config().local_state_path().display()
    );
    Ok(())
}
