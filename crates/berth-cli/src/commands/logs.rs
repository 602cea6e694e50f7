//! `berth logs` — Show where local container logs are written.

use berth_compose::project::LocalProject;
use clap::Args;

/// Arguments for the `logs` command.
#[derive(Args, Debug)]
pub struct LogsArgs {}

/// Executes the `logs` command.
///
/// Prints the host log root and the directory of the most recent run.
///
/// # Errors
///
/// Returns an error if the log root cannot be listed.
pub fn execute(project: &LocalProject, _args: &LogsArgs) -> anyhow::Result<()> {
    let root = project.config().logdir_path();
    if root.is_dir() {
        println!("Log root: {}", root.display());
    }
    match project.latest_logs()? {
        Some(latest) => println!("Latest run: {}", latest.display()),
        None => println!("No logs available yet."),
    }
    Ok(())
}
