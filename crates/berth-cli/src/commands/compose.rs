//! `berth compose` — Translate the descriptor into docker-compose.yml.

use std::path::PathBuf;

use berth_compose::emitter;
use berth_compose::envvars::EnvironmentOverlay;
use berth_compose::project::LocalProject;
use clap::Args;

/// Arguments for the `compose` subcommand.
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Path to the descriptor, if not `Dockerrun.aws.json` in the project root.
    #[arg(long)]
    pub descriptor: Option<PathBuf>,

    /// One-shot variables for this run only, e.g. `A=1,B=2,C=` (`C=` removes C).
    #[arg(long, default_value = "")]
    pub envvars: String,

    /// Write the document here instead of `.berth/docker-compose.yml`.
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the document instead of writing it.
    #[arg(long)]
    pub stdout: bool,
}

/// Executes the `compose` command.
///
/// # Errors
///
/// Returns an error if the overlay, descriptor, or state is invalid, or the
/// document cannot be written.
pub fn execute(project: &LocalProject, args: ComposeArgs) -> anyhow::Result<()> {
    let cli_env = EnvironmentOverlay::from_delimited(&args.envvars)?;

    let project = match args.descriptor {
        Some(path) => LocalProject::new(project.config().clone().with_descriptor(path)),
        None => project.clone(),
    };
    tracing::info!(
        descriptor = %project.config().descriptor_path.display(),
        "generating compose file"
    );

    if args.stdout {
        let outcome = project.compose_document(&cli_env)?;
        print!("{}", emitter::to_yaml(&outcome.document)?);
        return Ok(());
    }

    let outcome = project.make_compose(&cli_env, args.output.as_deref())?;
    if let Some(path) = &outcome.compose_path {
        println!("Wrote {}", path.display());
    }
    println!("Services: {}", crate::output::service_summary(&outcome.document));
    if let Some(host_log) = &outcome.host_log {
        println!("Logs: {}", host_log.display());
    }
    Ok(())
}
