//! CLI command definitions and dispatch.

pub mod compose;
pub mod logs;
pub mod printenv;
pub mod setenv;

use std::path::PathBuf;

use berth_common::config::ProjectConfig;
use berth_common::constants::BIN_NAME;
use berth_compose::project::LocalProject;
use clap::{Parser, Subcommand};

/// berth — run multi-container applications locally before deploying them.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Root directory of the application project.
    #[arg(long, global = true, env = "BERTH_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate docker-compose.yml from the multi-container descriptor.
    Compose(compose::ComposeArgs),
    /// Set or remove persisted environment variables.
    Setenv(setenv::SetenvArgs),
    /// Show persisted environment variables.
    Printenv(printenv::PrintenvArgs),
    /// Show where local container logs are written.
    Logs(logs::LogsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let project = LocalProject::new(ProjectConfig::for_root(cli.project_dir));
    match cli.command {
        Command::Compose(args) => compose::execute(&project, args),
        Command::Setenv(args) => setenv::execute(&project, &args),
        Command::Printenv(args) => printenv::execute(&project, &args),
        Command::Logs(args) => logs::execute(&project, &args),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_is_named_after_binary() {
        assert_eq!(Cli::command().get_name(), BIN_NAME);
    }

    #[test]
    fn compose_parses_envvars_and_output() {
        let cli = Cli::try_parse_from([
            "berth",
            "--project-dir",
            "/tmp/app",
            "compose",
            "--envvars",
            "A=1,B=",
            "--output",
            "out.yml",
        ])
        .expect("parse");
        assert_eq!(cli.project_dir, PathBuf::from("/tmp/app"));
        match cli.command {
            Command::Compose(args) => {
                assert_eq!(args.envvars, "A=1,B=");
                assert_eq!(args.output, Some(PathBuf::from("out.yml")));
                assert!(!args.stdout);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn compose_output_conflicts_with_stdout() {
        assert!(Cli::try_parse_from(["berth", "compose", "--stdout", "-o", "x.yml"]).is_err());
    }

    #[test]
    fn setenv_requires_tokens() {
        assert!(Cli::try_parse_from(["berth", "setenv"]).is_err());
        let cli = Cli::try_parse_from(["berth", "setenv", "a=1", "b="]).expect("parse");
        match cli.command {
            Command::Setenv(args) => assert_eq!(args.tokens, vec!["a=1", "b="]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
