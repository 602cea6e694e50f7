//! The local pipeline over a project directory.
//!
//! Ties the descriptor, persisted state, host log directories, and compose
//! file locations of a [`ProjectConfig`] together.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use berth_common::config::ProjectConfig;
use berth_common::error::Result;
use chrono::{DateTime, Local};

use crate::descriptor;
use crate::emitter::{self, ComposeDocument};
use crate::envvars::EnvironmentOverlay;
use crate::state;
use crate::volume::{self, DirectoryMaker, FsDirectoryMaker};

/// Result of generating the compose file for a project.
#[derive(Debug, Clone)]
pub struct ComposeOutcome {
    /// The generated document.
    pub document: ComposeDocument,
    /// Where the document was written, if it was.
    pub compose_path: Option<PathBuf>,
    /// Host log directory allocated for this run, if any log volume needed one.
    pub host_log: Option<PathBuf>,
}

/// A local project rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalProject {
    config: ProjectConfig,
}

impl LocalProject {
    /// Wraps a project configuration.
    pub const fn new(config: ProjectConfig) -> Self {
        Self { config }
    }

    /// The project's path configuration.
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Translates the project descriptor and writes the compose file.
    ///
    /// `cli` is layered over the persisted setenv variables. The compose file
    /// goes to `output`, or to the project default when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor or state cannot be loaded, the
    /// translation fails, or the file cannot be written. A failed translation
    /// writes nothing.
    pub fn make_compose(
        &self,
        cli: &EnvironmentOverlay,
        output: Option<&Path>,
    ) -> Result<ComposeOutcome> {
        let mut outcome = self.compose_document(cli)?;
        let path = output.map_or_else(|| self.config.compose_path(), Path::to_path_buf);
        emitter::write_compose_file(&outcome.document, &path)?;
        outcome.compose_path = Some(path);
        Ok(outcome)
    }

    /// Translates the project descriptor without writing the compose file.
    ///
    /// Host log directories are still created on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor or state cannot be loaded or the
    /// translation fails.
    pub fn compose_document(&self, cli: &EnvironmentOverlay) -> Result<ComposeOutcome> {
        self.generate(cli, Local::now(), &FsDirectoryMaker)
    }

    /// Like [`Self::compose_document`], with the clock and directory maker
    /// supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor or state cannot be loaded or the
    /// translation fails.
    pub fn generate(
        &self,
        cli: &EnvironmentOverlay,
        now: DateTime<Local>,
        dirs: &dyn DirectoryMaker,
    ) -> Result<ComposeOutcome> {
        let descriptor = descriptor::load_descriptor(&self.config.descriptor_path)?;
        let persisted = state::load_overlay(&self.config.local_state_path())?;

        let volume_map = volume::resolve_volume_map(&descriptor.volumes, self.config.root());
        let host_log = if volume::needs_host_log(&descriptor, &volume_map) {
            Some(volume::allocate_host_log(
                &self.config.logdir_path(),
                now,
                dirs,
            )?)
        } else {
            None
        };

        let document = crate::translate_descriptor(
            &descriptor,
            self.config.root(),
            host_log.as_deref(),
            &persisted,
            cli,
            dirs,
        )?;

        Ok(ComposeOutcome {
            document,
            compose_path: None,
            host_log,
        })
    }

    /// Applies `setenv` tokens to the project's persisted variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a token is malformed or the state cannot be
    /// read or written.
    pub fn set_env<I, S>(&self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        crate::set_environment_variables(tokens, &self.config.local_state_path())
    }

    /// The project's persisted variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be read or parsed.
    pub fn env(&self) -> Result<BTreeMap<String, String>> {
        crate::get_environment_variables(&self.config.local_state_path())
    }

    /// The most recent host log directory, if any run has produced one.
    ///
    /// # Errors
    ///
    /// Returns an error if the log root cannot be listed.
    pub fn latest_logs(&self) -> Result<Option<PathBuf>> {
        volume::latest_host_log(&self.config.logdir_path())
    }
}
