//! # berth-compose
//!
//! Local translation core for multi-container applications.
//!
//! Handles:
//! - **Descriptor**: Parsing and validation of the multi-container descriptor.
//! - **Envvars**: Environment overlays with merge and removal semantics.
//! - **Volume**: Logical volume resolution and per-run host log directories.
//! - **Translator**: Container definition to compose service translation.
//! - **Emitter**: docker-compose document construction and writing.
//! - **State**: Persisted `setenv` variables.
//! - **Project**: The full local pipeline over a project directory.

pub mod descriptor;
pub mod emitter;
pub mod envvars;
pub mod project;
pub mod state;
pub mod translator;
pub mod volume;

mod fsio;

use std::collections::BTreeMap;
use std::path::Path;

use berth_common::error::Result;

use crate::descriptor::model::Descriptor;
use crate::emitter::ComposeDocument;
use crate::envvars::EnvironmentOverlay;
use crate::translator::Translator;
use crate::volume::DirectoryMaker;

/// Translates a descriptor into a docker-compose document.
///
/// `persisted` is the setenv layer and `cli` the one-shot layer layered over
/// it. `host_log` is the run's host log directory; without one, log volumes
/// that are not declared are skipped.
///
/// # Errors
///
/// Returns an error if any definition fails to translate. Nothing is
/// returned for the other definitions in that case.
pub fn translate_descriptor(
    descriptor: &Descriptor,
    project_root: &Path,
    host_log: Option<&Path>,
    persisted: &EnvironmentOverlay,
    cli: &EnvironmentOverlay,
    dirs: &dyn DirectoryMaker,
) -> Result<ComposeDocument> {
    let volume_map = volume::resolve_volume_map(&descriptor.volumes, project_root);
    let services = Translator::new(&volume_map, host_log, persisted, cli, dirs)
        .translate(&descriptor.definitions)?;
    emitter::emit(services)
}

/// Applies `NAME=VALUE` / `NAME=` tokens to the persisted variables.
///
/// Removals are resolved before saving, so deleted names disappear from the
/// state file instead of being carried forward.
///
/// # Errors
///
/// Returns an error if a token is malformed (before anything is read or
/// written), or if the state cannot be read or written.
pub fn set_environment_variables<I, S>(tokens: I, state_path: &Path) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let update = EnvironmentOverlay::from_tokens(tokens)?;
    let merged = state::load_overlay(state_path)?.merge(&update);
    state::save_overlay(&merged.filtered(), state_path)?;
    tracing::info!(path = %state_path.display(), "updated persisted environment");
    Ok(())
}

/// Returns the persisted variables.
///
/// # Errors
///
/// Returns an error if the state file exists but cannot be read or parsed.
pub fn get_environment_variables(state_path: &Path) -> Result<BTreeMap<String, String>> {
    Ok(state::load_overlay(state_path)?.filtered().into_additions())
}
