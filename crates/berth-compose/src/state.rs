//! Persistent local state.
//!
//! Holds the variables set with `setenv` in a small JSON file under the
//! project state directory. A missing file is an empty state. The file is
//! always rewritten whole, through a rename, so a reader sees either the old
//! or the new contents.

use std::path::Path;

use berth_common::error::{BerthError, Result};
use serde::{Deserialize, Serialize};

use crate::envvars::EnvironmentOverlay;

/// Everything persisted for a local project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalState {
    /// Variables layered over the descriptor environment on every run.
    #[serde(default)]
    pub environment: EnvironmentOverlay,
    /// Keys written by other tools or versions, kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LocalState {
    /// Loads the state file, or an empty state if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading local state");
        match std::fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(BerthError::io(path, e)),
        }
    }

    /// Persists the state atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "saving local state");
        let data = serde_json::to_vec_pretty(self)?;
        crate::fsio::write_atomic(path, &data)
    }
}

/// Loads the persisted overlay. Empty if no state exists yet.
///
/// # Errors
///
/// Returns an error if the state file exists but cannot be read or parsed.
pub fn load_overlay(path: &Path) -> Result<EnvironmentOverlay> {
    Ok(LocalState::load(path)?.environment)
}

/// Replaces the persisted overlay, keeping any other state.
///
/// Pending removals are applied before writing, so the stored overlay never
/// carries removals.
///
/// # Errors
///
/// Returns an error if the existing state cannot be read or the new state
/// cannot be written.
pub fn save_overlay(overlay: &EnvironmentOverlay, path: &Path) -> Result<()> {
    let mut state = LocalState::load(path)?;
    state.environment = overlay.filtered();
    state.save(path)
}
