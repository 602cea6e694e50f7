//! Project layout configuration.
//!
//! All generated files and local state live under a single per-project
//! state directory, [`STATE_DIR_NAME`](crate::constants::STATE_DIR_NAME).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;

/// Resolved paths for one local project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Root directory of the user's application.
    pub project_root: PathBuf,
    /// Directory holding generated files and local state.
    pub state_dir: PathBuf,
    /// Path to the multi-container descriptor.
    pub descriptor_path: PathBuf,
}

impl ProjectConfig {
    /// Builds the default layout for the project rooted at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let project_root = root.into();
        Self {
            state_dir: project_root.join(constants::STATE_DIR_NAME),
            descriptor_path: project_root.join(constants::DESCRIPTOR_FILENAME),
            project_root,
        }
    }

    /// Replaces the descriptor path, keeping the rest of the layout.
    #[must_use]
    pub fn with_descriptor(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor_path = path.into();
        self
    }

    /// Path of the persisted setenv state.
    pub fn local_state_path(&self) -> PathBuf {
        self.state_dir.join(constants::LOCAL_STATE_FILENAME)
    }

    /// Path of the generated orchestration document.
    pub fn compose_path(&self) -> PathBuf {
        self.state_dir.join(constants::COMPOSE_FILENAME)
    }

    /// Root under which every run allocates its host log directory.
    pub fn logdir_path(&self) -> PathBuf {
        self.state_dir
            .join(constants::LOGS_DIR_NAME)
            .join(constants::HOST_LOGS_DIR_NAME)
    }

    /// Project root as a path reference.
    pub fn root(&self) -> &Path {
        &self.project_root
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::for_root(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_derived_from_root() {
        let config = ProjectConfig::for_root("/work/app");
        assert_eq!(config.state_dir, Path::new("/work/app/.berth"));
        assert_eq!(
            config.descriptor_path,
            Path::new("/work/app/Dockerrun.aws.json")
        );
        assert_eq!(
            config.local_state_path(),
            Path::new("/work/app/.berth/.localstate")
        );
        assert_eq!(
            config.compose_path(),
            Path::new("/work/app/.berth/docker-compose.yml")
        );
        assert_eq!(config.logdir_path(), Path::new("/work/app/.berth/logs/local"));
    }

    #[test]
    fn with_descriptor_overrides_only_descriptor() {
        let config = ProjectConfig::for_root("/p").with_descriptor("/elsewhere/run.json");
        assert_eq!(config.descriptor_path, Path::new("/elsewhere/run.json"));
        assert_eq!(config.state_dir, Path::new("/p/.berth"));
    }

    #[test]
    fn default_uses_current_directory() {
        let config = ProjectConfig::default();
        assert_eq!(config.root(), Path::new("."));
    }
}
