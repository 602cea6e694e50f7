//! Logical volume resolution and host log directories.
//!
//! Declared volumes resolve to local paths once per run. Mount points whose
//! volume is not declared but carries the log-volume prefix resolve under a
//! per-run host log directory, allocated once and shared by every log mount
//! of that run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use berth_common::constants::{
    APP_ROOT_PREFIX, HOST_LOG_DIR_FORMAT, LATEST_LOGS_LINK, LOG_VOLUME_PREFIX,
};
use berth_common::error::{BerthError, Result};
use chrono::{DateTime, Local};

use crate::descriptor::model::{Descriptor, VolumeDeclaration};

/// Maps logical volume names to local paths.
pub type VolumeMap = BTreeMap<String, PathBuf>;

/// Creates directories on behalf of the translator.
///
/// Injected so translation can be tested without touching the filesystem.
pub trait DirectoryMaker {
    /// Creates `path` and any missing parents. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Creates `path` as a new, world-writable run directory, creating
    /// missing parents. Fails if `path` already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists or cannot be created.
    fn create_run_dir(&self, path: &Path) -> Result<()>;

    /// Points the symlink at `link` to `target`, replacing a previous link.
    ///
    /// Best effort: failures are not reported.
    fn relink(&self, _link: &Path, _target: &Path) {}
}

/// [`DirectoryMaker`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectoryMaker;

impl DirectoryMaker for FsDirectoryMaker {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| BerthError::io(path, e))
    }

    fn create_run_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        std::fs::create_dir(path).map_err(|e| BerthError::io(path, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(RUN_DIR_MODE))
                .map_err(|e| BerthError::io(path, e))?;
        }
        Ok(())
    }

    #[cfg(unix)]
    fn relink(&self, link: &Path, target: &Path) {
        let _ = std::fs::remove_file(link);
        if let Err(e) = std::os::unix::fs::symlink(target, link) {
            tracing::debug!(link = %link.display(), error = %e, "could not update latest log link");
        }
    }
}

/// Mode of per-run host log directories.
#[cfg(unix)]
const RUN_DIR_MODE: u32 = 0o777;

/// Where a mount point's host side comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountSource {
    /// A declared volume, already resolved.
    Declared(PathBuf),
    /// A log volume under the run's host log directory. Must be created.
    Log(PathBuf),
    /// Neither declared nor a log volume; the mount point is skipped.
    Unresolved,
}

/// Resolves declared volumes to local paths.
///
/// Source paths under [`APP_ROOT_PREFIX`] are rewritten relative to
/// `project_root`; anything else is used verbatim.
pub fn resolve_volume_map(volumes: &[VolumeDeclaration], project_root: &Path) -> VolumeMap {
    volumes
        .iter()
        .map(|v| {
            let local = local_source_path(&v.source_path, project_root);
            tracing::debug!(volume = %v.name, path = %local.display(), "resolved volume");
            (v.name.clone(), local)
        })
        .collect()
}

fn local_source_path(source_path: &str, project_root: &Path) -> PathBuf {
    source_path.strip_prefix(APP_ROOT_PREFIX).map_or_else(
        || PathBuf::from(source_path),
        |relative| project_root.join(relative),
    )
}

/// Classifies the host side of a mount point.
///
/// A log volume only resolves when a host log directory is available.
pub fn classify_mount(
    source_volume: &str,
    volume_map: &VolumeMap,
    host_log: Option<&Path>,
) -> MountSource {
    if let Some(path) = volume_map.get(source_volume) {
        return MountSource::Declared(path.clone());
    }
    match (source_volume.strip_prefix(LOG_VOLUME_PREFIX), host_log) {
        (Some(dirname), Some(root)) => MountSource::Log(root.join(dirname)),
        _ => MountSource::Unresolved,
    }
}

/// Returns `true` if any mount point in the descriptor is a log volume that
/// is not covered by a declared volume.
pub fn needs_host_log(descriptor: &Descriptor, volume_map: &VolumeMap) -> bool {
    descriptor
        .definitions
        .iter()
        .flat_map(|d| &d.mount_points)
        .any(|m| {
            !volume_map.contains_key(&m.source_volume)
                && m.source_volume.starts_with(LOG_VOLUME_PREFIX)
        })
}

/// Path of a new per-run host log directory under `root_log_dir`.
pub fn new_host_log_path(root_log_dir: &Path, now: DateTime<Local>) -> PathBuf {
    root_log_dir.join(now.format(HOST_LOG_DIR_FORMAT).to_string())
}

/// Creates a fresh per-run host log directory and repoints `latest` at it.
///
/// # Errors
///
/// Returns an error if the directory already exists or cannot be created.
pub fn allocate_host_log(
    root_log_dir: &Path,
    now: DateTime<Local>,
    dirs: &dyn DirectoryMaker,
) -> Result<PathBuf> {
    let host_log = new_host_log_path(root_log_dir, now);
    dirs.create_run_dir(&host_log)?;
    dirs.relink(&root_log_dir.join(LATEST_LOGS_LINK), &host_log);
    tracing::info!(path = %host_log.display(), "allocated host log directory");
    Ok(host_log)
}

/// Returns the most recently modified run directory under `root_log_dir`,
/// ignoring the `latest` symlink. `None` if there are no runs yet, or if the
/// latest run left its directory empty.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
pub fn latest_host_log(root_log_dir: &Path) -> Result<Option<PathBuf>> {
    if !root_log_dir.is_dir() {
        return Ok(None);
    }
    let entries = std::fs::read_dir(root_log_dir).map_err(|e| BerthError::io(root_log_dir, e))?;

    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| BerthError::io(root_log_dir, e))?;
        let path = entry.path();
        let meta = std::fs::symlink_metadata(&path).map_err(|e| BerthError::io(&path, e))?;
        if meta.file_type().is_symlink() || !meta.is_dir() {
            continue;
        }
        let modified = meta.modified().map_err(|e| BerthError::io(&path, e))?;
        if newest.as_ref().is_none_or(|(t, _)| modified >= *t) {
            newest = Some((modified, path));
        }
    }
    let Some((_, path)) = newest else {
        return Ok(None);
    };
    let mut contents = std::fs::read_dir(&path).map_err(|e| BerthError::io(&path, e))?;
    Ok(contents.next().is_some().then_some(path))
}

/// Records requested directories instead of creating them.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingDirs {
    pub(crate) created: std::cell::RefCell<Vec<PathBuf>>,
    pub(crate) links: std::cell::RefCell<Vec<(PathBuf, PathBuf)>>,
}

#[cfg(test)]
impl DirectoryMaker for RecordingDirs {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.created.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn create_run_dir(&self, path: &Path) -> Result<()> {
        if self.created.borrow().iter().any(|p| p == path) {
            return Err(BerthError::io(
                path,
                std::io::Error::from(std::io::ErrorKind::AlreadyExists),
            ));
        }
        self.create_dir_all(path)
    }

    fn relink(&self, link: &Path, target: &Path) {
        self.links
            .borrow_mut()
            .push((link.to_path_buf(), target.to_path_buf()));
    }
}
