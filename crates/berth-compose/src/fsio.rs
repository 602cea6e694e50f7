//! Whole-file writes that readers never observe half-done.

use std::io::Write;
use std::path::Path;

use berth_common::error::{BerthError, Result};

/// Writes `data` to a temporary sibling of `path`, then renames it over
/// `path`. Creates the parent directory if needed.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| BerthError::io(parent, e))?;

    let file_name = path
        .file_name()
        .map_or_else(|| "berth".into(), |n| n.to_string_lossy().into_owned());
    let tmp = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4().simple()));

    let result = write_and_sync(&tmp, data).and_then(|()| {
        std::fs::rename(&tmp, path).map_err(|e| BerthError::io(path, e))
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_and_sync(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = std::fs::File::create(path).map_err(|e| BerthError::io(path, e))?;
    file.write_all(data).map_err(|e| BerthError::io(path, e))?;
    file.sync_all().map_err(|e| BerthError::io(path, e))
}
