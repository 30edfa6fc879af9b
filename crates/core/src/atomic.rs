//! Atomic writer (C8).
//!
//! Writes content to a path via a sibling temp file and `rename`, never
//! truncating the destination in place. On any failure between creating the
//! temp file and the rename, the temp file is removed and `path` is left
//! untouched.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, TextmendError};

/// Pre-write metadata the writer needs to preserve mode/mtime and to detect
/// a concurrent change.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub backup_suffix: String,
    pub preserve_times: bool,
    #[cfg(unix)]
    pub original_mode: Option<u32>,
    pub original_mtime: Option<std::time::SystemTime>,
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".tmp_{name}"))
}

/// Copies `path` to `path + suffix` unless that backup already exists.
/// Existing backups are never overwritten.
fn maybe_backup(path: &Path, suffix: &str) -> Result<()> {
    if suffix.is_empty() {
        return Ok(());
    }
    let backup_path = append_suffix(path, suffix);
    if backup_path.exists() {
        return Ok(());
    }
    fs::copy(path, &backup_path).map_err(|e| TextmendError::io(path, e))?;
    Ok(())
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// Writes `content` to `path` following the atomic sequence: optional
/// backup, write to a sibling temp file, fsync, chmod, rename, then optional
/// mtime restore.
pub fn write_atomic(path: &Path, content: &[u8], options: &WriteOptions) -> Result<()> {
    if path.exists() {
        maybe_backup(path, &options.backup_suffix)?;
    }

    let tmp_path = temp_path_for(path);

    let result = (|| -> Result<()> {
        let mut file = File::create(&tmp_path).map_err(|e| TextmendError::io(&tmp_path, e))?;
        file.write_all(content).map_err(|e| TextmendError::io(&tmp_path, e))?;
        file.sync_all().map_err(|e| TextmendError::io(&tmp_path, e))?;
        drop(file);

        #[cfg(unix)]
        if let Some(mode) = options.original_mode {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(mode))
                .map_err(|e| TextmendError::io(&tmp_path, e))?;
        }

        fs::rename(&tmp_path, path).map_err(|e| TextmendError::io(path, e))?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        return result;
    }

    if options.preserve_times {
        if let Some(mtime) = options.original_mtime {
            let _ = set_mtime(path, mtime);
        }
    }

    Ok(())
}

fn set_mtime(path: &Path, mtime: std::time::SystemTime) -> Result<()> {
    let file = File::open(path).map_err(|e| TextmendError::io(path, e))?;
    let times = fs::FileTimes::new().set_modified(mtime);
    file.set_times(times).map_err(|e| TextmendError::io(path, e))
}
