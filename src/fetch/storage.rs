//! Write-then-rename file materialization.
//!
//! A [`PartFile`] owns an open temporary sibling of its target. Bytes go to
//! the sibling; only [`PartFile::commit`] renames it onto the target. If the
//! guard is dropped before commit (error, panic, early return) the handle is
//! closed and the sibling stays on disk, so the target either does not exist
//! or is complete.
//!
//! Every guard gets its own uniquely named sibling
//! (`<file name>.<random><suffix>`), created exclusively. Two downloads of
//! the same target never share bytes; each renames a complete file and the
//! later rename wins.
//!
//! Orphaned siblings are never cleaned up here and never reused.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::check_temp_suffix;
use crate::error::{ArchiveError, Result, StorageOp};

/// An in-progress download into a temporary sibling of `target`.
#[derive(Debug)]
pub struct PartFile {
    file: File,
    temp: PathBuf,
    target: PathBuf,
    written: u64,
}

impl PartFile {
    /// Creates missing parent directories of `target` and a fresh temporary
    /// sibling ending in `suffix`.
    ///
    /// `suffix` must be non-empty and free of path separators, otherwise
    /// this is [`InvalidConfig`](ArchiveError::InvalidConfig).
    pub fn create(target: &Path, suffix: &str) -> Result<Self> {
        check_temp_suffix(suffix)?;

        let name = target.file_name().ok_or_else(|| {
            ArchiveError::storage(
                StorageOp::CreateTemp,
                target,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "target has no file name"),
            )
        })?;

        let dir = match target.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)
                    .map_err(|e| ArchiveError::storage(StorageOp::CreateDir, parent, e))?;
                parent
            }
            None => Path::new("."),
        };

        let mut prefix = OsString::from(name);
        prefix.push(".");
        let named = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(suffix)
            .tempfile_in(dir)
            .map_err(|e| ArchiveError::storage(StorageOp::CreateTemp, dir, e))?;

        // Opt out of delete-on-drop: an interrupted download leaves its sibling.
        let (file, temp) = named.into_parts();
        let temp = temp
            .keep()
            .map_err(|e| ArchiveError::storage(StorageOp::CreateTemp, dir, e.error))?;

        Ok(Self {
            file,
            temp,
            target: target.to_path_buf(),
            written: 0,
        })
    }

    /// Appends `buf` to the temporary file.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.file
            .write_all(buf)
            .map_err(|e| ArchiveError::storage(StorageOp::Write, &self.temp, e))?;
        self.written += buf.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path of the temporary sibling.
    pub fn temp(&self) -> &Path {
        &self.temp
    }

    /// Closes the temporary file and renames it onto the target.
    pub fn commit(self) -> Result<PathBuf> {
        let PartFile {
            mut file,
            temp,
            target,
            ..
        } = self;

        file.flush()
            .map_err(|e| ArchiveError::storage(StorageOp::Write, &temp, e))?;
        drop(file);

        fs::rename(&temp, &target)
            .map_err(|e| ArchiveError::storage(StorageOp::Rename, &target, e))?;
        Ok(target)
    }
}
