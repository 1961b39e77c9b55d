use chrono::{DateTime, Local};
use log::debug;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::logging::{log_file_error, log_fs_modification};

/// Prefix of the per-run backup directory created at the top of the target tree
pub const BACKUP_DIR_PREFIX: &str = "_backup_";

/// Name of the backup directory for a run started at `started`
pub fn backup_dir_name(started: DateTime<Local>) -> String {
    format!("{}{}", BACKUP_DIR_PREFIX, started.format("%Y%m%d_%H%M%S"))
}

/// Backs up targets and overwrites them with their matched reference file
pub struct Replacer {
    target_root: PathBuf,
    /// Where backups go; `None` when backups are disabled
    backup_root: Option<PathBuf>,
    dry_run: bool,
    backup_written: bool,
}

impl Replacer {
    pub fn new(target_root: impl Into<PathBuf>, backup_root: Option<PathBuf>, dry_run: bool) -> Self {
        Self {
            target_root: target_root.into(),
            backup_root,
            dry_run,
            backup_written: false,
        }
    }

    /// Back up `target` (if enabled), then copy `source` over it.
    ///
    /// In dry-run mode nothing is touched. Returns the backup path when one was written.
    pub fn apply(&mut self, target: &Path, source: &Path) -> Result<Option<PathBuf>> {
        if self.dry_run {
            debug!("Dry run, leaving {} untouched", target.display());
            return Ok(None);
        }

        let backup = match &self.backup_root {
            Some(backup_root) => {
                let relative = target.strip_prefix(&self.target_root).map_err(|_| {
                    Error::Configuration(format!(
                        "{} is outside the target tree {}",
                        target.display(),
                        self.target_root.display()
                    ))
                })?;
                let backup_path = backup_root.join(relative);
                if let Some(parent) = backup_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                copy_with_metadata(target, &backup_path)?;
                log_fs_modification("BACKUP", target, Some(&backup_path.display().to_string()));
                self.backup_written = true;
                Some(backup_path)
            }
            None => None,
        };

        copy_with_metadata(source, target)?;
        log_fs_modification("REPLACE", target, Some(&source.display().to_string()));

        Ok(backup)
    }

    /// Backup root, once at least one backup has been written
    pub fn backup_dir(&self) -> Option<&Path> {
        if self.backup_written {
            self.backup_root.as_deref()
        } else {
            None
        }
    }
}

/// Copy bytes, permissions, and access/modification times from `from` to `to`
pub fn copy_with_metadata(from: &Path, to: &Path) -> Result<()> {
    copy_file(from, to).map_err(|source| {
        log_file_error(to, "copy", &source);
        Error::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    })
}

fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() && fs::canonicalize(from)? == fs::canonicalize(to)? {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and destination are the same file",
        ));
    }

    // fs::copy carries permissions along with the bytes
    fs::copy(from, to)?;

    let metadata = fs::metadata(from)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    open_for_times(to)?.set_times(times)
}

#[cfg(windows)]
fn open_for_times(path: &Path) -> io::Result<File> {
    File::options().write(true).open(path)
}

#[cfg(not(windows))]
fn open_for_times(path: &Path) -> io::Result<File> {
    File::open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    #[test]
    fn test_backup_dir_name() {
        let started = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(backup_dir_name(started), "_backup_20240309_070501");
    }

    #[test]
    fn test_copy_preserves_bytes_and_mtime() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("from.png");
        let to = dir.path().join("to.png");
        fs::write(&from, b"REFERENCE").unwrap();
        fs::write(&to, b"OLD CONTENT").unwrap();

        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(&from)
            .unwrap()
            .set_modified(mtime)
            .unwrap();

        copy_with_metadata(&from, &to).unwrap();

        assert_eq!(fs::read(&to).unwrap(), b"REFERENCE");
        assert_eq!(fs::metadata(&to).unwrap().modified().unwrap(), mtime);
    }

    #[test]
    fn test_copy_onto_itself_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("same.png");
        fs::write(&path, b"DATA").unwrap();

        let result = copy_with_metadata(&path, &path);
        assert!(matches!(result, Err(Error::Copy { .. })));
        assert_eq!(fs::read(&path).unwrap(), b"DATA");
    }

    #[test]
    fn test_apply_backs_up_then_replaces() {
        let dir = tempdir().unwrap();
        let target_root = dir.path().join("targets");
        let backup_root = target_root.join("_backup_test");
        let target = target_root.join("gallery").join("hero.png");
        let source = dir.path().join("hero.png");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"ORIGINAL").unwrap();
        fs::write(&source, b"REFERENCE").unwrap();

        let mut replacer = Replacer::new(&target_root, Some(backup_root.clone()), false);
        assert!(replacer.backup_dir().is_none());

        let backup = replacer.apply(&target, &source).unwrap().unwrap();

        assert_eq!(backup, backup_root.join("gallery").join("hero.png"));
        assert_eq!(fs::read(&backup).unwrap(), b"ORIGINAL");
        assert_eq!(fs::read(&target).unwrap(), b"REFERENCE");
        assert_eq!(replacer.backup_dir(), Some(backup_root.as_path()));
    }

    #[test]
    fn test_apply_without_backup() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("sub").join("a.jpg");
        let source = dir.path().join("a-ref.jpg");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"ORIGINAL").unwrap();
        fs::write(&source, b"REFERENCE").unwrap();

        let mut replacer = Replacer::new(dir.path(), None, false);
        assert_eq!(replacer.apply(&target, &source).unwrap(), None);
        assert_eq!(fs::read(&target).unwrap(), b"REFERENCE");
        assert!(replacer.backup_dir().is_none());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        let backup_root = dir.path().join("_backup_dry");
        let target = dir.path().join("sub").join("a.jpg");
        let source = dir.path().join("a-ref.jpg");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"ORIGINAL").unwrap();
        fs::write(&source, b"REFERENCE").unwrap();

        let mut replacer = Replacer::new(dir.path(), Some(backup_root.clone()), true);
        assert_eq!(replacer.apply(&target, &source).unwrap(), None);

        assert_eq!(fs::read(&target).unwrap(), b"ORIGINAL");
        assert!(!backup_root.exists());
        assert!(replacer.backup_dir().is_none());
    }

    #[test]
    fn test_missing_source_is_a_copy_error() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("sub").join("a.jpg");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"ORIGINAL").unwrap();

        let mut replacer = Replacer::new(dir.path(), None, false);
        let result = replacer.apply(&target, &dir.path().join("missing.jpg"));
        assert!(matches!(result, Err(Error::Copy { .. })));
        assert_eq!(fs::read(&target).unwrap(), b"ORIGINAL");
    }
}
