#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image_replacer_core::Config;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Reference and target trees living in one temporary directory
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("reference")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        Self { dir }
    }

    pub fn reference_dir(&self) -> PathBuf {
        self.dir.path().join("reference")
    }

    pub fn target_dir(&self) -> PathBuf {
        self.dir.path().join("target")
    }

    /// Add a reference file at a path relative to the reference root
    pub fn reference(&self, relative: &str, contents: &[u8]) -> PathBuf {
        write_file(&self.reference_dir().join(relative), contents)
    }

    /// Add a target file at a path relative to the target root
    pub fn target(&self, relative: &str, contents: &[u8]) -> PathBuf {
        write_file(&self.target_dir().join(relative), contents)
    }

    pub fn config(&self) -> Config {
        Config::new(self.reference_dir(), self.target_dir())
    }

    /// Entries directly under the target root whose name starts with `_backup_`
    pub fn backup_dirs(&self) -> Vec<PathBuf> {
        fs::read_dir(self.target_dir())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with("_backup_"))
                    .unwrap_or(false)
            })
            .collect()
    }
}

pub fn write_file(path: &Path, contents: &[u8]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// Every file under `root` with its contents, in name-sorted walk order
pub fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let contents = fs::read(entry.path()).unwrap();
            (entry.into_path(), contents)
        })
        .collect()
}
