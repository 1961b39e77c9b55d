use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::replace::BACKUP_DIR_PREFIX;
use crate::types::has_image_extension;

/// Collect every image file under `root`, sorted by name within each directory.
///
/// Symlinked files count when they point at a file; symlinked directories are
/// listed but not descended into.
pub fn discover_reference_images(root: &Path) -> Result<Vec<PathBuf>> {
    ensure_directory(root, "Reference")?;

    let mut images = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Log error but continue with other files
                warn!("Skipping unreadable reference entry: {}", e);
                continue;
            }
        };

        if entry.path().is_file() && has_image_extension(entry.path()) {
            debug!("Reference image: {}", entry.path().display());
            images.push(entry.into_path());
        }
    }

    Ok(images)
}

/// Collect the image files sitting directly inside each subfolder of `root`.
///
/// Subfolders are visited in name order, files in name order within each.
/// Files in `root` itself, deeper levels, and earlier backup directories are ignored.
/// Symlinked subfolders and files are followed.
pub fn discover_targets(root: &Path) -> Result<Vec<PathBuf>> {
    ensure_directory(root, "Target")?;

    let mut targets = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_backup_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable target entry: {}", e);
                continue;
            }
        };

        if entry.depth() == 2 && entry.file_type().is_file() && has_image_extension(entry.path()) {
            targets.push(entry.into_path());
        }
    }

    Ok(targets)
}

fn is_backup_dir(entry: &DirEntry) -> bool {
    entry.depth() == 1
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with(BACKUP_DIR_PREFIX))
            .unwrap_or(false)
}

fn ensure_directory(path: &Path, role: &str) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(Error::Configuration(format!(
            "{} path is not a directory: {}",
            role,
            path.display()
        )));
    }
    Ok(())
}

// -- Tests --
