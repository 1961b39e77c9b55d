use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::discovery::discover_reference_images;
use crate::error::{Error, Result};
use crate::normalize::{file_stem_of, normalize_stem};

/// Lookup tables over the reference tree, built once and read-only afterwards
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    /// Lowercased basename -> first path seen with that name
    by_exact_name: HashMap<String, PathBuf>,

    /// Normalized stem -> position of its bucket in `stems`
    stem_slots: HashMap<String, usize>,

    /// Stem buckets in first-insertion order; paths in discovery order
    stems: Vec<(String, Vec<PathBuf>)>,

    /// Number of image files indexed
    file_count: usize,
}

impl ReferenceIndex {
    /// Walk `root` recursively and index every image file found.
    ///
    /// Fails if the tree contains no images at all, since nothing could ever match.
    pub fn build(root: &Path) -> Result<Self> {
        let files = discover_reference_images(root)?;
        if files.is_empty() {
            return Err(Error::NoReferenceImages(root.to_path_buf()));
        }
        Ok(Self::from_paths(files))
    }

    /// Index the given paths in order
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut index = Self::default();
        for path in paths {
            index.insert(path);
        }
        index
    }

    fn insert(&mut self, path: PathBuf) {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return;
        };

        self.by_exact_name
            .entry(file_name.to_lowercase())
            .or_insert_with(|| path.clone());

        let stem = normalize_stem(file_stem_of(&file_name));
        match self.stem_slots.get(&stem) {
            Some(&slot) => self.stems[slot].1.push(path),
            None => {
                self.stem_slots.insert(stem.clone(), self.stems.len());
                self.stems.push((stem, vec![path]));
            }
        }

        self.file_count += 1;
    }

    /// Number of files indexed
    pub fn len(&self) -> usize {
        self.file_count
    }

    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }

    /// Path registered for a lowercased basename
    pub fn lookup_exact(&self, lowercase_name: &str) -> Option<&Path> {
        self.by_exact_name.get(lowercase_name).map(PathBuf::as_path)
    }

    /// All paths sharing a normalized stem, in discovery order
    pub fn lookup_stem(&self, normalized_stem: &str) -> Option<&[PathBuf]> {
        self.stem_slots
            .get(normalized_stem)
            .map(|&slot| self.stems[slot].1.as_slice())
    }

    /// Stem buckets in the order their stems were first seen
    pub fn stems(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.stems
            .iter()
            .map(|(stem, paths)| (stem.as_str(), paths.as_slice()))
    }
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_fails_without_images() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"NOT AN IMAGE").unwrap();

        let result = ReferenceIndex::build(dir.path());
        assert!(matches!(result, Err(Error::NoReferenceImages(_))));
    }

    #[test]
    fn test_exact_name_first_seen_wins() {
        let index = ReferenceIndex::from_paths(vec![
            PathBuf::from("one/Logo.png"),
            PathBuf::from("two/logo.PNG"),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup_exact("logo.png"), Some(Path::new("one/Logo.png")));
    }

    #[test]
    fn test_stem_buckets_keep_discovery_order() {
        let index = ReferenceIndex::from_paths(vec![
            PathBuf::from("x/Beach Sunset.jpg"),
            PathBuf::from("x/hero.png"),
            PathBuf::from("y/beach_sunset.png"),
        ]);

        assert_eq!(
            index.lookup_stem("beach-sunset").unwrap(),
            &[
                PathBuf::from("x/Beach Sunset.jpg"),
                PathBuf::from("y/beach_sunset.png")
            ]
        );

        let keys: Vec<&str> = index.stems().map(|(stem, _)| stem).collect();
        assert_eq!(keys, vec!["beach-sunset", "hero"]);
    }
}
