use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File extensions (lowercase, without dot) treated as images
pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico"];

/// Returns true if the file name ends in `.` plus one of the image extensions (case-insensitive).
///
/// A bare `.png` counts too, even though it has no stem.
pub fn has_image_extension(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| {
        name.strip_suffix(ext)
            .map(|rest| rest.ends_with('.'))
            .unwrap_or(false)
    })
}

/// How a target file was paired with its reference file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "stem", rename_all = "snake_case")]
pub enum MatchMethod {
    /// Case-insensitive basename equality
    ExactFilename,

    /// Normalized stems are equal
    StemMatch,

    /// Similarity ratio of normalized stems reached the cutoff; holds the chosen reference stem
    FuzzyMatch(String),

    /// One normalized stem contains the other; holds the chosen reference stem
    Partial(String),
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactFilename => write!(f, "exact_filename"),
            Self::StemMatch => write!(f, "stem_match"),
            Self::FuzzyMatch(stem) => write!(f, "fuzzy_match({})", stem),
            Self::Partial(stem) => write!(f, "partial({})", stem),
        }
    }
}

/// A target file paired with the reference file that replaces it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// File that gets overwritten
    pub target: PathBuf,

    /// Reference file whose content is copied over the target
    pub source: PathBuf,

    /// Tier that produced the match
    pub method: MatchMethod,
}

/// Outcome of a full replacement run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of image files found in the reference tree
    pub reference_count: usize,

    /// Number of candidate target files considered
    pub targets_scanned: usize,

    /// Replacements, in processing order
    pub replacements: Vec<MatchResult>,

    /// Targets for which no tier produced a match, in processing order
    pub unmatched: Vec<PathBuf>,

    /// Whether filesystem mutations were suppressed
    pub dry_run: bool,

    /// Backup directory, set only once a backup has actually been written
    pub backup_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("test.jpg")));
        assert!(has_image_extension(Path::new("test.JPEG")));
        assert!(has_image_extension(Path::new("dir/test.Png")));
        assert!(has_image_extension(Path::new("favicon.ico")));
        assert!(has_image_extension(Path::new("logo.svg")));
        assert!(!has_image_extension(Path::new("test.tiff")));
        assert!(!has_image_extension(Path::new("test.txt")));
        assert!(!has_image_extension(Path::new("jpg")));
        assert!(!has_image_extension(Path::new("test")));
        assert!(!has_image_extension(Path::new("")));
    }

    #[test]
    fn test_bare_extension_is_an_image() {
        assert!(has_image_extension(Path::new(".png")));
        assert!(has_image_extension(Path::new("dir/.JPG")));
        assert!(!has_image_extension(Path::new(".txt")));
    }

    #[test]
    fn test_method_tags() {
        assert_eq!(MatchMethod::ExactFilename.to_string(), "exact_filename");
        assert_eq!(MatchMethod::StemMatch.to_string(), "stem_match");
        assert_eq!(
            MatchMethod::FuzzyMatch("beach-sunset".into()).to_string(),
            "fuzzy_match(beach-sunset)"
        );
        assert_eq!(
            MatchMethod::Partial("logo".into()).to_string(),
            "partial(logo)"
        );
    }
}
