//! Core functionality for replacing images with their reference counterparts.
//!
//! This library provides the components of a one-shot replacement run:
//! - Reference discovery and indexing by name and normalized stem
//! - Tiered name matching (exact, stem, fuzzy, containment)
//! - Backup-then-overwrite of matched targets
//! - Run reporting

// -- External Dependencies --
use chrono::Local;
use log::{debug, info};

// -- Standard Library --
use std::io::{self, Write};

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use error::{Error, Result};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod discovery;
pub mod index;
pub mod logging;
pub mod matcher;
pub mod normalize;
pub mod replace;
pub mod report;
pub mod similarity;
pub mod types;

use crate::index::ReferenceIndex;
use crate::matcher::Matcher;
use crate::replace::{backup_dir_name, Replacer};
use crate::report::write_progress;

/// Main entry point for a replacement run
pub struct ImageReplacer {
    config: Config,
}

impl ImageReplacer {
    /// Create a new ImageReplacer, validating the provided configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline, printing progress and the summary to stdout
    pub fn run(&self) -> Result<RunReport> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let report = self.run_with_output(&mut out)?;
        report.write_summary(&mut out)?;
        Ok(report)
    }

    /// Run the full pipeline, writing one progress line per replaced target to `out`.
    ///
    /// Targets are processed one at a time to completion; an I/O failure stops
    /// the run with earlier replacements and backups left in place.
    pub fn run_with_output<W: Write>(&self, out: &mut W) -> Result<RunReport> {
        let config = &self.config;

        info!("Indexing reference images in {}", config.reference_dir.display());
        let index = ReferenceIndex::build(&config.reference_dir)?;
        info!("Indexed {} reference images", index.len());

        let targets = discovery::discover_targets(&config.target_dir)?;
        info!("Found {} target images", targets.len());

        let backup_root = config
            .make_backup
            .then(|| config.target_dir.join(backup_dir_name(Local::now())));
        let mut replacer = Replacer::new(&config.target_dir, backup_root, config.dry_run);
        let matcher = Matcher::new(&index, config.fuzzy_cutoff);

        let mut report = RunReport {
            reference_count: index.len(),
            targets_scanned: targets.len(),
            dry_run: config.dry_run,
            ..Default::default()
        };

        for target in targets {
            let file_name = match target.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };

            let Some(candidate) = matcher.find(&file_name) else {
                debug!("No match for {}", target.display());
                report.unmatched.push(target);
                continue;
            };

            replacer.apply(&target, candidate.source)?;

            let result = MatchResult {
                target,
                source: candidate.source.to_path_buf(),
                method: candidate.method,
            };
            write_progress(&mut *out, &result, config.dry_run)?;
            report.replacements.push(result);
        }

        report.backup_dir = replacer.backup_dir().map(|dir| dir.to_path_buf());

        info!(
            "Run finished: {} replaced, {} unmatched",
            report.replacements.len(),
            report.unmatched.len()
        );

        Ok(report)
    }
}
