use std::io::{self, Write};
use std::path::Path;

use crate::types::{MatchResult, RunReport};

/// Unmatched targets listed in the summary before truncating
pub const UNMATCHED_PREVIEW: usize = 20;

/// Progress line printed as each target is processed
pub fn write_progress<W: Write>(out: &mut W, result: &MatchResult, dry_run: bool) -> io::Result<()> {
    writeln!(
        out,
        "{}: {} <= {} ({})",
        if dry_run { "would replace" } else { "replaced" },
        result.target.display(),
        result.source.display(),
        result.method
    )
}

impl RunReport {
    /// Write the end-of-run summary block
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "==== SUMMARY ====")?;
        writeln!(out, "Total reference images scanned: {}", self.reference_count)?;
        writeln!(out, "Total target images considered: {}", self.targets_scanned)?;
        if self.dry_run {
            writeln!(out, "Total replacements planned (dry run): {}", self.replacements.len())?;
        } else {
            writeln!(out, "Total replacements performed: {}", self.replacements.len())?;
        }

        if !self.replacements.is_empty() {
            writeln!(out)?;
            writeln!(out, "Replacements (target <= source):")?;
            for result in &self.replacements {
                writeln!(
                    out,
                    " - {} <= {}   [{}]",
                    result.target.display(),
                    result.source.display(),
                    result.method
                )?;
            }
        }

        if !self.unmatched.is_empty() {
            writeln!(out)?;
            writeln!(out, "Files left unmatched: {}", self.unmatched.len())?;
            writeln!(out, "Examples (first {}):", UNMATCHED_PREVIEW)?;
            for path in self.unmatched.iter().take(UNMATCHED_PREVIEW) {
                writeln!(out, " - {}", path.display())?;
            }
        }

        match self.backup_dir.as_deref() {
            Some(dir) => write_backup_location(out, dir)?,
            None if !self.dry_run => {
                writeln!(out)?;
                writeln!(out, "No backups created.")?;
            }
            None => {}
        }

        writeln!(out)?;
        writeln!(out, "Done.")
    }

    /// Summary as a string, for logging and tests
    pub fn summary(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_summary(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

fn write_backup_location<W: Write>(out: &mut W, dir: &Path) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Backups (original targets) are in: {}", dir.display())
}
