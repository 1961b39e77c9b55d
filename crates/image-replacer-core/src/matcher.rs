//! Pairs a target filename with a reference file.
//!
//! Four tiers are tried in order and the first hit wins:
//! 1. exact filename (case-insensitive)
//! 2. normalized stem equality
//! 3. fuzzy similarity of normalized stems, at or above a cutoff
//! 4. containment of one normalized stem in the other

use log::trace;
use std::path::Path;

use crate::index::ReferenceIndex;
use crate::normalize::{file_stem_of, normalize_stem};
use crate::similarity::SequenceMatcher;
use crate::types::MatchMethod;

/// Reference file chosen for a target, and how it was chosen
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub source: &'a Path,
    pub method: MatchMethod,
}

/// Stateless lookup over a [`ReferenceIndex`]
pub struct Matcher<'a> {
    index: &'a ReferenceIndex,
    fuzzy_cutoff: f64,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a ReferenceIndex, fuzzy_cutoff: f64) -> Self {
        Self {
            index,
            fuzzy_cutoff,
        }
    }

    /// Find the reference file for `file_name`, or `None` if no tier matches
    pub fn find(&self, file_name: &str) -> Option<Candidate<'a>> {
        if let Some(source) = self.index.lookup_exact(&file_name.to_lowercase()) {
            return Some(Candidate {
                source,
                method: MatchMethod::ExactFilename,
            });
        }

        let target_stem = normalize_stem(file_stem_of(file_name));

        if let Some(source) = self
            .index
            .lookup_stem(&target_stem)
            .and_then(|paths| paths.first())
        {
            return Some(Candidate {
                source,
                method: MatchMethod::StemMatch,
            });
        }

        if let Some((stem, source)) = self.fuzzy(&target_stem) {
            return Some(Candidate {
                source,
                method: MatchMethod::FuzzyMatch(stem.to_string()),
            });
        }

        self.partial(&target_stem).map(|(stem, source)| Candidate {
            source,
            method: MatchMethod::Partial(stem.to_string()),
        })
    }

    /// Best-scoring stem at or above the cutoff; earlier stems win ties
    fn fuzzy(&self, target_stem: &str) -> Option<(&'a str, &'a Path)> {
        let scorer = SequenceMatcher::new(target_stem);
        let mut best: Option<(f64, &'a str, &'a Path)> = None;

        for (stem, paths) in self.index.stems() {
            let Some(first) = paths.first() else {
                continue;
            };
            let score = scorer.ratio(stem);
            if score < self.fuzzy_cutoff {
                continue;
            }
            trace!("Fuzzy candidate {} for {} ({:.3})", stem, target_stem, score);
            if best.map_or(true, |(best_score, _, _)| score > best_score) {
                best = Some((score, stem, first.as_path()));
            }
        }

        best.map(|(_, stem, source)| (stem, source))
    }

    /// First stem, in index order, that contains or is contained by the target stem
    fn partial(&self, target_stem: &str) -> Option<(&'a str, &'a Path)> {
        self.index.stems().find_map(|(stem, paths)| {
            if stem.contains(target_stem) || target_stem.contains(stem) {
                paths.first().map(|first| (stem, first.as_path()))
            } else {
                None
            }
        })
    }
}
