use std::collections::HashSet;

use tracing::debug;

use crate::record::Record;

/// Why a candidate counts as already known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownBy {
    Title,
    Body,
}

/// Titles and non-empty bodies of the reference set.
pub struct ReferenceIndex<'a> {
    titles: HashSet<&'a str>,
    bodies: HashSet<&'a str>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn build(reference: &'a [Record]) -> Self {
        ReferenceIndex {
            titles: reference.iter().map(|r| r.title.as_str()).collect(),
            bodies: reference.iter().filter_map(Record::body_text).collect(),
        }
    }

    /// Exact title match first, then exact body match when both bodies are non-empty.
    pub fn match_for(&self, candidate: &Record) -> Option<KnownBy> {
        if self.titles.contains(candidate.title.as_str()) {
            return Some(KnownBy::Title);
        }
        candidate
            .body_text()
            .filter(|body| self.bodies.contains(body))
            .map(|_| KnownBy::Body)
    }
}

/// Candidates not present in `reference`, in their original order.
pub fn filter_new(candidates: &[Record], reference: &[Record]) -> Vec<Record> {
    let index = ReferenceIndex::build(reference);
    candidates
        .iter()
        .filter(|candidate| match index.match_for(candidate) {
            Some(by) => {
                debug!("Skipping known prompt {:?} (matched by {:?})", candidate.title, by);
                false
            }
            None => true,
        })
        .cloned()
        .collect()
}

// ── Tests ──
