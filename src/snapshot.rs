use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dedup;
use crate::error::HarvestError;
use crate::parser;
use crate::record::{Record, SourceDescriptor};

/// Whether the source could be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Ok,
    Unreachable { kind: String, reason: String },
}

/// The single document a `run` writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub source: String,
    pub origin_link: String,
    pub fetched_at: DateTime<Utc>,
    pub outcome: Outcome,
    pub candidates: usize,
    pub records: Vec<Record>,
}

impl Snapshot {
    /// Extract and filter a fetched document. A failed fetch becomes an
    /// `Unreachable` snapshot with no records instead of an error.
    pub fn harvest(
        source: &SourceDescriptor,
        fetched: Result<String, HarvestError>,
        reference: &[Record],
    ) -> Self {
        let (outcome, candidates, records) = match fetched {
            Ok(document) => {
                let candidates = parser::extract(&document, source);
                let fresh = dedup::filter_new(&candidates, reference);
                info!(
                    "Extracted {} candidates from {}, {} new",
                    candidates.len(),
                    source.name,
                    fresh.len()
                );
                (Outcome::Ok, candidates.len(), fresh)
            }
            Err(e) => {
                warn!("Source {} unreachable: {}", source.name, e);
                let outcome = Outcome::Unreachable {
                    kind: e.kind().to_string(),
                    reason: e.to_string(),
                };
                (outcome, 0, Vec::new())
            }
        };

        Snapshot {
            source: source.name.clone(),
            origin_link: source.origin_link(),
            fetched_at: Utc::now(),
            outcome,
            candidates,
            records,
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SourceDescriptor {
        SourceDescriptor {
            name: "fixture".into(),
            location: "https://raw.githubusercontent.com/example/awesome-prompts/main/README.md"
                .into(),
            attribution: "example".into(),
            mode: "generate".into(),
            category: "image".into(),
            sub_category: "general".into(),
        }
    }

    #[test]
    fn harvest_filters_known_records() {
        let md = std::fs::read_to_string("tests/fixtures/awesome.md").unwrap();
        let known = parser::extract("## Example 1: Ghibli Portrait\n> old\n", &source());

        let snap = Snapshot::harvest(&source(), Ok(md), &known);
        assert_eq!(snap.outcome, Outcome::Ok);
        assert_eq!(snap.candidates, 5);
        let titles: Vec<_> = snap.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Example 2: Isometric Room", "Example 4: Two Takes", "Example 5: Image Only"]
        );
        assert_eq!(
            snap.origin_link,
            "https://github.com/example/awesome-prompts/blob/main/README.md"
        );
    }

    #[test]
    fn failed_fetch_yields_empty_unreachable_snapshot() {
        let err = HarvestError::UnknownSource("gone".into());
        let snap = Snapshot::harvest(&source(), Err(err), &[]);
        assert_eq!(snap.candidates, 0);
        assert!(snap.records.is_empty());
        assert!(matches!(&snap.outcome, Outcome::Unreachable { kind, .. } if kind == "unknown-source"));
    }

    #[test]
    fn outcome_wire_format() {
        let ok = serde_json::to_value(Outcome::Ok).unwrap();
        assert_eq!(ok, serde_json::json!({ "status": "ok" }));

        let down = Outcome::Unreachable {
            kind: "http-status".into(),
            reason: "404".into(),
        };
        assert_eq!(
            serde_json::to_value(down).unwrap(),
            serde_json::json!({ "status": "unreachable", "kind": "http-status", "reason": "404" })
        );
    }
}
