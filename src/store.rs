use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{HarvestError, Result};
use crate::record::Record;
use crate::snapshot::Snapshot;

/// Accepted shapes of the reference file: a bare record array, or a
/// snapshot written by an earlier run.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReferenceFile {
    Records(Vec<Value>),
    Snapshot { records: Vec<Value> },
}

/// Load previously known records. Any failure degrades to an empty set.
pub fn load_reference(path: &Path) -> Vec<Record> {
    match read_reference(path) {
        Ok(records) => {
            info!("Loaded {} known records from {:?}", records.len(), path);
            records
        }
        Err(e) => {
            warn!("Treating reference set as empty: {}", e);
            Vec::new()
        }
    }
}

fn read_reference(path: &Path) -> Result<Vec<Record>> {
    let raw = fs::read_to_string(path).map_err(|source| HarvestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ReferenceFile = serde_json::from_str(&raw).map_err(|source| HarvestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = match file {
        ReferenceFile::Records(entries) | ReferenceFile::Snapshot { records: entries } => entries,
    };

    let total = entries.len();
    let records: Vec<Record> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed reference entry #{}: {}", i, e);
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!("{} of {} reference entries were unusable", total - records.len(), total);
    }
    Ok(records)
}

/// Serialize `snapshot` and move it into place at `path`.
///
/// The JSON is rendered in memory and written to a sibling temp file first,
/// so `path` only ever holds a complete document.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).map_err(HarvestError::Serialize)?;
    let write_err = |source| HarvestError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, json + "\n").map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;

    info!("Wrote {} records to {:?}", snapshot.records.len(), path);
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SourceDescriptor;

    fn source() -> SourceDescriptor {
        SourceDescriptor {
            name: "fixture".into(),
            location: "https://example.com/README.md".into(),
            attribution: "example".into(),
            mode: "generate".into(),
            category: "image".into(),
            sub_category: "general".into(),
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_reference(&dir.path().join("nope.json")).is_empty());
    }

    #[test]
    fn garbage_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_reference(&path).is_empty());
    }

    #[test]
    fn loads_record_array_and_skips_bad_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        fs::write(
            &path,
            r#"[
                {"title": "A", "body": "a", "originLink": "https://x", "subCategory": "s"},
                {"title": 42},
                {"title": "B", "preview": "https://x/b.png", "extra": true}
            ]"#,
        )
        .unwrap();

        let records = load_reference(&path);
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(records[0].sub_category, "s");
    }

    #[test]
    fn snapshot_round_trips_as_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("new_prompts.json");

        let snap = Snapshot::harvest(&source(), Ok("## A\n> a\n## B\n> b\n".into()), &[]);
        write_snapshot(&path, &snap).unwrap();

        assert!(!temp_path(&path).exists());
        let reloaded = load_reference(&path);
        assert_eq!(reloaded, snap.records);
    }

    #[test]
    fn snapshot_uses_record_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_prompts.json");

        let snap = Snapshot::harvest(&source(), Ok("## A\n> a\n".into()), &[]);
        write_snapshot(&path, &snap).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let record = &json["records"][0];
        for key in ["title", "body", "attribution", "originLink", "mode", "category", "subCategory"] {
            assert!(record.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["outcome"]["status"], "ok");
        assert_eq!(json["candidates"], 1);
    }

    #[test]
    fn write_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_prompts.json");
        fs::write(&path, "old").unwrap();

        let snap = Snapshot::harvest(&source(), Ok(String::new()), &[]);
        write_snapshot(&path, &snap).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"records\": []"));
    }
}
