//! JSON documents on disk.
//!
//! Files are written pretty-printed with four-space indentation and sorted
//! object keys, so a dump is stable and diffable and loads back equal.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, info};

use super::StorageError;
use crate::models::{MatchDocument, Resource};

/// Load a match document from a JSON file.
pub fn load_document(path: &Path) -> Result<MatchDocument, StorageError> {
    debug!("Loading match document from {}", path.display());
    let contents = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| StorageError::json(path, e))
}

/// Recursively rebuild every object with its keys in sorted order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Serialize to pretty JSON with sorted keys.
pub fn to_sorted_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = sort_keys(serde_json::to_value(value)?);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a value to `path` as sorted, pretty JSON, creating parent dirs.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let text = to_sorted_json(value).map_err(|e| StorageError::json(path, e))?;
    let mut file = fs::File::create(path).map_err(|e| StorageError::io(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| StorageError::io(path, e))?;
    file.write_all(b"\n").map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

/// Saves fetched matches and their included assets, one file each.
#[derive(Debug, Clone)]
pub struct HarvestWriter {
    output_dir: PathBuf,
}

impl HarvestWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `{id}_data.json`
    pub fn match_path(&self, m: &Resource) -> PathBuf {
        self.output_dir.join(format!("{}_data.json", m.id))
    }

    /// `{id}_{type}.json`
    pub fn included_path(&self, item: &Resource) -> PathBuf {
        self.output_dir.join(format!("{}_{}.json", item.id, item.kind))
    }

    pub fn save_match(&self, m: &Resource) -> Result<PathBuf, StorageError> {
        let path = self.match_path(m);
        write_json(&path, m)?;
        info!("Saved match data to {}", path.display());
        Ok(path)
    }

    pub fn save_included(&self, item: &Resource) -> Result<PathBuf, StorageError> {
        let path = self.included_path(item);
        write_json(&path, item)?;
        info!("Saved included {} to {}", item.kind, path.display());
        Ok(path)
    }

    /// Save every primary and included resource of a document.
    pub fn save_document(&self, document: &MatchDocument) -> Result<Vec<PathBuf>, StorageError> {
        let mut written = Vec::new();
        for m in document.primary() {
            written.push(self.save_match(m)?);
        }
        for item in &document.included {
            written.push(self.save_included(item)?);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::fixtures::two_match_document;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_sorted_json_orders_keys_and_indents() {
        let mut r = Resource::new("roster", "r1");
        r.attributes
            .insert("stats".to_string(), json!({"zeta": 1, "alpha": 2}));

        let text = to_sorted_json(&r).unwrap();

        let attributes = text.find("\"attributes\"").unwrap();
        let id = text.find("\"id\"").unwrap();
        let kind = text.find("\"type\"").unwrap();
        assert!(attributes < id && id < kind);
        assert!(text.find("\"alpha\"").unwrap() < text.find("\"zeta\"").unwrap());
        assert!(text.contains("\n    \"attributes\""));
    }

    #[test]
    fn test_document_dump_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("demo.json");
        let doc = two_match_document();

        write_json(&path, &doc).unwrap();
        let loaded = load_document(&path).unwrap();

        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_document_reports_bad_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            load_document(&path),
            Err(StorageError::Json { .. })
        ));
    }

    #[test]
    fn test_harvest_file_names() {
        let writer = HarvestWriter::new(PathBuf::from("saved_matches"));
        let m = Resource::new("match", "m1");
        let p = Resource::new("participant", "pa1");

        assert_eq!(writer.match_path(&m), PathBuf::from("saved_matches/m1_data.json"));
        assert_eq!(
            writer.included_path(&p),
            PathBuf::from("saved_matches/pa1_participant.json")
        );
    }

    #[test]
    fn test_harvest_save_document() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = HarvestWriter::new(tmp.path().join("saved"));
        let doc = two_match_document();

        let written = writer.save_document(&doc).unwrap();

        assert_eq!(written.len(), doc.primary().len() + doc.included.len());
        assert!(written.iter().all(|p| p.exists()));

        let saved: Resource =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(saved, doc.primary()[0]);
    }

    #[test]
    fn test_bundled_demo_data_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/demo-data.json");
        let doc = load_document(&path).unwrap();
        let index = crate::parse::DocumentIndex::new(&doc);

        assert_eq!(doc.match_ids().len(), 3);
        for id in doc.match_ids() {
            assert_eq!(index.rosters_for_match(id).len(), 2);
            assert_eq!(index.participants_for_match(id).len(), 6);
        }
        assert_eq!(crate::parse::pair_users(&doc.included).len(), 18);
    }
}
