//! Export/import — file artifacts with an explicit merge-or-replace choice.
//!
//! Import is all-or-nothing: the first structurally bad record rejects the
//! whole artifact with no state change. A parsed artifact is held as a
//! `PendingImport` until the caller supplies a resolution; the store applies
//! it (see `TerritoryStore::apply_import`).

use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use terramark_core::{Collection, Error, Result, Territory};

/// How a validated import is applied to the existing collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportResolution {
    /// Append imported records to the existing collection. No dedup by
    /// name — duplicates are preserved as-is.
    Merge,
    /// Discard the existing collection and adopt the imported one.
    Replace,
}

/// A parsed and validated artifact that has not yet touched any state.
/// Dropping it abandons the import with no side effect.
#[derive(Debug)]
pub struct PendingImport {
    territories: Collection,
}

impl PendingImport {
    /// Parse an artifact. Every record must carry at minimum a non-empty
    /// `name`, a `coordinates` sequence, `price`, and `status`.
    pub fn parse(artifact: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(artifact)
            .map_err(|e| Error::import_invalid(format!("not valid JSON: {}", e)))?;

        let records = value
            .as_array()
            .ok_or_else(|| Error::import_invalid("artifact must be an array of territories"))?;
        for (index, record) in records.iter().enumerate() {
            validate_record(index, record)?;
        }

        let territories: Collection = serde_json::from_value(value)
            .map_err(|e| Error::import_invalid(e.to_string()))?;
        Ok(Self { territories })
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn into_territories(self) -> Collection {
        self.territories
    }
}

fn validate_record(index: usize, record: &Value) -> Result<()> {
    let obj = record
        .as_object()
        .ok_or_else(|| Error::import_invalid(format!("record {}: not an object", index)))?;

    let name = match obj.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(Error::import_invalid(format!(
                "record {}: missing or empty name",
                index
            )))
        }
    };

    // Structural check only: a sequence, not length-validated here.
    if !obj.get("coordinates").map(Value::is_array).unwrap_or(false) {
        return Err(Error::import_invalid(format!(
            "record {} ({}): coordinates must be a sequence",
            index, name
        )));
    }
    if obj.get("price").and_then(Value::as_str).is_none() {
        return Err(Error::import_invalid(format!(
            "record {} ({}): missing price",
            index, name
        )));
    }
    if obj.get("status").and_then(Value::as_str).is_none() {
        return Err(Error::import_invalid(format!(
            "record {} ({}): missing status",
            index, name
        )));
    }
    Ok(())
}

/// Default artifact file name, stamped with the current date.
pub fn default_export_name() -> String {
    format!("terramark_territories_{}.json", Utc::now().format("%Y-%m-%d"))
}

/// Pretty-printed artifact body. Pure: no stored state is touched.
pub fn export_to_string(territories: &[Territory]) -> Result<String> {
    serde_json::to_string_pretty(territories).map_err(|e| Error::export_failed(e.to_string()))
}

pub fn export_to_file(territories: &[Territory], path: &Path) -> Result<()> {
    let body = export_to_string(territories)?;
    std::fs::write(path, body).map_err(|e| {
        Error::export_failed(format!("cannot write {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use terramark_core::seed::default_territories;

    #[test]
    fn export_then_import_round_trips() {
        let territories = default_territories();
        let artifact = export_to_string(&territories).unwrap();
        let pending = PendingImport::parse(&artifact).unwrap();
        assert_eq!(pending.territories(), &territories[..]);
    }

    #[test]
    fn export_omits_ids() {
        let artifact = export_to_string(&default_territories()).unwrap();
        assert!(!artifact.contains("\"id\""));
    }

    #[test]
    fn record_missing_status_rejects_whole_artifact() {
        let artifact = r#"[
            {"name": "A", "coordinates": [[1,2],[3,4],[5,6]], "price": "1", "status": "ready"},
            {"name": "B", "coordinates": [[1,2],[3,4],[5,6]], "price": "2"}
        ]"#;
        let err = PendingImport::parse(artifact).unwrap_err();
        assert!(matches!(err, Error::ImportInvalid(_)));
        assert!(err.to_string().contains("record 1"));
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn non_array_artifact_is_rejected() {
        let err = PendingImport::parse(r#"{"name": "A"}"#).unwrap_err();
        assert!(matches!(err, Error::ImportInvalid(_)));
    }

    #[test]
    fn coordinates_must_be_a_sequence() {
        let artifact = r#"[{"name": "A", "coordinates": "oops", "price": "1", "status": "ready"}]"#;
        assert!(PendingImport::parse(artifact).is_err());
    }

    #[test]
    fn default_name_is_date_stamped() {
        let name = default_export_name();
        assert!(name.starts_with("terramark_territories_"));
        assert!(name.ends_with(".json"));
    }
}
