//! Snapshot export and merge-import of the fleet document
//!
//! Export documents look like
//! `{ "equipment": [...], "exportDate": "<RFC 3339>", "version": "1.0" }`.
//! Import merges by id: records already in the store win, only new ids are
//! appended.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use fleetcost_domain::model::EquipmentRecord;
use fleetcost_domain::repository::EquipmentRepository;
use fleetcost_types::{Error, Result};

/// Schema version tag written into every export
pub const EXPORT_VERSION: &str = "1.0";

const EXPORT_FILE_PREFIX: &str = "equipment-directory";

/// Portable fleet document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub equipment: Vec<EquipmentRecord>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// Serialized export ready to be written somewhere
#[derive(Debug, Clone)]
pub struct ExportedSnapshot {
    pub payload: String,
    pub suggested_filename: String,
    pub document: ExportDocument,
}

/// Result of merging an import document into the store
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Stored collection after the merge
    pub equipment: Vec<EquipmentRecord>,
    /// Ids appended by this import, in document order
    pub added: Vec<String>,
    /// Records dropped because their id was already present
    pub skipped: usize,
}

/// `equipment-directory-YYYY-MM-DD.json`
pub fn suggested_filename(now: DateTime<Utc>) -> String {
    format!("{}-{}.json", EXPORT_FILE_PREFIX, now.format("%Y-%m-%d"))
}

/// Serialize the full stored collection with a timestamp and version tag
pub fn export_snapshot<R: EquipmentRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
) -> Result<ExportedSnapshot> {
    let document = ExportDocument {
        equipment: repo.read_all(),
        export_date: now,
        version: EXPORT_VERSION.to_string(),
    };
    let payload = serde_json::to_string_pretty(&document)?;
    debug!(count = document.equipment.len(), "snapshot exported");

    Ok(ExportedSnapshot {
        payload,
        suggested_filename: suggested_filename(now),
        document,
    })
}

/// Parse an import payload into records
///
/// All-or-nothing: the document must carry an `equipment` array and every
/// element must be a record with an id.
pub fn parse_import(payload: &str) -> Result<Vec<EquipmentRecord>> {
    let document: Value = serde_json::from_str(payload)?;
    let items = document
        .get("equipment")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::InvalidImport("expected an \"equipment\" list".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            EquipmentRecord::deserialize(item)
                .map_err(|e| Error::InvalidImport(format!("equipment[{}]: {}", index, e)))
        })
        .collect()
}

/// Merge `incoming` into `existing`, keeping existing ids and the first
/// occurrence of any id repeated within `incoming`
///
/// Appended records have their costs recomputed.
pub fn merge_import(
    existing: Vec<EquipmentRecord>,
    incoming: Vec<EquipmentRecord>,
) -> ImportOutcome {
    let mut seen: HashSet<String> = existing.iter().map(|r| r.id.clone()).collect();
    let mut equipment = existing;
    let mut added = Vec::new();
    let mut skipped = 0;

    for mut record in incoming {
        if !seen.insert(record.id.clone()) {
            skipped += 1;
            continue;
        }
        record.recalculate();
        added.push(record.id.clone());
        equipment.push(record);
    }

    ImportOutcome {
        equipment,
        added,
        skipped,
    }
}

/// Parse `payload` and merge it into the store with a single write
pub fn import_snapshot<R: EquipmentRepository + ?Sized>(
    repo: &R,
    payload: &str,
) -> Result<ImportOutcome> {
    let incoming = parse_import(payload)?;
    let outcome = merge_import(repo.read_all(), incoming);
    repo.write_all(&outcome.equipment)?;
    info!(
        added = outcome.added.len(),
        skipped = outcome.skipped,
        "snapshot imported"
    );
    Ok(outcome)
}
