//! Repository trait definitions for data persistence

use fleetcost_types::{Error, Result};

use crate::model::EquipmentRecord;

/// Durable store for the fleet collection, kept as a single blob
///
/// Implementors provide whole-collection reads and writes; the keyed
/// operations are built on top of them and keep ids unique.
pub trait EquipmentRepository {
    /// Stored collection, or empty if nothing is stored or the blob is unreadable
    fn read_all(&self) -> Vec<EquipmentRecord>;

    /// Overwrite the stored collection in one write
    fn write_all(&self, equipment: &[EquipmentRecord]) -> Result<()>;

    /// Find a record by id
    fn find_by_id(&self, id: &str) -> Option<EquipmentRecord> {
        self.read_all().into_iter().find(|r| r.id == id)
    }

    /// Append a record whose id is not stored yet
    fn append(&self, record: &EquipmentRecord) -> Result<()> {
        let mut equipment = self.read_all();
        if equipment.iter().any(|r| r.id == record.id) {
            return Err(Error::DuplicateId(record.id.clone()));
        }
        equipment.push(record.clone());
        self.write_all(&equipment)
    }

    /// Replace the record stored under `id`; the stored id is kept
    fn replace(&self, id: &str, record: &EquipmentRecord) -> Result<()> {
        let mut equipment = self.read_all();
        let slot = equipment
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        *slot = EquipmentRecord {
            id: id.to_string(),
            ..record.clone()
        };
        self.write_all(&equipment)
    }

    /// Remove the record stored under `id`; `Ok(false)` if it was absent
    fn remove_by_id(&self, id: &str) -> Result<bool> {
        let mut equipment = self.read_all();
        let before = equipment.len();
        equipment.retain(|r| r.id != id);
        if equipment.len() == before {
            return Ok(false);
        }
        self.write_all(&equipment)?;
        Ok(true)
    }
}
