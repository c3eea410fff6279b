//! Persistence implementations
//!
//! This module provides the file-backed and in-memory implementations of
//! [`EquipmentRepository`](fleetcost_domain::repository::EquipmentRepository),
//! plus snapshot export/import on top of any of them.

mod file_equipment_repo;
mod memory_repo;
pub mod snapshot;

pub use file_equipment_repo::{FileEquipmentRepository, STORE_FILE_NAME};
pub use memory_repo::MemoryEquipmentRepository;
pub use snapshot::{export_snapshot, import_snapshot, ExportDocument, ExportedSnapshot, ImportOutcome};
