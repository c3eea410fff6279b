//! In-memory implementation of EquipmentRepository

use std::cell::RefCell;

use fleetcost_domain::model::EquipmentRecord;
use fleetcost_domain::repository::EquipmentRepository;
use fleetcost_types::Result;

/// Repository holding the fleet in memory; used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryEquipmentRepository {
    equipment: RefCell<Vec<EquipmentRecord>>,
}

impl MemoryEquipmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-seeded with `equipment`
    pub fn with_equipment(equipment: Vec<EquipmentRecord>) -> Self {
        Self {
            equipment: RefCell::new(equipment),
        }
    }
}

impl EquipmentRepository for MemoryEquipmentRepository {
    fn read_all(&self) -> Vec<EquipmentRecord> {
        self.equipment.borrow().clone()
    }

    fn write_all(&self, equipment: &[EquipmentRecord]) -> Result<()> {
        *self.equipment.borrow_mut() = equipment.to_vec();
        Ok(())
    }
}
