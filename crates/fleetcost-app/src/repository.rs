//! Repository adapters for persistence layer

use fleetcost_infra::persistence::FileEquipmentRepository;
use fleetcost_types::Result;

use crate::config::Config;
use crate::fleet_store::FleetStore;

/// Open file-based equipment repository
pub fn open_equipment_repo(config: &Config) -> Result<FileEquipmentRepository> {
    let store_dir = config.store_dir()?;
    FileEquipmentRepository::open(store_dir)
}

/// Open a loaded fleet store using the configured directory and default filters
pub fn open_fleet_store(config: &Config) -> Result<FleetStore<FileEquipmentRepository>> {
    let repo = open_equipment_repo(config)?;
    let mut store = FleetStore::with_filters(repo, config.filters());
    store.load();
    Ok(store)
}
