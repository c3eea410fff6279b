//! Domain model types

pub mod equipment;
mod lenient;
pub mod presets;

pub use equipment::{
    CalculatedCosts, EquipmentFinancial, EquipmentIdentity, EquipmentInput, EquipmentMetadata,
    EquipmentRecord, EquipmentStatus, EquipmentUsage, MaintenanceLevel, ResaleValue,
};
pub use presets::{MaintenancePreset, UsagePreset, ALL_CATEGORIES, EQUIPMENT_CATEGORIES};
