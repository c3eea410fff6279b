//! Domain services

pub mod cost_model;
pub mod fleet_view;
pub mod validation;

pub use cost_model::compute_all;
pub use fleet_view::{
    category_breakdown, equipment_metrics, filter_and_sort, fleet_stats, most_recent,
    needs_attention, CategorySummary, EquipmentMetrics, FilterUpdate, Filters, FleetStats,
    SortKey, SortOrder,
};
pub use validation::{quality_alerts, validate_form, AlertLevel, FormValidation, QualityAlert};
