//! Fleet Store - single owner of the fleet collection and its derived view
//!
//! Every transition runs to completion before returning: durable writes go
//! through the repository first, and in-memory state only changes once they
//! succeed. The derived view is recomputed after every transition.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use fleetcost_domain::model::{CalculatedCosts, EquipmentInput, EquipmentRecord, EquipmentStatus};
use fleetcost_domain::repository::EquipmentRepository;
use fleetcost_domain::service::{
    category_breakdown, equipment_metrics, filter_and_sort, fleet_stats, most_recent,
    needs_attention, quality_alerts, validate_form, CategorySummary, EquipmentMetrics,
    FilterUpdate, Filters, FleetStats, FormValidation, QualityAlert, SortKey, SortOrder,
};
use fleetcost_infra::persistence::{
    export_snapshot, import_snapshot, ExportedSnapshot, ImportOutcome, MemoryEquipmentRepository,
};
use fleetcost_types::{Error, Result};

/// Suffix appended to the name of a duplicated record
pub const COPY_SUFFIX: &str = " (Copy)";

/// Cost model and advisory checks for inputs that are not saved yet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationPreview {
    pub calculated: CalculatedCosts,
    pub validation: FormValidation,
    pub alerts: Vec<QualityAlert>,
}

pub fn preview(input: &EquipmentInput) -> CalculationPreview {
    let calculated = input.calculate();
    CalculationPreview {
        calculated,
        validation: validate_form(input),
        alerts: quality_alerts(&calculated, &input.usage),
    }
}

fn log_failure(operation: &str, id: &str, error: &Error) {
    if error.is_durability() {
        warn!(operation, id, error = %error, "durable write failed");
    } else {
        debug!(operation, id, error = %error, "operation rejected");
    }
}

/// In-memory fleet state backed by an [`EquipmentRepository`]
pub struct FleetStore<R: EquipmentRepository> {
    repo: R,
    equipment: Vec<EquipmentRecord>,
    filters: Filters,
    derived_view: Vec<EquipmentRecord>,
}

impl<R: EquipmentRepository> FleetStore<R> {
    /// Empty store with default filters; call [`load`](Self::load) to populate
    pub fn new(repo: R) -> Self {
        Self::with_filters(repo, Filters::default())
    }

    pub fn with_filters(repo: R, filters: Filters) -> Self {
        Self {
            repo,
            equipment: Vec::new(),
            filters,
            derived_view: Vec::new(),
        }
    }

    fn refresh_view(&mut self) {
        self.derived_view = filter_and_sort(&self.equipment, &self.filters);
    }

    /// Replace the in-memory collection with the repository's snapshot
    pub fn load(&mut self) {
        let mut equipment = self.repo.read_all();
        for record in equipment.iter_mut() {
            record.recalculate();
        }
        self.equipment = equipment;
        self.refresh_view();
        debug!(count = self.equipment.len(), "fleet loaded");
    }

    /// Create a record from `input` and store it durably
    ///
    /// On a failed write nothing changes in memory.
    pub fn add(&mut self, input: EquipmentInput) -> Result<EquipmentRecord> {
        let record = EquipmentRecord::new(Uuid::new_v4().to_string(), input, Utc::now());

        if let Err(e) = self.repo.append(&record) {
            log_failure("add", &record.id, &e);
            return Err(e);
        }

        self.equipment.push(record.clone());
        self.refresh_view();
        info!(id = %record.id, name = %record.identity.display_name(), "equipment added");
        Ok(record)
    }

    /// Replace the inputs of an existing record
    ///
    /// Fails with [`Error::NotFound`] if `id` is not in the durable store.
    pub fn update(&mut self, id: &str, input: EquipmentInput) -> Result<EquipmentRecord> {
        let mut record = self.stored(id)?;
        record.apply_input(input, Utc::now());
        self.commit(record)
    }

    /// Change the lifecycle status of a record
    pub fn set_status(&mut self, id: &str, status: EquipmentStatus) -> Result<EquipmentRecord> {
        let mut record = self.stored(id)?;
        record.metadata.status = status;
        record.touch(Utc::now());
        self.commit(record)
    }

    /// Add a copy of a record's inputs under a new id
    pub fn duplicate(&mut self, id: &str) -> Result<EquipmentRecord> {
        let source = self
            .get_by_id(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let mut input = source.input();
        input.identity.equipment_name.push_str(COPY_SUFFIX);
        self.add(input)
    }

    /// Delete a record; `Ok(false)` if it was already absent
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let removed = self.repo.remove_by_id(id)?;
        self.equipment.retain(|r| r.id != id);
        self.refresh_view();
        if removed {
            info!(id, "equipment removed");
        } else {
            debug!(id, "remove of absent id ignored");
        }
        Ok(removed)
    }

    fn stored(&self, id: &str) -> Result<EquipmentRecord> {
        self.repo
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn commit(&mut self, record: EquipmentRecord) -> Result<EquipmentRecord> {
        if let Err(e) = self.repo.replace(&record.id, &record) {
            log_failure("update", &record.id, &e);
            return Err(e);
        }

        match self.equipment.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => self.equipment.push(record.clone()),
        }
        self.refresh_view();
        info!(id = %record.id, "equipment updated");
        Ok(record)
    }

    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
        self.refresh_view();
        debug!(filters = ?self.filters, "filters changed");
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.set_filter(FilterUpdate {
            search: Some(text.into()),
            ..Default::default()
        });
    }

    pub fn set_sort(&mut self, sort_by: SortKey, sort_order: SortOrder) {
        self.set_filter(FilterUpdate {
            sort_by: Some(sort_by),
            sort_order: Some(sort_order),
            ..Default::default()
        });
    }

    pub fn get_by_id(&self, id: &str) -> Option<&EquipmentRecord> {
        self.equipment.iter().find(|r| r.id == id)
    }

    pub fn equipment(&self) -> &[EquipmentRecord] {
        &self.equipment
    }

    pub fn derived_view(&self) -> &[EquipmentRecord] {
        &self.derived_view
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn stats(&self) -> FleetStats {
        fleet_stats(&self.equipment)
    }

    pub fn category_breakdown(&self) -> BTreeMap<String, CategorySummary> {
        category_breakdown(&self.equipment)
    }

    /// The `limit` most recently added records
    pub fn recent(&self, limit: usize) -> Vec<EquipmentRecord> {
        most_recent(&self.equipment, limit)
    }

    pub fn needing_attention(&self, current_year: i32) -> Vec<&EquipmentRecord> {
        self.equipment
            .iter()
            .filter(|r| needs_attention(r, current_year))
            .collect()
    }

    /// A record together with its age and value metrics
    pub fn with_metrics(
        &self,
        id: &str,
        current_year: i32,
    ) -> Option<(&EquipmentRecord, EquipmentMetrics)> {
        self.get_by_id(id)
            .map(|record| (record, equipment_metrics(record, current_year)))
    }

    /// Serialize the durable collection as an export document
    pub fn export(&self) -> Result<ExportedSnapshot> {
        export_snapshot(&self.repo, Utc::now())
    }

    /// Merge an export document into the store, then reload
    pub fn import(&mut self, payload: &str) -> Result<ImportOutcome> {
        let outcome = import_snapshot(&self.repo, payload)?;
        self.load();
        Ok(outcome)
    }

    /// What [`import`](Self::import) would do, without touching the store
    pub fn import_preview(&self, payload: &str) -> Result<ImportOutcome> {
        let scratch = MemoryEquipmentRepository::with_equipment(self.repo.read_all());
        import_snapshot(&scratch, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetcost_domain::model::{MaintenanceLevel, ResaleValue};
    use fleetcost_domain::service::AlertLevel;
    use std::cell::{Cell, RefCell};

    /// Repository whose writes can be switched to fail
    #[derive(Default)]
    struct FlakyRepository {
        equipment: RefCell<Vec<EquipmentRecord>>,
        fail_writes: Cell<bool>,
    }

    impl EquipmentRepository for FlakyRepository {
        fn read_all(&self) -> Vec<EquipmentRecord> {
            self.equipment.borrow().clone()
        }

        fn write_all(&self, equipment: &[EquipmentRecord]) -> Result<()> {
            if self.fail_writes.get() {
                return Err(Error::Storage("quota exceeded".to_string()));
            }
            *self.equipment.borrow_mut() = equipment.to_vec();
            Ok(())
        }
    }

    fn input(name: &str, make: &str, category: &str) -> EquipmentInput {
        let mut input = EquipmentInput::default();
        input.identity.equipment_name = name.to_string();
        input.identity.make = make.to_string();
        input.identity.model = "M1".to_string();
        input.identity.category = category.to_string();
        input.identity.year = Some(2020);
        input.usage.days_per_year = Some(200.0);
        input.usage.hours_per_day = Some(6.0);
        input.financial.purchase_price = Some(65000.0);
        input.financial.resale = ResaleValue::Manual(13000.0);
        input.financial.years_of_service = Some(7.0);
        input.financial.daily_fuel_cost = Some(100.0);
        input.financial.maintenance_level = Some(MaintenanceLevel::Standard);
        input.financial.annual_insurance_cost = Some(3000.0);
        input
    }

    fn seeded() -> FleetStore<MemoryEquipmentRepository> {
        let mut store = FleetStore::new(MemoryEquipmentRepository::new());
        store.add(input("Mulcher", "Caterpillar", "Forestry Mulcher")).unwrap();
        store.add(input("Loader", "Bobcat", "Skid Steer")).unwrap();
        store.add(input("Crew truck", "Ford", "Pickup Truck")).unwrap();
        store.add(input("Hauler", "Kenworth", "Dump Truck")).unwrap();
        store
    }

    fn names(view: &[EquipmentRecord]) -> Vec<&str> {
        view.iter().map(|r| r.identity.equipment_name.as_str()).collect()
    }

    #[test]
    fn test_add_computes_and_persists() {
        let mut store = FleetStore::new(MemoryEquipmentRepository::new());
        let record = store.add(input("Mulcher", "Caterpillar", "Forestry Mulcher")).unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.calculated.hourly_cost, 27.52);
        assert_eq!(record.calculated.recommended_rate, 35.78);
        assert_eq!(record.metadata.status, EquipmentStatus::Active);
        assert_eq!(record.metadata.date_added, record.metadata.last_modified);
        assert_eq!(store.derived_view().len(), 1);
        assert_eq!(store.repository().read_all(), vec![record]);
    }

    #[test]
    fn test_add_failure_leaves_state_unchanged() {
        let mut store = FleetStore::new(FlakyRepository::default());
        store.add(input("Mulcher", "Caterpillar", "Forestry Mulcher")).unwrap();
        let before = store.equipment().to_vec();

        store.repository().fail_writes.set(true);
        let err = store.add(input("Loader", "Bobcat", "Skid Steer")).unwrap_err();

        assert!(err.is_durability());
        assert_eq!(store.equipment(), before.as_slice());
        assert_eq!(store.derived_view(), before.as_slice());
        assert_eq!(store.repository().read_all(), before);
    }

    #[test]
    fn test_update_unknown_id_changes_nothing() {
        let mut store = seeded();
        let before = store.equipment().to_vec();
        let stored_before = store.repository().read_all();

        let err = store.update("missing", input("Ghost", "None", "Other")).unwrap_err();

        assert!(matches!(err, Error::NotFound(id) if id == "missing"));
        assert_eq!(store.equipment(), before.as_slice());
        assert_eq!(store.repository().read_all(), stored_before);
    }

    #[test]
    fn test_update_recomputes_and_keeps_identity() {
        let mut store = seeded();
        let original = store.equipment()[0].clone();

        let mut changed = original.input();
        changed.usage.hours_per_day = Some(8.0);
        changed.financial.resale = ResaleValue::Auto;
        let updated = store.update(&original.id, changed).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.calculated.annual_hours, 1600.0);
        assert_eq!(updated.financial.resale, ResaleValue::Auto);
        assert_eq!(updated.metadata.date_added, original.metadata.date_added);
        assert!(updated.metadata.last_modified >= original.metadata.last_modified);
        assert_eq!(store.get_by_id(&original.id), Some(&updated));
        assert_eq!(store.repository().find_by_id(&original.id), Some(updated));
    }

    #[test]
    fn test_update_write_failure_keeps_memory() {
        let mut store = FleetStore::new(FlakyRepository::default());
        let record = store.add(input("Mulcher", "Caterpillar", "Forestry Mulcher")).unwrap();
        store.repository().fail_writes.set(true);

        let mut changed = record.input();
        changed.identity.equipment_name = "Renamed".to_string();
        assert!(store.update(&record.id, changed).is_err());
        assert_eq!(store.get_by_id(&record.id), Some(&record));
    }

    #[test]
    fn test_remove() {
        let mut store = seeded();
        let id = store.equipment()[1].id.clone();

        assert!(store.remove(&id).unwrap());
        assert!(store.get_by_id(&id).is_none());
        assert!(store.derived_view().iter().all(|r| r.id != id));
        assert_eq!(store.repository().read_all().len(), 3);

        assert!(!store.remove(&id).unwrap());
        assert_eq!(store.equipment().len(), 3);
    }

    #[test]
    fn test_set_filter_all_is_idempotent() {
        let mut store = seeded();
        store.set_filter(FilterUpdate::category("All"));
        let once = store.derived_view().to_vec();
        store.set_filter(FilterUpdate::category("All"));
        assert_eq!(store.derived_view(), once.as_slice());
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn test_search_then_clear_restores_category_view() {
        let mut store = seeded();
        store.add(input("Spare mulcher", "Fecon", "Forestry Mulcher")).unwrap();
        store.set_filter(FilterUpdate::category("Forestry Mulcher"));
        let category_view = store.derived_view().to_vec();
        assert_eq!(category_view.len(), 2);

        store.set_search("cat");
        assert_eq!(names(store.derived_view()), vec!["Mulcher"]);

        store.set_search("");
        assert_eq!(store.derived_view(), category_view.as_slice());
    }

    #[test]
    fn test_set_sort() {
        let mut store = seeded();
        store.set_sort(SortKey::Name, SortOrder::Desc);
        assert_eq!(
            names(store.derived_view()),
            vec!["Mulcher", "Loader", "Hauler", "Crew truck"]
        );
        assert_eq!(store.filters().sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_load_reads_repository() {
        let seeded = seeded();
        let stored = seeded.repository().read_all();

        let mut store = FleetStore::with_filters(
            MemoryEquipmentRepository::with_equipment(stored.clone()),
            Filters {
                category: "Skid Steer".to_string(),
                ..Default::default()
            },
        );
        assert!(store.equipment().is_empty());
        store.load();
        assert_eq!(store.equipment(), stored.as_slice());
        assert_eq!(names(store.derived_view()), vec!["Loader"]);
    }

    #[test]
    fn test_stats_and_breakdown() {
        let mut store = seeded();
        let id = store.equipment()[3].id.clone();
        store.set_status(&id, EquipmentStatus::Retired).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.total_value, 260000.0);
        assert_eq!(stats.average_hourly_cost, 27.52);
        assert_eq!(stats.active_count, 3);

        let breakdown = store.category_breakdown();
        assert_eq!(breakdown.len(), 4);
        assert_eq!(breakdown["Dump Truck"].count, 1);
    }

    #[test]
    fn test_set_status_persists() {
        let mut store = seeded();
        let id = store.equipment()[0].id.clone();
        let updated = store.set_status(&id, EquipmentStatus::Maintenance).unwrap();

        assert_eq!(updated.metadata.status, EquipmentStatus::Maintenance);
        let stored = store.repository().find_by_id(&id).unwrap();
        assert_eq!(stored.metadata.status, EquipmentStatus::Maintenance);
        assert!(matches!(
            store.set_status("missing", EquipmentStatus::Retired),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate() {
        let mut store = seeded();
        let source = store.equipment()[0].clone();
        let copy = store.duplicate(&source.id).unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.identity.equipment_name, "Mulcher (Copy)");
        assert_eq!(copy.calculated, source.calculated);
        assert_eq!(store.equipment().len(), 5);
        assert!(matches!(store.duplicate("missing"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_attention_and_metrics() {
        let mut store = seeded();
        let id = store.equipment()[0].id.clone();

        // fresh records have zero utilization, so all of them are flagged
        assert_eq!(store.needing_attention(2024).len(), 4);

        let (record, metrics) = store.with_metrics(&id, 2024).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(metrics.age, 4);
        assert_eq!(metrics.total_depreciation, 7429.0 * 4.0);
        assert!(store.with_metrics("missing", 2024).is_none());

        store.set_search("zzz");
        assert_eq!(store.recent(2).len(), 2);
    }

    #[test]
    fn test_export_import_round_trip_is_noop() {
        let mut store = seeded();
        let before = store.equipment().to_vec();
        let snapshot = store.export().unwrap();

        let outcome = store.import(&snapshot.payload).unwrap();
        assert!(outcome.added.is_empty());
        assert_eq!(store.equipment(), before.as_slice());
    }

    #[test]
    fn test_import_merges_and_reloads() {
        let mut other = FleetStore::new(MemoryEquipmentRepository::new());
        other.add(input("Grinder", "Vermeer", "Stump Grinder")).unwrap();
        let payload = other.export().unwrap().payload;

        let mut store = seeded();
        let preview = store.import_preview(&payload).unwrap();
        assert_eq!(preview.added.len(), 1);
        assert_eq!(store.repository().read_all().len(), 4);

        let outcome = store.import(&payload).unwrap();
        assert_eq!(outcome.added, preview.added);
        assert_eq!(store.equipment().len(), 5);
        assert!(store.get_by_id(&outcome.added[0]).is_some());
    }

    #[test]
    fn test_import_failure_keeps_state() {
        let mut store = seeded();
        let before = store.equipment().to_vec();
        assert!(matches!(store.import(r#"{"items": []}"#), Err(Error::InvalidImport(_))));
        assert_eq!(store.equipment(), before.as_slice());
    }

    #[test]
    fn test_preview_reports_alerts_without_saving() {
        let mut cheap = input("Trailer", "Big Tex", "Other");
        cheap.usage.days_per_year = Some(100.0);
        cheap.usage.hours_per_day = Some(2.0);
        cheap.financial.purchase_price = Some(5000.0);
        cheap.financial.resale = ResaleValue::Auto;
        cheap.financial.daily_fuel_cost = Some(1.0);
        cheap.financial.maintenance_level = Some(MaintenanceLevel::Minimal);
        cheap.financial.annual_insurance_cost = Some(0.0);

        let result = preview(&cheap);
        assert!(result.validation.is_valid);
        assert_eq!(result.calculated.annual_hours, 200.0);
        assert!(result.alerts.iter().any(|a| a.level == AlertLevel::Info));
    }
}
