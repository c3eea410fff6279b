//! Fleet projections: filter/search/sort view and aggregate reductions

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{EquipmentRecord, EquipmentStatus, ALL_CATEGORIES};
use crate::service::cost_model::round2;

/// Field the derived view is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Cost,
    Date,
    Category,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Cost => write!(f, "cost"),
            SortKey::Date => write!(f, "date"),
            SortKey::Category => write!(f, "category"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "cost" => Ok(SortKey::Cost),
            "date" => Ok(SortKey::Date),
            "category" => Ok(SortKey::Category),
            other => Err(format!(
                "unknown sort key '{}' (expected name, cost, date, category)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}' (expected asc, desc)", other)),
        }
    }
}

/// Active criteria for the derived view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub category: String,
    pub search: String,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
            sort_by: SortKey::Name,
            sort_order: SortOrder::Asc,
        }
    }
}

/// Partial update of [`Filters`]; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
}

impl FilterUpdate {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Default::default()
        }
    }
}

impl Filters {
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(sort_by) = update.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = update.sort_order {
            self.sort_order = sort_order;
        }
    }

    fn category_filter(&self) -> Option<&str> {
        let category = self.category.as_str();
        if category.is_empty() || category == ALL_CATEGORIES {
            None
        } else {
            Some(category)
        }
    }
}

fn matches_search(record: &EquipmentRecord, needle: &str) -> bool {
    let identity = &record.identity;
    [&identity.equipment_name, &identity.make, &identity.model]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare_by(key: SortKey, a: &EquipmentRecord, b: &EquipmentRecord) -> Ordering {
    match key {
        SortKey::Name => a.identity.equipment_name.cmp(&b.identity.equipment_name),
        SortKey::Cost => a
            .calculated
            .hourly_cost
            .partial_cmp(&b.calculated.hourly_cost)
            .unwrap_or(Ordering::Equal),
        SortKey::Date => a.metadata.date_added.cmp(&b.metadata.date_added),
        SortKey::Category => a.identity.category.cmp(&b.identity.category),
    }
}

/// Project the fleet through category filter, search, and sort
///
/// The sort is stable, so ties keep collection order in both directions.
pub fn filter_and_sort(equipment: &[EquipmentRecord], filters: &Filters) -> Vec<EquipmentRecord> {
    let category = filters.category_filter();
    let needle = filters.search.to_lowercase();

    let mut view: Vec<EquipmentRecord> = equipment
        .iter()
        .filter(|r| category.map_or(true, |c| r.identity.category == c))
        .filter(|r| needle.is_empty() || matches_search(r, &needle))
        .cloned()
        .collect();

    match filters.sort_order {
        SortOrder::Asc => view.sort_by(|a, b| compare_by(filters.sort_by, a, b)),
        SortOrder::Desc => view.sort_by(|a, b| compare_by(filters.sort_by, b, a)),
    }

    view
}

/// Fleet-level aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total_count: usize,
    pub total_value: f64,
    pub average_hourly_cost: f64,
    pub active_count: usize,
}

pub fn fleet_stats(equipment: &[EquipmentRecord]) -> FleetStats {
    let total_count = equipment.len();
    let total_value: f64 = equipment
        .iter()
        .map(|r| r.financial.purchase_price.unwrap_or(0.0))
        .sum();
    let total_hourly: f64 = equipment.iter().map(|r| r.calculated.hourly_cost).sum();
    let average_hourly_cost = if total_count > 0 {
        round2(total_hourly / total_count as f64)
    } else {
        0.0
    };
    let active_count = equipment
        .iter()
        .filter(|r| r.metadata.status == EquipmentStatus::Active)
        .count();

    FleetStats {
        total_count,
        total_value,
        average_hourly_cost,
        active_count,
    }
}

/// Aggregates for one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub count: usize,
    pub total_value: f64,
    pub average_hourly_cost: f64,
}

/// Per-category aggregates; records without a category count as "Other"
pub fn category_breakdown(equipment: &[EquipmentRecord]) -> BTreeMap<String, CategorySummary> {
    let mut groups: BTreeMap<String, Vec<&EquipmentRecord>> = BTreeMap::new();
    for record in equipment {
        let category = if record.identity.category.trim().is_empty() {
            "Other".to_string()
        } else {
            record.identity.category.clone()
        };
        groups.entry(category).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(category, records)| {
            let count = records.len();
            let total_value: f64 = records
                .iter()
                .map(|r| r.financial.purchase_price.unwrap_or(0.0))
                .sum();
            let total_hourly: f64 = records.iter().map(|r| r.calculated.hourly_cost).sum();
            let summary = CategorySummary {
                count,
                total_value,
                average_hourly_cost: round2(total_hourly / count as f64),
            };
            (category, summary)
        })
        .collect()
}

pub const ATTENTION_HOURLY_COST: f64 = 150.0;
pub const ATTENTION_AGE_YEARS: i32 = 10;
pub const ATTENTION_UTILIZATION: f64 = 30.0;

/// Age and value metrics of a record as of `current_year`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentMetrics {
    pub age: i32,
    pub current_value: f64,
    pub total_depreciation: f64,
    pub utilization_rate: f64,
}

fn record_age(record: &EquipmentRecord, current_year: i32) -> i32 {
    record
        .identity
        .year
        .map(|y| current_year.saturating_sub(y))
        .unwrap_or(0)
}

pub fn equipment_metrics(record: &EquipmentRecord, current_year: i32) -> EquipmentMetrics {
    let age = record_age(record, current_year);
    let total_depreciation = record.calculated.annual_depreciation * f64::from(age);
    let purchase_price = record.financial.purchase_price.unwrap_or(0.0);
    EquipmentMetrics {
        age,
        current_value: (purchase_price - total_depreciation).max(0.0),
        total_depreciation,
        utilization_rate: record.metadata.utilization,
    }
}

/// High hourly cost, old, or underused
pub fn needs_attention(record: &EquipmentRecord, current_year: i32) -> bool {
    let age = record_age(record, current_year);
    record.calculated.hourly_cost > ATTENTION_HOURLY_COST
        || age > ATTENTION_AGE_YEARS
        || record.metadata.utilization < ATTENTION_UTILIZATION
}

/// The `limit` most recently added records, newest first
pub fn most_recent(equipment: &[EquipmentRecord], limit: usize) -> Vec<EquipmentRecord> {
    let mut sorted = equipment.to_vec();
    sorted.sort_by(|a, b| b.metadata.date_added.cmp(&a.metadata.date_added));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EquipmentInput, EquipmentRecord};
    use chrono::{DateTime, Utc};

    fn at(ts: &str) -> DateTime<Utc> {
        ts.parse().unwrap()
    }

    fn record(id: &str, name: &str, make: &str, category: &str, hourly: f64, added: &str) -> EquipmentRecord {
        let mut input = EquipmentInput::default();
        input.identity.equipment_name = name.to_string();
        input.identity.make = make.to_string();
        input.identity.model = "X".to_string();
        input.identity.category = category.to_string();
        let mut r = EquipmentRecord::new(id.to_string(), input, at(added));
        r.calculated.hourly_cost = hourly;
        r
    }

    fn fleet() -> Vec<EquipmentRecord> {
        vec![
            record("1", "Mulcher", "Caterpillar", "Forestry Mulcher", 45.0, "2024-01-03T00:00:00Z"),
            record("2", "Chipper", "Bandit", "Chipper", 22.5, "2024-01-01T00:00:00Z"),
            record("3", "Bobcat", "Bobcat", "Skid Steer", 30.0, "2024-01-02T00:00:00Z"),
            record("4", "Crew truck", "Ford", "Pickup Truck", 12.0, "2024-01-04T00:00:00Z"),
        ]
    }

    fn ids(view: &[EquipmentRecord]) -> Vec<&str> {
        view.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_default_view_sorted_by_name() {
        let view = filter_and_sort(&fleet(), &Filters::default());
        assert_eq!(ids(&view), vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn test_category_filter() {
        let filters = Filters {
            category: "Chipper".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_and_sort(&fleet(), &filters)), vec!["2"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_make() {
        let filters = Filters {
            search: "CAT".to_string(),
            ..Default::default()
        };
        // "Bobcat" matches too
        assert_eq!(ids(&filter_and_sort(&fleet(), &filters)), vec!["3", "1"]);
    }

    #[test]
    fn test_search_ignores_category_field() {
        let filters = Filters {
            search: "pickup".to_string(),
            ..Default::default()
        };
        assert!(filter_and_sort(&fleet(), &filters).is_empty());
    }

    #[test]
    fn test_sort_by_cost_desc() {
        let filters = Filters {
            sort_by: SortKey::Cost,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(ids(&filter_and_sort(&fleet(), &filters)), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_sort_by_date() {
        let filters = Filters {
            sort_by: SortKey::Date,
            ..Default::default()
        };
        assert_eq!(ids(&filter_and_sort(&fleet(), &filters)), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn test_ties_keep_collection_order() {
        let mut equipment = fleet();
        for r in equipment.iter_mut() {
            r.identity.category = "Other".to_string();
        }
        let filters = Filters {
            sort_by: SortKey::Category,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(ids(&filter_and_sort(&equipment, &filters)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_filter_update_is_partial() {
        let mut filters = Filters::default();
        filters.apply(FilterUpdate {
            search: Some("ford".to_string()),
            ..Default::default()
        });
        filters.apply(FilterUpdate::category("Pickup Truck"));
        assert_eq!(filters.search, "ford");
        assert_eq!(filters.category, "Pickup Truck");
        assert_eq!(filters.sort_by, SortKey::Name);
    }

    #[test]
    fn test_fleet_stats() {
        let mut equipment = fleet();
        equipment[0].financial.purchase_price = Some(65000.0);
        equipment[1].financial.purchase_price = Some(40000.0);
        equipment[2].metadata.status = EquipmentStatus::Retired;

        let stats = fleet_stats(&equipment);
        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.total_value, 105000.0);
        assert_eq!(stats.average_hourly_cost, 27.38);
        assert_eq!(stats.active_count, 3);
    }

    #[test]
    fn test_fleet_stats_empty() {
        assert_eq!(fleet_stats(&[]), FleetStats::default());
    }

    #[test]
    fn test_category_breakdown() {
        let mut equipment = fleet();
        equipment.push(record("5", "Spare", "Ford", "", 10.0, "2024-01-05T00:00:00Z"));
        equipment.push(record("6", "Spare 2", "Ford", "Other", 20.0, "2024-01-06T00:00:00Z"));

        let breakdown = category_breakdown(&equipment);
        assert_eq!(breakdown["Other"].count, 2);
        assert_eq!(breakdown["Other"].average_hourly_cost, 15.0);
        assert_eq!(breakdown["Chipper"].count, 1);
    }

    #[test]
    fn test_metrics_and_attention() {
        let mut r = record("1", "Mulcher", "Caterpillar", "Forestry Mulcher", 45.0, "2024-01-03T00:00:00Z");
        r.identity.year = Some(2020);
        r.financial.purchase_price = Some(65000.0);
        r.calculated.annual_depreciation = 7429.0;
        r.metadata.utilization = 55.0;

        let metrics = equipment_metrics(&r, 2025);
        assert_eq!(metrics.age, 5);
        assert_eq!(metrics.total_depreciation, 37145.0);
        assert_eq!(metrics.current_value, 27855.0);
        assert!(!needs_attention(&r, 2025));

        assert_eq!(equipment_metrics(&r, 2032).current_value, 0.0);
        assert!(needs_attention(&r, 2031));

        r.metadata.utilization = 10.0;
        assert!(needs_attention(&r, 2025));
    }

    #[test]
    fn test_extreme_years_do_not_overflow_age() {
        let mut r = record("1", "Relic", "Unknown", "Other", 10.0, "2024-01-03T00:00:00Z");
        r.calculated.annual_depreciation = 1000.0;
        r.metadata.utilization = 55.0;

        r.identity.year = Some(i32::MIN);
        assert_eq!(equipment_metrics(&r, 2026).age, i32::MAX);
        assert!(needs_attention(&r, 2026));

        r.identity.year = Some(i32::MAX);
        assert!(equipment_metrics(&r, -10).age < 0);
        assert!(!needs_attention(&r, -10));
    }

    #[test]
    fn test_most_recent() {
        let recent = most_recent(&fleet(), 2);
        assert_eq!(ids(&recent), vec!["4", "1"]);
    }
}
