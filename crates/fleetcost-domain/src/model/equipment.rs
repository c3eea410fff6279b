//! Equipment record type definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::service::cost_model::{self, DEFAULT_RESALE_PERCENTAGE};

/// Descriptive identity of a piece of equipment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentIdentity {
    #[serde(default)]
    pub equipment_name: String,
    #[serde(
        default,
        deserialize_with = "lenient::year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl EquipmentIdentity {
    /// Name for listings, falling back to "year make model"
    pub fn display_name(&self) -> String {
        if self.equipment_name.trim().is_empty() {
            self.full_description()
        } else {
            self.equipment_name.clone()
        }
    }

    pub fn full_description(&self) -> String {
        let year = self.year.map(|y| y.to_string()).unwrap_or_default();
        [year.as_str(), self.make.as_str(), self.model.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Operating cadence inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentUsage {
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub days_per_year: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub hours_per_day: Option<f64>,
}

impl EquipmentUsage {
    /// Planned annual operating hours (never stored on its own)
    pub fn annual_hours(&self) -> f64 {
        cost_model::annual_hours(self.days_per_year, self.hours_per_day)
    }
}

/// Source of the resale value used for depreciation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ResaleValue {
    /// Derived from the purchase price at the default resale percentage
    #[default]
    Auto,
    /// Entered by the user; authoritative until reset to `Auto`
    Manual(f64),
}

/// Preventive maintenance tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceLevel {
    Minimal,
    Standard,
    Intense,
    Custom,
}

impl MaintenanceLevel {
    pub const PRESETS: [MaintenanceLevel; 3] = [
        MaintenanceLevel::Minimal,
        MaintenanceLevel::Standard,
        MaintenanceLevel::Intense,
    ];

    /// Fixed annual cost for preset tiers; `None` for `Custom`
    pub fn fixed_annual_cost(&self) -> Option<f64> {
        match self {
            MaintenanceLevel::Minimal => Some(1300.0),
            MaintenanceLevel::Standard => Some(2600.0),
            MaintenanceLevel::Intense => Some(4550.0),
            MaintenanceLevel::Custom => None,
        }
    }

    pub fn is_preset(&self) -> bool {
        self.fixed_annual_cost().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceLevel::Minimal => "Minimal",
            MaintenanceLevel::Standard => "Standard",
            MaintenanceLevel::Intense => "Intense",
            MaintenanceLevel::Custom => "Custom",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MaintenanceLevel::Minimal => "Basic oil changes, filters",
            MaintenanceLevel::Standard => "Regular service schedule",
            MaintenanceLevel::Intense => "Heavy-duty operations, frequent repairs",
            MaintenanceLevel::Custom => "Custom maintenance plan",
        }
    }
}

impl fmt::Display for MaintenanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MaintenanceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(MaintenanceLevel::Minimal),
            "standard" => Ok(MaintenanceLevel::Standard),
            "intense" => Ok(MaintenanceLevel::Intense),
            "custom" => Ok(MaintenanceLevel::Custom),
            other => Err(format!(
                "unknown maintenance level '{}' (expected minimal, standard, intense, custom)",
                other
            )),
        }
    }
}

/// Acquisition and running-cost inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FinancialWire", into = "FinancialWire")]
pub struct EquipmentFinancial {
    pub purchase_price: Option<f64>,
    pub resale: ResaleValue,
    pub years_of_service: Option<f64>,
    pub daily_fuel_cost: Option<f64>,
    pub maintenance_level: Option<MaintenanceLevel>,
    pub custom_maintenance_cost: Option<f64>,
    pub annual_insurance_cost: Option<f64>,
}

impl EquipmentFinancial {
    /// Resale value in effect: the manual override, or the auto estimate
    pub fn estimated_resale_value(&self) -> f64 {
        match self.resale {
            ResaleValue::Auto => {
                cost_model::estimated_resale(self.purchase_price, DEFAULT_RESALE_PERCENTAGE)
            }
            ResaleValue::Manual(value) => value,
        }
    }

    /// Custom maintenance cost, only when no preset tier is selected
    pub fn effective_custom_maintenance(&self) -> Option<f64> {
        match self.maintenance_level {
            Some(level) if level.is_preset() => None,
            _ => self.custom_maintenance_cost,
        }
    }
}

/// On-disk shape of [`EquipmentFinancial`]: resale as value + manual flag
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialWire {
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    purchase_price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    estimated_resale_value: Option<f64>,
    #[serde(default)]
    manual_resale_value: bool,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    years_of_service: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    daily_fuel_cost: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::maintenance_level",
        skip_serializing_if = "Option::is_none"
    )]
    maintenance_level: Option<MaintenanceLevel>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    custom_maintenance_cost: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    annual_insurance_cost: Option<f64>,
}

impl From<FinancialWire> for EquipmentFinancial {
    fn from(wire: FinancialWire) -> Self {
        let resale = if wire.manual_resale_value {
            ResaleValue::Manual(wire.estimated_resale_value.unwrap_or(0.0))
        } else {
            ResaleValue::Auto
        };
        Self {
            purchase_price: wire.purchase_price,
            resale,
            years_of_service: wire.years_of_service,
            daily_fuel_cost: wire.daily_fuel_cost,
            maintenance_level: wire.maintenance_level,
            custom_maintenance_cost: wire.custom_maintenance_cost,
            annual_insurance_cost: wire.annual_insurance_cost,
        }
    }
}

impl From<EquipmentFinancial> for FinancialWire {
    fn from(financial: EquipmentFinancial) -> Self {
        Self {
            purchase_price: financial.purchase_price,
            estimated_resale_value: Some(financial.estimated_resale_value()),
            manual_resale_value: matches!(financial.resale, ResaleValue::Manual(_)),
            years_of_service: financial.years_of_service,
            daily_fuel_cost: financial.daily_fuel_cost,
            maintenance_level: financial.maintenance_level,
            custom_maintenance_cost: financial.custom_maintenance_cost,
            annual_insurance_cost: financial.annual_insurance_cost,
        }
    }
}

/// Derived cost figures; always recomputed, never edited by hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatedCosts {
    #[serde(deserialize_with = "lenient::amount")]
    pub annual_hours: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub annual_depreciation: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub annual_fuel: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub annual_maintenance: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub total_annual_cost: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub hourly_cost: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub recommended_rate: f64,
}

impl CalculatedCosts {
    pub fn monthly_operating_cost(&self) -> f64 {
        self.total_annual_cost / 12.0
    }

    /// Cost of one 8-hour working day
    pub fn daily_operating_cost(&self) -> f64 {
        self.hourly_cost * 8.0
    }

    pub fn profit_per_hour(&self) -> f64 {
        self.recommended_rate - self.hourly_cost
    }

    /// Margin of the recommended rate, in percent
    pub fn profit_margin(&self) -> f64 {
        if self.recommended_rate <= 0.0 {
            return 0.0;
        }
        (self.recommended_rate - self.hourly_cost) / self.recommended_rate * 100.0
    }
}

/// Lifecycle state of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    #[default]
    #[serde(alias = "Active")]
    Active,
    #[serde(alias = "Maintenance")]
    Maintenance,
    #[serde(alias = "Retired")]
    Retired,
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentStatus::Active => write!(f, "active"),
            EquipmentStatus::Maintenance => write!(f, "maintenance"),
            EquipmentStatus::Retired => write!(f, "retired"),
        }
    }
}

impl FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(EquipmentStatus::Active),
            "maintenance" => Ok(EquipmentStatus::Maintenance),
            "retired" => Ok(EquipmentStatus::Retired),
            other => Err(format!(
                "unknown status '{}' (expected active, maintenance, retired)",
                other
            )),
        }
    }
}

/// Lifecycle bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentMetadata {
    pub date_added: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub status: EquipmentStatus,
    /// Logged operating hours; written only by external sources (imports)
    pub usage_hours: f64,
    /// Utilization percentage; written only by external sources (imports)
    pub utilization: f64,
}

impl EquipmentMetadata {
    /// Metadata for a record created at `now`
    pub fn created_at(now: DateTime<Utc>) -> Self {
        Self {
            date_added: now,
            last_modified: now,
            status: EquipmentStatus::Active,
            usage_hours: 0.0,
            utilization: 0.0,
        }
    }
}

/// Caller-supplied inputs for creating or updating a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentInput {
    pub identity: EquipmentIdentity,
    pub usage: EquipmentUsage,
    pub financial: EquipmentFinancial,
}

impl EquipmentInput {
    /// Run the cost model over these inputs
    pub fn calculate(&self) -> CalculatedCosts {
        cost_model::compute_all(&self.usage, &self.financial)
    }
}

/// A single piece of equipment in the fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    pub id: String,
    #[serde(default)]
    pub identity: EquipmentIdentity,
    #[serde(default)]
    pub usage: EquipmentUsage,
    #[serde(default)]
    pub financial: EquipmentFinancial,
    #[serde(default)]
    pub calculated: CalculatedCosts,
    #[serde(default)]
    pub metadata: EquipmentMetadata,
}

impl EquipmentRecord {
    /// Build a fresh record from inputs, with costs computed and metadata stamped
    pub fn new(id: String, input: EquipmentInput, now: DateTime<Utc>) -> Self {
        let calculated = input.calculate();
        Self {
            id,
            identity: input.identity,
            usage: input.usage,
            financial: input.financial,
            calculated,
            metadata: EquipmentMetadata::created_at(now),
        }
    }

    /// Inputs this record was built from
    pub fn input(&self) -> EquipmentInput {
        EquipmentInput {
            identity: self.identity.clone(),
            usage: self.usage.clone(),
            financial: self.financial.clone(),
        }
    }

    /// Replace the inputs, recompute costs, and bump `last_modified`
    pub fn apply_input(&mut self, input: EquipmentInput, now: DateTime<Utc>) {
        self.identity = input.identity;
        self.usage = input.usage;
        self.financial = input.financial;
        self.touch(now);
    }

    /// Recompute costs and bump `last_modified`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.recalculate();
        self.metadata.last_modified = now;
    }

    pub fn recalculate(&mut self) {
        self.calculated = cost_model::compute_all(&self.usage, &self.financial);
    }
}
