//! Advisory validation for equipment input
//!
//! Nothing here blocks the cost model: the model always produces numbers, and
//! these checks only report what a careful user should look at.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{CalculatedCosts, EquipmentInput, EquipmentUsage};
use crate::service::cost_model;

/// Inclusive numeric range for a form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub min: f64,
    pub max: f64,
}

impl Limit {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const YEAR_LIMIT: Limit = Limit { min: 1990.0, max: 2030.0 };
pub const DAYS_PER_YEAR_LIMIT: Limit = Limit { min: 100.0, max: 300.0 };
pub const HOURS_PER_DAY_LIMIT: Limit = Limit { min: 2.0, max: 16.0 };
pub const YEARS_OF_SERVICE_LIMIT: Limit = Limit { min: 1.0, max: 15.0 };
pub const PURCHASE_PRICE_LIMIT: Limit = Limit { min: 1000.0, max: 1_000_000.0 };
pub const DAILY_FUEL_COST_LIMIT: Limit = Limit { min: 1.0, max: 1000.0 };
pub const ANNUAL_INSURANCE_LIMIT: Limit = Limit { min: 0.0, max: 100_000.0 };

pub const HOURLY_COST_LOW: f64 = 10.0;
pub const HOURLY_COST_HIGH: f64 = 200.0;
pub const RECOMMENDED_RATE_MINIMUM: f64 = 25.0;
pub const LOW_UTILIZATION_HOURS: f64 = 400.0;

/// Outcome of [`validate_form`]; errors are keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl FormValidation {
    fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// One-line summary, e.g. for a CLI error message
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Severity of a quality alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Error => write!(f, "error"),
            AlertLevel::Warning => write!(f, "warning"),
            AlertLevel::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAlert {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub message: String,
}

impl QualityAlert {
    fn new(level: AlertLevel, message: &str) -> Self {
        Self {
            level,
            message: message.to_string(),
        }
    }
}

fn format_dollars(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}", grouped)
}

fn validate_required(value: &str, field_name: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{} is required", field_name))
    } else {
        None
    }
}

fn validate_year(year: Option<i32>) -> Option<String> {
    match year {
        None | Some(0) => Some("Valid year is required".to_string()),
        Some(y) if !YEAR_LIMIT.contains(f64::from(y)) => Some(format!(
            "Year must be between {} and {}",
            YEAR_LIMIT.min, YEAR_LIMIT.max
        )),
        Some(_) => None,
    }
}

fn validate_currency(amount: Option<f64>, field_name: &str, limit: Limit) -> Option<String> {
    match amount {
        None => Some(format!("{} must be a valid positive number", field_name)),
        Some(v) if v < 0.0 => Some(format!("{} must be a valid positive number", field_name)),
        Some(v) if v < limit.min => Some(format!(
            "{} must be at least {}",
            field_name,
            format_dollars(limit.min)
        )),
        Some(v) if v > limit.max => Some(format!(
            "{} must be less than {}",
            field_name,
            format_dollars(limit.max)
        )),
        Some(_) => None,
    }
}

fn validate_range(value: Option<f64>, label: &str, limit: Limit) -> Option<String> {
    match value {
        Some(v) if v != 0.0 && limit.contains(v) => None,
        _ => Some(format!(
            "{} must be between {} and {}",
            label, limit.min, limit.max
        )),
    }
}

/// Check form input against the domain constraints
///
/// Never mutates its input. `is_valid` is true iff no field has an error.
pub fn validate_form(input: &EquipmentInput) -> FormValidation {
    let mut errors = BTreeMap::new();
    let mut check = |field: &str, result: Option<String>| {
        if let Some(message) = result {
            errors.insert(field.to_string(), message);
        }
    };

    let identity = &input.identity;
    check("equipmentName", validate_required(&identity.equipment_name, "Equipment Name"));
    check("year", validate_year(identity.year));
    check("make", validate_required(&identity.make, "Make"));
    check("model", validate_required(&identity.model, "Model"));
    check("category", validate_required(&identity.category, "Category"));

    let usage = &input.usage;
    check(
        "daysPerYear",
        validate_range(usage.days_per_year, "Days per year", DAYS_PER_YEAR_LIMIT),
    );
    check(
        "hoursPerDay",
        validate_range(usage.hours_per_day, "Hours per day", HOURS_PER_DAY_LIMIT),
    );

    let financial = &input.financial;
    check(
        "purchasePrice",
        validate_currency(financial.purchase_price, "Purchase Price", PURCHASE_PRICE_LIMIT),
    );
    if let Some(years) = financial.years_of_service.filter(|y| *y != 0.0) {
        if !YEARS_OF_SERVICE_LIMIT.contains(years) {
            check(
                "yearsOfService",
                Some(format!(
                    "Years of service must be between {} and {}",
                    YEARS_OF_SERVICE_LIMIT.min, YEARS_OF_SERVICE_LIMIT.max
                )),
            );
        }
    }
    check(
        "dailyFuelCost",
        validate_currency(financial.daily_fuel_cost, "Daily Fuel Cost", DAILY_FUEL_COST_LIMIT),
    );

    let has_preset = financial.maintenance_level.map(|l| l.is_preset()).unwrap_or(false);
    let has_custom_cost = financial.custom_maintenance_cost.map(|c| c > 0.0).unwrap_or(false);
    if !has_preset && !has_custom_cost {
        let message = if financial.maintenance_level.is_some() {
            "Custom maintenance cost must be greater than zero"
        } else {
            "Maintenance level is required"
        };
        check("maintenanceLevel", Some(message.to_string()));
    }

    check(
        "annualInsuranceCost",
        validate_currency(
            Some(financial.annual_insurance_cost.unwrap_or(0.0)),
            "Annual Insurance Cost",
            ANNUAL_INSURANCE_LIMIT,
        ),
    );

    FormValidation::from_errors(errors)
}

/// Heuristic cost checks, in declaration order; advisory only
pub fn quality_alerts(calculated: &CalculatedCosts, usage: &EquipmentUsage) -> Vec<QualityAlert> {
    let mut alerts = Vec::new();

    if calculated.hourly_cost < HOURLY_COST_LOW {
        alerts.push(QualityAlert::new(
            AlertLevel::Warning,
            "Hourly cost seems low - verify inputs",
        ));
    }

    if calculated.hourly_cost > HOURLY_COST_HIGH {
        alerts.push(QualityAlert::new(
            AlertLevel::Warning,
            "Hourly cost seems high - check fuel/maintenance",
        ));
    }

    if calculated.recommended_rate < RECOMMENDED_RATE_MINIMUM {
        alerts.push(QualityAlert::new(AlertLevel::Error, "Rate may be unprofitable"));
    }

    let annual_hours = cost_model::annual_hours(usage.days_per_year, usage.hours_per_day);
    if annual_hours < LOW_UTILIZATION_HOURS {
        alerts.push(QualityAlert::new(
            AlertLevel::Info,
            "Low utilization - asset may be underused",
        ));
    }

    alerts
}
