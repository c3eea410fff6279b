//! Equipment cost model
//!
//! Pure functions turning usage and financial inputs into annual and hourly
//! operating costs. Every input is numeric-or-missing: missing or non-finite
//! values count as zero, and division guards clamp divisors to at least 1.
//! Results that overflow to infinity also count as zero, so every function
//! returns a finite number even for implausible input.

use crate::model::{CalculatedCosts, EquipmentFinancial, EquipmentUsage, MaintenanceLevel};

/// Share of the purchase price assumed recoverable at resale
pub const DEFAULT_RESALE_PERCENTAGE: f64 = 0.2;

/// Multiplier from hourly cost to the recommended billing rate
pub const RECOMMENDED_MARKUP: f64 = 1.3;

/// Maintenance tier used when no level is recognized
pub const FALLBACK_MAINTENANCE_LEVEL: MaintenanceLevel = MaintenanceLevel::Standard;

fn coerce(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Round to the nearest integer, halves toward positive infinity.
/// Non-finite values round to zero.
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to 2 decimal places, halves toward positive infinity
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        // already far beyond cent precision
        return round_half_up(value);
    }
    round_half_up(scaled) / 100.0
}

pub fn annual_hours(days_per_year: Option<f64>, hours_per_day: Option<f64>) -> f64 {
    round_half_up(coerce(days_per_year) * coerce(hours_per_day))
}

/// Straight-line depreciation; service life below one year counts as one
pub fn annual_depreciation(
    purchase_price: Option<f64>,
    resale_value: Option<f64>,
    years_of_service: Option<f64>,
) -> f64 {
    let years = coerce(years_of_service).max(1.0);
    round_half_up((coerce(purchase_price) - coerce(resale_value)) / years)
}

pub fn annual_fuel(daily_fuel_cost: Option<f64>, days_per_year: Option<f64>) -> f64 {
    round_half_up(coerce(daily_fuel_cost) * coerce(days_per_year))
}

/// A positive custom cost wins; otherwise the tier's fixed cost, or the
/// standard tier when the level is missing or has no fixed cost
pub fn annual_maintenance(level: Option<MaintenanceLevel>, custom_cost: Option<f64>) -> f64 {
    let custom = coerce(custom_cost);
    if custom > 0.0 {
        return custom;
    }
    level
        .and_then(|l| l.fixed_annual_cost())
        .or_else(|| FALLBACK_MAINTENANCE_LEVEL.fixed_annual_cost())
        .unwrap_or(0.0)
}

pub fn total_annual_cost(
    depreciation: Option<f64>,
    fuel: Option<f64>,
    maintenance: Option<f64>,
    insurance: Option<f64>,
) -> f64 {
    round_half_up(coerce(depreciation) + coerce(fuel) + coerce(maintenance) + coerce(insurance))
}

pub fn hourly_cost(total_annual_cost: Option<f64>, annual_hours: Option<f64>) -> f64 {
    let hours = coerce(annual_hours).max(1.0);
    round2(coerce(total_annual_cost) / hours)
}

pub fn recommended_rate(hourly_cost: Option<f64>) -> f64 {
    round2(coerce(hourly_cost) * RECOMMENDED_MARKUP)
}

pub fn estimated_resale(purchase_price: Option<f64>, percentage: f64) -> f64 {
    round_half_up(coerce(purchase_price) * percentage)
}

/// Logged hours as a percentage of planned annual hours
pub fn utilization(actual_hours: Option<f64>, annual_hours: Option<f64>) -> f64 {
    let planned = coerce(annual_hours).max(1.0);
    round_half_up(100.0 * coerce(actual_hours) / planned)
}

/// Full cost breakdown for a record's inputs
///
/// The custom maintenance cost is only consulted when no preset tier is
/// selected (see [`EquipmentFinancial::effective_custom_maintenance`]).
pub fn compute_all(usage: &EquipmentUsage, financial: &EquipmentFinancial) -> CalculatedCosts {
    let annual_hours = annual_hours(usage.days_per_year, usage.hours_per_day);

    let annual_depreciation = annual_depreciation(
        financial.purchase_price,
        Some(financial.estimated_resale_value()),
        financial.years_of_service,
    );
    let annual_fuel = annual_fuel(financial.daily_fuel_cost, usage.days_per_year);
    let annual_maintenance = annual_maintenance(
        financial.maintenance_level,
        financial.effective_custom_maintenance(),
    );
    let total_annual_cost = total_annual_cost(
        Some(annual_depreciation),
        Some(annual_fuel),
        Some(annual_maintenance),
        financial.annual_insurance_cost,
    );

    let hourly_cost = hourly_cost(Some(total_annual_cost), Some(annual_hours));
    let recommended_rate = recommended_rate(Some(hourly_cost));

    CalculatedCosts {
        annual_hours,
        annual_depreciation,
        annual_fuel,
        annual_maintenance,
        total_annual_cost,
        hourly_cost,
        recommended_rate,
    }
}
