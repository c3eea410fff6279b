//! Preset tables for equipment categories, usage cadence, and maintenance

use std::str::FromStr;

use super::equipment::MaintenanceLevel;

/// Category filter sentinel that matches every record
pub const ALL_CATEGORIES: &str = "All";

/// Known equipment categories, in display order
pub const EQUIPMENT_CATEGORIES: [&str; 7] = [
    "Forestry Mulcher",
    "Skid Steer",
    "Pickup Truck",
    "Dump Truck",
    "Chipper",
    "Stump Grinder",
    "Other",
];

/// Typical operating cadence presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsagePreset {
    Light,
    Moderate,
    Heavy,
}

impl UsagePreset {
    pub const ALL: [UsagePreset; 3] = [UsagePreset::Light, UsagePreset::Moderate, UsagePreset::Heavy];

    pub fn days_per_year(&self) -> f64 {
        match self {
            UsagePreset::Light => 150.0,
            UsagePreset::Moderate => 200.0,
            UsagePreset::Heavy => 250.0,
        }
    }

    pub fn hours_per_day(&self) -> f64 {
        match self {
            UsagePreset::Light => 3.0,
            UsagePreset::Moderate => 6.0,
            UsagePreset::Heavy => 10.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UsagePreset::Light => "Light",
            UsagePreset::Moderate => "Moderate",
            UsagePreset::Heavy => "Heavy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UsagePreset::Light => "2-4 hours/day",
            UsagePreset::Moderate => "4-8 hours/day",
            UsagePreset::Heavy => "8+ hours/day",
        }
    }
}

impl FromStr for UsagePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(UsagePreset::Light),
            "moderate" => Ok(UsagePreset::Moderate),
            "heavy" => Ok(UsagePreset::Heavy),
            other => Err(format!(
                "unknown usage preset '{}' (expected light, moderate, heavy)",
                other
            )),
        }
    }
}

/// Display row for a maintenance tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaintenancePreset {
    pub level: MaintenanceLevel,
    pub name: &'static str,
    pub description: &'static str,
    pub annual_cost: f64,
}

impl MaintenancePreset {
    /// Preset rows for the fixed-cost tiers
    pub fn all() -> Vec<MaintenancePreset> {
        MaintenanceLevel::PRESETS
            .iter()
            .filter_map(|level| {
                level.fixed_annual_cost().map(|annual_cost| MaintenancePreset {
                    level: *level,
                    name: level.label(),
                    description: level.description(),
                    annual_cost,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_presets() {
        let moderate: UsagePreset = "Moderate".parse().unwrap();
        assert_eq!(moderate.days_per_year() * moderate.hours_per_day(), 1200.0);
        assert_eq!(UsagePreset::Heavy.days_per_year(), 250.0);
        assert!("extreme".parse::<UsagePreset>().is_err());
    }

    #[test]
    fn test_maintenance_presets_cover_fixed_tiers() {
        let presets = MaintenancePreset::all();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[0].annual_cost, 1300.0);
        assert_eq!(presets[2].name, "Intense");
    }
}
