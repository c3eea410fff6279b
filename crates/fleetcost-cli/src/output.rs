//! Output formatting module

use std::collections::BTreeMap;

use serde::Serialize;

use fleetcost_app::fleet_store::CalculationPreview;
use fleetcost_domain::model::{
    CalculatedCosts, EquipmentRecord, MaintenancePreset, ResaleValue, UsagePreset,
    EQUIPMENT_CATEGORIES,
};
use fleetcost_domain::service::{
    CategorySummary, EquipmentMetrics, FormValidation, FleetStats, QualityAlert,
};
use fleetcost_infra::persistence::ImportOutcome;
use fleetcost_types::{OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn money(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn output_equipment_list(output_format: OutputFormat, records: &[EquipmentRecord]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(records);
    }

    if records.is_empty() {
        println!("No equipment found.");
        return Ok(());
    }

    println!(
        "{:<36} {:<24} {:<18} {:>10} {:>10} {:<11}",
        "ID", "Name", "Category", "Hourly", "Rate", "Status"
    );
    println!("{}", "-".repeat(114));

    for record in records {
        println!(
            "{:<36} {:<24} {:<18} {:>10} {:>10} {:<11}",
            record.id,
            truncate(&record.identity.display_name(), 24),
            truncate(&record.identity.category, 18),
            money(record.calculated.hourly_cost),
            money(record.calculated.recommended_rate),
            record.metadata.status.to_string()
        );
    }

    println!();
    println!("{} record(s)", records.len());
    Ok(())
}

fn print_costs(costs: &CalculatedCosts) {
    println!("\n--- Annual Costs ---");
    println!("Operating hours: {:.0} h", costs.annual_hours);
    println!("Depreciation:    {}", money(costs.annual_depreciation));
    println!("Fuel:            {}", money(costs.annual_fuel));
    println!("Maintenance:     {}", money(costs.annual_maintenance));
    println!("Total:           {}", money(costs.total_annual_cost));
    println!("--------------------");
    println!("Hourly cost:     {}", money(costs.hourly_cost));
    println!("Recommended:     {}/h", money(costs.recommended_rate));
    println!("Profit/hour:     {}", money(costs.profit_per_hour()));
    println!("Profit margin:   {:.1}%", costs.profit_margin());
    println!("Daily (8h):      {}", money(costs.daily_operating_cost()));
    println!("Monthly:         {}", money(costs.monthly_operating_cost()));
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordDetail<'a> {
    #[serde(flatten)]
    record: &'a EquipmentRecord,
    metrics: &'a EquipmentMetrics,
}

pub fn output_record(
    output_format: OutputFormat,
    record: &EquipmentRecord,
    metrics: &EquipmentMetrics,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&RecordDetail { record, metrics });
    }

    let identity = &record.identity;
    println!("\n{}", identity.display_name());
    println!("{}", "=".repeat(identity.display_name().chars().count().max(8)));
    println!("ID:              {}", record.id);
    println!("Description:     {}", identity.full_description());
    println!("Category:        {}", identity.category);
    if let Some(ref serial) = identity.serial_number {
        println!("Serial number:   {}", serial);
    }
    println!("Status:          {}", record.metadata.status);
    println!("Added:           {}", record.metadata.date_added.format("%Y-%m-%d %H:%M"));
    println!("Last modified:   {}", record.metadata.last_modified.format("%Y-%m-%d %H:%M"));

    let financial = &record.financial;
    println!("\n--- Inputs ---");
    println!(
        "Usage:           {} days x {} h",
        opt(record.usage.days_per_year),
        opt(record.usage.hours_per_day)
    );
    println!("Purchase price:  {}", opt_money(financial.purchase_price));
    println!(
        "Resale value:    {}{}",
        money(financial.estimated_resale_value()),
        match financial.resale {
            ResaleValue::Auto => " (estimated)",
            ResaleValue::Manual(_) => " (manual)",
        }
    );
    println!("Service years:   {}", opt(financial.years_of_service));
    println!("Daily fuel:      {}", opt_money(financial.daily_fuel_cost));
    println!(
        "Maintenance:     {}",
        financial
            .maintenance_level
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Insurance:       {}", opt_money(financial.annual_insurance_cost));

    print_costs(&record.calculated);

    println!("\n--- Metrics ---");
    println!("Age:             {} years", metrics.age);
    println!("Depreciated:     {}", money(metrics.total_depreciation));
    println!("Current value:   {}", money(metrics.current_value));
    println!("Utilization:     {:.0}%", metrics.utilization_rate);

    Ok(())
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn opt_money(value: Option<f64>) -> String {
    value.map(money).unwrap_or_else(|| "-".to_string())
}

/// Alerts and validation problems go to stderr so JSON on stdout stays parseable
pub fn report_checks(validation: &FormValidation, alerts: &[QualityAlert]) {
    for (field, message) in &validation.errors {
        eprintln!("invalid {}: {}", field, message);
    }
    for alert in alerts {
        eprintln!("[{}] {}", alert.level, alert.message);
    }
}

pub fn output_saved(output_format: OutputFormat, action: &str, record: &EquipmentRecord) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(record);
    }
    println!("{} {} ({})", action, record.identity.display_name(), record.id);
    println!(
        "Hourly cost {} / recommended rate {}",
        money(record.calculated.hourly_cost),
        money(record.calculated.recommended_rate)
    );
    Ok(())
}

pub fn output_removed(output_format: OutputFormat, id: &str, removed: bool) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "id": id, "removed": removed }));
    }
    if removed {
        println!("Removed {}", id);
    } else {
        println!("No equipment with id {}; nothing removed", id);
    }
    Ok(())
}

pub fn output_preview(output_format: OutputFormat, preview: &CalculationPreview) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(preview);
    }

    print_costs(&preview.calculated);

    if !preview.alerts.is_empty() {
        println!("\n--- Alerts ---");
        for alert in &preview.alerts {
            println!("[{}] {}", alert.level, alert.message);
        }
    }
    if !preview.validation.is_valid {
        println!("\n--- Validation ---");
        for (field, message) in &preview.validation.errors {
            println!("{:<20} {}", field, message);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport<'a> {
    #[serde(flatten)]
    stats: &'a FleetStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    by_category: Option<&'a BTreeMap<String, CategorySummary>>,
}

pub fn output_stats(
    output_format: OutputFormat,
    stats: &FleetStats,
    by_category: Option<&BTreeMap<String, CategorySummary>>,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&StatsReport { stats, by_category });
    }

    println!("Fleet Statistics");
    println!("================");
    println!("Equipment:           {}", stats.total_count);
    println!("Active:              {}", stats.active_count);
    println!("Total value:         {}", money(stats.total_value));
    println!("Average hourly cost: {}", money(stats.average_hourly_cost));

    if let Some(breakdown) = by_category {
        println!();
        println!("{:<20} {:>6} {:>14} {:>12}", "Category", "Count", "Value", "Avg hourly");
        println!("{}", "-".repeat(55));
        for (category, summary) in breakdown {
            println!(
                "{:<20} {:>6} {:>14} {:>12}",
                truncate(category, 20),
                summary.count,
                money(summary.total_value),
                money(summary.average_hourly_cost)
            );
        }
    }
    Ok(())
}

pub fn output_import(output_format: OutputFormat, outcome: &ImportOutcome, dry_run: bool) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "dryRun": dry_run,
            "added": outcome.added,
            "skipped": outcome.skipped,
            "total": outcome.equipment.len(),
        }));
    }

    let verb = if dry_run { "Would add" } else { "Added" };
    println!("{} {} record(s), skipped {} existing", verb, outcome.added.len(), outcome.skipped);
    println!("Fleet size: {}", outcome.equipment.len());
    Ok(())
}

pub fn output_presets(output_format: OutputFormat) -> Result<()> {
    let maintenance = MaintenancePreset::all();

    if output_format == OutputFormat::Json {
        let usage: Vec<_> = UsagePreset::ALL
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.label(),
                    "description": p.description(),
                    "daysPerYear": p.days_per_year(),
                    "hoursPerDay": p.hours_per_day(),
                })
            })
            .collect();
        let maintenance: Vec<_> = maintenance
            .iter()
            .map(|p| {
                serde_json::json!({
                    "level": p.level,
                    "name": p.name,
                    "description": p.description,
                    "annualCost": p.annual_cost,
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "usage": usage,
            "maintenance": maintenance,
            "categories": EQUIPMENT_CATEGORIES,
        }));
    }

    println!("Usage presets");
    for preset in UsagePreset::ALL {
        println!(
            "  {:<10} {:>4} days x {:>2} h  {}",
            preset.label(),
            preset.days_per_year(),
            preset.hours_per_day(),
            preset.description()
        );
    }
    println!("\nMaintenance tiers");
    for preset in &maintenance {
        println!("  {:<10} {:>10}  {}", preset.name, money(preset.annual_cost), preset.description);
    }
    println!("\nCategories");
    for category in EQUIPMENT_CATEGORIES {
        println!("  {}", category);
    }
    Ok(())
}
