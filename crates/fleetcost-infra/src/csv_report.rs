//! CSV fleet report

use std::io::Write;

use serde::Serialize;

use fleetcost_domain::model::EquipmentRecord;
use fleetcost_types::{Error, Result};

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    id: &'a str,
    name: &'a str,
    year: Option<i32>,
    category: &'a str,
    make: &'a str,
    model: &'a str,
    status: String,
    annual_hours: f64,
    total_annual_cost: f64,
    hourly_cost: f64,
    recommended_rate: f64,
}

impl<'a> From<&'a EquipmentRecord> for ReportRow<'a> {
    fn from(record: &'a EquipmentRecord) -> Self {
        Self {
            id: &record.id,
            name: &record.identity.equipment_name,
            year: record.identity.year,
            category: &record.identity.category,
            make: &record.identity.make,
            model: &record.identity.model,
            status: record.metadata.status.to_string(),
            annual_hours: record.calculated.annual_hours,
            total_annual_cost: record.calculated.total_annual_cost,
            hourly_cost: record.calculated.hourly_cost,
            recommended_rate: record.calculated.recommended_rate,
        }
    }
}

fn export_error(e: csv::Error) -> Error {
    Error::Export(format!("CSV write failed: {}", e))
}

/// Write one row per record, with a header row, in the given order
pub fn write_fleet_report<W: Write>(writer: W, equipment: &[EquipmentRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in equipment {
        csv_writer
            .serialize(ReportRow::from(record))
            .map_err(export_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Fleet report as a string
pub fn fleet_report_string(equipment: &[EquipmentRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_fleet_report(&mut buffer, equipment)?;
    String::from_utf8(buffer).map_err(|e| Error::Export(e.to_string()))
}
