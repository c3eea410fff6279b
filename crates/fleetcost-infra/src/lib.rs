//! Infrastructure layer - persistence implementations, snapshots, reports

pub mod csv_report;
pub mod persistence;
