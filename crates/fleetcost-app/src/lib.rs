//! Application service layer - fleet store, config, logging

pub mod config;
pub mod fleet_store;
pub mod logging;
pub mod repository;

pub use config::Config;
pub use fleet_store::FleetStore;
