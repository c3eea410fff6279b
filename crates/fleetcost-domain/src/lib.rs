//! Domain layer for fleet equipment costing
//!
//! Holds the equipment record model, the pure cost and validation services,
//! and the repository trait the persistence layer implements.

pub mod model;
pub mod repository;
pub mod service;
