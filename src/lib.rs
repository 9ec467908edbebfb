//! courierd - shipping carrier rate resolution service.
//!
//! Loads a static, carrier-heterogeneous rate table once at startup and
//! answers country + weight queries with priced carrier/service options:
//! - Country matching: direct names, zone-code mappings, curated aliases
//! - Weight resolution: ceiling policy over sparse weight tiers
//! - Pricing: flat and per-kilogram rates with display formatting

pub mod config;
pub mod http;
pub mod rates;
pub mod table;
pub mod telemetry;
