//! Static carrier rate table.
//!
//! The table is the deserialized form of the master JSON artifact produced by
//! the offline CSV ingestion step: carrier -> service -> location key ->
//! weight tier -> rate entry, plus per-carrier country -> zone-code mappings.
//! It is loaded once at process start and never mutated.

mod loader;
mod types;

pub use types::{Carrier, RateEntry, RateTable, Service, WeightTable};
