//! Rate resolution engine.
//!
//! Resolves shipping rates for a destination country and package weight:
//! - Country matcher: direct name/substring/alias matches plus zone-code
//!   indirection through per-carrier zone mappings
//! - Weight resolver: ceiling selection over sparse weight tiers
//! - Pricer: flat and per-kg pricing with display formatting
//! - Engine: per-query orchestration, dedup, sorting, match caching

pub mod alias;
mod engine;
mod matcher;
mod pricer;
pub mod weight;

pub use engine::{QueryError, RateEngine, RateQuote};
pub use matcher::{find_matches, MatchType, RateMatch};
pub use pricer::{price_match, PricedRate};
