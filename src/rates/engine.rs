//! Query orchestration.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::table::RateTable;
use crate::telemetry::counters;

use super::matcher::{self, MatchType, RateMatch};
use super::pricer::{self, PricedRate};
use super::{alias, weight};

/// Carriers whose zone code is surfaced in responses for transparency.
const SUMMARY_CARRIERS: &[&str] = &["fedex", "dhl", "ups"];

/// Rate query failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Bad request input; user-facing message
    #[error("{0}")]
    InvalidInput(String),
    /// No candidate locations exist anywhere in the table for this country
    #[error("no shipping data found for {0}")]
    NoDataFound(String),
    /// The rate table failed to load at startup
    #[error("rate table is not loaded")]
    TableUnavailable,
}

/// Aggregated result of one rate query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    /// Echo of the queried country
    pub country: String,
    /// Echo of the queried weight
    pub weight: f64,
    /// Priced options, sorted ascending by final rate
    pub results: Vec<PricedRate>,
    /// Number of priced options
    pub total_found: usize,
    /// Human-readable summary of the search
    pub analysis: String,
    /// Display-only zone codes for well-known zone carriers,
    /// e.g. "dhl_zone" -> "14"
    pub zone_mappings: HashMap<String, String>,
}

/// The rate resolution engine.
///
/// Owns an immutable, load-once rate table and a per-country match cache.
/// Matching is a pure function of table + country, and the table never
/// changes during the process lifetime, so the cache needs no invalidation.
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct RateEngine {
    table: Arc<RateTable>,
    match_cache: RwLock<HashMap<String, Arc<Vec<RateMatch>>>>,
}

impl RateEngine {
    /// Create an engine over a loaded table.
    pub fn new(table: Arc<RateTable>) -> Self {
        Self {
            table,
            match_cache: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying table.
    pub fn table(&self) -> &RateTable {
        &self.table
    }

    /// Resolve rates for a destination country and package weight.
    ///
    /// Validation failures are [`QueryError::InvalidInput`]; a country with
    /// no candidate locations at all is [`QueryError::NoDataFound`]. Matches
    /// that exist but all fail weight availability produce an `Ok` quote
    /// with zero results; the two cases are distinct on the wire (200 vs
    /// 404).
    pub fn get_rates(&self, country: &str, weight_kg: f64) -> Result<RateQuote, QueryError> {
        let trimmed = country.trim();
        if trimmed.is_empty() {
            return Err(QueryError::InvalidInput("country is required".to_string()));
        }
        weight::validate_weight(weight_kg)
            .map_err(|e| QueryError::InvalidInput(e.to_string()))?;

        let normalized = alias::normalize(trimmed);
        let matches = self.matches_for(&normalized);

        if matches.is_empty() {
            debug!(country = %trimmed, "no candidate locations");
            return Err(QueryError::NoDataFound(trimmed.to_string()));
        }

        let direct = matches
            .iter()
            .filter(|m| m.match_type == MatchType::Direct)
            .count();
        let zone = matches.len() - direct;
        counters::matches_found(MatchType::Direct, direct);
        counters::matches_found(MatchType::Zone, zone);

        let mut results: Vec<PricedRate> = matches
            .iter()
            .filter_map(|m| pricer::price_match(m, &normalized, weight_kg, &self.table))
            .collect();

        // Cheapest first; stable sort keeps match order for equal prices
        results.sort_by(|a, b| a.final_rate.total_cmp(&b.final_rate));

        let analysis = format!(
            "Matched {} location(s) for {} ({} direct, {} zone-based); \
             {} option(s) serve {}kg.",
            matches.len(),
            trimmed,
            direct,
            zone,
            results.len(),
            weight_kg
        );

        info!(
            country = %trimmed,
            weight = weight_kg,
            matches = matches.len(),
            priced = results.len(),
            "rate query resolved"
        );

        Ok(RateQuote {
            country: trimmed.to_string(),
            weight: weight_kg,
            total_found: results.len(),
            results,
            analysis,
            zone_mappings: self.zone_summary(&normalized),
        })
    }

    /// Matches for a normalized country, via the cache.
    fn matches_for(&self, normalized: &str) -> Arc<Vec<RateMatch>> {
        if let Some(hit) = self.match_cache.read().unwrap().get(normalized) {
            counters::match_cache_hit();
            return hit.clone();
        }

        let computed = Arc::new(matcher::find_matches(normalized, &self.table));
        self.match_cache
            .write()
            .unwrap()
            .insert(normalized.to_string(), computed.clone());
        computed
    }

    /// Display-only zone codes for the well-known zone carriers.
    ///
    /// Substring matching only, mirroring how the mappings are keyed; the
    /// first alias in sorted order wins.
    fn zone_summary(&self, normalized: &str) -> HashMap<String, String> {
        let mut summary = HashMap::new();

        for carrier in SUMMARY_CARRIERS {
            let Some(mapping) = self.table.zone_mapping_ci(carrier) else {
                continue;
            };

            let mut aliases: Vec<&String> = mapping.keys().collect();
            aliases.sort();

            for mapped_country in aliases {
                let mapped_upper = mapped_country.to_uppercase();
                if normalized.contains(&mapped_upper) || mapped_upper.contains(normalized) {
                    summary.insert(format!("{carrier}_zone"), mapping[mapped_country].clone());
                    break;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RateEngine {
        let table = RateTable::from_json(
            r#"{
                "carriers": {
                    "TestCarrier": {
                        "services": {
                            "Standard": {
                                "CANADA": {
                                    "1.0": {"rate": 500},
                                    "2.0": {"rate": 900}
                                }
                            }
                        }
                    },
                    "DHL": {
                        "services": {
                            "Express": {
                                "ZONE 14": {
                                    "1.0": {"rate": 950},
                                    "2.0": {"rate": 1400}
                                },
                                "CANADA": {
                                    "1.0": {"rate": 650}
                                }
                            }
                        }
                    }
                },
                "zone_mappings": {
                    "dhl": {
                        "AUSTRALIA": "14"
                    }
                }
            }"#,
        )
        .unwrap();
        RateEngine::new(Arc::new(table))
    }

    #[test]
    fn test_end_to_end_ceiling() {
        let quote = engine().get_rates("Canada", 1.5).unwrap();
        let test_carrier = quote
            .results
            .iter()
            .find(|r| r.carrier == "TestCarrier")
            .unwrap();
        assert_eq!(test_carrier.weight_tier, "2.0");
        assert_eq!(test_carrier.final_rate, 900.0);
    }

    #[test]
    fn test_results_sorted_by_final_rate() {
        let quote = engine().get_rates("Canada", 1.0).unwrap();
        assert_eq!(quote.total_found, 2);
        assert!(quote.results[0].final_rate <= quote.results[1].final_rate);
        assert_eq!(quote.results[0].final_rate, 500.0);
    }

    #[test]
    fn test_zone_resolution() {
        let quote = engine().get_rates("Australia", 1.0).unwrap();
        let zone = quote
            .results
            .iter()
            .find(|r| r.carrier == "DHL")
            .unwrap();
        assert_eq!(zone.match_type, MatchType::Zone);
        assert_eq!(zone.zone, "14");
        assert_eq!(quote.zone_mappings.get("dhl_zone").map(String::as_str), Some("14"));
    }

    #[test]
    fn test_invalid_inputs() {
        let e = engine();
        assert!(matches!(
            e.get_rates("", 1.0),
            Err(QueryError::InvalidInput(_))
        ));
        assert!(matches!(
            e.get_rates("Canada", 0.0),
            Err(QueryError::InvalidInput(_))
        ));
        assert!(matches!(
            e.get_rates("Canada", 1.3),
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_data_found() {
        assert_eq!(
            engine().get_rates("Atlantis", 1.0),
            Err(QueryError::NoDataFound("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_matches_without_serving_weight_is_ok_empty() {
        // Candidates exist for Canada but no tier reaches 5kg: 200 with zero
        // results, not NoDataFound.
        let quote = engine().get_rates("Canada", 5.0).unwrap();
        assert_eq!(quote.total_found, 0);
        assert!(quote.results.is_empty());
    }

    #[test]
    fn test_idempotence() {
        let e = engine();
        let first = e.get_rates("Canada", 1.5).unwrap();
        let second = e.get_rates("Canada", 1.5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_match_cache_serves_repeat_queries() {
        let e = engine();
        e.get_rates("Canada", 1.0).unwrap();
        assert!(e.match_cache.read().unwrap().contains_key("CANADA"));
        // Differing weight reuses the cached matches
        e.get_rates("canada", 2.0).unwrap();
        assert_eq!(e.match_cache.read().unwrap().len(), 1);
    }
}
