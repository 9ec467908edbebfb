//! Country matching against carrier rate tables.
//!
//! Two passes over the table produce candidate matches:
//! - Direct: the normalized country against every location key
//!   (equality / substring / alias, see [`alias::names_match`])
//! - Zone: the country resolved to a per-carrier zone code through
//!   `zone_mappings`, then the carrier's location keys scanned for zone
//!   tokens carrying that code
//!
//! Matches are deduplicated by (carrier, service, location key); a zone
//! match never overrides or duplicates a direct match for the same triple.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::table::RateTable;

use super::alias;

/// How a location key was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Country name matched the location key itself
    Direct,
    /// Country resolved to a zone code via the carrier's zone mapping
    Zone,
}

/// A candidate (carrier, service, location) for a destination country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateMatch {
    /// Carrier name (canonical key from the table)
    pub carrier: String,
    /// Service name
    pub service: String,
    /// Location key as stored in the service's rate table
    pub location_key: String,
    /// How the match was made
    pub match_type: MatchType,
    /// Resolved zone code, for zone matches
    pub zone: Option<String>,
    /// The zone-mapping country alias that resolved the zone
    pub zone_country_alias: Option<String>,
}

/// Find all plausible matches for a normalized country across the table.
///
/// `country` must already be [`alias::normalize`]d. A country with no
/// matches anywhere yields an empty list; that is a "no data" condition for
/// the caller, not an error. Output is sorted for stable presentation.
pub fn find_matches(country: &str, table: &RateTable) -> Vec<RateMatch> {
    let mut matches = Vec::new();
    let mut seen: HashSet<(String, String, String)> = HashSet::new();

    direct_pass(country, table, &mut matches, &mut seen);
    zone_pass(country, table, &mut matches, &mut seen);

    matches.sort_by(|a, b| {
        (&a.carrier, &a.service, &a.location_key).cmp(&(&b.carrier, &b.service, &b.location_key))
    });

    matches
}

/// Match the country directly against every location key.
fn direct_pass(
    country: &str,
    table: &RateTable,
    matches: &mut Vec<RateMatch>,
    seen: &mut HashSet<(String, String, String)>,
) {
    for (carrier_name, carrier) in &table.carriers {
        for (service_name, service) in &carrier.services {
            for location_key in service.keys() {
                let location_norm = alias::normalize(location_key);
                if !alias::names_match(country, &location_norm) {
                    continue;
                }
                if !seen.insert((
                    carrier_name.clone(),
                    service_name.clone(),
                    location_key.clone(),
                )) {
                    continue;
                }
                trace!(
                    carrier = %carrier_name,
                    service = %service_name,
                    location = %location_key,
                    "direct match"
                );
                matches.push(RateMatch {
                    carrier: carrier_name.clone(),
                    service: service_name.clone(),
                    location_key: location_key.clone(),
                    match_type: MatchType::Direct,
                    zone: None,
                    zone_country_alias: None,
                });
            }
        }
    }
}

/// Resolve the country to a zone code per carrier, then scan that carrier's
/// location keys for tokens carrying the code.
fn zone_pass(
    country: &str,
    table: &RateTable,
    matches: &mut Vec<RateMatch>,
    seen: &mut HashSet<(String, String, String)>,
) {
    for (mapped_carrier, mapping) in &table.zone_mappings {
        // Zone-mapping carrier keys may be cased differently than the
        // carriers map ("fedex" vs "FedEx").
        let Some((carrier_name, carrier)) = table.carrier_ci(mapped_carrier) else {
            continue;
        };

        let Some((zone_alias, zone_code)) = resolve_zone(country, mapping) else {
            continue;
        };

        trace!(
            carrier = %carrier_name,
            alias = %zone_alias,
            zone = %zone_code,
            "zone resolved"
        );

        for (service_name, service) in &carrier.services {
            for location_key in service.keys() {
                if !location_carries_zone(location_key, &zone_code) {
                    continue;
                }
                if !seen.insert((
                    carrier_name.to_string(),
                    service_name.clone(),
                    location_key.clone(),
                )) {
                    continue;
                }
                matches.push(RateMatch {
                    carrier: carrier_name.to_string(),
                    service: service_name.clone(),
                    location_key: location_key.clone(),
                    match_type: MatchType::Zone,
                    zone: Some(zone_code.clone()),
                    zone_country_alias: Some(zone_alias.clone()),
                });
            }
        }
    }
}

/// Find the zone code for a country in one carrier's mapping.
///
/// Uses the same equality/substring/alias rules as direct matching. The
/// mapping is scanned in sorted key order so resolution is deterministic.
fn resolve_zone(
    country: &str,
    mapping: &std::collections::HashMap<String, String>,
) -> Option<(String, String)> {
    let mut aliases: Vec<&String> = mapping.keys().collect();
    aliases.sort();

    for mapped_country in aliases {
        let mapped_norm = alias::normalize(mapped_country);
        if alias::names_match(country, &mapped_norm) {
            return Some((mapped_country.clone(), mapping[mapped_country].clone()));
        }
    }
    None
}

/// Whether a location key carries a zone code.
///
/// Accepts `ZONE <code>`, `ZONE<code>`, `Z<code>` or the bare code, exact or
/// as a substring, case-insensitively. Like name matching this is permissive
/// by design; short codes can over-match.
fn location_carries_zone(location_key: &str, zone_code: &str) -> bool {
    let key = location_key.to_uppercase();
    let code = zone_code.trim().to_uppercase();
    if code.is_empty() {
        return false;
    }

    let patterns = [
        format!("ZONE {code}"),
        format!("ZONE{code}"),
        format!("Z{code}"),
        code,
    ];

    patterns.iter().any(|p| key == *p || key.contains(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_table() -> RateTable {
        RateTable::from_json(
            r#"{
                "carriers": {
                    "Aramax": {
                        "services": {
                            "Standard": {
                                "CANADA": {"1.0": {"rate": 500}},
                                "UNITED STATES": {"1.0": {"rate": 600}},
                                "AUSTRALIA METRO": {"1.0": {"rate": 700}}
                            }
                        }
                    },
                    "DHL": {
                        "services": {
                            "Express": {
                                "ZONE 14": {"1.0": {"rate": 900}},
                                "ZONE 9": {"1.0": {"rate": 800}}
                            }
                        }
                    }
                },
                "zone_mappings": {
                    "dhl": {
                        "AUSTRALIA": "14",
                        "CANADA": "9"
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_direct_match() {
        let matches = find_matches("CANADA", &test_table());
        assert!(matches.iter().any(|m| {
            m.carrier == "Aramax"
                && m.location_key == "CANADA"
                && m.match_type == MatchType::Direct
        }));
    }

    #[test]
    fn test_alias_match_both_directions() {
        let table = test_table();
        let usa = find_matches("USA", &table);
        assert!(usa.iter().any(|m| m.location_key == "UNITED STATES"));

        let spelled = find_matches("UNITED STATES", &table);
        assert!(spelled.iter().any(|m| m.location_key == "UNITED STATES"));
    }

    #[test]
    fn test_zone_match_with_cased_mapping_key() {
        // Mapping key "dhl" resolves against carrier "DHL"
        let matches = find_matches("AUSTRALIA", &test_table());
        let zone = matches
            .iter()
            .find(|m| m.carrier == "DHL" && m.location_key == "ZONE 14")
            .unwrap();
        assert_eq!(zone.match_type, MatchType::Zone);
        assert_eq!(zone.zone.as_deref(), Some("14"));
        assert_eq!(zone.zone_country_alias.as_deref(), Some("AUSTRALIA"));
    }

    #[test]
    fn test_sub_zone_substring_match() {
        let matches = find_matches("AUSTRALIA", &test_table());
        assert!(matches
            .iter()
            .any(|m| m.location_key == "AUSTRALIA METRO" && m.match_type == MatchType::Direct));
    }

    #[test]
    fn test_no_matches_for_unknown_country() {
        assert!(find_matches("ATLANTIS", &test_table()).is_empty());
    }

    #[test]
    fn test_direct_wins_over_zone() {
        // A location key that both matches directly and carries the zone
        // code stays a single direct match.
        let table = RateTable::from_json(
            r#"{
                "carriers": {
                    "DHL": {
                        "services": {
                            "Express": {"ZONE 14 AUSTRALIA": {"1.0": {"rate": 900}}}
                        }
                    }
                },
                "zone_mappings": {
                    "DHL": {"AUSTRALIA": "14"}
                }
            }"#,
        )
        .unwrap();

        let matches = find_matches("AUSTRALIA", &table);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Direct);
    }

    #[test]
    fn test_zone_token_forms() {
        assert!(location_carries_zone("ZONE 14", "14"));
        assert!(location_carries_zone("ZONE14", "14"));
        assert!(location_carries_zone("Z14", "14"));
        assert!(location_carries_zone("14", "14"));
        assert!(location_carries_zone("zone 14 remote", "14"));
        assert!(!location_carries_zone("ZONE 9", "14"));
        assert!(!location_carries_zone("ZONE 14", ""));
    }

    #[test]
    fn test_output_is_sorted() {
        let matches = find_matches("AUSTRALIA", &test_table());
        let mut sorted = matches.clone();
        sorted.sort_by(|a, b| {
            (&a.carrier, &a.service, &a.location_key)
                .cmp(&(&b.carrier, &b.service, &b.location_key))
        });
        assert_eq!(matches, sorted);
    }
}
