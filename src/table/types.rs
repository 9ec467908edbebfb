use serde::Deserialize;
use std::collections::HashMap;

/// Weight table for one location: stringified weight tier -> rate entry.
///
/// Keys parse as non-negative numbers, typically in 0.5 increments. Tables
/// are sparse: not every tier is present for every location.
pub type WeightTable = HashMap<String, RateEntry>;

/// Rate table for one service: location key -> weight table.
///
/// A location key is either a country/region name ("CANADA",
/// "AUSTRALIA METRO") or a zone-code token ("ZONE 14"). Keys come straight
/// from the source spreadsheets and are not guaranteed normalized.
pub type Service = HashMap<String, WeightTable>;

/// The master rate table, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct RateTable {
    /// Carrier name -> carrier data
    #[serde(default)]
    pub carriers: HashMap<String, Carrier>,

    /// Carrier name -> (country alias -> zone code).
    ///
    /// Carrier keys here may differ in case from `carriers` keys; lookups
    /// must go through [`RateTable::carrier_ci`].
    #[serde(default)]
    pub zone_mappings: HashMap<String, HashMap<String, String>>,
}

/// One shipping carrier.
#[derive(Debug, Clone, Deserialize)]
pub struct Carrier {
    /// Service name ("Express", "Document", ...) -> rate data
    #[serde(default)]
    pub services: HashMap<String, Service>,
}

/// A single priced cell of the table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateEntry {
    /// Price in the entry currency. Flat for the tier unless `is_per_kg`.
    pub rate: f64,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// When true the final price is `rate * requested_weight`
    #[serde(default)]
    pub is_per_kg: bool,

    /// Source weight range for range-derived tiers (start, end)
    #[serde(default)]
    pub weight_range: Option<(f64, f64)>,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl RateTable {
    /// Resolve a carrier by name, case-insensitively.
    ///
    /// Returns the canonical key from `carriers` along with the carrier.
    pub fn carrier_ci(&self, name: &str) -> Option<(&str, &Carrier)> {
        if let Some((key, carrier)) = self.carriers.get_key_value(name) {
            return Some((key.as_str(), carrier));
        }
        self.carriers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, carrier)| (key.as_str(), carrier))
    }

    /// Resolve a zone mapping by carrier name, case-insensitively.
    pub fn zone_mapping_ci(&self, name: &str) -> Option<&HashMap<String, String>> {
        if let Some(mapping) = self.zone_mappings.get(name) {
            return Some(mapping);
        }
        self.zone_mappings
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, mapping)| mapping)
    }

    /// Carrier names, sorted for stable output.
    pub fn carrier_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.carriers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of services across all carriers.
    pub fn services_count(&self) -> usize {
        self.carriers.values().map(|c| c.services.len()).sum()
    }

    /// Total number of location keys across all services.
    pub fn locations_count(&self) -> usize {
        self.carriers
            .values()
            .flat_map(|c| c.services.values())
            .map(|s| s.len())
            .sum()
    }
}
