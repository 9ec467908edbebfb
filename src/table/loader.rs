use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::types::RateTable;

impl RateTable {
    /// Load the master rate table from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        debug!(path = %path.display(), "loading rate table");

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read rate table: {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("failed to parse rate table: {}", path.display()))
    }

    /// Parse a rate table from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let table: RateTable =
            serde_json::from_str(json).context("failed to parse rate table JSON")?;

        table.validate()?;

        Ok(table)
    }

    /// Validate the table shape.
    ///
    /// Zone mappings pointing at unknown carriers and carriers without
    /// services are tolerated (the source spreadsheets are messy), but they
    /// are worth a warning.
    pub fn validate(&self) -> Result<()> {
        if self.carriers.is_empty() {
            anyhow::bail!("rate table has no carriers");
        }

        for (name, carrier) in &self.carriers {
            if carrier.services.is_empty() {
                warn!(carrier = %name, "carrier has no services");
            }
        }

        for name in self.zone_mappings.keys() {
            if self.carrier_ci(name).is_none() {
                warn!(carrier = %name, "zone mapping references unknown carrier");
            }
        }

        info!(
            carriers = self.carriers.len(),
            services = self.services_count(),
            locations = self.locations_count(),
            zone_mapped_carriers = self.zone_mappings.len(),
            "rate table validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_table() {
        let json = r#"{
            "carriers": {
                "DHL": {
                    "services": {
                        "Express": {
                            "CANADA": {
                                "1.0": {"rate": 500}
                            }
                        }
                    }
                }
            }
        }"#;

        let table = RateTable::from_json(json).unwrap();
        assert_eq!(table.carriers.len(), 1);
        assert_eq!(table.locations_count(), 1);
    }

    #[test]
    fn test_ingestion_metadata_ignored() {
        // The ingestion script writes a top-level metadata block and
        // per-carrier countries/weight_tiers summaries; the core ignores them.
        let json = r#"{
            "carriers": {
                "DHL": {
                    "services": {},
                    "countries": ["CANADA"],
                    "weight_tiers": [0.5, 1.0]
                }
            },
            "zone_mappings": {},
            "metadata": {"generated_at": "2025-01-23"}
        }"#;

        let table = RateTable::from_json(json).unwrap();
        assert!(table.carriers.contains_key("DHL"));
    }

    #[test]
    fn test_empty_table_rejected() {
        let json = r#"{"carriers": {}, "zone_mappings": {}}"#;
        assert!(RateTable::from_json(json).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(RateTable::load("/nonexistent/rates.json").is_err());
    }
}
