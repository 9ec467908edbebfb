//! Pricing a match into a presentable result.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::table::{RateTable, Service, WeightTable};

use super::matcher::{MatchType, RateMatch};
use super::weight;

/// A priced shipping option, ready for the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedRate {
    /// Carrier name
    pub carrier: String,
    /// Service label, with a sub-zone suffix where applicable
    pub service_type: String,
    /// Display price, e.g. "₹900"
    pub rate: String,
    /// Currency code
    pub currency: String,
    /// Zone code for zone matches, empty otherwise
    pub zone: String,
    /// How the price was computed, e.g. "₹900 for 2.0kg tier"
    pub calculation: String,
    /// Display label for the matched destination
    pub matched_country: String,
    /// The selected weight tier key
    pub weight_tier: String,
    /// direct or zone
    pub match_type: MatchType,
    /// Numeric final price, used for sorting
    pub final_rate: f64,
}

/// Price one match for the requested weight.
///
/// `country` is the normalized query country, used for display labels.
/// Returns `None` when the match cannot be priced (location key missing
/// after case fallback, no weight tier at or above the request); failures
/// are logged and skipped, never escalated to the whole query.
pub fn price_match(
    m: &RateMatch,
    country: &str,
    requested_weight: f64,
    table: &RateTable,
) -> Option<PricedRate> {
    let Some((_, carrier)) = table.carrier_ci(&m.carrier) else {
        warn!(carrier = %m.carrier, "match references unknown carrier, skipping");
        return None;
    };
    let Some(service) = carrier.services.get(&m.service) else {
        warn!(
            carrier = %m.carrier,
            service = %m.service,
            "match references unknown service, skipping"
        );
        return None;
    };

    let Some((resolved_key, weights)) = lookup_location(service, &m.location_key) else {
        warn!(
            carrier = %m.carrier,
            service = %m.service,
            location = %m.location_key,
            "location key not found in service, skipping"
        );
        return None;
    };

    let Some(tier) = weight::resolve_tier(requested_weight, weights.keys().map(String::as_str))
    else {
        trace!(
            carrier = %m.carrier,
            service = %m.service,
            location = %resolved_key,
            weight = requested_weight,
            "no weight tier at or above request, excluded"
        );
        return None;
    };
    let entry = &weights[tier];

    let (final_rate, calculation) = if entry.is_per_kg {
        let total = entry.rate * requested_weight;
        (
            total,
            format!(
                "₹{}/kg × {}kg = ₹{}",
                fmt_amount(entry.rate),
                fmt_amount(requested_weight),
                fmt_amount(total)
            ),
        )
    } else {
        (entry.rate, format!("₹{} for {}kg tier", fmt_amount(entry.rate), tier))
    };

    let (service_type, matched_country) = display_labels(m, country, resolved_key);

    Some(PricedRate {
        carrier: m.carrier.clone(),
        service_type,
        rate: format!("₹{}", fmt_amount(final_rate)),
        currency: entry.currency.clone(),
        zone: m.zone.clone().unwrap_or_default(),
        calculation,
        matched_country,
        weight_tier: tier.to_string(),
        match_type: m.match_type,
        final_rate,
    })
}

/// Resolve a location key against a service map, trying original, upper and
/// lower case in that order. Stored keys are not guaranteed normalized.
fn lookup_location<'a>(service: &'a Service, key: &str) -> Option<(&'a str, &'a WeightTable)> {
    if let Some((k, w)) = service.get_key_value(key) {
        return Some((k.as_str(), w));
    }
    let upper = key.to_uppercase();
    if let Some((k, w)) = service.get_key_value(&upper) {
        return Some((k.as_str(), w));
    }
    let lower = key.to_lowercase();
    service
        .get_key_value(&lower)
        .map(|(k, w)| (k.as_str(), w))
}

/// Build the service and destination display labels.
///
/// Australia and New Zealand tables carry sub-zone keys ("AUSTRALIA METRO",
/// "NEW ZEALAND ZONE 1"); when the query was for the plain country, the
/// sub-zone suffix is appended to both labels. Otherwise a resolved key that
/// differs from what was matched is shown in parentheses.
fn display_labels(m: &RateMatch, country: &str, resolved_key: &str) -> (String, String) {
    let resolved_upper = resolved_key.to_uppercase();

    let au = country == "AUSTRALIA" && resolved_upper != "AUSTRALIA";
    let nz = (country == "NEW ZEALAND" || country == "NZ")
        && resolved_upper != "NEW ZEALAND"
        && resolved_upper != "NZ";

    if (au || nz) && m.match_type == MatchType::Direct {
        let suffix = resolved_key
            .split_once(' ')
            .map(|(_, rest)| rest)
            .unwrap_or(resolved_key);
        let label = if au { "Australia" } else { "New Zealand" };
        return (
            format!("{} ({})", m.service, suffix),
            format!("{} ({})", label, suffix),
        );
    }

    // For zone matches the human-meaningful name is the zone-mapping alias,
    // not the zone token itself.
    let matched = m
        .zone_country_alias
        .as_deref()
        .unwrap_or(&m.location_key);

    let matched_country = if !resolved_key.eq_ignore_ascii_case(matched) {
        format!("{} ({})", matched, resolved_key)
    } else {
        matched.to_string()
    };

    (m.service.clone(), matched_country)
}

/// Format an amount without a trailing ".0" but keeping real fractions.
fn fmt_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
