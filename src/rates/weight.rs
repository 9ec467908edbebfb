//! Weight validation and ceiling tier resolution.

use thiserror::Error;

/// Tolerance for the half-step check on weights that arrived as JSON floats.
const STEP_EPSILON: f64 = 1e-9;

/// Invalid requested weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidWeight {
    #[error("weight must be greater than 0")]
    NotPositive,
    #[error("weight must be in 0.5kg increments (0.5, 1.0, 1.5, 2.0, ...)")]
    NotHalfStep,
}

/// Validate a requested weight: finite, positive, multiple of 0.5.
pub fn validate_weight(weight: f64) -> Result<(), InvalidWeight> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(InvalidWeight::NotPositive);
    }
    let doubled = weight * 2.0;
    if (doubled - doubled.round()).abs() > STEP_EPSILON {
        return Err(InvalidWeight::NotHalfStep);
    }
    Ok(())
}

/// Select the weight tier for a requested weight under the ceiling policy.
///
/// Parses the tier keys as numbers, sorts ascending, and returns the key of
/// the smallest tier >= `requested`. Returns `None` when the requested
/// weight exceeds every available tier: that carrier/service does not serve
/// the weight and is excluded, never approximated downward.
///
/// Returns the table's own key string so the caller can index the weight
/// table directly; keys that do not parse as numbers are skipped.
pub fn resolve_tier<'a, I>(requested: f64, tier_keys: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tiers: Vec<(f64, &str)> = tier_keys
        .into_iter()
        .filter_map(|key| key.trim().parse::<f64>().ok().map(|value| (value, key)))
        .collect();

    tiers.sort_by(|a, b| a.0.total_cmp(&b.0));

    tiers
        .into_iter()
        .find(|(value, _)| *value >= requested)
        .map(|(_, key)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_half_steps() {
        assert!(validate_weight(0.5).is_ok());
        assert!(validate_weight(1.0).is_ok());
        assert!(validate_weight(17.5).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert_eq!(validate_weight(0.0), Err(InvalidWeight::NotPositive));
        assert_eq!(validate_weight(-1.5), Err(InvalidWeight::NotPositive));
        assert_eq!(validate_weight(f64::NAN), Err(InvalidWeight::NotPositive));
        assert_eq!(
            validate_weight(f64::INFINITY),
            Err(InvalidWeight::NotPositive)
        );
    }

    #[test]
    fn test_validate_rejects_off_step() {
        assert_eq!(validate_weight(0.3), Err(InvalidWeight::NotHalfStep));
        assert_eq!(validate_weight(1.2), Err(InvalidWeight::NotHalfStep));
        assert_eq!(validate_weight(2.75), Err(InvalidWeight::NotHalfStep));
    }

    #[test]
    fn test_ceiling_picks_smallest_at_or_above() {
        let keys = ["2.0", "0.5", "1.0"];
        assert_eq!(resolve_tier(1.5, keys), Some("2.0"));
        assert_eq!(resolve_tier(1.0, keys), Some("1.0"));
        assert_eq!(resolve_tier(0.5, keys), Some("0.5"));
    }

    #[test]
    fn test_ceiling_excludes_overweight() {
        let keys = ["0.5", "1.0", "2.0"];
        assert_eq!(resolve_tier(5.0, keys), None);
    }

    #[test]
    fn test_unparseable_keys_skipped() {
        let keys = ["0.5", "Dox 500 Gm", "2.0"];
        assert_eq!(resolve_tier(1.0, keys), Some("2.0"));
    }

    #[test]
    fn test_integer_style_keys_kept_verbatim() {
        // Sparse tables mix "1" and "1.0" style keys; the resolver hands
        // back whichever string the table actually uses.
        let keys = ["1", "3"];
        assert_eq!(resolve_tier(0.5, keys), Some("1"));
        assert_eq!(resolve_tier(2.0, keys), Some("3"));
    }

    #[test]
    fn test_empty_tier_set() {
        assert_eq!(resolve_tier(1.0, []), None);
    }
}
