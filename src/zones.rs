//! Availability zone resolution

use crate::models::Zone;
use crate::{Error, Result};
use tracing::warn;

/// Bound the requested zone count against what the region offers
///
/// Returns the first `min(requested, available.len())` zones in discovery
/// order — the lookup's enumeration order is authoritative and is never
/// sorted. Running with fewer zones than requested is a degraded but valid
/// mode and only logs; an empty lookup fails with
/// [`Error::NoZonesAvailable`].
pub fn resolve(requested: usize, available: Vec<Zone>) -> Result<Vec<Zone>> {
    if available.is_empty() {
        return Err(Error::NoZonesAvailable);
    }

    if requested > available.len() {
        warn!(
            requested,
            available = available.len(),
            "fewer availability zones than requested, continuing with all of them"
        );
    }

    let count = requested.min(available.len());
    Ok(available.into_iter().take(count).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones(names: &[&str]) -> Vec<Zone> {
        names.iter().copied().map(Zone::new).collect()
    }

    #[test]
    fn test_truncates_to_requested_count() {
        let resolved = resolve(2, zones(&["a", "b", "c"])).unwrap();
        assert_eq!(resolved, zones(&["a", "b"]));
    }

    #[test]
    fn test_shortfall_returns_everything_available() {
        // Requesting 5 from a 3-zone region: degraded but valid
        let resolved = resolve(5, zones(&["a", "b", "c"])).unwrap();
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved, zones(&["a", "b", "c"]));
    }

    #[test]
    fn test_discovery_order_preserved() {
        let resolved = resolve(3, zones(&["c", "a", "b"])).unwrap();
        assert_eq!(resolved, zones(&["c", "a", "b"]));
    }

    #[test]
    fn test_empty_lookup_fails() {
        let result = resolve(3, Vec::new());
        assert!(matches!(result.err(), Some(Error::NoZonesAvailable)));
    }

    #[test]
    fn test_exact_match() {
        let resolved = resolve(3, zones(&["a", "b", "c"])).unwrap();
        assert_eq!(resolved.len(), 3);
    }
}
