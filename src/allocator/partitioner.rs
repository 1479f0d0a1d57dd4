//! Partitions a network block into candidate subnet blocks
//!
//! Walks the children of the base block in ascending address order and skips
//! anything overlapping the occupied set. Pure: same inputs, same sequence,
//! no external lookups.

use crate::models::OccupiedSet;
use crate::{Error, Result};
use ipnet::Ipv4Net;

/// Lazily partition `base` into `/child_prefix` blocks avoiding `occupied`
///
/// Blocks come out in ascending address order, aligned to the child prefix
/// and fully contained in `base`; consecutive emissions never overlap each
/// other or any occupied block. Callers take only the prefix of the sequence
/// they need.
///
/// Fails with [`Error::InvalidPrefix`] unless `child_prefix` is strictly
/// longer than the base prefix.
pub fn partition(
    base: Ipv4Net,
    child_prefix: u8,
    occupied: &OccupiedSet,
) -> Result<impl Iterator<Item = Ipv4Net> + '_> {
    if child_prefix <= base.prefix_len() {
        return Err(Error::InvalidPrefix {
            base: base.prefix_len(),
            child: child_prefix,
        });
    }

    // trunc() drops any host bits so the walk starts at the network address
    let children = base.trunc().subnets(child_prefix)?;
    Ok(children.filter(move |block| !occupied.overlaps(block)))
}

/// Take exactly `count` blocks from [`partition`]
///
/// Fails with [`Error::AddressSpaceExhausted`] when fewer than `count`
/// disjoint blocks remain; the error carries the counts a caller needs to
/// report the misconfiguration precisely.
pub fn partition_n(
    base: Ipv4Net,
    child_prefix: u8,
    occupied: &OccupiedSet,
    count: usize,
) -> Result<Vec<Ipv4Net>> {
    let blocks: Vec<Ipv4Net> = partition(base, child_prefix, occupied)?.take(count).collect();

    if blocks.len() < count {
        return Err(Error::AddressSpaceExhausted {
            base,
            prefix: child_prefix,
            requested: count,
            available: blocks.len(),
            occupied: occupied.len(),
        });
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::blocks_overlap;
    use std::str::FromStr;

    fn net(s: &str) -> Ipv4Net {
        Ipv4Net::from_str(s).unwrap()
    }

    #[test]
    fn test_partition_ascending_aligned() {
        let blocks: Vec<_> = partition(net("10.0.0.0/16"), 24, &OccupiedSet::empty())
            .unwrap()
            .take(3)
            .collect();

        assert_eq!(blocks[0], net("10.0.0.0/24"));
        assert_eq!(blocks[1], net("10.0.1.0/24"));
        assert_eq!(blocks[2], net("10.0.2.0/24"));
    }

    #[test]
    fn test_partition_skips_occupied() {
        let occupied = OccupiedSet::new(vec![net("10.0.1.0/24")]);
        let blocks: Vec<_> = partition(net("10.0.0.0/16"), 24, &occupied)
            .unwrap()
            .take(3)
            .collect();

        assert_eq!(blocks, vec![net("10.0.0.0/24"), net("10.0.2.0/24"), net("10.0.3.0/24")]);
    }

    #[test]
    fn test_partition_skips_larger_occupied_block() {
        // A /22 occupies four /24 children at once
        let occupied = OccupiedSet::new(vec![net("10.0.0.0/22")]);
        let blocks: Vec<_> = partition(net("10.0.0.0/16"), 24, &occupied)
            .unwrap()
            .take(2)
            .collect();

        assert_eq!(blocks, vec![net("10.0.4.0/24"), net("10.0.5.0/24")]);
    }

    #[test]
    fn test_partition_ignores_occupied_outside_base() {
        let occupied = OccupiedSet::new(vec![net("192.168.0.0/24")]);
        let blocks: Vec<_> = partition(net("10.0.0.0/16"), 24, &occupied)
            .unwrap()
            .take(1)
            .collect();

        assert_eq!(blocks, vec![net("10.0.0.0/24")]);
    }

    #[test]
    fn test_partition_disjointness_and_containment() {
        let base = net("10.0.0.0/16");
        let occupied = OccupiedSet::new(vec![net("10.0.2.0/23"), net("10.0.64.0/18")]);
        let blocks: Vec<_> = partition(base, 24, &occupied).unwrap().take(32).collect();

        assert_eq!(blocks.len(), 32);
        for (i, a) in blocks.iter().enumerate() {
            assert_eq!(a.prefix_len(), 24);
            assert!(base.contains(&a.network()) && base.contains(&a.broadcast()));
            assert!(!occupied.overlaps(a));
            for b in &blocks[i + 1..] {
                assert!(!blocks_overlap(a, b));
            }
        }
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let empty = OccupiedSet::empty();
        let result = partition(net("10.0.0.0/16"), 16, &empty);
        assert!(matches!(
            result.err(),
            Some(Error::InvalidPrefix { base: 16, child: 16 })
        ));

        let empty = OccupiedSet::empty();
        let result = partition(net("10.0.0.0/16"), 8, &empty);
        assert!(matches!(result.err(), Some(Error::InvalidPrefix { .. })));
    }

    #[test]
    fn test_partition_n_excludes_occupied() {
        // Requesting 4 blocks around an occupied 10.0.5.0/24
        let occupied = OccupiedSet::new(vec![net("10.0.5.0/24")]);
        let blocks = partition_n(net("10.0.0.0/16"), 24, &occupied, 4).unwrap();

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], net("10.0.0.0/24"));
        assert!(!blocks.contains(&net("10.0.5.0/24")));
    }

    #[test]
    fn test_partition_n_exhaustion() {
        // A /24 holds eight /27 children; occupying two leaves six
        let occupied = OccupiedSet::new(vec![net("10.0.0.0/27"), net("10.0.0.32/27")]);
        let result = partition_n(net("10.0.0.0/24"), 27, &occupied, 8);

        match result {
            Err(Error::AddressSpaceExhausted {
                requested,
                available,
                occupied: occupied_count,
                ..
            }) => {
                assert_eq!(requested, 8);
                assert_eq!(available, 6);
                assert_eq!(occupied_count, 2);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_partition_n_exact_fit() {
        let blocks = partition_n(net("10.0.0.0/24"), 26, &OccupiedSet::empty(), 4).unwrap();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[3], net("10.0.0.192/26"));
    }
}
