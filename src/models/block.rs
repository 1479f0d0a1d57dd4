//! Address blocks already in use within the target network

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

/// Check if two CIDR blocks overlap
pub fn blocks_overlap(a: &Ipv4Net, b: &Ipv4Net) -> bool {
    a.contains(&b.network())
        || a.contains(&b.broadcast())
        || b.contains(&a.network())
        || b.contains(&a.broadcast())
}

/// Address blocks discovered as already allocated within the parent network
///
/// Read-only input to the partitioner; membership never changes during a
/// planning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccupiedSet {
    blocks: Vec<Ipv4Net>,
}

impl OccupiedSet {
    /// Create an occupied set from discovered blocks
    pub fn new(blocks: Vec<Ipv4Net>) -> Self {
        Self { blocks }
    }

    /// An empty set, for networks with no prior allocations
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if a candidate block overlaps any occupied block
    pub fn overlaps(&self, block: &Ipv4Net) -> bool {
        self.blocks.iter().any(|b| blocks_overlap(b, block))
    }

    /// Number of occupied blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The occupied blocks, in discovery order
    pub fn blocks(&self) -> &[Ipv4Net] {
        &self.blocks
    }
}

impl From<Vec<Ipv4Net>> for OccupiedSet {
    fn from(blocks: Vec<Ipv4Net>) -> Self {
        Self::new(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn net(s: &str) -> Ipv4Net {
        Ipv4Net::from_str(s).unwrap()
    }

    #[test]
    fn test_overlap_detection() {
        // Identical, nested, and partially aligned blocks all overlap
        assert!(blocks_overlap(&net("10.0.0.0/24"), &net("10.0.0.0/24")));
        assert!(blocks_overlap(&net("10.0.0.0/16"), &net("10.0.5.0/24")));
        assert!(blocks_overlap(&net("10.0.5.0/24"), &net("10.0.0.0/16")));

        assert!(!blocks_overlap(&net("10.0.0.0/24"), &net("10.0.1.0/24")));
        assert!(!blocks_overlap(&net("10.0.0.0/16"), &net("10.1.0.0/16")));
    }

    #[test]
    fn test_occupied_set_overlaps() {
        let occupied = OccupiedSet::new(vec![net("10.0.5.0/24"), net("10.0.16.0/20")]);

        assert!(occupied.overlaps(&net("10.0.5.0/24")));
        assert!(occupied.overlaps(&net("10.0.5.128/25")));
        assert!(occupied.overlaps(&net("10.0.17.0/24")));
        assert!(!occupied.overlaps(&net("10.0.6.0/24")));
        assert_eq!(occupied.len(), 2);
    }

    #[test]
    fn test_empty_set_never_overlaps() {
        let occupied = OccupiedSet::empty();
        assert!(occupied.is_empty());
        assert!(!occupied.overlaps(&net("10.0.0.0/24")));
    }
}
