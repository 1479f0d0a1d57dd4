//! Pairs partitioned blocks into per-zone public/private allocations
//!
//! The i-th zone gets `blocks[2i]` as its public block and `blocks[2i + 1]`
//! as its private block. Downstream role assignment (route table
//! associations, load balancer membership) relies on this exact order.

use crate::models::{SubnetAllocation, Zone};
use crate::{Error, Result};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pair every zone with a public/private block pair
///
/// Strict: fails with [`Error::InsufficientBlocks`] unless at least
/// `2 * zones.len()` blocks were given. On success the allocation for the
/// last zone, and only that one, carries the terminal marker.
pub fn allocate(zones: &[Zone], blocks: &[Ipv4Net]) -> Result<Vec<SubnetAllocation>> {
    let required = zones.len() * 2;
    if blocks.len() < required {
        return Err(Error::InsufficientBlocks {
            zones: zones.len(),
            required,
            given: blocks.len(),
        });
    }

    let mut allocations: Vec<SubnetAllocation> = zones
        .iter()
        .enumerate()
        .map(|(i, zone)| SubnetAllocation {
            zone: zone.clone(),
            public_block: blocks[2 * i],
            private_block: blocks[2 * i + 1],
            terminal: false,
        })
        .collect();

    if let Some(last) = allocations.last_mut() {
        last.terminal = true;
    }

    Ok(allocations)
}

/// A zone that could not be paired in a lenient allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedZone {
    pub zone: Zone,
    pub reason: String,
}

/// Result of a lenient allocation: what paired, what got skipped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub allocations: Vec<SubnetAllocation>,
    pub skipped: Vec<SkippedZone>,
}

/// Pair as many zones as the given blocks allow
///
/// Zones without a complete public/private pair are skipped with a logged
/// diagnostic and reported in the outcome instead of failing the run; the
/// terminal marker lands on the last zone that did pair. Block indices stay
/// positional (`2i`, `2i + 1`), so a skipped zone's slots are not reassigned
/// to later zones.
pub fn allocate_available(zones: &[Zone], blocks: &[Ipv4Net]) -> AllocationOutcome {
    let mut allocations = Vec::new();
    let mut skipped = Vec::new();

    for (i, zone) in zones.iter().enumerate() {
        match (blocks.get(2 * i), blocks.get(2 * i + 1)) {
            (Some(public), Some(private)) => allocations.push(SubnetAllocation {
                zone: zone.clone(),
                public_block: *public,
                private_block: *private,
                terminal: false,
            }),
            _ => {
                let available = blocks.len().saturating_sub(2 * i);
                warn!(
                    zone = %zone,
                    available,
                    "skipping zone without a complete public/private block pair"
                );
                skipped.push(SkippedZone {
                    zone: zone.clone(),
                    reason: format!("only {} of 2 blocks available", available),
                });
            }
        }
    }

    if let Some(last) = allocations.last_mut() {
        last.terminal = true;
    }

    AllocationOutcome {
        allocations,
        skipped,
    }
}
