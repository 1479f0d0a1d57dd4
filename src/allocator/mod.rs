//! Address-space partitioning and zone pairing
//!
//! Provides the two pure stages of a planning run:
//! - carving non-overlapping child blocks out of the network block
//! - pairing blocks into per-zone public/private allocations

mod pairing;
mod partitioner;

pub use pairing::{allocate, allocate_available, AllocationOutcome, SkippedZone};
pub use partitioner::{partition, partition_n};
