//! Data models for topology planning

mod allocation;
mod block;
mod resource;

pub use allocation::{SubnetAllocation, SubnetRole, Zone};
pub use block::{blocks_overlap, OccupiedSet};
pub use resource::{ResourceKind, ResourceNode};
