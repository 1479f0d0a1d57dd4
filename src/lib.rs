//! Multi-AZ Topology Planner
//!
//! Plans a multi-availability-zone network topology from a handful of
//! parameters (address block, subnet count, prefix length):
//! - Non-overlapping CIDR partitioning around already-occupied ranges
//! - Zone resolution bounded by what the region offers
//! - Public/private subnet pairing per zone
//! - A dependency-ordered plan of the full resource graph (network, routing,
//!   load-balanced autoscaled compute, database, DNS alias)
//!
//! The planner performs no provider calls itself: the environment comes in
//! through the [`discovery::NetworkDiscovery`] port, and the finished
//! [`graph::Plan`] goes out through the [`executor::PlanExecutor`] port.

pub mod allocator;
pub mod bootstrap;
pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod graph;
pub mod models;
pub mod service;
pub mod zones;

// Re-export core types
pub use allocator::{
    allocate, allocate_available, partition, partition_n, AllocationOutcome, SkippedZone,
};
pub use bootstrap::{bootstrap_env, EnvEntry, EnvValue};
pub use config::{
    ComputeConfig, DatabaseConfig, DnsConfig, PortConfig, ScalingConfig, TopologyConfig,
};
pub use discovery::{NetworkDiscovery, StaticDiscovery};
pub use error::{Error, Result};
pub use executor::{ExecutionOutcome, PlanExecutor, RecordingExecutor};
pub use graph::{Plan, PlanOutput, TopologyGraphBuilder};
pub use models::{
    blocks_overlap, OccupiedSet, ResourceKind, ResourceNode, SubnetAllocation, SubnetRole, Zone,
};
pub use service::TopologyPlanner;
