//! Environment discovery port
//!
//! The two lookups a planning run needs before partitioning: which address
//! blocks are already in use, and which availability zones exist. Both are
//! remote in production; retries and timeouts belong to the implementation,
//! never to the planner.

use crate::models::Zone;
use crate::Result;
use async_trait::async_trait;
use ipnet::Ipv4Net;

/// Source of pre-existing network state
///
/// Implementations wrap a provider's APIs; enumerating occupied blocks may
/// take one round-trip per existing subnet. Zone order must be the provider's
/// enumeration order.
#[async_trait]
pub trait NetworkDiscovery: Send + Sync {
    /// Address blocks already allocated within the target network
    async fn occupied_blocks(&self) -> Result<Vec<Ipv4Net>>;

    /// Usable availability zones, in discovery order
    async fn availability_zones(&self) -> Result<Vec<Zone>>;
}

/// Discovery over fixed, in-memory state
///
/// Used in tests and for offline planning against a known environment.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    occupied: Vec<Ipv4Net>,
    zones: Vec<Zone>,
}

impl StaticDiscovery {
    pub fn new(occupied: Vec<Ipv4Net>, zones: Vec<Zone>) -> Self {
        Self { occupied, zones }
    }
}

#[async_trait]
impl NetworkDiscovery for StaticDiscovery {
    async fn occupied_blocks(&self) -> Result<Vec<Ipv4Net>> {
        Ok(self.occupied.clone())
    }

    async fn availability_zones(&self) -> Result<Vec<Zone>> {
        Ok(self.zones.clone())
    }
}
