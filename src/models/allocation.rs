//! Zones and per-zone subnet allocations

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

/// An availability zone within the target region
///
/// Ordering is the discovery order returned by the zone lookup, which is
/// authoritative; zones are never sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identifier (e.g. "us-east-1a")
    pub name: String,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Role of a subnet within its zone pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetRole {
    /// Routed to the gateway; hosts the ingress tier
    Public,
    /// No gateway route; hosts the database tier
    Private,
}

impl std::fmt::Display for SubnetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubnetRole::Public => write!(f, "public"),
            SubnetRole::Private => write!(f, "private"),
        }
    }
}

/// One zone's pair of subnet blocks
///
/// Invariants across a full allocation set: every resolved zone has exactly
/// one pair, no two blocks overlap anywhere in the set, and exactly one
/// allocation carries the terminal marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetAllocation {
    /// Zone this pair lands in
    pub zone: Zone,
    /// Block for the public subnet
    pub public_block: Ipv4Net,
    /// Block for the private subnet
    pub private_block: Ipv4Net,
    /// True only for the last successfully allocated zone; gates the
    /// shared, zone-count-independent resources
    pub terminal: bool,
}

impl SubnetAllocation {
    /// Block for the given role
    pub fn block(&self, role: SubnetRole) -> Ipv4Net {
        match role {
            SubnetRole::Public => self.public_block,
            SubnetRole::Private => self.private_block,
        }
    }

    /// Both blocks in pairing order (public precedes private)
    pub fn blocks(&self) -> [(SubnetRole, Ipv4Net); 2] {
        [
            (SubnetRole::Public, self.public_block),
            (SubnetRole::Private, self.private_block),
        ]
    }
}
