//! Topology configuration
//!
//! Everything the planner needs to describe one provisioning run. Loading and
//! validating presence of these fields belongs to the caller (missing fields
//! are a configuration error surfaced before planning starts); the planner
//! only consumes the resolved values.

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

/// Configuration for a single topology planning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Logical name for the network, used as the tag/name prefix
    pub name: String,
    /// Provider region the topology lives in
    pub region: String,
    /// Address block of the network (e.g. 10.0.0.0/16)
    pub vpc_cidr: Ipv4Net,
    /// Prefix length of each subnet carved out of `vpc_cidr`
    pub subnet_prefix_length: u8,
    /// How many zones to spread the subnet pairs across
    pub requested_zone_count: usize,
    /// Destination block for the public default route (e.g. 0.0.0.0/0)
    pub public_route_cidr: Ipv4Net,
    /// Ports opened by the security groups
    pub ports: PortConfig,
    /// Compute tier settings
    pub compute: ComputeConfig,
    /// Managed database settings
    pub database: DatabaseConfig,
    /// DNS alias settings
    pub dns: DnsConfig,
    /// Autoscaling settings
    #[serde(default)]
    pub scaling: ScalingConfig,
    /// Opaque reference to the TLS certificate the listener terminates with
    pub certificate_ref: String,
    /// Opaque reference to the notification topic surfaced to the compute tier
    pub notification_topic_ref: String,
}

/// Ports opened by the security groups
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PortConfig {
    pub ssh: u16,
    pub http: u16,
    pub https: u16,
    pub app: u16,
}

/// Compute tier settings for the launch template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeConfig {
    /// Machine image the instances boot from
    pub ami: String,
    pub instance_type: String,
    pub key_name: String,
    /// Root volume size in GiB
    pub root_volume_size: u32,
}

/// Managed database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub engine: String,
    pub instance_class: String,
    /// Allocated storage in GiB
    pub allocated_storage: u32,
    /// Port the engine listens on
    pub port: u16,
    /// Name of the initial database
    pub name: String,
    pub username: String,
    pub password: String,
    /// Provider-visible instance identifier
    pub identifier: String,
    pub skip_final_snapshot: bool,
    pub publicly_accessible: bool,
}

/// DNS alias settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsConfig {
    /// Fully qualified record name (e.g. "app.example.com")
    pub sub_domain: String,
    /// Record type for the alias (e.g. "A")
    pub record_type: String,
    pub ttl: u32,
}

/// Autoscaling settings
///
/// The defaults are the reference behavior: a 1..3 group scaling by one
/// instance on 5%/3% CPU thresholds sampled over two 300-second periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub min_size: u32,
    pub max_size: u32,
    pub desired_capacity: u32,
    pub cooldown_secs: u64,
    pub scale_up_adjustment: i32,
    pub scale_down_adjustment: i32,
    pub cpu_high_threshold: f64,
    pub cpu_low_threshold: f64,
    pub period_secs: u64,
    pub evaluation_periods: u32,
    pub health_check_grace_secs: u64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            min_size: 1,
            max_size: 3,
            desired_capacity: 1,
            cooldown_secs: 60,
            scale_up_adjustment: 1,
            scale_down_adjustment: -1,
            cpu_high_threshold: 5.0,
            cpu_low_threshold: 3.0,
            period_secs: 300,
            evaluation_periods: 2,
            health_check_grace_secs: 300,
        }
    }
}
