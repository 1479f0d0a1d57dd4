//! Resource descriptions making up a plan

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of infrastructure resource a node describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Network,
    Gateway,
    RouteTable,
    Route,
    Subnet,
    RouteTableAssociation,
    SecurityGroup,
    InstanceProfile,
    DbParameterGroup,
    DbSubnetGroup,
    Database,
    LaunchTemplate,
    LoadBalancer,
    TargetGroup,
    Listener,
    AutoscalingGroup,
    ScalingPolicy,
    MetricAlarm,
    DnsRecord,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Network => "network",
            ResourceKind::Gateway => "gateway",
            ResourceKind::RouteTable => "route_table",
            ResourceKind::Route => "route",
            ResourceKind::Subnet => "subnet",
            ResourceKind::RouteTableAssociation => "route_table_association",
            ResourceKind::SecurityGroup => "security_group",
            ResourceKind::InstanceProfile => "instance_profile",
            ResourceKind::DbParameterGroup => "db_parameter_group",
            ResourceKind::DbSubnetGroup => "db_subnet_group",
            ResourceKind::Database => "database",
            ResourceKind::LaunchTemplate => "launch_template",
            ResourceKind::LoadBalancer => "load_balancer",
            ResourceKind::TargetGroup => "target_group",
            ResourceKind::Listener => "listener",
            ResourceKind::AutoscalingGroup => "autoscaling_group",
            ResourceKind::ScalingPolicy => "scaling_policy",
            ResourceKind::MetricAlarm => "metric_alarm",
            ResourceKind::DnsRecord => "dns_record",
        };
        write!(f, "{}", name)
    }
}

/// One resource description in a plan
///
/// Attributes are provider-opaque JSON; their schema per kind belongs to the
/// executor. Where an attribute embeds another node's id, that id is also
/// present in `depends_on`, so an executor honoring the declared edges never
/// materializes a node before a resource it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Plan-local identifier, referenced by dependent nodes
    pub id: Uuid,
    /// Logical name, unique within a plan, used for tagging and diagnostics
    pub name: String,
    /// What the node describes
    pub kind: ResourceKind,
    /// Provider-opaque attribute document
    pub attributes: serde_json::Value,
    /// Ids of nodes that must exist before this one
    pub depends_on: Vec<Uuid>,
}

impl ResourceNode {
    /// Create a node with no dependencies
    pub fn new(name: impl Into<String>, kind: ResourceKind, attributes: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            attributes,
            depends_on: Vec::new(),
        }
    }

    /// Add a single prerequisite
    pub fn with_dependency(mut self, id: Uuid) -> Self {
        self.depends_on.push(id);
        self
    }

    /// Add a set of prerequisites
    pub fn with_dependencies(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.depends_on.extend(ids);
        self
    }
}
