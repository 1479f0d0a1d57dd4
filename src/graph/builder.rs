//! Expands allocations into the resource dependency graph
//!
//! Zone processing is strictly sequential: the shared resources created on
//! the terminal zone need the complete, ordered accumulation of every prior
//! zone's subnet ids, so zone i + 1 is never expanded before zone i.

use crate::bootstrap;
use crate::config::TopologyConfig;
use crate::graph::{Plan, PlanOutput};
use crate::models::{ResourceKind, ResourceNode, SubnetAllocation, SubnetRole};
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Ids of the zone-independent base nodes
struct BaseNodes {
    network: Uuid,
    public_route_table: Uuid,
    private_route_table: Uuid,
    instance_profile: Uuid,
}

/// Subnet ids accumulated across sequential zone steps
///
/// Owned by a single `build` call; never shared, never mutated concurrently.
#[derive(Debug, Default)]
struct ZoneAccumulator {
    public_subnets: Vec<Uuid>,
    private_subnets: Vec<Uuid>,
}

impl ZoneAccumulator {
    fn last_public(&self) -> Option<Uuid> {
        self.public_subnets.last().copied()
    }
}

/// Collects nodes while enforcing backward-only dependency edges
struct GraphAssembly {
    nodes: Vec<ResourceNode>,
    known: HashSet<Uuid>,
}

impl GraphAssembly {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            known: HashSet::new(),
        }
    }

    fn push(&mut self, node: ResourceNode) -> Uuid {
        debug_assert!(
            node.depends_on.iter().all(|dep| self.known.contains(dep)),
            "dependency edge to a node that is not constructed yet"
        );
        let id = node.id;
        self.known.insert(id);
        self.nodes.push(node);
        id
    }
}

/// Builds a dependency-ordered [`Plan`] from per-zone allocations
pub struct TopologyGraphBuilder<'a> {
    config: &'a TopologyConfig,
}

impl<'a> TopologyGraphBuilder<'a> {
    pub fn new(config: &'a TopologyConfig) -> Self {
        Self { config }
    }

    /// Expand allocations into the full resource graph
    ///
    /// Base nodes first, then each zone's subnets and associations in
    /// allocation order; the shared tier (security groups, database, load
    /// balancer, autoscaling, DNS) is built exactly once, when the terminal
    /// allocation is reached and every zone's subnet ids are accumulated.
    pub fn build(&self, allocations: &[SubnetAllocation]) -> Plan {
        let mut assembly = GraphAssembly::new();
        let mut outputs = BTreeMap::new();

        let base = self.build_base(&mut assembly);
        outputs.insert(
            "vpc_id".to_string(),
            PlanOutput {
                node: base.network,
                attribute: "id".to_string(),
            },
        );

        let mut accumulator = ZoneAccumulator::default();
        for allocation in allocations {
            self.add_zone(&mut assembly, &base, &mut accumulator, allocation);
            if allocation.terminal {
                self.add_shared_tier(&mut assembly, &base, &accumulator, &mut outputs);
            }
        }

        Plan::new(assembly.nodes, outputs)
    }

    fn build_base(&self, assembly: &mut GraphAssembly) -> BaseNodes {
        let cfg = self.config;

        let network = assembly.push(ResourceNode::new(
            cfg.name.clone(),
            ResourceKind::Network,
            json!({
                "cidr_block": cfg.vpc_cidr.to_string(),
                "enable_dns_support": true,
                "enable_dns_hostnames": true,
                "tags": { "Name": cfg.name },
            }),
        ));

        let gateway = assembly.push(
            ResourceNode::new(
                format!("{}-gateway", cfg.name),
                ResourceKind::Gateway,
                json!({ "vpc_id": network }),
            )
            .with_dependency(network),
        );

        let public_route_table = assembly.push(
            ResourceNode::new(
                format!("{}-public-rt", cfg.name),
                ResourceKind::RouteTable,
                json!({ "vpc_id": network }),
            )
            .with_dependency(network),
        );

        // The default route is its own node so it is never created before
        // both the table and the gateway exist
        assembly.push(
            ResourceNode::new(
                format!("{}-public-internet-route", cfg.name),
                ResourceKind::Route,
                json!({
                    "route_table_id": public_route_table,
                    "destination_cidr_block": cfg.public_route_cidr.to_string(),
                    "gateway_id": gateway,
                }),
            )
            .with_dependencies([public_route_table, gateway]),
        );

        let private_route_table = assembly.push(
            ResourceNode::new(
                format!("{}-private-rt", cfg.name),
                ResourceKind::RouteTable,
                json!({ "vpc_id": network }),
            )
            .with_dependency(network),
        );

        // Opaque identity the compute tier runs under; the policy documents
        // attached to it belong to the executor
        let instance_profile = assembly.push(ResourceNode::new(
            format!("{}-instance-profile", cfg.name),
            ResourceKind::InstanceProfile,
            json!({}),
        ));

        BaseNodes {
            network,
            public_route_table,
            private_route_table,
            instance_profile,
        }
    }

    fn add_zone(
        &self,
        assembly: &mut GraphAssembly,
        base: &BaseNodes,
        accumulator: &mut ZoneAccumulator,
        allocation: &SubnetAllocation,
    ) {
        let public_subnet = self.add_subnet(assembly, base, allocation, SubnetRole::Public);
        self.add_association(
            assembly,
            allocation,
            SubnetRole::Public,
            public_subnet,
            base.public_route_table,
        );

        let private_subnet = self.add_subnet(assembly, base, allocation, SubnetRole::Private);
        self.add_association(
            assembly,
            allocation,
            SubnetRole::Private,
            private_subnet,
            base.private_route_table,
        );

        accumulator.public_subnets.push(public_subnet);
        accumulator.private_subnets.push(private_subnet);
    }

    fn add_subnet(
        &self,
        assembly: &mut GraphAssembly,
        base: &BaseNodes,
        allocation: &SubnetAllocation,
        role: SubnetRole,
    ) -> Uuid {
        let name = format!("{}-subnet-{}", role, allocation.zone);
        assembly.push(
            ResourceNode::new(
                name.clone(),
                ResourceKind::Subnet,
                json!({
                    "vpc_id": base.network,
                    "cidr_block": allocation.block(role).to_string(),
                    "availability_zone": allocation.zone.name,
                    "role": role,
                    "tags": { "Name": name },
                }),
            )
            .with_dependency(base.network),
        )
    }

    fn add_association(
        &self,
        assembly: &mut GraphAssembly,
        allocation: &SubnetAllocation,
        role: SubnetRole,
        subnet: Uuid,
        route_table: Uuid,
    ) {
        assembly.push(
            ResourceNode::new(
                format!("{}-rt-association-{}", role, allocation.zone),
                ResourceKind::RouteTableAssociation,
                json!({ "subnet_id": subnet, "route_table_id": route_table }),
            )
            .with_dependencies([subnet, route_table]),
        );
    }

    fn add_shared_tier(
        &self,
        assembly: &mut GraphAssembly,
        base: &BaseNodes,
        accumulator: &ZoneAccumulator,
        outputs: &mut BTreeMap<String, PlanOutput>,
    ) {
        let cfg = self.config;
        let ports = &cfg.ports;
        let scaling = &cfg.scaling;
        let public_route = cfg.public_route_cidr.to_string();

        let terminal_public = match accumulator.last_public() {
            Some(id) => id,
            None => return,
        };

        let lb_security_group = assembly.push(
            ResourceNode::new(
                format!("{}-lb-sg", cfg.name),
                ResourceKind::SecurityGroup,
                json!({
                    "vpc_id": base.network,
                    "description": "ingress for the load balancer",
                    "ingress": [
                        {
                            "protocol": "tcp",
                            "from_port": ports.https,
                            "to_port": ports.https,
                            "cidr_blocks": [public_route],
                        },
                    ],
                    "egress": [
                        { "protocol": "-1", "from_port": 0, "to_port": 0, "cidr_blocks": ["0.0.0.0/0"] },
                    ],
                }),
            )
            .with_dependency(base.network),
        );

        let app_security_group = assembly.push(
            ResourceNode::new(
                format!("{}-app-sg", cfg.name),
                ResourceKind::SecurityGroup,
                json!({
                    "vpc_id": base.network,
                    "description": "ingress for the application instances",
                    "ingress": [
                        {
                            "protocol": "tcp",
                            "from_port": ports.ssh,
                            "to_port": ports.ssh,
                            "cidr_blocks": [public_route],
                        },
                        {
                            // App traffic only from the load balancer
                            "protocol": "tcp",
                            "from_port": ports.app,
                            "to_port": ports.app,
                            "security_groups": [lb_security_group],
                        },
                    ],
                    "egress": [
                        { "protocol": "-1", "from_port": 0, "to_port": 0, "cidr_blocks": ["0.0.0.0/0"] },
                    ],
                }),
            )
            .with_dependencies([base.network, lb_security_group]),
        );

        let db_security_group = assembly.push(
            ResourceNode::new(
                format!("{}-db-sg", cfg.name),
                ResourceKind::SecurityGroup,
                json!({
                    "vpc_id": base.network,
                    "description": "ingress for the database",
                    "ingress": [
                        {
                            "protocol": "tcp",
                            "from_port": cfg.database.port,
                            "to_port": cfg.database.port,
                            "security_groups": [app_security_group],
                        },
                    ],
                }),
            )
            .with_dependencies([base.network, app_security_group]),
        );

        let db_parameter_group = assembly.push(ResourceNode::new(
            format!("{}-db-params", cfg.name),
            ResourceKind::DbParameterGroup,
            json!({
                "family": cfg.database.engine,
                "description": "database parameter group",
            }),
        ));

        // The subnet group spans every private subnet accumulated so far
        let db_subnet_group = assembly.push(
            ResourceNode::new(
                format!("{}-db-subnets", cfg.name),
                ResourceKind::DbSubnetGroup,
                json!({ "subnet_ids": accumulator.private_subnets }),
            )
            .with_dependencies(accumulator.private_subnets.iter().copied()),
        );

        let database = assembly.push(
            ResourceNode::new(
                cfg.database.identifier.clone(),
                ResourceKind::Database,
                json!({
                    "engine": cfg.database.engine,
                    "instance_class": cfg.database.instance_class,
                    "allocated_storage": cfg.database.allocated_storage,
                    "port": cfg.database.port,
                    "db_name": cfg.database.name,
                    "username": cfg.database.username,
                    "password": cfg.database.password,
                    "identifier": cfg.database.identifier,
                    "skip_final_snapshot": cfg.database.skip_final_snapshot,
                    "publicly_accessible": cfg.database.publicly_accessible,
                    "parameter_group_id": db_parameter_group,
                    "security_group_ids": [db_security_group],
                    "subnet_group_id": db_subnet_group,
                }),
            )
            .with_dependencies([db_security_group, db_subnet_group, db_parameter_group]),
        );
        outputs.insert(
            "database_endpoint".to_string(),
            PlanOutput {
                node: database,
                attribute: "endpoint".to_string(),
            },
        );

        let launch_template = assembly.push(
            ResourceNode::new(
                format!("{}-launch-template", cfg.name),
                ResourceKind::LaunchTemplate,
                json!({
                    "image_id": cfg.compute.ami,
                    "instance_type": cfg.compute.instance_type,
                    "key_name": cfg.compute.key_name,
                    "root_volume_size": cfg.compute.root_volume_size,
                    "instance_profile_id": base.instance_profile,
                    "network_interface": {
                        "associate_public_ip_address": true,
                        "security_groups": [app_security_group],
                    },
                    "bootstrap_env": bootstrap::bootstrap_env(database, cfg),
                }),
            )
            .with_dependencies([app_security_group, base.instance_profile, database]),
        );
        outputs.insert(
            "launch_template_id".to_string(),
            PlanOutput {
                node: launch_template,
                attribute: "id".to_string(),
            },
        );

        // Ingress spans every zone's public subnet
        let load_balancer = assembly.push(
            ResourceNode::new(
                format!("{}-lb", cfg.name),
                ResourceKind::LoadBalancer,
                json!({
                    "internal": false,
                    "kind": "application",
                    "security_groups": [lb_security_group],
                    "subnet_ids": accumulator.public_subnets,
                }),
            )
            .with_dependency(lb_security_group)
            .with_dependencies(accumulator.public_subnets.iter().copied()),
        );
        outputs.insert(
            "load_balancer_dns_name".to_string(),
            PlanOutput {
                node: load_balancer,
                attribute: "dns_name".to_string(),
            },
        );

        let target_group = assembly.push(
            ResourceNode::new(
                format!("{}-target-group", cfg.name),
                ResourceKind::TargetGroup,
                json!({
                    "vpc_id": base.network,
                    "port": ports.app,
                    "protocol": "HTTP",
                    "target_type": "instance",
                    "health_check": {
                        "enabled": true,
                        "interval_secs": 30,
                        "path": "/",
                        "port": "traffic-port",
                        "protocol": "HTTP",
                        "healthy_threshold": 5,
                        "unhealthy_threshold": 2,
                        "timeout_secs": 5,
                    },
                }),
            )
            .with_dependencies([load_balancer, base.network]),
        );

        assembly.push(
            ResourceNode::new(
                format!("{}-https-listener", cfg.name),
                ResourceKind::Listener,
                json!({
                    "load_balancer_id": load_balancer,
                    "port": ports.https,
                    "protocol": "HTTPS",
                    "ssl_policy": "ELBSecurityPolicy-2016-08",
                    "certificate_ref": cfg.certificate_ref,
                    "default_action": { "type": "forward", "target_group_id": target_group },
                }),
            )
            .with_dependencies([load_balancer, target_group]),
        );

        // The scaling group is pinned to the terminal zone's public subnet
        // while the load balancer spans all of them: single-zone compute
        // behind multi-zone ingress, as in the reference behavior
        let autoscaling_group = assembly.push(
            ResourceNode::new(
                format!("{}-asg", cfg.name),
                ResourceKind::AutoscalingGroup,
                json!({
                    "vpc_zone_identifiers": [terminal_public],
                    "min_size": scaling.min_size,
                    "max_size": scaling.max_size,
                    "desired_capacity": scaling.desired_capacity,
                    "launch_template_id": launch_template,
                    "target_group_ids": [target_group],
                    "health_check_grace_period_secs": scaling.health_check_grace_secs,
                    "tags": [
                        {
                            "key": "Name",
                            "value": format!("{}-instance", cfg.name),
                            "propagate_at_launch": true,
                        },
                    ],
                }),
            )
            .with_dependencies([launch_template, target_group, terminal_public]),
        );

        let scale_up = self.add_scaling_policy(
            assembly,
            "scale-up",
            scaling.scale_up_adjustment,
            autoscaling_group,
        );
        let scale_down = self.add_scaling_policy(
            assembly,
            "scale-down",
            scaling.scale_down_adjustment,
            autoscaling_group,
        );

        self.add_cpu_alarm(
            assembly,
            "cpu-high",
            "greater_than",
            scaling.cpu_high_threshold,
            scale_up,
            autoscaling_group,
        );
        self.add_cpu_alarm(
            assembly,
            "cpu-low",
            "less_than",
            scaling.cpu_low_threshold,
            scale_down,
            autoscaling_group,
        );

        assembly.push(
            ResourceNode::new(
                cfg.dns.sub_domain.clone(),
                ResourceKind::DnsRecord,
                json!({
                    "name": cfg.dns.sub_domain,
                    "record_type": cfg.dns.record_type,
                    "ttl": cfg.dns.ttl,
                    "alias": { "target_id": load_balancer, "evaluate_target_health": true },
                }),
            )
            .with_dependency(load_balancer),
        );
    }

    fn add_scaling_policy(
        &self,
        assembly: &mut GraphAssembly,
        suffix: &str,
        adjustment: i32,
        autoscaling_group: Uuid,
    ) -> Uuid {
        assembly.push(
            ResourceNode::new(
                format!("{}-{}", self.config.name, suffix),
                ResourceKind::ScalingPolicy,
                json!({
                    "autoscaling_group_id": autoscaling_group,
                    "adjustment_type": "change_in_capacity",
                    "scaling_adjustment": adjustment,
                    "cooldown_secs": self.config.scaling.cooldown_secs,
                }),
            )
            .with_dependency(autoscaling_group),
        )
    }

    fn add_cpu_alarm(
        &self,
        assembly: &mut GraphAssembly,
        suffix: &str,
        comparison: &str,
        threshold: f64,
        policy: Uuid,
        autoscaling_group: Uuid,
    ) -> Uuid {
        let scaling = &self.config.scaling;
        assembly.push(
            ResourceNode::new(
                format!("{}-{}", self.config.name, suffix),
                ResourceKind::MetricAlarm,
                json!({
                    "metric": "cpu_utilization",
                    "statistic": "average",
                    "comparison": comparison,
                    "threshold": threshold,
                    "period_secs": scaling.period_secs,
                    "evaluation_periods": scaling.evaluation_periods,
                    "autoscaling_group_id": autoscaling_group,
                    "alarm_actions": [policy],
                }),
            )
            .with_dependencies([autoscaling_group, policy]),
        )
    }
}
