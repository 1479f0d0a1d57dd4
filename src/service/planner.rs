//! Topology planning service
//!
//! Runs the full pipeline for one provisioning run: discover the environment,
//! resolve zones, partition the address space, pair blocks per zone, and
//! expand the result into a dependency-ordered plan. Discovery is the only
//! asynchronous stage; both lookups are issued concurrently and joined before
//! partitioning starts.

use crate::allocator;
use crate::config::TopologyConfig;
use crate::discovery::NetworkDiscovery;
use crate::executor::{ExecutionOutcome, PlanExecutor};
use crate::graph::{Plan, TopologyGraphBuilder};
use crate::models::OccupiedSet;
use crate::zones;
use crate::Result;
use std::sync::Arc;
use tracing::{info, instrument};

/// Orchestrates planning runs against a discovery source
pub struct TopologyPlanner {
    config: TopologyConfig,
    discovery: Arc<dyn NetworkDiscovery>,
}

impl TopologyPlanner {
    pub fn new(config: TopologyConfig, discovery: Arc<dyn NetworkDiscovery>) -> Self {
        Self { config, discovery }
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    /// Assemble the plan for one provisioning run
    ///
    /// Fails fast on the fatal planning errors (bad prefix, exhausted address
    /// space, no zones, short block list) before anything external could be
    /// touched; up to this point nothing has been created.
    #[instrument(skip(self), fields(network = %self.config.name))]
    pub async fn plan(&self) -> Result<Plan> {
        // Both lookups are independent; issue them together and join
        let (occupied, available) = tokio::try_join!(
            self.discovery.occupied_blocks(),
            self.discovery.availability_zones(),
        )?;

        let occupied = OccupiedSet::new(occupied);
        info!(
            occupied = occupied.len(),
            zones = available.len(),
            "environment discovery complete"
        );

        let zones = zones::resolve(self.config.requested_zone_count, available)?;

        let blocks = allocator::partition_n(
            self.config.vpc_cidr,
            self.config.subnet_prefix_length,
            &occupied,
            2 * zones.len(),
        )?;

        let allocations = allocator::allocate(&zones, &blocks)?;

        let plan = TopologyGraphBuilder::new(&self.config).build(&allocations);
        info!(nodes = plan.len(), plan = %plan.id, "plan assembled");

        Ok(plan)
    }

    /// Plan, then hand off to an executor
    pub async fn provision(&self, executor: &dyn PlanExecutor) -> Result<ExecutionOutcome> {
        let plan = self.plan().await?;
        executor.apply(&plan).await
    }
}
