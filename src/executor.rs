//! Plan execution port
//!
//! The planner stops at the plan; realizing it against live infrastructure,
//! including remote-call retries and partial-creation rollback, belongs to
//! implementations of this port. The plan must not be mutated in place.

use crate::graph::Plan;
use crate::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// What an execution produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Provider identifier per created node
    pub identifiers: HashMap<Uuid, String>,
    /// The plan's named outputs, resolved against created resources
    pub outputs: HashMap<String, String>,
}

/// Realizes a plan against live infrastructure in dependency order
#[async_trait]
pub trait PlanExecutor: Send + Sync {
    async fn apply(&self, plan: &Plan) -> Result<ExecutionOutcome>;
}

/// Executor that records visitation instead of creating anything
///
/// Walks the plan in order, refusing any node whose prerequisites were not
/// visited first, and synthesizes provider identifiers from node names. Used
/// in tests and as a dry-run harness.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    applied: Mutex<Vec<Uuid>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node ids in the order they were applied, across all runs
    pub fn applied(&self) -> Vec<Uuid> {
        self.applied.lock().clone()
    }
}

#[async_trait]
impl PlanExecutor for RecordingExecutor {
    async fn apply(&self, plan: &Plan) -> Result<ExecutionOutcome> {
        let mut outcome = ExecutionOutcome::default();
        let mut applied = self.applied.lock();

        for (index, node) in plan.nodes.iter().enumerate() {
            for dep in &node.depends_on {
                if !outcome.identifiers.contains_key(dep) {
                    return Err(Error::Execution(format!(
                        "node {} depends on {} which is not created yet",
                        node.name, dep
                    )));
                }
            }
            outcome
                .identifiers
                .insert(node.id, format!("{}-{:04}", node.kind, index));
            applied.push(node.id);
        }

        for (name, output) in &plan.outputs {
            if let Some(identifier) = outcome.identifiers.get(&output.node) {
                outcome
                    .outputs
                    .insert(name.clone(), format!("{}/{}", identifier, output.attribute));
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PlanOutput;
    use crate::models::{ResourceKind, ResourceNode};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_applies_in_dependency_order() {
        let network = ResourceNode::new("network", ResourceKind::Network, json!({}));
        let gateway =
            ResourceNode::new("gateway", ResourceKind::Gateway, json!({})).with_dependency(network.id);
        let ids = vec![network.id, gateway.id];

        let plan = Plan::new(vec![network, gateway], BTreeMap::new());
        let executor = RecordingExecutor::new();
        let outcome = executor.apply(&plan).await.unwrap();

        assert_eq!(executor.applied(), ids);
        assert_eq!(outcome.identifiers.len(), 2);
    }

    #[tokio::test]
    async fn test_rejects_forward_references() {
        let network = ResourceNode::new("network", ResourceKind::Network, json!({}));
        let gateway =
            ResourceNode::new("gateway", ResourceKind::Gateway, json!({})).with_dependency(network.id);

        // Out of order on purpose
        let plan = Plan::new(vec![gateway, network], BTreeMap::new());
        let result = RecordingExecutor::new().apply(&plan).await;

        assert!(matches!(result.err(), Some(Error::Execution(_))));
    }

    #[tokio::test]
    async fn test_resolves_outputs() {
        let network = ResourceNode::new("network", ResourceKind::Network, json!({}));
        let mut outputs = BTreeMap::new();
        outputs.insert(
            "vpc_id".to_string(),
            PlanOutput {
                node: network.id,
                attribute: "id".to_string(),
            },
        );

        let plan = Plan::new(vec![network], outputs);
        let outcome = RecordingExecutor::new().apply(&plan).await.unwrap();

        assert_eq!(outcome.outputs.get("vpc_id").unwrap(), "network-0000/id");
    }
}
