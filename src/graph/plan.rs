//! The plan handed to an executor

use crate::models::{ResourceKind, ResourceNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// A named reference into the plan, resolved by the executor after creation
/// (e.g. the database endpoint or the load balancer DNS name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutput {
    /// Node the value comes from
    pub node: Uuid,
    /// Provider attribute to read off the created resource
    pub attribute: String,
}

/// Dependency-ordered collection of resource descriptions
///
/// `nodes` is a valid topological order: every node's dependencies appear
/// earlier in the list. Built once per provisioning run, treated as immutable
/// after handoff, and discarded after execution; outcome state belongs to the
/// executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier, for correlating diagnostics with executions
    pub id: Uuid,
    /// Resource descriptions in construction (= dependency) order
    pub nodes: Vec<ResourceNode>,
    /// Named references the caller asked the executor to resolve
    pub outputs: BTreeMap<String, PlanOutput>,
    /// When the plan was assembled
    pub created_at: DateTime<Utc>,
}

impl Plan {
    pub(crate) fn new(nodes: Vec<ResourceNode>, outputs: BTreeMap<String, PlanOutput>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes,
            outputs,
            created_at: Utc::now(),
        }
    }

    /// Number of resource nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id
    pub fn node(&self, id: Uuid) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// All nodes of one kind, in plan order
    pub fn nodes_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Nodes with no prerequisites
    pub fn roots(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(|n| n.depends_on.is_empty())
    }

    /// Check that every dependency points at an earlier node
    ///
    /// Holds for every plan the builder produces; earlier-only edges also
    /// rule out cycles.
    pub fn is_dependency_ordered(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node.depends_on.iter().all(|dep| seen.contains(dep)) {
                return false;
            }
            seen.insert(node.id);
        }
        true
    }
}
