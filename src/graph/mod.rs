//! Dependency-ordered resource plans and their construction

mod builder;
mod plan;

pub use builder::TopologyGraphBuilder;
pub use plan::{Plan, PlanOutput};
