//! Stack declarations and synthesis.

use std::collections::HashMap;

use netstack_core::AwsRegion;
use netstack_model::{LogicalId, ResourceSpec};
use netstack_params::{ParameterPath, ParameterStore};

use crate::error::{EngineError, EngineResult};
use crate::graph::DependencyGraph;

/// One declared resource: logical id, spec, and any explicit ordering edges
/// beyond those implied by typed references.
#[derive(Debug, Clone)]
pub struct ResourceDecl {
    /// Stack-local name of the resource.
    pub logical_id: LogicalId,
    /// What to provision.
    pub spec: ResourceSpec,
    /// Additional completion-order dependencies.
    pub depends_on: Vec<LogicalId>,
}

/// A synthesized stack: an ordered set of resource declarations.
#[derive(Debug)]
pub struct Stack {
    name: String,
    resources: Vec<ResourceDecl>,
    index: HashMap<LogicalId, usize>,
}

impl Stack {
    /// Create an empty stack.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Stack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a resource, returning its logical id as a handle for
    /// references from later declarations.
    pub fn add(
        &mut self,
        logical_id: impl Into<LogicalId>,
        spec: impl Into<ResourceSpec>,
    ) -> EngineResult<LogicalId> {
        self.add_with_deps(logical_id, spec, &[])
    }

    /// Declare a resource with explicit extra dependencies.
    pub fn add_with_deps(
        &mut self,
        logical_id: impl Into<LogicalId>,
        spec: impl Into<ResourceSpec>,
        depends_on: &[LogicalId],
    ) -> EngineResult<LogicalId> {
        let logical_id = logical_id.into();
        if self.index.contains_key(&logical_id) {
            return Err(EngineError::DuplicateLogicalId(logical_id));
        }
        self.index.insert(logical_id.clone(), self.resources.len());
        self.resources.push(ResourceDecl {
            logical_id: logical_id.clone(),
            spec: spec.into(),
            depends_on: depends_on.to_vec(),
        });
        Ok(logical_id)
    }

    /// All declarations in declaration order.
    #[must_use]
    pub fn resources(&self) -> &[ResourceDecl] {
        &self.resources
    }

    /// Look up a declaration by logical id.
    #[must_use]
    pub fn get(&self, logical_id: &LogicalId) -> Option<&ResourceDecl> {
        self.index.get(logical_id).map(|&i| &self.resources[i])
    }

    /// Build the dependency graph from typed references and explicit
    /// `depends_on` edges, validating that every referenced id exists.
    pub fn dependency_graph(&self) -> EngineResult<DependencyGraph> {
        let mut graph = DependencyGraph::new();
        for decl in &self.resources {
            graph.add_node(decl.logical_id.clone())?;
        }
        for decl in &self.resources {
            for reference in decl.spec.references() {
                graph.add_edge(&decl.logical_id, reference)?;
            }
            for dep in &decl.depends_on {
                graph.add_edge(&decl.logical_id, dep)?;
            }
        }
        Ok(graph)
    }
}

/// Context handed to stack definitions during synthesis.
///
/// Parameter resolution happens here, before any resource mutation: a
/// missing path fails the whole synthesis.
#[derive(Debug)]
pub struct SynthContext<'a> {
    params: &'a ParameterStore,
    region: AwsRegion,
}

impl<'a> SynthContext<'a> {
    /// Create a synthesis context over the given parameter store.
    #[must_use]
    pub fn new(params: &'a ParameterStore, region: AwsRegion) -> Self {
        Self { params, region }
    }

    /// Resolve a published parameter. Hard precondition, no retry.
    pub fn resolve(&self, path: &ParameterPath) -> EngineResult<String> {
        Ok(self.params.resolve(path)?)
    }

    /// Region this synthesis targets.
    #[must_use]
    pub fn region(&self) -> &AwsRegion {
        &self.region
    }
}

/// A deployable stack definition.
///
/// `reads` and `writes` declare the parameter paths the stack resolves and
/// publishes; the planner orders stacks from these declarations without
/// synthesizing anything.
pub trait StackDefinition: std::fmt::Debug {
    /// Stack name, unique within a deployment plan.
    fn name(&self) -> &str;

    /// Parameter paths this stack resolves during synthesis.
    fn reads(&self) -> Vec<ParameterPath> {
        Vec::new()
    }

    /// Parameter paths this stack publishes during apply.
    fn writes(&self) -> Vec<ParameterPath> {
        Vec::new()
    }

    /// Synthesize the declared resource set.
    fn synth(&self, ctx: &SynthContext<'_>) -> EngineResult<Stack>;
}

#[cfg(test)]
mod tests {
    use netstack_core::{Cidr, TagSet};
    use netstack_model::{RouteTableSpec, Value, VpcSpec};

    use super::*;

    #[test]
    fn test_should_reject_duplicate_logical_id() {
        let mut stack = Stack::new("test");
        stack
            .add(
                "vpc",
                VpcSpec {
                    cidr: Cidr::new("10.0.0.0/22"),
                    tags: TagSet::new(),
                },
            )
            .unwrap();
        let err = stack
            .add(
                "vpc",
                VpcSpec {
                    cidr: Cidr::new("10.0.4.0/22"),
                    tags: TagSet::new(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateLogicalId(_)));
    }

    #[test]
    fn test_should_build_graph_with_reference_edges() {
        let mut stack = Stack::new("test");
        let vpc = stack
            .add(
                "vpc",
                VpcSpec {
                    cidr: Cidr::new("10.0.0.0/22"),
                    tags: TagSet::new(),
                },
            )
            .unwrap();
        let rt = stack
            .add(
                "rt",
                RouteTableSpec {
                    vpc: Value::from(&vpc),
                    tags: TagSet::new(),
                },
            )
            .unwrap();

        let graph = stack.dependency_graph().unwrap();
        assert!(graph.depends_on(&rt, &vpc));
    }

    #[test]
    fn test_should_fail_graph_on_dangling_reference() {
        let mut stack = Stack::new("test");
        stack
            .add(
                "rt",
                RouteTableSpec {
                    vpc: Value::Ref(LogicalId::new("ghost")),
                    tags: TagSet::new(),
                },
            )
            .unwrap();
        assert!(matches!(
            stack.dependency_graph(),
            Err(EngineError::UnknownReference { .. })
        ));
    }

    #[test]
    fn test_should_resolve_through_synth_context() {
        use netstack_core::DeploymentId;

        let store = ParameterStore::new();
        let d = DeploymentId::new("test").unwrap();
        store.publish(ParameterPath::core_router_id(&d), "tgw-abc123");

        let ctx = SynthContext::new(&store, AwsRegion::default());
        assert_eq!(
            ctx.resolve(&ParameterPath::core_router_id(&d)).unwrap(),
            "tgw-abc123"
        );
        assert!(ctx.resolve(&ParameterPath::edge_route_table_id(&d)).is_err());
    }
}
