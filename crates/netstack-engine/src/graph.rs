//! Dependency graph over a stack's resource declarations.

use std::collections::HashMap;
use std::collections::VecDeque;

use netstack_model::LogicalId;

use crate::error::{EngineError, EngineResult};

/// Directed dependency graph: an edge `a -> b` means `b` depends on `a` and
/// cannot be applied before `a` completes.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<LogicalId>,
    index: HashMap<LogicalId, usize>,
    /// Adjacency list: dependents of each node.
    dependents: Vec<Vec<usize>>,
    /// Reverse adjacency: dependencies of each node.
    dependencies: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Returns an error if the id is already present.
    pub fn add_node(&mut self, id: LogicalId) -> EngineResult<()> {
        if self.index.contains_key(&id) {
            return Err(EngineError::DuplicateLogicalId(id));
        }
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(id);
        self.dependents.push(Vec::new());
        self.dependencies.push(Vec::new());
        Ok(())
    }

    /// Record that `dependent` depends on `dependency`.
    ///
    /// Both nodes must already exist; an unknown id is reported as a
    /// dangling reference from `dependent`.
    pub fn add_edge(&mut self, dependent: &LogicalId, dependency: &LogicalId) -> EngineResult<()> {
        let dep_idx =
            *self
                .index
                .get(dependency)
                .ok_or_else(|| EngineError::UnknownReference {
                    from: dependent.clone(),
                    reference: dependency.clone(),
                })?;
        let node_idx =
            *self
                .index
                .get(dependent)
                .ok_or_else(|| EngineError::UnknownReference {
                    from: dependency.clone(),
                    reference: dependent.clone(),
                })?;
        if !self.dependents[dep_idx].contains(&node_idx) {
            self.dependents[dep_idx].push(node_idx);
            self.dependencies[node_idx].push(dep_idx);
        }
        Ok(())
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `dependent` transitively depends on `dependency`.
    #[must_use]
    pub fn depends_on(&self, dependent: &LogicalId, dependency: &LogicalId) -> bool {
        let (Some(&from), Some(&target)) =
            (self.index.get(dependent), self.index.get(dependency))
        else {
            return false;
        };
        // Walk up the dependency edges from `dependent`.
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([from]);
        while let Some(idx) = queue.pop_front() {
            for &dep in &self.dependencies[idx] {
                if dep == target {
                    return true;
                }
                if !seen[dep] {
                    seen[dep] = true;
                    queue.push_back(dep);
                }
            }
        }
        false
    }

    /// Topological order of the graph (Kahn's algorithm).
    ///
    /// Deterministic: nodes become ready in declaration order. Returns an
    /// error naming one node on a cycle if no valid order exists.
    pub fn topo_order(&self) -> EngineResult<Vec<LogicalId>> {
        let mut indegree: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut ready: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| indegree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(idx) = ready.pop_front() {
            order.push(self.nodes[idx].clone());
            for &dependent in &self.dependents[idx] {
                indegree[dependent] -= 1;
                if indegree[dependent] == 0 {
                    ready.push_back(dependent);
                }
            }
        }

        if order.len() != self.nodes.len() {
            let stuck = (0..self.nodes.len())
                .find(|&i| indegree[i] > 0)
                .map(|i| self.nodes[i].clone())
                .unwrap_or_else(|| LogicalId::new("unknown"));
            return Err(EngineError::DependencyCycle(stuck));
        }
        Ok(order)
    }
}
