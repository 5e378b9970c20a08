//! Cross-stack deployment planning.
//!
//! Stacks hand identifiers to each other only through the parameter store,
//! which the per-stack dependency graph cannot see. The planner closes that
//! gap: declared publishes and resolves become producer/consumer edges
//! between whole stacks, and a consumer is never scheduled before its
//! producer. A read with no planned producer is refused outright unless the
//! parameter is already present in the store from an earlier run.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use tracing::{debug, info};

use netstack_params::{ParameterPath, ParameterStore};

use crate::deploy::{ApplyReport, Deployer};
use crate::error::PlanError;
use crate::stack::StackDefinition;

/// Orders stack definitions by their parameter reads and writes.
pub struct Planner {
    stacks: Vec<Box<dyn StackDefinition>>,
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field(
                "stacks",
                &self.stacks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Planner {
    /// Create an empty planner.
    #[must_use]
    pub fn new() -> Self {
        Self { stacks: Vec::new() }
    }

    /// Add a stack definition to the plan.
    pub fn add(&mut self, stack: Box<dyn StackDefinition>) {
        self.stacks.push(stack);
    }

    /// Compute the deployment order.
    ///
    /// Producers are scheduled strictly before their consumers. Ties keep
    /// insertion order.
    pub fn plan(&self, store: &ParameterStore) -> Result<Vec<&dyn StackDefinition>, PlanError> {
        let mut writers: HashMap<ParameterPath, usize> = HashMap::new();
        let mut names: HashMap<&str, usize> = HashMap::new();
        for (idx, stack) in self.stacks.iter().enumerate() {
            if names.insert(stack.name(), idx).is_some() {
                return Err(PlanError::DuplicateStack(stack.name().to_owned()));
            }
            for path in stack.writes() {
                if let Some(&first) = writers.get(&path) {
                    return Err(PlanError::DuplicateWriter {
                        path,
                        first: self.stacks[first].name().to_owned(),
                        second: stack.name().to_owned(),
                    });
                }
                writers.insert(path, idx);
            }
        }

        // Producer -> consumer edges from declared reads.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.stacks.len()];
        let mut indegree: Vec<usize> = vec![0; self.stacks.len()];
        for (idx, stack) in self.stacks.iter().enumerate() {
            for path in stack.reads() {
                match writers.get(&path) {
                    Some(&producer) if producer != idx => {
                        dependents[producer].push(idx);
                        indegree[idx] += 1;
                        debug!(
                            consumer = stack.name(),
                            producer = self.stacks[producer].name(),
                            %path,
                            "cross-stack parameter edge"
                        );
                    }
                    Some(_) => {}
                    None if store.contains(&path) => {
                        // Pre-published by an earlier pipeline run.
                        debug!(consumer = stack.name(), %path, "read satisfied by store");
                    }
                    None => {
                        return Err(PlanError::MissingProducer {
                            stack: stack.name().to_owned(),
                            path,
                        });
                    }
                }
            }
        }

        let mut ready: VecDeque<usize> = (0..self.stacks.len())
            .filter(|&i| indegree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.stacks.len());
        while let Some(idx) = ready.pop_front() {
            order.push(self.stacks[idx].as_ref());
            for &dependent in &dependents[idx] {
                indegree[dependent] -= 1;
                if indegree[dependent] == 0 {
                    ready.push_back(dependent);
                }
            }
        }
        if order.len() != self.stacks.len() {
            let cycle = (0..self.stacks.len())
                .filter(|&i| indegree[i] > 0)
                .map(|i| self.stacks[i].name().to_owned())
                .collect();
            return Err(PlanError::CyclicStacks(cycle));
        }
        Ok(order)
    }

    /// Plan against the deployer's store, then synthesize and apply every
    /// stack in order.
    pub fn deploy_all(&self, deployer: &Deployer) -> Result<Vec<ApplyReport>, PlanError> {
        let order = self.plan(deployer.params())?;
        info!(
            stacks = ?order.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "deployment plan"
        );
        let mut reports = Vec::with_capacity(order.len());
        for definition in order {
            reports.push(deployer.apply_definition(definition)?);
        }
        Ok(reports)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}
