//! Engine, planner, and control-plane error types.

use netstack_model::{InvalidResourceId, LogicalId, ResourceKind};
use netstack_params::{ParameterError, ParameterPath};

/// Errors raised while synthesizing or applying a single stack.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A parameter resolution failed at synthesis time.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Two positionally indexed input lists differ in length.
    #[error(
        "stack {stack}: {left_name} has {left} entries but {right_name} has {right}; \
         positional lists must match"
    )]
    LengthMismatch {
        /// Stack being synthesized.
        stack: String,
        /// Name of the first list.
        left_name: &'static str,
        /// Length of the first list.
        left: usize,
        /// Name of the second list.
        right_name: &'static str,
        /// Length of the second list.
        right: usize,
    },

    /// A required positional input list has no entries.
    #[error("stack {stack}: {list} must not be empty")]
    EmptyList {
        /// Stack being synthesized.
        stack: String,
        /// Name of the empty list.
        list: &'static str,
    },

    /// A logical id was declared twice in one stack.
    #[error("duplicate logical id: {0}")]
    DuplicateLogicalId(LogicalId),

    /// A declaration references a logical id that does not exist.
    #[error("resource {from} references unknown logical id {reference}")]
    UnknownReference {
        /// Referencing resource.
        from: LogicalId,
        /// Missing referenced id.
        reference: LogicalId,
    },

    /// The stack's dependency graph contains a cycle.
    #[error("dependency cycle involving resource {0}")]
    DependencyCycle(LogicalId),

    /// A resolved identifier string had the wrong kind prefix.
    #[error(transparent)]
    InvalidId(#[from] InvalidResourceId),

    /// The stack has no recorded state to destroy.
    #[error("no applied state recorded for stack {0}")]
    UnknownStack(String),

    /// Control-plane rejection at apply time.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Internal invariant violation.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the cross-stack planner.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A stack resolves a path that no planned stack publishes and that is
    /// not already present in the parameter store.
    #[error(
        "stack {stack} resolves {path} but no planned stack publishes it \
         and it is not already in the parameter store"
    )]
    MissingProducer {
        /// Consuming stack.
        stack: String,
        /// Unproduced path.
        path: ParameterPath,
    },

    /// Two planned stacks publish the same path.
    #[error("parameter {path} has multiple writers: {first} and {second}")]
    DuplicateWriter {
        /// Contested path.
        path: ParameterPath,
        /// First publishing stack.
        first: String,
        /// Second publishing stack.
        second: String,
    },

    /// Two stacks share a name.
    #[error("duplicate stack name: {0}")]
    DuplicateStack(String),

    /// The parameter dependencies between stacks form a cycle.
    #[error("cyclic parameter dependency among stacks: {}", .0.join(" -> "))]
    CyclicStacks(Vec<String>),

    /// A stack failed during synthesis or apply.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Apply-time rejections from the simulated control plane.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// A referenced resource does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing resource.
        kind: ResourceKind,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// Malformed CIDR block.
    #[error("malformed CIDR block: {0}")]
    InvalidCidr(String),

    /// A route targets a hub the route table's VPC is not attached to.
    ///
    /// This is the ordering violation: the route was submitted before the
    /// attachment completed (or the attachment was never declared).
    #[error("vpc {vpc} has no attachment to {gateway}; route cannot target the hub")]
    AttachmentNotReady {
        /// VPC owning the route table.
        vpc: String,
        /// Targeted hub.
        gateway: String,
    },

    /// An equivalent resource already exists.
    #[error("{kind} already exists: {detail}")]
    AlreadyExists {
        /// Kind of the conflicting resource.
        kind: ResourceKind,
        /// Human-readable conflict description.
        detail: String,
    },

    /// A resource belongs to a different parent than the request assumes.
    #[error("{detail}")]
    InvalidParent {
        /// Human-readable mismatch description.
        detail: String,
    },
}

/// Convenience result type for control-plane operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
