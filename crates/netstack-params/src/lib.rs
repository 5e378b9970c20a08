//! Namespaced parameter store for cross-stack identifier handoff.
//!
//! Independently deployed stacks have no direct references to each other's
//! resources. The producing stack publishes small string values (resource
//! identifiers) under `/<deploymentId>/<name>` paths, and consuming stacks
//! resolve those paths at synthesis time. Resolution is a hard precondition:
//! a missing path aborts the consuming deployment before any resource is
//! mutated, with no retry.

mod error;
mod path;
mod store;

pub use error::{ParameterError, ParameterResult};
pub use path::ParameterPath;
pub use store::{Parameter, ParameterStore};
