//! Core types, configuration, and errors for NetStack.
//!
//! This crate provides the foundational building blocks shared across all
//! NetStack crates: deployment and region identifiers, CIDR and tag types,
//! environment-driven configuration, and the top-level error type.

mod config;
mod error;
mod types;

pub use config::NetStackConfig;
pub use error::{NetStackError, NetStackResult};
pub use types::{AvailabilityZone, AwsRegion, Cidr, DeploymentId, Tag, TagSet};
