//! Stack definitions for the regional network deployment.
//!
//! Three stacks, deployed in producer-before-consumer order:
//!
//! - [`RouterStack`] provisions the regional hub and its secondary edge
//!   route table, publishing both identifiers to the parameter store.
//! - [`CoreVpcStack`] provisions the core network, attaches every subnet to
//!   the hub, and routes all traffic toward it.
//! - [`EdgeVpcStack`] provisions the dual-tier edge network: public subnets
//!   reach the internet directly, private subnets egress through NAT, and
//!   only the private tier attaches to the hub via the secondary route
//!   table.

mod core_vpc;
mod edge_vpc;
mod router;

pub use core_vpc::{CoreVpcProps, CoreVpcStack};
pub use edge_vpc::{EdgeVpcProps, EdgeVpcStack, NatStrategy};
pub use router::{RouterProps, RouterStack};
