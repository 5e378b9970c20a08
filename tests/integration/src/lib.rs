//! End-to-end tests for the regional network deployment.
//!
//! Each test builds a fresh in-process control plane and parameter store,
//! deploys the hub router, core VPC, and edge VPC stacks through the
//! planner, and asserts on the provisioned records.

use std::sync::{Arc, Once};

use netstack_core::{AvailabilityZone, Cidr, DeploymentId};
use netstack_engine::{CloudProvider, Deployer, Planner};
use netstack_params::ParameterStore;
use netstack_stacks::{
    CoreVpcProps, CoreVpcStack, EdgeVpcProps, EdgeVpcStack, NatStrategy, RouterProps, RouterStack,
};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Deployment namespace shared by the fixtures.
#[must_use]
pub fn deployment_id() -> DeploymentId {
    DeploymentId::new("test").unwrap()
}

/// Fresh deployer over an empty control plane and parameter store.
#[must_use]
pub fn deployer() -> Deployer {
    init_tracing();
    Deployer::new(
        Arc::new(CloudProvider::default()),
        Arc::new(ParameterStore::new()),
    )
}

/// Hub router fixture: ASN 65500 over 10.0.0.0/16.
#[must_use]
pub fn router_stack() -> RouterStack {
    RouterStack::new(RouterProps {
        deployment_id: deployment_id(),
        region_asn: 65500,
        region_cidr: Cidr::new("10.0.0.0/16"),
    })
}

/// Core VPC fixture: 10.0.0.0/22 split over three zones.
#[must_use]
pub fn core_stack() -> CoreVpcStack {
    CoreVpcStack::new(CoreVpcProps {
        deployment_id: deployment_id(),
        vpc_cidr: Cidr::new("10.0.0.0/22"),
        subnet_azs: vec![
            AvailabilityZone::new("us-east-1a"),
            AvailabilityZone::new("us-east-1b"),
            AvailabilityZone::new("us-east-1c"),
        ],
        subnet_cidrs: vec![
            Cidr::new("10.0.0.0/24"),
            Cidr::new("10.0.1.0/24"),
            Cidr::new("10.0.2.0/24"),
        ],
    })
}

/// Edge VPC fixture: 10.0.4.0/22 with two zones, one subnet per tier each.
#[must_use]
pub fn edge_stack(nat_strategy: NatStrategy) -> EdgeVpcStack {
    EdgeVpcStack::new(EdgeVpcProps {
        deployment_id: deployment_id(),
        region_cidr: Cidr::new("10.0.0.0/16"),
        edge_cidr: Cidr::new("10.0.4.0/22"),
        subnet_azs: vec![
            AvailabilityZone::new("us-east-1a"),
            AvailabilityZone::new("us-east-1b"),
        ],
        public_cidrs: vec![Cidr::new("10.0.4.0/24"), Cidr::new("10.0.6.0/24")],
        private_cidrs: vec![Cidr::new("10.0.5.0/24"), Cidr::new("10.0.7.0/24")],
        nat_strategy,
    })
}

/// Planner loaded with all three stacks, deliberately out of order.
#[must_use]
pub fn full_planner(nat_strategy: NatStrategy) -> Planner {
    let mut planner = Planner::new();
    planner.add(Box::new(edge_stack(nat_strategy)));
    planner.add(Box::new(core_stack()));
    planner.add(Box::new(router_stack()));
    planner
}

/// Deploy all three stacks, returning the deployer for assertions.
#[must_use]
pub fn deploy_full(nat_strategy: NatStrategy) -> Deployer {
    let deployer = deployer();
    full_planner(nat_strategy)
        .deploy_all(&deployer)
        .expect("full deployment");
    deployer
}

mod test_core_vpc;
mod test_edge_vpc;
mod test_lifecycle;
mod test_planner;
mod test_router;
