//! NetStack Deploy - provisions a regional hub-and-spoke network.
//!
//! This binary assembles the three stack definitions (hub router, core VPC,
//! edge VPC), plans them in producer-before-consumer order from their
//! parameter reads and writes, and applies them against the in-process
//! provider. With persistence enabled, the parameter store is loaded from
//! and saved back to a JSON snapshot so repeated runs converge.
//!
//! # Usage
//!
//! ```text
//! DEPLOYMENT_ID=prod-us netstack-deploy
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DEPLOYMENT_ID` | *(required)* | Deployment namespace for parameters and tags |
//! | `DEFAULT_REGION` | `us-east-1` | Region the provider simulates |
//! | `REGION_ASN` | `65000` | Autonomous system number of the hub |
//! | `REGION_CIDR` | `10.0.0.0/16` | Address space of the whole region |
//! | `CORE_VPC_CIDR` | `10.0.0.0/22` | Core network block |
//! | `CORE_SUBNET_AZS` | `us-east-1a,us-east-1b,us-east-1c` | Core zones, one subnet each |
//! | `CORE_SUBNET_CIDRS` | `10.0.0.0/24,10.0.1.0/24,10.0.2.0/24` | Core subnet blocks |
//! | `EDGE_VPC_CIDR` | `10.0.4.0/22` | Edge network block |
//! | `EDGE_SUBNET_AZS` | `us-east-1a,us-east-1b` | Edge zones, one subnet per tier each |
//! | `EDGE_PUBLIC_CIDRS` | `10.0.4.0/24,10.0.6.0/24` | Public-tier subnet blocks |
//! | `EDGE_PRIVATE_CIDRS` | `10.0.5.0/24,10.0.7.0/24` | Private-tier subnet blocks |
//! | `NAT_STRATEGY` | `single` | NAT placement: `single` or `per-az` |
//! | `PERSISTENCE` | `false` | Snapshot the parameter store to disk |
//! | `DATA_DIR` | `/var/lib/netstack` | Snapshot directory |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use netstack_core::{AvailabilityZone, Cidr, DeploymentId, NetStackConfig};
use netstack_engine::{CloudProvider, Deployer, Planner};
use netstack_params::ParameterStore;
use netstack_stacks::{
    CoreVpcProps, CoreVpcStack, EdgeVpcProps, EdgeVpcStack, NatStrategy, RouterProps, RouterStack,
};

/// Version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Read an environment variable, falling back to a default.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated list, trimming whitespace and dropping empties.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a comma-separated list of availability zones.
fn parse_azs(raw: &str) -> Vec<AvailabilityZone> {
    parse_list(raw).into_iter().map(AvailabilityZone::new).collect()
}

/// Parse a comma-separated list of CIDR blocks.
fn parse_cidrs(raw: &str) -> Vec<Cidr> {
    parse_list(raw).into_iter().map(Cidr::new).collect()
}

fn main() -> Result<()> {
    let config = NetStackConfig::from_env();
    init_tracing(&config.log_level)?;

    let deployment_id = std::env::var("DEPLOYMENT_ID")
        .context("DEPLOYMENT_ID must be set")
        .and_then(|raw| DeploymentId::new(raw).map_err(Into::into))?;

    let region_asn: u32 = env_or("REGION_ASN", "65000")
        .parse()
        .context("REGION_ASN must be a number")?;
    let region_cidr = Cidr::new(env_or("REGION_CIDR", "10.0.0.0/16"));
    let nat_strategy: NatStrategy = env_or("NAT_STRATEGY", "single")
        .parse()
        .map_err(anyhow::Error::msg)?;

    let provider = Arc::new(CloudProvider::new(config.default_region.clone()));
    let params = Arc::new(ParameterStore::new());

    let snapshot = Path::new(&config.data_dir).join("parameters.json");
    if config.persistence && snapshot.exists() {
        params.load_snapshot(&snapshot)?;
        info!(path = %snapshot.display(), "loaded parameter snapshot");
    }

    let deployer = Deployer::new(provider, Arc::clone(&params));

    let mut planner = Planner::new();
    planner.add(Box::new(RouterStack::new(RouterProps {
        deployment_id: deployment_id.clone(),
        region_asn,
        region_cidr: region_cidr.clone(),
    })));
    planner.add(Box::new(CoreVpcStack::new(CoreVpcProps {
        deployment_id: deployment_id.clone(),
        vpc_cidr: Cidr::new(env_or("CORE_VPC_CIDR", "10.0.0.0/22")),
        subnet_azs: parse_azs(&env_or("CORE_SUBNET_AZS", "us-east-1a,us-east-1b,us-east-1c")),
        subnet_cidrs: parse_cidrs(&env_or(
            "CORE_SUBNET_CIDRS",
            "10.0.0.0/24,10.0.1.0/24,10.0.2.0/24",
        )),
    })));
    planner.add(Box::new(EdgeVpcStack::new(EdgeVpcProps {
        deployment_id: deployment_id.clone(),
        region_cidr,
        edge_cidr: Cidr::new(env_or("EDGE_VPC_CIDR", "10.0.4.0/22")),
        subnet_azs: parse_azs(&env_or("EDGE_SUBNET_AZS", "us-east-1a,us-east-1b")),
        public_cidrs: parse_cidrs(&env_or("EDGE_PUBLIC_CIDRS", "10.0.4.0/24,10.0.6.0/24")),
        private_cidrs: parse_cidrs(&env_or("EDGE_PRIVATE_CIDRS", "10.0.5.0/24,10.0.7.0/24")),
        nat_strategy,
    })));

    info!(
        deployment_id = %deployment_id,
        region = %config.default_region,
        version = VERSION,
        "starting deployment",
    );

    let reports = planner.deploy_all(&deployer)?;
    for report in &reports {
        info!(
            stack = %report.stack,
            run_id = %report.run_id,
            created = report.created.len(),
            unchanged = report.unchanged,
            "stack applied",
        );
    }

    if config.persistence {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("cannot create {}", config.data_dir))?;
        params.save_snapshot(&snapshot)?;
        info!(path = %snapshot.display(), "saved parameter snapshot");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_list_with_whitespace() {
        assert_eq!(parse_list(" a, b ,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_should_drop_empty_list_entries() {
        assert_eq!(parse_list("a,,b,"), vec!["a", "b"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_should_parse_cidr_list() {
        let cidrs = parse_cidrs("10.0.0.0/24, 10.0.1.0/24");
        assert_eq!(cidrs.len(), 2);
        assert_eq!(cidrs[0].as_str(), "10.0.0.0/24");
    }
}
