//! Core VPC stack: the hub-connected private network.

use tracing::debug;

use netstack_core::{AvailabilityZone, Cidr, DeploymentId, TagSet};
use netstack_engine::{EngineError, EngineResult, Stack, StackDefinition, SynthContext};
use netstack_model::{
    FlowLogDestination, FlowLogSpec, PhysicalId, RouteSpec, RouteTableSpec, RouteTarget,
    SubnetRouteTableAssociationSpec, SubnetSpec, TransitGatewayAttachmentSpec, TransitGatewayId,
    Value, VpcSpec,
};
use netstack_params::ParameterPath;

/// Construction parameters for the core VPC stack.
#[derive(Debug, Clone)]
pub struct CoreVpcProps {
    /// Deployment namespace.
    pub deployment_id: DeploymentId,
    /// Address block of the core network.
    pub vpc_cidr: Cidr,
    /// Availability zones, one subnet each.
    pub subnet_azs: Vec<AvailabilityZone>,
    /// Per-zone subnet blocks; must match `subnet_azs` positionally.
    pub subnet_cidrs: Vec<Cidr>,
}

/// Provisions the core network: one subnet per availability zone, all of
/// them attached to the hub, with a default route toward it.
#[derive(Debug)]
pub struct CoreVpcStack {
    props: CoreVpcProps,
}

impl CoreVpcStack {
    /// Stack name.
    pub const NAME: &str = "core-vpc";

    /// Create the stack definition.
    #[must_use]
    pub fn new(props: CoreVpcProps) -> Self {
        Self { props }
    }
}

impl StackDefinition for CoreVpcStack {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> Vec<ParameterPath> {
        vec![ParameterPath::core_router_id(&self.props.deployment_id)]
    }

    fn synth(&self, ctx: &SynthContext<'_>) -> EngineResult<Stack> {
        let props = &self.props;
        if props.subnet_azs.len() != props.subnet_cidrs.len() {
            return Err(EngineError::LengthMismatch {
                stack: Self::NAME.to_owned(),
                left_name: "subnet_azs",
                left: props.subnet_azs.len(),
                right_name: "subnet_cidrs",
                right: props.subnet_cidrs.len(),
            });
        }

        let gateway = TransitGatewayId::parse(
            ctx.resolve(&ParameterPath::core_router_id(&props.deployment_id))?,
        )?;

        let mut stack = Stack::new(Self::NAME);

        let vpc = stack.add(
            "vpc",
            VpcSpec {
                cidr: props.vpc_cidr.clone(),
                tags: TagSet::new()
                    .with("Name", "core/vpc")
                    .with("Network", "core")
                    .with("DeploymentId", props.deployment_id.as_str()),
            },
        )?;

        stack.add(
            "vpcFlowLogs",
            FlowLogSpec {
                vpc: Value::from(&vpc),
                destination: FlowLogDestination::CloudWatchLogs,
            },
        )?;

        let route_table = stack.add(
            "coreRouteTable",
            RouteTableSpec {
                vpc: Value::from(&vpc),
                tags: TagSet::new()
                    .with("Name", "gatewayConnected")
                    .with("DeploymentId", props.deployment_id.as_str()),
            },
        )?;

        let mut subnets = Vec::with_capacity(props.subnet_azs.len());
        for (i, (az, cidr)) in props
            .subnet_azs
            .iter()
            .zip(&props.subnet_cidrs)
            .enumerate()
        {
            let n = i + 1;
            let subnet = stack.add(
                format!("coreNet{n}"),
                SubnetSpec {
                    vpc: Value::from(&vpc),
                    availability_zone: az.clone(),
                    cidr: cidr.clone(),
                    map_public_ip_on_launch: false,
                    tags: TagSet::new().with("Name", format!("core{n:02}")),
                },
            )?;
            stack.add(
                format!("net{n}RtA"),
                SubnetRouteTableAssociationSpec {
                    route_table: Value::from(&route_table),
                    subnet: Value::from(&subnet),
                },
            )?;
            subnets.push(subnet);
        }

        // Every core subnet rides the hub attachment.
        let attachment = stack.add(
            "coreToTgw",
            TransitGatewayAttachmentSpec {
                gateway: Value::Literal(gateway.clone()),
                vpc: Value::from(&vpc),
                subnets: subnets.iter().map(Value::from).collect(),
                tags: TagSet::new()
                    .with("Name", "coreToTgw")
                    .with("Network", "core"),
            },
        )?;

        stack.add(
            "defaultRoute",
            RouteSpec {
                route_table: Value::from(&route_table),
                destination: Cidr::any(),
                target: RouteTarget::TransitGateway {
                    gateway: Value::Literal(gateway),
                    attachment,
                },
            },
        )?;

        debug!(stack = Self::NAME, resources = stack.resources().len(), "synthesized");
        Ok(stack)
    }
}

#[cfg(test)]
mod tests {
    use netstack_core::AwsRegion;
    use netstack_model::{LogicalId, ResourceSpec};
    use netstack_params::ParameterStore;

    use super::*;

    fn props(azs: &[&str], cidrs: &[&str]) -> CoreVpcProps {
        CoreVpcProps {
            deployment_id: DeploymentId::new("test").unwrap(),
            vpc_cidr: Cidr::new("10.0.0.0/22"),
            subnet_azs: azs.iter().copied().map(AvailabilityZone::new).collect(),
            subnet_cidrs: cidrs.iter().copied().map(Cidr::new).collect(),
        }
    }

    fn store_with_router() -> ParameterStore {
        let store = ParameterStore::new();
        store.publish(
            ParameterPath::core_router_id(&DeploymentId::new("test").unwrap()),
            "tgw-0123456789abcdef0",
        );
        store
    }

    #[test]
    fn test_should_error_on_mismatched_list_lengths() {
        let store = store_with_router();
        let ctx = SynthContext::new(&store, AwsRegion::default());
        let def = CoreVpcStack::new(props(
            &["us-east-1a", "us-east-1b", "us-east-1c"],
            &["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24", "10.0.3.0/24"],
        ));
        assert!(matches!(
            def.synth(&ctx),
            Err(EngineError::LengthMismatch { left: 3, right: 4, .. })
        ));
    }

    #[test]
    fn test_should_fail_synth_without_published_router() {
        let store = ParameterStore::new();
        let ctx = SynthContext::new(&store, AwsRegion::default());
        let def = CoreVpcStack::new(props(&["us-east-1a"], &["10.0.0.0/24"]));
        assert!(matches!(def.synth(&ctx), Err(EngineError::Parameter(_))));
    }

    #[test]
    fn test_should_attach_every_subnet_to_the_hub() {
        let store = store_with_router();
        let ctx = SynthContext::new(&store, AwsRegion::default());
        let def = CoreVpcStack::new(props(
            &["us-east-1a", "us-east-1b", "us-east-1c"],
            &["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24"],
        ));
        let stack = def.synth(&ctx).unwrap();

        let decl = stack.get(&LogicalId::new("coreToTgw")).unwrap();
        let ResourceSpec::TransitGatewayAttachment(spec) = &decl.spec else {
            panic!("coreToTgw is not an attachment");
        };
        let attached: Vec<&str> = spec
            .subnets
            .iter()
            .filter_map(|v| v.reference().map(LogicalId::as_str))
            .collect();
        assert_eq!(attached, vec!["coreNet1", "coreNet2", "coreNet3"]);
    }

    #[test]
    fn test_should_make_default_route_depend_on_attachment() {
        let store = store_with_router();
        let ctx = SynthContext::new(&store, AwsRegion::default());
        let def = CoreVpcStack::new(props(&["us-east-1a"], &["10.0.0.0/24"]));
        let stack = def.synth(&ctx).unwrap();

        let graph = stack.dependency_graph().unwrap();
        assert!(graph.depends_on(&LogicalId::new("defaultRoute"), &LogicalId::new("coreToTgw")));
    }
}
