//! Edge VPC stack: the dual-tier internet-facing network.

use std::str::FromStr;

use tracing::debug;

use netstack_core::{AvailabilityZone, Cidr, DeploymentId, TagSet};
use netstack_engine::{EngineError, EngineResult, Stack, StackDefinition, SynthContext};
use netstack_model::{
    EipSpec, FlowLogDestination, FlowLogSpec, InternetGatewaySpec, LogicalId, NatGatewaySpec,
    PhysicalId, RouteSpec, RouteTableSpec, RouteTarget, SubnetRouteTableAssociationSpec,
    SubnetSpec, TransitGatewayAttachmentSpec, TransitGatewayId, TransitGatewayRouteSpec,
    TransitGatewayRouteTableAssociationSpec, TransitRouteTableId, Value, VpcGatewayAttachmentSpec,
    VpcSpec,
};
use netstack_params::ParameterPath;

/// NAT gateway placement policy for the private tier.
///
/// `Single` provisions one NAT gateway in the first private subnet: cheaper,
/// but that zone is a single point of failure for all private-tier egress.
/// `PerAz` provisions one NAT gateway and one private route table per zone,
/// keeping egress zone-local.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NatStrategy {
    /// One NAT gateway for the whole private tier.
    #[default]
    Single,
    /// One NAT gateway per availability zone.
    PerAz,
}

impl FromStr for NatStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "per-az" => Ok(Self::PerAz),
            other => Err(format!("unknown NAT strategy: {other} (single | per-az)")),
        }
    }
}

/// Construction parameters for the edge VPC stack.
#[derive(Debug, Clone)]
pub struct EdgeVpcProps {
    /// Deployment namespace.
    pub deployment_id: DeploymentId,
    /// Address space of the whole region, routed back toward the hub from
    /// the public tier.
    pub region_cidr: Cidr,
    /// Address block of the edge network.
    pub edge_cidr: Cidr,
    /// Availability zones, one public and one private subnet each.
    pub subnet_azs: Vec<AvailabilityZone>,
    /// Public-tier subnet blocks; must match `subnet_azs` positionally.
    pub public_cidrs: Vec<Cidr>,
    /// Private-tier subnet blocks; must match `subnet_azs` positionally.
    pub private_cidrs: Vec<Cidr>,
    /// NAT gateway placement.
    pub nat_strategy: NatStrategy,
}

/// Provisions the edge network: public subnets route to an internet
/// gateway, private subnets egress through NAT, and only the private tier
/// attaches to the hub, via the secondary route table so edge egress routes
/// stay out of the default association domain.
#[derive(Debug)]
pub struct EdgeVpcStack {
    props: EdgeVpcProps,
}

impl EdgeVpcStack {
    /// Stack name.
    pub const NAME: &str = "edge-vpc";

    /// Create the stack definition.
    #[must_use]
    pub fn new(props: EdgeVpcProps) -> Self {
        Self { props }
    }

    fn check_lengths(&self) -> EngineResult<()> {
        let props = &self.props;
        if props.subnet_azs.is_empty() {
            return Err(EngineError::EmptyList {
                stack: Self::NAME.to_owned(),
                list: "subnet_azs",
            });
        }
        for (name, len) in [
            ("public_cidrs", props.public_cidrs.len()),
            ("private_cidrs", props.private_cidrs.len()),
        ] {
            if props.subnet_azs.len() != len {
                return Err(EngineError::LengthMismatch {
                    stack: Self::NAME.to_owned(),
                    left_name: "subnet_azs",
                    left: props.subnet_azs.len(),
                    right_name: name,
                    right: len,
                });
            }
        }
        Ok(())
    }
}

impl StackDefinition for EdgeVpcStack {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> Vec<ParameterPath> {
        vec![
            ParameterPath::core_router_id(&self.props.deployment_id),
            ParameterPath::edge_route_table_id(&self.props.deployment_id),
        ]
    }

    #[allow(clippy::too_many_lines)]
    fn synth(&self, ctx: &SynthContext<'_>) -> EngineResult<Stack> {
        let props = &self.props;
        self.check_lengths()?;

        let gateway = TransitGatewayId::parse(
            ctx.resolve(&ParameterPath::core_router_id(&props.deployment_id))?,
        )?;
        let edge_route_table = TransitRouteTableId::parse(
            ctx.resolve(&ParameterPath::edge_route_table_id(&props.deployment_id))?,
        )?;

        let mut stack = Stack::new(Self::NAME);

        let vpc = stack.add(
            "vpc",
            VpcSpec {
                cidr: props.edge_cidr.clone(),
                tags: TagSet::new()
                    .with("Name", "edge/vpc")
                    .with("Network", "edge")
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

        let pub_rt = stack.add(
            "pubRt",
            RouteTableSpec {
                vpc: Value::from(&vpc),
                tags: TagSet::new()
                    .with("Name", "pubRoutes")
                    .with("DeploymentId", props.deployment_id.as_str()),
            },
        )?;

        // Private route tables: one shared, or one per zone.
        let priv_rts: Vec<LogicalId> = match props.nat_strategy {
            NatStrategy::Single => {
                let rt = stack.add(
                    "privRt",
                    RouteTableSpec {
                        vpc: Value::from(&vpc),
                        tags: TagSet::new()
                            .with("Name", "privRoutes")
                            .with("DeploymentId", props.deployment_id.as_str()),
                    },
                )?;
                vec![rt; props.subnet_azs.len()]
            }
            NatStrategy::PerAz => {
                let mut rts = Vec::with_capacity(props.subnet_azs.len());
                for n in 1..=props.subnet_azs.len() {
                    rts.push(stack.add(
                        format!("privRt{n}"),
                        RouteTableSpec {
                            vpc: Value::from(&vpc),
                            tags: TagSet::new()
                                .with("Name", format!("privRoutes{n:02}"))
                                .with("DeploymentId", props.deployment_id.as_str()),
                        },
                    )?);
                }
                rts
            }
        };

        for (i, (az, cidr)) in props.subnet_azs.iter().zip(&props.public_cidrs).enumerate() {
            let n = i + 1;
            let subnet = stack.add(
                format!("pub{n}"),
                SubnetSpec {
                    vpc: Value::from(&vpc),
                    availability_zone: az.clone(),
                    cidr: cidr.clone(),
                    map_public_ip_on_launch: true,
                    tags: TagSet::new().with("Name", format!("pub{n:02}")),
                },
            )?;
            stack.add(
                format!("pub{n}RtA"),
                SubnetRouteTableAssociationSpec {
                    route_table: Value::from(&pub_rt),
                    subnet: Value::from(&subnet),
                },
            )?;
        }

        let mut private_subnets = Vec::with_capacity(props.subnet_azs.len());
        for (i, (az, cidr)) in props.subnet_azs.iter().zip(&props.private_cidrs).enumerate() {
            let n = i + 1;
            let subnet = stack.add(
                format!("priv{n}"),
                SubnetSpec {
                    vpc: Value::from(&vpc),
                    availability_zone: az.clone(),
                    cidr: cidr.clone(),
                    map_public_ip_on_launch: false,
                    tags: TagSet::new().with("Name", format!("priv{n:02}")),
                },
            )?;
            stack.add(
                format!("priv{n}RtA"),
                SubnetRouteTableAssociationSpec {
                    route_table: Value::from(&priv_rts[i]),
                    subnet: Value::from(&subnet),
                },
            )?;
            private_subnets.push(subnet);
        }

        let igw = stack.add(
            "igw",
            InternetGatewaySpec {
                tags: TagSet::new().with("DeploymentId", props.deployment_id.as_str()),
            },
        )?;
        let vpc_igw = stack.add(
            "vpcIgw",
            VpcGatewayAttachmentSpec {
                vpc: Value::from(&vpc),
                internet_gateway: Value::from(&igw),
            },
        )?;

        // NAT gateways need the internet gateway binding in place.
        let nat_gateways: Vec<LogicalId> = match props.nat_strategy {
            NatStrategy::Single => {
                let eip = stack.add(
                    "eip-ngw1",
                    EipSpec {
                        tags: TagSet::new(),
                    },
                )?;
                let ngw = stack.add_with_deps(
                    "ngw1",
                    NatGatewaySpec {
                        subnet: Value::from(&private_subnets[0]),
                        allocation: Value::from(&eip),
                        tags: TagSet::new(),
                    },
                    std::slice::from_ref(&vpc_igw),
                )?;
                vec![ngw; props.subnet_azs.len()]
            }
            NatStrategy::PerAz => {
                let mut ngws = Vec::with_capacity(props.subnet_azs.len());
                for (i, subnet) in private_subnets.iter().enumerate() {
                    let n = i + 1;
                    let eip = stack.add(
                        format!("eip-ngw{n}"),
                        EipSpec {
                            tags: TagSet::new(),
                        },
                    )?;
                    ngws.push(stack.add_with_deps(
                        format!("ngw{n}"),
                        NatGatewaySpec {
                            subnet: Value::from(subnet),
                            allocation: Value::from(&eip),
                            tags: TagSet::new(),
                        },
                        std::slice::from_ref(&vpc_igw),
                    )?);
                }
                ngws
            }
        };

        // Only the private tier rides the hub.
        let attachment = stack.add(
            "edgeToTgw",
            TransitGatewayAttachmentSpec {
                gateway: Value::Literal(gateway.clone()),
                vpc: Value::from(&vpc),
                subnets: private_subnets.iter().map(Value::from).collect(),
                tags: TagSet::new()
                    .with("Name", "edgeToTgw")
                    .with("Network", "edge"),
            },
        )?;

        // Join the secondary route table instead of the hub's default one.
        stack.add(
            "edgeTgwRtA",
            TransitGatewayRouteTableAssociationSpec {
                attachment: Value::from(&attachment),
                route_table: Value::Literal(edge_route_table.clone()),
            },
        )?;

        stack.add(
            "DefaultRoute",
            TransitGatewayRouteSpec {
                route_table: Value::Literal(edge_route_table),
                destination: Cidr::any(),
                attachment: Value::from(&attachment),
            },
        )?;

        stack.add_with_deps(
            "defRts",
            RouteSpec {
                route_table: Value::from(&pub_rt),
                destination: Cidr::any(),
                target: RouteTarget::InternetGateway(Value::from(&igw)),
            },
            std::slice::from_ref(&vpc_igw),
        )?;

        stack.add(
            "pubRts",
            RouteSpec {
                route_table: Value::from(&pub_rt),
                destination: props.region_cidr.clone(),
                target: RouteTarget::TransitGateway {
                    gateway: Value::Literal(gateway),
                    attachment,
                },
            },
        )?;

        match props.nat_strategy {
            NatStrategy::Single => {
                stack.add(
                    "privRts",
                    RouteSpec {
                        route_table: Value::from(&priv_rts[0]),
                        destination: Cidr::any(),
                        target: RouteTarget::NatGateway(Value::from(&nat_gateways[0])),
                    },
                )?;
            }
            NatStrategy::PerAz => {
                for (n, (rt, ngw)) in priv_rts.iter().zip(&nat_gateways).enumerate() {
                    stack.add(
                        format!("privRts{}", n + 1),
                        RouteSpec {
                            route_table: Value::from(rt),
                            destination: Cidr::any(),
                            target: RouteTarget::NatGateway(Value::from(ngw)),
                        },
                    )?;
                }
            }
        }

        debug!(stack = Self::NAME, resources = stack.resources().len(), "synthesized");
        Ok(stack)
    }
}
