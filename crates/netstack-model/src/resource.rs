//! Resource declaration specs.
//!
//! These are plain-data descriptions of the resources a stack wants to
//! exist. They carry no provisioning behavior; the engine resolves their
//! [`Value`] slots and drives them through the control plane in dependency
//! order.

use std::fmt;

use netstack_core::{AvailabilityZone, Cidr, TagSet};
use netstack_params::ParameterPath;

use crate::ids::{
    AllocationId, AttachmentId, InternetGatewayId, NatGatewayId, RouteTableId, SubnetId,
    TransitGatewayId, TransitRouteTableId, VpcId,
};
use crate::value::{LogicalId, Value};

/// Regional routing hub (transit gateway) declaration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitGatewaySpec {
    /// Private autonomous system number on the provider side.
    pub amazon_side_asn: u32,
    /// Operator-facing description.
    pub description: String,
    /// Auto-accept attachment requests from shared accounts.
    pub auto_accept_shared_attachments: bool,
    /// Associate new attachments with the default route table.
    pub default_route_table_association: bool,
    /// Propagate new attachments into the default route table.
    pub default_route_table_propagation: bool,
    /// Resolve DNS across attachments.
    pub dns_support: bool,
    /// Multicast domain support.
    pub multicast_support: bool,
    /// Equal-cost multipath across VPN attachments.
    pub vpn_ecmp_support: bool,
    /// Resource tags.
    pub tags: TagSet,
}

impl TransitGatewaySpec {
    /// A hub with every feature flag enabled, matching the regional default.
    #[must_use]
    pub fn new(amazon_side_asn: u32) -> Self {
        Self {
            amazon_side_asn,
            description: "transit gateway".to_owned(),
            auto_accept_shared_attachments: true,
            default_route_table_association: true,
            default_route_table_propagation: true,
            dns_support: true,
            multicast_support: true,
            vpn_ecmp_support: true,
            tags: TagSet::new(),
        }
    }

    /// Replace the tag set.
    #[must_use]
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }
}

/// Secondary route table on a hub.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitGatewayRouteTableSpec {
    /// Owning hub.
    pub gateway: Value<TransitGatewayId>,
    /// Resource tags.
    pub tags: TagSet,
}

/// A parameter publish, modeled as a stack resource so the write lands as
/// part of the apply graph after its producer completes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterSpec {
    /// Destination path.
    pub path: ParameterPath,
    /// Value to publish; a `Ref` publishes the producer's physical id.
    pub value: Value<String>,
}

/// Private network (VPC) declaration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VpcSpec {
    /// Address space of the network.
    pub cidr: Cidr,
    /// Resource tags.
    pub tags: TagSet,
}

/// Flow log sink destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FlowLogDestination {
    /// Deliver flow records to CloudWatch Logs.
    CloudWatchLogs,
}

/// VPC flow log declaration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlowLogSpec {
    /// Monitored network.
    pub vpc: Value<VpcId>,
    /// Where flow records are delivered.
    pub destination: FlowLogDestination,
}

/// Subnet declaration, pinned to one availability zone.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubnetSpec {
    /// Owning network.
    pub vpc: Value<VpcId>,
    /// Availability zone the subnet is pinned to.
    pub availability_zone: AvailabilityZone,
    /// Subnet address block.
    pub cidr: Cidr,
    /// Whether instances get a public address on launch (public tier).
    pub map_public_ip_on_launch: bool,
    /// Resource tags.
    pub tags: TagSet,
}

/// VPC route table declaration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteTableSpec {
    /// Owning network.
    pub vpc: Value<VpcId>,
    /// Resource tags.
    pub tags: TagSet,
}

/// Association of a subnet with a route table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubnetRouteTableAssociationSpec {
    /// Route table to associate.
    pub route_table: Value<RouteTableId>,
    /// Subnet being associated.
    pub subnet: Value<SubnetId>,
}

/// Next hop of a VPC route. Exactly one target kind per route, by
/// construction rather than by mutually exclusive optional fields.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum RouteTarget {
    /// Route into the hub. The attachment's logical id rides along so the
    /// completion-order dependency on the attachment is structural: the
    /// control plane will not accept this route until the VPC is attached.
    TransitGateway {
        /// Hub the traffic is handed to.
        gateway: Value<TransitGatewayId>,
        /// Attachment this route depends on.
        attachment: LogicalId,
    },
    /// Route through a NAT gateway (private-tier egress).
    NatGateway(Value<NatGatewayId>),
    /// Route through an internet gateway (public tier).
    InternetGateway(Value<InternetGatewayId>),
}

/// VPC route declaration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteSpec {
    /// Route table the route is installed into.
    pub route_table: Value<RouteTableId>,
    /// Destination CIDR block.
    pub destination: Cidr,
    /// Next hop.
    pub target: RouteTarget,
}

/// Binding of a network's chosen subnets to the hub.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitGatewayAttachmentSpec {
    /// Hub being attached to.
    pub gateway: Value<TransitGatewayId>,
    /// Network being attached.
    pub vpc: Value<VpcId>,
    /// Ordered subnets the attachment spans.
    pub subnets: Vec<Value<SubnetId>>,
    /// Resource tags.
    pub tags: TagSet,
}

/// Association of an attachment with a non-default hub route table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitGatewayRouteTableAssociationSpec {
    /// Attachment being associated.
    pub attachment: Value<AttachmentId>,
    /// Hub route table the attachment joins.
    pub route_table: Value<TransitRouteTableId>,
}

/// Route inside a hub route table, pointed at an attachment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitGatewayRouteSpec {
    /// Hub route table the route is installed into.
    pub route_table: Value<TransitRouteTableId>,
    /// Destination CIDR block.
    pub destination: Cidr,
    /// Attachment traffic is forwarded to.
    pub attachment: Value<AttachmentId>,
}

/// Internet gateway declaration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InternetGatewaySpec {
    /// Resource tags.
    pub tags: TagSet,
}

/// Binding of an internet gateway to a network.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VpcGatewayAttachmentSpec {
    /// Network the gateway serves.
    pub vpc: Value<VpcId>,
    /// Gateway being bound.
    pub internet_gateway: Value<InternetGatewayId>,
}

/// Elastic IP allocation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EipSpec {
    /// Resource tags.
    pub tags: TagSet,
}

/// NAT gateway declaration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NatGatewaySpec {
    /// Subnet the gateway lives in.
    pub subnet: Value<SubnetId>,
    /// Public address allocation.
    pub allocation: Value<AllocationId>,
    /// Resource tags.
    pub tags: TagSet,
}

/// Resource kind discriminant, used for journaling, deletion dispatch, and
/// log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ResourceKind {
    /// Regional routing hub.
    TransitGateway,
    /// Hub route table.
    TransitGatewayRouteTable,
    /// Published parameter.
    Parameter,
    /// Private network.
    Vpc,
    /// Flow log sink.
    FlowLog,
    /// Subnet.
    Subnet,
    /// VPC route table.
    RouteTable,
    /// Subnet/route-table association.
    SubnetRouteTableAssociation,
    /// VPC route.
    Route,
    /// Hub attachment.
    TransitGatewayAttachment,
    /// Hub route table association.
    TransitGatewayRouteTableAssociation,
    /// Hub route.
    TransitGatewayRoute,
    /// Internet gateway.
    InternetGateway,
    /// Internet gateway/VPC binding.
    VpcGatewayAttachment,
    /// Elastic IP allocation.
    Eip,
    /// NAT gateway.
    NatGateway,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TransitGateway => "transit-gateway",
            Self::TransitGatewayRouteTable => "transit-gateway-route-table",
            Self::Parameter => "parameter",
            Self::Vpc => "vpc",
            Self::FlowLog => "flow-log",
            Self::Subnet => "subnet",
            Self::RouteTable => "route-table",
            Self::SubnetRouteTableAssociation => "subnet-route-table-association",
            Self::Route => "route",
            Self::TransitGatewayAttachment => "transit-gateway-attachment",
            Self::TransitGatewayRouteTableAssociation => "transit-gateway-route-table-association",
            Self::TransitGatewayRoute => "transit-gateway-route",
            Self::InternetGateway => "internet-gateway",
            Self::VpcGatewayAttachment => "vpc-gateway-attachment",
            Self::Eip => "eip",
            Self::NatGateway => "nat-gateway",
        };
        f.write_str(name)
    }
}

/// A declared resource of any kind.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ResourceSpec {
    /// Regional routing hub.
    TransitGateway(TransitGatewaySpec),
    /// Hub route table.
    TransitGatewayRouteTable(TransitGatewayRouteTableSpec),
    /// Published parameter.
    Parameter(ParameterSpec),
    /// Private network.
    Vpc(VpcSpec),
    /// Flow log sink.
    FlowLog(FlowLogSpec),
    /// Subnet.
    Subnet(SubnetSpec),
    /// VPC route table.
    RouteTable(RouteTableSpec),
    /// Subnet/route-table association.
    SubnetRouteTableAssociation(SubnetRouteTableAssociationSpec),
    /// VPC route.
    Route(RouteSpec),
    /// Hub attachment.
    TransitGatewayAttachment(TransitGatewayAttachmentSpec),
    /// Hub route table association.
    TransitGatewayRouteTableAssociation(TransitGatewayRouteTableAssociationSpec),
    /// Hub route.
    TransitGatewayRoute(TransitGatewayRouteSpec),
    /// Internet gateway.
    InternetGateway(InternetGatewaySpec),
    /// Internet gateway/VPC binding.
    VpcGatewayAttachment(VpcGatewayAttachmentSpec),
    /// Elastic IP allocation.
    Eip(EipSpec),
    /// NAT gateway.
    NatGateway(NatGatewaySpec),
}

impl ResourceSpec {
    /// Kind discriminant for this spec.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::TransitGateway(_) => ResourceKind::TransitGateway,
            Self::TransitGatewayRouteTable(_) => ResourceKind::TransitGatewayRouteTable,
            Self::Parameter(_) => ResourceKind::Parameter,
            Self::Vpc(_) => ResourceKind::Vpc,
            Self::FlowLog(_) => ResourceKind::FlowLog,
            Self::Subnet(_) => ResourceKind::Subnet,
            Self::RouteTable(_) => ResourceKind::RouteTable,
            Self::SubnetRouteTableAssociation(_) => ResourceKind::SubnetRouteTableAssociation,
            Self::Route(_) => ResourceKind::Route,
            Self::TransitGatewayAttachment(_) => ResourceKind::TransitGatewayAttachment,
            Self::TransitGatewayRouteTableAssociation(_) => {
                ResourceKind::TransitGatewayRouteTableAssociation
            }
            Self::TransitGatewayRoute(_) => ResourceKind::TransitGatewayRoute,
            Self::InternetGateway(_) => ResourceKind::InternetGateway,
            Self::VpcGatewayAttachment(_) => ResourceKind::VpcGatewayAttachment,
            Self::Eip(_) => ResourceKind::Eip,
            Self::NatGateway(_) => ResourceKind::NatGateway,
        }
    }

    /// Logical ids of every same-stack resource this spec references.
    ///
    /// These become dependency edges in the stack graph; a spec with no
    /// `Ref` slots (or only `Literal` values) contributes none.
    #[must_use]
    pub fn references(&self) -> Vec<&LogicalId> {
        let mut refs = Vec::new();
        match self {
            Self::TransitGateway(_) | Self::InternetGateway(_) | Self::Eip(_) => {}
            Self::TransitGatewayRouteTable(s) => refs.extend(s.gateway.reference()),
            Self::Parameter(s) => refs.extend(s.value.reference()),
            Self::Vpc(_) => {}
            Self::FlowLog(s) => refs.extend(s.vpc.reference()),
            Self::Subnet(s) => refs.extend(s.vpc.reference()),
            Self::RouteTable(s) => refs.extend(s.vpc.reference()),
            Self::SubnetRouteTableAssociation(s) => {
                refs.extend(s.route_table.reference());
                refs.extend(s.subnet.reference());
            }
            Self::Route(s) => {
                refs.extend(s.route_table.reference());
                match &s.target {
                    RouteTarget::TransitGateway {
                        gateway,
                        attachment,
                    } => {
                        refs.extend(gateway.reference());
                        refs.push(attachment);
                    }
                    RouteTarget::NatGateway(v) => refs.extend(v.reference()),
                    RouteTarget::InternetGateway(v) => refs.extend(v.reference()),
                }
            }
            Self::TransitGatewayAttachment(s) => {
                refs.extend(s.gateway.reference());
                refs.extend(s.vpc.reference());
                refs.extend(s.subnets.iter().filter_map(Value::reference));
            }
            Self::TransitGatewayRouteTableAssociation(s) => {
                refs.extend(s.attachment.reference());
                refs.extend(s.route_table.reference());
            }
            Self::TransitGatewayRoute(s) => {
                refs.extend(s.route_table.reference());
                refs.extend(s.attachment.reference());
            }
            Self::VpcGatewayAttachment(s) => {
                refs.extend(s.vpc.reference());
                refs.extend(s.internet_gateway.reference());
            }
            Self::NatGateway(s) => {
                refs.extend(s.subnet.reference());
                refs.extend(s.allocation.reference());
            }
        }
        refs
    }
}

macro_rules! spec_from {
    ($variant:ident, $spec:ty) => {
        impl From<$spec> for ResourceSpec {
            fn from(spec: $spec) -> Self {
                Self::$variant(spec)
            }
        }
    };
}

spec_from!(TransitGateway, TransitGatewaySpec);
spec_from!(TransitGatewayRouteTable, TransitGatewayRouteTableSpec);
spec_from!(Parameter, ParameterSpec);
spec_from!(Vpc, VpcSpec);
spec_from!(FlowLog, FlowLogSpec);
spec_from!(Subnet, SubnetSpec);
spec_from!(RouteTable, RouteTableSpec);
spec_from!(SubnetRouteTableAssociation, SubnetRouteTableAssociationSpec);
spec_from!(Route, RouteSpec);
spec_from!(TransitGatewayAttachment, TransitGatewayAttachmentSpec);
spec_from!(
    TransitGatewayRouteTableAssociation,
    TransitGatewayRouteTableAssociationSpec
);
spec_from!(TransitGatewayRoute, TransitGatewayRouteSpec);
spec_from!(InternetGateway, InternetGatewaySpec);
spec_from!(VpcGatewayAttachment, VpcGatewayAttachmentSpec);
spec_from!(Eip, EipSpec);
spec_from!(NatGateway, NatGatewaySpec);
