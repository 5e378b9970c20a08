//! Simulated regional control plane.
//!
//! Holds provisioned resource records in concurrent maps and enforces the
//! referential rules a real control plane would: referenced resources must
//! exist, CIDR blocks must parse, a VPC attaches to a hub at most once, and
//! a route cannot target a hub its VPC is not attached to.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use netstack_core::{AvailabilityZone, AwsRegion, Cidr, TagSet};
use netstack_model::{
    AllocationId, AttachmentId, FlowLogDestination, FlowLogId, InternetGatewayId, NatGatewayId,
    PhysicalId, ResourceKind, RouteTableId, SubnetId, TransitGatewayId, TransitGatewaySpec,
    TransitRouteTableId, VpcId,
};

use crate::error::{ProviderError, ProviderResult};

/// Provisioned hub record.
#[derive(Debug, Clone)]
pub struct TransitGatewayRecord {
    /// Hub identifier.
    pub id: TransitGatewayId,
    /// Provider-side ASN.
    pub amazon_side_asn: u32,
    /// Description.
    pub description: String,
    /// Tags.
    pub tags: TagSet,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Hub route table record.
#[derive(Debug, Clone)]
pub struct TransitRouteTableRecord {
    /// Route table identifier.
    pub id: TransitRouteTableId,
    /// Owning hub.
    pub gateway: TransitGatewayId,
    /// Associated attachments.
    pub associations: Vec<AttachmentId>,
    /// Installed routes as (destination, attachment) pairs.
    pub routes: Vec<(Cidr, AttachmentId)>,
    /// Tags.
    pub tags: TagSet,
}

/// Provisioned VPC record.
#[derive(Debug, Clone)]
pub struct VpcRecord {
    /// VPC identifier.
    pub id: VpcId,
    /// Address block.
    pub cidr: Cidr,
    /// Tags.
    pub tags: TagSet,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Provisioned subnet record.
#[derive(Debug, Clone)]
pub struct SubnetRecord {
    /// Subnet identifier.
    pub id: SubnetId,
    /// Owning VPC.
    pub vpc: VpcId,
    /// Pinned availability zone.
    pub availability_zone: AvailabilityZone,
    /// Address block.
    pub cidr: Cidr,
    /// Public-tier flag.
    pub map_public_ip_on_launch: bool,
    /// Tags.
    pub tags: TagSet,
}

/// Next hop stored on an installed route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTargetRecord {
    /// Hub next hop.
    TransitGateway(TransitGatewayId),
    /// NAT gateway next hop.
    NatGateway(NatGatewayId),
    /// Internet gateway next hop.
    InternetGateway(InternetGatewayId),
}

/// Installed VPC route.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    /// Destination block.
    pub destination: Cidr,
    /// Next hop.
    pub target: RouteTargetRecord,
}

/// VPC route table record.
#[derive(Debug, Clone)]
pub struct RouteTableRecord {
    /// Route table identifier.
    pub id: RouteTableId,
    /// Owning VPC.
    pub vpc: VpcId,
    /// Installed routes.
    pub routes: Vec<RouteRecord>,
    /// Associated subnets.
    pub associations: Vec<SubnetId>,
    /// Tags.
    pub tags: TagSet,
}

/// Hub attachment record.
#[derive(Debug, Clone)]
pub struct AttachmentRecord {
    /// Attachment identifier.
    pub id: AttachmentId,
    /// Attached hub.
    pub gateway: TransitGatewayId,
    /// Attached VPC.
    pub vpc: VpcId,
    /// Subnets the attachment spans, in declaration order.
    pub subnets: Vec<SubnetId>,
    /// Tags.
    pub tags: TagSet,
}

/// Internet gateway record.
#[derive(Debug, Clone)]
pub struct InternetGatewayRecord {
    /// Gateway identifier.
    pub id: InternetGatewayId,
    /// VPC the gateway is bound to, once attached.
    pub vpc: Option<VpcId>,
    /// Tags.
    pub tags: TagSet,
}

/// Elastic IP allocation record.
#[derive(Debug, Clone)]
pub struct EipRecord {
    /// Allocation identifier.
    pub id: AllocationId,
    /// Tags.
    pub tags: TagSet,
}

/// NAT gateway record.
#[derive(Debug, Clone)]
pub struct NatGatewayRecord {
    /// Gateway identifier.
    pub id: NatGatewayId,
    /// Subnet the gateway lives in.
    pub subnet: SubnetId,
    /// Public address allocation.
    pub allocation: AllocationId,
    /// Tags.
    pub tags: TagSet,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Flow log record.
#[derive(Debug, Clone)]
pub struct FlowLogRecord {
    /// Flow log identifier.
    pub id: FlowLogId,
    /// Monitored VPC.
    pub vpc: VpcId,
    /// Sink destination.
    pub destination: FlowLogDestination,
}

/// In-process control plane for one region.
#[derive(Debug, Default)]
pub struct CloudProvider {
    region: AwsRegion,
    transit_gateways: DashMap<TransitGatewayId, TransitGatewayRecord>,
    transit_route_tables: DashMap<TransitRouteTableId, TransitRouteTableRecord>,
    vpcs: DashMap<VpcId, VpcRecord>,
    subnets: DashMap<SubnetId, SubnetRecord>,
    route_tables: DashMap<RouteTableId, RouteTableRecord>,
    attachments: DashMap<AttachmentId, AttachmentRecord>,
    internet_gateways: DashMap<InternetGatewayId, InternetGatewayRecord>,
    eips: DashMap<AllocationId, EipRecord>,
    nat_gateways: DashMap<NatGatewayId, NatGatewayRecord>,
    flow_logs: DashMap<FlowLogId, FlowLogRecord>,
}

/// Check `a.b.c.d/len` notation with a prefix length of at most 32.
fn validate_cidr(cidr: &Cidr) -> ProviderResult<()> {
    let raw = cidr.as_str();
    let malformed = || ProviderError::InvalidCidr(raw.to_owned());
    let (addr, len) = raw.split_once('/').ok_or_else(malformed)?;
    if addr.parse::<std::net::Ipv4Addr>().is_err() {
        return Err(malformed());
    }
    match len.parse::<u8>() {
        Ok(l) if l <= 32 => Ok(()),
        _ => Err(malformed()),
    }
}

fn not_found(kind: ResourceKind, id: &impl std::fmt::Display) -> ProviderError {
    ProviderError::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl CloudProvider {
    /// Create a control plane for the given region.
    #[must_use]
    pub fn new(region: AwsRegion) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }

    /// Region this control plane serves.
    #[must_use]
    pub fn region(&self) -> &AwsRegion {
        &self.region
    }

    /// Provision a hub.
    pub fn create_transit_gateway(
        &self,
        spec: &TransitGatewaySpec,
    ) -> ProviderResult<TransitGatewayId> {
        let id = TransitGatewayId::generate();
        self.transit_gateways.insert(
            id.clone(),
            TransitGatewayRecord {
                id: id.clone(),
                amazon_side_asn: spec.amazon_side_asn,
                description: spec.description.clone(),
                tags: spec.tags.clone(),
                created_at: Utc::now(),
            },
        );
        debug!(%id, asn = spec.amazon_side_asn, "created transit gateway");
        Ok(id)
    }

    /// Provision a hub route table.
    pub fn create_transit_route_table(
        &self,
        gateway: &TransitGatewayId,
        tags: TagSet,
    ) -> ProviderResult<TransitRouteTableId> {
        self.require_transit_gateway(gateway)?;
        let id = TransitRouteTableId::generate();
        self.transit_route_tables.insert(
            id.clone(),
            TransitRouteTableRecord {
                id: id.clone(),
                gateway: gateway.clone(),
                associations: Vec::new(),
                routes: Vec::new(),
                tags,
            },
        );
        debug!(%id, %gateway, "created transit gateway route table");
        Ok(id)
    }

    /// Provision a VPC.
    pub fn create_vpc(&self, cidr: &Cidr, tags: TagSet) -> ProviderResult<VpcId> {
        validate_cidr(cidr)?;
        let id = VpcId::generate();
        self.vpcs.insert(
            id.clone(),
            VpcRecord {
                id: id.clone(),
                cidr: cidr.clone(),
                tags,
                created_at: Utc::now(),
            },
        );
        debug!(%id, %cidr, "created vpc");
        Ok(id)
    }

    /// Provision a flow log on a VPC.
    pub fn create_flow_log(
        &self,
        vpc: &VpcId,
        destination: FlowLogDestination,
    ) -> ProviderResult<FlowLogId> {
        self.require_vpc(vpc)?;
        let id = FlowLogId::generate();
        self.flow_logs.insert(
            id.clone(),
            FlowLogRecord {
                id: id.clone(),
                vpc: vpc.clone(),
                destination,
            },
        );
        Ok(id)
    }

    /// Provision a subnet in a VPC.
    pub fn create_subnet(
        &self,
        vpc: &VpcId,
        availability_zone: &AvailabilityZone,
        cidr: &Cidr,
        map_public_ip_on_launch: bool,
        tags: TagSet,
    ) -> ProviderResult<SubnetId> {
        self.require_vpc(vpc)?;
        validate_cidr(cidr)?;
        let id = SubnetId::generate();
        self.subnets.insert(
            id.clone(),
            SubnetRecord {
                id: id.clone(),
                vpc: vpc.clone(),
                availability_zone: availability_zone.clone(),
                cidr: cidr.clone(),
                map_public_ip_on_launch,
                tags,
            },
        );
        debug!(%id, %vpc, az = %availability_zone, %cidr, "created subnet");
        Ok(id)
    }

    /// Provision a VPC route table.
    pub fn create_route_table(&self, vpc: &VpcId, tags: TagSet) -> ProviderResult<RouteTableId> {
        self.require_vpc(vpc)?;
        let id = RouteTableId::generate();
        self.route_tables.insert(
            id.clone(),
            RouteTableRecord {
                id: id.clone(),
                vpc: vpc.clone(),
                routes: Vec::new(),
                associations: Vec::new(),
                tags,
            },
        );
        Ok(id)
    }

    /// Associate a subnet with a route table.
    ///
    /// A subnet holds at most one active association.
    pub fn associate_route_table(
        &self,
        route_table: &RouteTableId,
        subnet: &SubnetId,
    ) -> ProviderResult<()> {
        let subnet_record = self.require_subnet(subnet)?;
        let already = self
            .route_tables
            .iter()
            .any(|t| t.associations.contains(subnet));
        if already {
            return Err(ProviderError::AlreadyExists {
                kind: ResourceKind::SubnetRouteTableAssociation,
                detail: format!("subnet {subnet} is already associated with a route table"),
            });
        }
        let mut table = self
            .route_tables
            .get_mut(route_table)
            .ok_or_else(|| not_found(ResourceKind::RouteTable, route_table))?;
        if table.vpc != subnet_record.vpc {
            return Err(ProviderError::InvalidParent {
                detail: format!(
                    "subnet {subnet} belongs to {} but route table {route_table} belongs to {}",
                    subnet_record.vpc, table.vpc
                ),
            });
        }
        table.associations.push(subnet.clone());
        Ok(())
    }

    /// Install a route into a VPC route table.
    ///
    /// A hub next hop requires a live attachment between the route table's
    /// VPC and that hub; submitting the route first is the ordering
    /// violation and is rejected with [`ProviderError::AttachmentNotReady`].
    pub fn create_route(
        &self,
        route_table: &RouteTableId,
        destination: &Cidr,
        target: RouteTargetRecord,
    ) -> ProviderResult<()> {
        validate_cidr(destination)?;
        let vpc = self
            .route_tables
            .get(route_table)
            .ok_or_else(|| not_found(ResourceKind::RouteTable, route_table))?
            .vpc
            .clone();

        match &target {
            RouteTargetRecord::TransitGateway(gateway) => {
                self.require_transit_gateway(gateway)?;
                let attached = self
                    .attachments
                    .iter()
                    .any(|a| a.vpc == vpc && a.gateway == *gateway);
                if !attached {
                    return Err(ProviderError::AttachmentNotReady {
                        vpc: vpc.to_string(),
                        gateway: gateway.to_string(),
                    });
                }
            }
            RouteTargetRecord::NatGateway(nat) => {
                let record = self.require_nat_gateway(nat)?;
                let nat_vpc = self.require_subnet(&record.subnet)?.vpc;
                if nat_vpc != vpc {
                    return Err(ProviderError::InvalidParent {
                        detail: format!("nat gateway {nat} lives in {nat_vpc}, not {vpc}"),
                    });
                }
            }
            RouteTargetRecord::InternetGateway(igw) => {
                let record = self.require_internet_gateway(igw)?;
                if record.vpc.as_ref() != Some(&vpc) {
                    return Err(ProviderError::InvalidParent {
                        detail: format!("internet gateway {igw} is not attached to {vpc}"),
                    });
                }
            }
        }

        let mut table = self
            .route_tables
            .get_mut(route_table)
            .ok_or_else(|| not_found(ResourceKind::RouteTable, route_table))?;
        if table.routes.iter().any(|r| r.destination == *destination) {
            return Err(ProviderError::AlreadyExists {
                kind: ResourceKind::Route,
                detail: format!("route table {route_table} already routes {destination}"),
            });
        }
        table.routes.push(RouteRecord {
            destination: destination.clone(),
            target,
        });
        debug!(%route_table, %destination, "installed route");
        Ok(())
    }

    /// Attach a VPC's subnets to a hub.
    pub fn create_transit_gateway_attachment(
        &self,
        gateway: &TransitGatewayId,
        vpc: &VpcId,
        subnets: &[SubnetId],
        tags: TagSet,
    ) -> ProviderResult<AttachmentId> {
        self.require_transit_gateway(gateway)?;
        self.require_vpc(vpc)?;
        for subnet in subnets {
            let record = self.require_subnet(subnet)?;
            if record.vpc != *vpc {
                return Err(ProviderError::InvalidParent {
                    detail: format!("subnet {subnet} belongs to {}, not {vpc}", record.vpc),
                });
            }
        }
        let duplicate = self
            .attachments
            .iter()
            .any(|a| a.vpc == *vpc && a.gateway == *gateway);
        if duplicate {
            return Err(ProviderError::AlreadyExists {
                kind: ResourceKind::TransitGatewayAttachment,
                detail: format!("{vpc} is already attached to {gateway}"),
            });
        }
        let id = AttachmentId::generate();
        self.attachments.insert(
            id.clone(),
            AttachmentRecord {
                id: id.clone(),
                gateway: gateway.clone(),
                vpc: vpc.clone(),
                subnets: subnets.to_vec(),
                tags,
            },
        );
        debug!(%id, %gateway, %vpc, subnets = subnets.len(), "created transit gateway attachment");
        Ok(id)
    }

    /// Associate an attachment with a non-default hub route table.
    ///
    /// An attachment joins at most one hub route table.
    pub fn associate_transit_route_table(
        &self,
        route_table: &TransitRouteTableId,
        attachment: &AttachmentId,
    ) -> ProviderResult<()> {
        let attachment_record = self.require_attachment(attachment)?;
        let already = self
            .transit_route_tables
            .iter()
            .any(|t| t.associations.contains(attachment));
        if already {
            return Err(ProviderError::AlreadyExists {
                kind: ResourceKind::TransitGatewayRouteTableAssociation,
                detail: format!("attachment {attachment} is already associated"),
            });
        }
        let mut table = self
            .transit_route_tables
            .get_mut(route_table)
            .ok_or_else(|| not_found(ResourceKind::TransitGatewayRouteTable, route_table))?;
        if table.gateway != attachment_record.gateway {
            return Err(ProviderError::InvalidParent {
                detail: format!(
                    "attachment {attachment} belongs to {}, route table {route_table} to {}",
                    attachment_record.gateway, table.gateway
                ),
            });
        }
        table.associations.push(attachment.clone());
        Ok(())
    }

    /// Install a route into a hub route table, pointed at an attachment.
    pub fn create_transit_gateway_route(
        &self,
        route_table: &TransitRouteTableId,
        destination: &Cidr,
        attachment: &AttachmentId,
    ) -> ProviderResult<()> {
        validate_cidr(destination)?;
        let attachment_record = self.require_attachment(attachment)?;
        let mut table = self
            .transit_route_tables
            .get_mut(route_table)
            .ok_or_else(|| not_found(ResourceKind::TransitGatewayRouteTable, route_table))?;
        if table.gateway != attachment_record.gateway {
            return Err(ProviderError::InvalidParent {
                detail: format!(
                    "attachment {attachment} and route table {route_table} belong to \
                     different hubs"
                ),
            });
        }
        if table.routes.iter().any(|(d, _)| d == destination) {
            return Err(ProviderError::AlreadyExists {
                kind: ResourceKind::TransitGatewayRoute,
                detail: format!("hub route table {route_table} already routes {destination}"),
            });
        }
        table.routes.push((destination.clone(), attachment.clone()));
        Ok(())
    }

    /// Provision an internet gateway (unattached).
    pub fn create_internet_gateway(&self, tags: TagSet) -> ProviderResult<InternetGatewayId> {
        let id = InternetGatewayId::generate();
        self.internet_gateways.insert(
            id.clone(),
            InternetGatewayRecord {
                id: id.clone(),
                vpc: None,
                tags,
            },
        );
        Ok(id)
    }

    /// Bind an internet gateway to a VPC.
    pub fn attach_internet_gateway(
        &self,
        internet_gateway: &InternetGatewayId,
        vpc: &VpcId,
    ) -> ProviderResult<()> {
        self.require_vpc(vpc)?;
        let mut record = self
            .internet_gateways
            .get_mut(internet_gateway)
            .ok_or_else(|| not_found(ResourceKind::InternetGateway, internet_gateway))?;
        if let Some(existing) = &record.vpc {
            return Err(ProviderError::AlreadyExists {
                kind: ResourceKind::VpcGatewayAttachment,
                detail: format!("internet gateway {internet_gateway} is attached to {existing}"),
            });
        }
        record.vpc = Some(vpc.clone());
        Ok(())
    }

    /// Allocate a public address.
    pub fn allocate_address(&self, tags: TagSet) -> ProviderResult<AllocationId> {
        let id = AllocationId::generate();
        self.eips
            .insert(id.clone(), EipRecord { id: id.clone(), tags });
        Ok(id)
    }

    /// Provision a NAT gateway in a subnet.
    pub fn create_nat_gateway(
        &self,
        subnet: &SubnetId,
        allocation: &AllocationId,
        tags: TagSet,
    ) -> ProviderResult<NatGatewayId> {
        self.require_subnet(subnet)?;
        if !self.eips.contains_key(allocation) {
            return Err(not_found(ResourceKind::Eip, allocation));
        }
        let in_use = self.nat_gateways.iter().any(|n| n.allocation == *allocation);
        if in_use {
            return Err(ProviderError::AlreadyExists {
                kind: ResourceKind::NatGateway,
                detail: format!("allocation {allocation} is already bound to a NAT gateway"),
            });
        }
        let id = NatGatewayId::generate();
        self.nat_gateways.insert(
            id.clone(),
            NatGatewayRecord {
                id: id.clone(),
                subnet: subnet.clone(),
                allocation: allocation.clone(),
                tags,
                created_at: Utc::now(),
            },
        );
        debug!(%id, %subnet, "created nat gateway");
        Ok(id)
    }

    fn require_transit_gateway(
        &self,
        id: &TransitGatewayId,
    ) -> ProviderResult<TransitGatewayRecord> {
        self.transit_gateways
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| not_found(ResourceKind::TransitGateway, id))
    }

    fn require_vpc(&self, id: &VpcId) -> ProviderResult<VpcRecord> {
        self.vpcs
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| not_found(ResourceKind::Vpc, id))
    }

    fn require_subnet(&self, id: &SubnetId) -> ProviderResult<SubnetRecord> {
        self.subnets
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| not_found(ResourceKind::Subnet, id))
    }

    fn require_attachment(&self, id: &AttachmentId) -> ProviderResult<AttachmentRecord> {
        self.attachments
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| not_found(ResourceKind::TransitGatewayAttachment, id))
    }

    fn require_nat_gateway(&self, id: &NatGatewayId) -> ProviderResult<NatGatewayRecord> {
        self.nat_gateways
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| not_found(ResourceKind::NatGateway, id))
    }

    fn require_internet_gateway(
        &self,
        id: &InternetGatewayId,
    ) -> ProviderResult<InternetGatewayRecord> {
        self.internet_gateways
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| not_found(ResourceKind::InternetGateway, id))
    }

    /// Look up a hub record.
    #[must_use]
    pub fn transit_gateway(&self, id: &TransitGatewayId) -> Option<TransitGatewayRecord> {
        self.transit_gateways.get(id).map(|r| r.clone())
    }

    /// Look up a hub route table record.
    #[must_use]
    pub fn transit_route_table(&self, id: &TransitRouteTableId) -> Option<TransitRouteTableRecord> {
        self.transit_route_tables.get(id).map(|r| r.clone())
    }

    /// Look up a VPC record.
    #[must_use]
    pub fn vpc(&self, id: &VpcId) -> Option<VpcRecord> {
        self.vpcs.get(id).map(|r| r.clone())
    }

    /// Look up a subnet record.
    #[must_use]
    pub fn subnet(&self, id: &SubnetId) -> Option<SubnetRecord> {
        self.subnets.get(id).map(|r| r.clone())
    }

    /// Look up a route table record.
    #[must_use]
    pub fn route_table(&self, id: &RouteTableId) -> Option<RouteTableRecord> {
        self.route_tables.get(id).map(|r| r.clone())
    }

    /// Look up an attachment record.
    #[must_use]
    pub fn attachment(&self, id: &AttachmentId) -> Option<AttachmentRecord> {
        self.attachments.get(id).map(|r| r.clone())
    }

    /// Look up a NAT gateway record.
    #[must_use]
    pub fn nat_gateway(&self, id: &NatGatewayId) -> Option<NatGatewayRecord> {
        self.nat_gateways.get(id).map(|r| r.clone())
    }

    /// Find a subnet by its CIDR block.
    #[must_use]
    pub fn find_subnet_by_cidr(&self, cidr: &Cidr) -> Option<SubnetRecord> {
        self.subnets
            .iter()
            .find(|s| s.cidr == *cidr)
            .map(|s| s.clone())
    }

    /// Number of provisioned subnets.
    #[must_use]
    pub fn subnet_count(&self) -> usize {
        self.subnets.len()
    }

    /// Number of provisioned NAT gateways.
    #[must_use]
    pub fn nat_gateway_count(&self) -> usize {
        self.nat_gateways.len()
    }

    /// Number of provisioned VPCs.
    #[must_use]
    pub fn vpc_count(&self) -> usize {
        self.vpcs.len()
    }

    /// Delete a resource by kind and journaled physical id.
    ///
    /// Sub-resources journaled with composite ids (`parent|detail`) are
    /// removed from their parent record.
    pub fn delete(&self, kind: ResourceKind, physical: &str) -> ProviderResult<()> {
        let missing = || ProviderError::NotFound {
            kind,
            id: physical.to_owned(),
        };
        let split = || physical.split_once('|').ok_or_else(missing);
        match kind {
            ResourceKind::TransitGateway => {
                let id = TransitGatewayId::parse(physical).map_err(|_| missing())?;
                self.transit_gateways.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::TransitGatewayRouteTable => {
                let id = TransitRouteTableId::parse(physical).map_err(|_| missing())?;
                self.transit_route_tables.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::Vpc => {
                let id = VpcId::parse(physical).map_err(|_| missing())?;
                self.vpcs.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::FlowLog => {
                let id = FlowLogId::parse(physical).map_err(|_| missing())?;
                self.flow_logs.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::Subnet => {
                let id = SubnetId::parse(physical).map_err(|_| missing())?;
                self.subnets.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::RouteTable => {
                let id = RouteTableId::parse(physical).map_err(|_| missing())?;
                self.route_tables.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::SubnetRouteTableAssociation => {
                let (table, subnet) = split()?;
                let table = RouteTableId::parse(table).map_err(|_| missing())?;
                let subnet = SubnetId::parse(subnet).map_err(|_| missing())?;
                let mut record = self.route_tables.get_mut(&table).ok_or_else(missing)?;
                record.associations.retain(|s| *s != subnet);
            }
            ResourceKind::Route => {
                let (table, destination) = split()?;
                let table = RouteTableId::parse(table).map_err(|_| missing())?;
                let destination = Cidr::new(destination);
                let mut record = self.route_tables.get_mut(&table).ok_or_else(missing)?;
                record.routes.retain(|r| r.destination != destination);
            }
            ResourceKind::TransitGatewayAttachment => {
                let id = AttachmentId::parse(physical).map_err(|_| missing())?;
                self.attachments.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::TransitGatewayRouteTableAssociation => {
                let (table, attachment) = split()?;
                let table = TransitRouteTableId::parse(table).map_err(|_| missing())?;
                let attachment = AttachmentId::parse(attachment).map_err(|_| missing())?;
                let mut record = self
                    .transit_route_tables
                    .get_mut(&table)
                    .ok_or_else(missing)?;
                record.associations.retain(|a| *a != attachment);
            }
            ResourceKind::TransitGatewayRoute => {
                let (table, destination) = split()?;
                let table = TransitRouteTableId::parse(table).map_err(|_| missing())?;
                let destination = Cidr::new(destination);
                let mut record = self
                    .transit_route_tables
                    .get_mut(&table)
                    .ok_or_else(missing)?;
                record.routes.retain(|(d, _)| *d != destination);
            }
            ResourceKind::InternetGateway => {
                let id = InternetGatewayId::parse(physical).map_err(|_| missing())?;
                self.internet_gateways.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::VpcGatewayAttachment => {
                let (igw, _vpc) = split()?;
                let igw = InternetGatewayId::parse(igw).map_err(|_| missing())?;
                let mut record = self.internet_gateways.get_mut(&igw).ok_or_else(missing)?;
                record.vpc = None;
            }
            ResourceKind::Eip => {
                let id = AllocationId::parse(physical).map_err(|_| missing())?;
                self.eips.remove(&id).ok_or_else(missing)?;
            }
            ResourceKind::NatGateway => {
                let id = NatGatewayId::parse(physical).map_err(|_| missing())?;
                self.nat_gateways.remove(&id).ok_or_else(missing)?;
            }
            // Parameters live in the store, not the control plane.
            ResourceKind::Parameter => {}
        }
        debug!(%kind, physical, "deleted resource");
        Ok(())
    }
}
