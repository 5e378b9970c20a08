//! Typed resource identifiers and the declaration model for NetStack.
//!
//! Stacks declare resources as plain-data [`ResourceSpec`] values wired
//! together with [`Value`] references. A reference is either a `Literal`
//! physical identifier (resolved externally, e.g. from the parameter store)
//! or a `Ref` to another resource in the same stack; every `Ref` contributes
//! a dependency edge to the stack's graph, so completion ordering is carried
//! by the types rather than by manually remembered `depends_on` lists.

mod ids;
mod resource;
mod value;

pub use ids::{
    AllocationId, AttachmentId, FlowLogId, InternetGatewayId, InvalidResourceId, NatGatewayId,
    PhysicalId, RouteTableId, SubnetId, TransitGatewayId, TransitRouteTableId, VpcId,
};
pub use resource::{
    EipSpec, FlowLogDestination, FlowLogSpec, InternetGatewaySpec, NatGatewaySpec, ParameterSpec,
    ResourceKind, ResourceSpec, RouteSpec, RouteTableSpec, RouteTarget, SubnetRouteTableAssociationSpec,
    SubnetSpec, TransitGatewayAttachmentSpec, TransitGatewayRouteSpec,
    TransitGatewayRouteTableAssociationSpec, TransitGatewayRouteTableSpec, TransitGatewaySpec,
    VpcGatewayAttachmentSpec, VpcSpec,
};
pub use value::{LogicalId, Value};
