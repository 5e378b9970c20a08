//! Stack synthesis, planning, and apply engine.
//!
//! The engine turns declared resource graphs into provisioned state in three
//! layers:
//!
//! - [`Stack`] holds one deployment's resource declarations and derives a
//!   [`DependencyGraph`] from typed references plus explicit `depends_on`
//!   edges.
//! - [`Planner`] orders whole stacks across deployments by modeling
//!   parameter publishes and resolves as producer/consumer edges, refusing
//!   to schedule a consumer whose producer is neither planned nor already
//!   published.
//! - [`Deployer`] applies a synthesized stack against the in-process
//!   [`CloudProvider`] in topological order, journaling logical-to-physical
//!   bindings so re-applies are idempotent and destroys run in reverse
//!   creation order.

mod deploy;
mod error;
mod graph;
mod planner;
mod provider;
mod stack;

pub use deploy::{ApplyReport, Deployer};
pub use error::{EngineError, EngineResult, PlanError, ProviderError, ProviderResult};
pub use graph::DependencyGraph;
pub use planner::Planner;
pub use provider::{
    AttachmentRecord, CloudProvider, EipRecord, FlowLogRecord, InternetGatewayRecord,
    NatGatewayRecord, RouteRecord, RouteTableRecord, RouteTargetRecord, SubnetRecord,
    TransitGatewayRecord, TransitRouteTableRecord, VpcRecord,
};
pub use stack::{ResourceDecl, Stack, StackDefinition, SynthContext};
