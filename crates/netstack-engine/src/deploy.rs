//! Stack apply and destroy.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use netstack_model::{LogicalId, PhysicalId, ResourceKind, ResourceSpec, RouteTarget, Value};
use netstack_params::{ParameterPath, ParameterStore};

use crate::error::{EngineError, EngineResult};
use crate::provider::{CloudProvider, RouteTargetRecord};
use crate::stack::{Stack, StackDefinition, SynthContext};

/// One logical-to-physical binding created by an apply.
#[derive(Debug, Clone)]
struct JournalEntry {
    logical: LogicalId,
    kind: ResourceKind,
    physical: String,
}

/// Per-stack applied state: outputs plus the creation-order journal.
#[derive(Debug, Default)]
struct StackState {
    outputs: HashMap<LogicalId, String>,
    journal: Vec<JournalEntry>,
}

/// Result of applying one stack.
#[derive(Debug)]
pub struct ApplyReport {
    /// Stack name.
    pub stack: String,
    /// Token identifying this apply run in logs.
    pub run_id: Uuid,
    /// Resources created by this run, in creation order.
    pub created: Vec<(LogicalId, String)>,
    /// Resources skipped because a previous apply already created them.
    pub unchanged: usize,
}

/// Applies synthesized stacks against the control plane.
///
/// The deployer journals every logical-to-physical binding per stack, so a
/// repeated apply of an unchanged stack creates nothing and keeps every
/// physical id stable, and a destroy replays the journal in reverse.
#[derive(Debug)]
pub struct Deployer {
    provider: Arc<CloudProvider>,
    params: Arc<ParameterStore>,
    stacks: DashMap<String, StackState>,
}

impl Deployer {
    /// Create a deployer over a control plane and parameter store.
    #[must_use]
    pub fn new(provider: Arc<CloudProvider>, params: Arc<ParameterStore>) -> Self {
        Self {
            provider,
            params,
            stacks: DashMap::new(),
        }
    }

    /// The control plane this deployer applies against.
    #[must_use]
    pub fn provider(&self) -> &CloudProvider {
        &self.provider
    }

    /// The shared parameter store.
    #[must_use]
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Build a synthesis context over this deployer's parameter store.
    #[must_use]
    pub fn synth_context(&self) -> SynthContext<'_> {
        SynthContext::new(&self.params, self.provider.region().clone())
    }

    /// Physical id bound to a logical id in an applied stack.
    #[must_use]
    pub fn output(&self, stack: &str, logical: &LogicalId) -> Option<String> {
        self.stacks
            .get(stack)
            .and_then(|s| s.outputs.get(logical).cloned())
    }

    /// Synthesize a definition and apply the result.
    pub fn apply_definition(&self, definition: &dyn StackDefinition) -> EngineResult<ApplyReport> {
        let stack = definition.synth(&self.synth_context())?;
        self.apply(&stack)
    }

    /// Apply a synthesized stack in dependency order.
    ///
    /// Resources already journaled from a previous apply are skipped; their
    /// physical ids stay stable. On failure the journal keeps everything
    /// created so far, so a later apply resumes where this one stopped.
    pub fn apply(&self, stack: &Stack) -> EngineResult<ApplyReport> {
        let run_id = Uuid::new_v4();
        let order = stack.dependency_graph()?.topo_order()?;
        info!(stack = stack.name(), %run_id, resources = order.len(), "applying stack");

        let mut state = self.stacks.entry(stack.name().to_owned()).or_default();
        let mut created = Vec::new();
        let mut unchanged = 0usize;

        for logical in order {
            let decl = stack
                .get(&logical)
                .ok_or_else(|| anyhow!("resource {logical} missing from stack"))?;
            if state.outputs.contains_key(&logical) {
                unchanged += 1;
                continue;
            }

            let kind = decl.spec.kind();
            let physical = self.create(&state.outputs, &decl.spec)?;
            info!(
                stack = stack.name(),
                %run_id,
                resource = %logical,
                %kind,
                physical = physical.as_str(),
                "created resource"
            );
            state.journal.push(JournalEntry {
                logical: logical.clone(),
                kind,
                physical: physical.clone(),
            });
            state.outputs.insert(logical.clone(), physical.clone());
            created.push((logical, physical));
        }

        Ok(ApplyReport {
            stack: stack.name().to_owned(),
            run_id,
            created,
            unchanged,
        })
    }

    /// Destroy an applied stack: delete every journaled resource in reverse
    /// creation order and drop the stack's state.
    pub fn destroy(&self, stack: &str) -> EngineResult<()> {
        let (_, state) = self
            .stacks
            .remove(stack)
            .ok_or_else(|| EngineError::UnknownStack(stack.to_owned()))?;

        for entry in state.journal.iter().rev() {
            if entry.kind == ResourceKind::Parameter {
                let path = ParameterPath::parse(entry.physical.as_str())?;
                self.params.remove(&path);
            } else {
                self.provider.delete(entry.kind, &entry.physical)?;
            }
            info!(
                stack,
                resource = %entry.logical,
                kind = %entry.kind,
                "deleted resource"
            );
        }
        Ok(())
    }

    /// Resolve a typed value slot against the stack's outputs so far.
    fn resolve_id<T: PhysicalId>(
        outputs: &HashMap<LogicalId, String>,
        value: &Value<T>,
    ) -> EngineResult<T> {
        match value {
            Value::Literal(id) => Ok(id.clone()),
            Value::Ref(logical) => {
                let raw = outputs
                    .get(logical)
                    .ok_or_else(|| anyhow!("reference {logical} applied out of order"))?;
                Ok(T::parse(raw.clone())?)
            }
        }
    }

    /// Resolve an untyped (string) value slot.
    fn resolve_raw(
        outputs: &HashMap<LogicalId, String>,
        value: &Value<String>,
    ) -> EngineResult<String> {
        match value {
            Value::Literal(s) => Ok(s.clone()),
            Value::Ref(logical) => outputs
                .get(logical)
                .cloned()
                .ok_or_else(|| anyhow!("reference {logical} applied out of order").into()),
        }
    }

    /// Create one resource through the control plane, returning the
    /// journaled physical id. Sub-resources without provider-side ids get
    /// composite `parent|detail` ids.
    fn create(
        &self,
        outputs: &HashMap<LogicalId, String>,
        spec: &ResourceSpec,
    ) -> EngineResult<String> {
        let physical = match spec {
            ResourceSpec::TransitGateway(s) => {
                self.provider.create_transit_gateway(s)?.to_string()
            }
            ResourceSpec::TransitGatewayRouteTable(s) => {
                let gateway = Self::resolve_id(outputs, &s.gateway)?;
                self.provider
                    .create_transit_route_table(&gateway, s.tags.clone())?
                    .to_string()
            }
            ResourceSpec::Parameter(s) => {
                let value = Self::resolve_raw(outputs, &s.value)?;
                self.params.publish(s.path.clone(), value);
                s.path.to_string()
            }
            ResourceSpec::Vpc(s) => self.provider.create_vpc(&s.cidr, s.tags.clone())?.to_string(),
            ResourceSpec::FlowLog(s) => {
                let vpc = Self::resolve_id(outputs, &s.vpc)?;
                self.provider.create_flow_log(&vpc, s.destination)?.to_string()
            }
            ResourceSpec::Subnet(s) => {
                let vpc = Self::resolve_id(outputs, &s.vpc)?;
                self.provider
                    .create_subnet(
                        &vpc,
                        &s.availability_zone,
                        &s.cidr,
                        s.map_public_ip_on_launch,
                        s.tags.clone(),
                    )?
                    .to_string()
            }
            ResourceSpec::RouteTable(s) => {
                let vpc = Self::resolve_id(outputs, &s.vpc)?;
                self.provider.create_route_table(&vpc, s.tags.clone())?.to_string()
            }
            ResourceSpec::SubnetRouteTableAssociation(s) => {
                let route_table = Self::resolve_id(outputs, &s.route_table)?;
                let subnet = Self::resolve_id(outputs, &s.subnet)?;
                self.provider.associate_route_table(&route_table, &subnet)?;
                format!("{route_table}|{subnet}")
            }
            ResourceSpec::Route(s) => {
                let route_table = Self::resolve_id(outputs, &s.route_table)?;
                let target = match &s.target {
                    RouteTarget::TransitGateway { gateway, .. } => {
                        RouteTargetRecord::TransitGateway(Self::resolve_id(outputs, gateway)?)
                    }
                    RouteTarget::NatGateway(v) => {
                        RouteTargetRecord::NatGateway(Self::resolve_id(outputs, v)?)
                    }
                    RouteTarget::InternetGateway(v) => {
                        RouteTargetRecord::InternetGateway(Self::resolve_id(outputs, v)?)
                    }
                };
                self.provider.create_route(&route_table, &s.destination, target)?;
                format!("{route_table}|{}", s.destination)
            }
            ResourceSpec::TransitGatewayAttachment(s) => {
                let gateway = Self::resolve_id(outputs, &s.gateway)?;
                let vpc = Self::resolve_id(outputs, &s.vpc)?;
                let subnets = s
                    .subnets
                    .iter()
                    .map(|v| Self::resolve_id(outputs, v))
                    .collect::<EngineResult<Vec<_>>>()?;
                self.provider
                    .create_transit_gateway_attachment(&gateway, &vpc, &subnets, s.tags.clone())?
                    .to_string()
            }
            ResourceSpec::TransitGatewayRouteTableAssociation(s) => {
                let route_table = Self::resolve_id(outputs, &s.route_table)?;
                let attachment = Self::resolve_id(outputs, &s.attachment)?;
                self.provider
                    .associate_transit_route_table(&route_table, &attachment)?;
                format!("{route_table}|{attachment}")
            }
            ResourceSpec::TransitGatewayRoute(s) => {
                let route_table = Self::resolve_id(outputs, &s.route_table)?;
                let attachment = Self::resolve_id(outputs, &s.attachment)?;
                self.provider
                    .create_transit_gateway_route(&route_table, &s.destination, &attachment)?;
                format!("{route_table}|{}", s.destination)
            }
            ResourceSpec::InternetGateway(s) => {
                self.provider.create_internet_gateway(s.tags.clone())?.to_string()
            }
            ResourceSpec::VpcGatewayAttachment(s) => {
                let vpc = Self::resolve_id(outputs, &s.vpc)?;
                let internet_gateway = Self::resolve_id(outputs, &s.internet_gateway)?;
                self.provider.attach_internet_gateway(&internet_gateway, &vpc)?;
                format!("{internet_gateway}|{vpc}")
            }
            ResourceSpec::Eip(s) => self.provider.allocate_address(s.tags.clone())?.to_string(),
            ResourceSpec::NatGateway(s) => {
                let subnet = Self::resolve_id(outputs, &s.subnet)?;
                let allocation = Self::resolve_id(outputs, &s.allocation)?;
                self.provider
                    .create_nat_gateway(&subnet, &allocation, s.tags.clone())?
                    .to_string()
            }
        };
        Ok(physical)
    }
}
