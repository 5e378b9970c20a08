//! Router stack: the regional hub and its published identifiers.

use tracing::debug;

use netstack_core::{Cidr, DeploymentId, TagSet};
use netstack_engine::{EngineResult, Stack, StackDefinition, SynthContext};
use netstack_model::{ParameterSpec, TransitGatewayRouteTableSpec, TransitGatewaySpec, Value};
use netstack_params::ParameterPath;

/// Construction parameters for the router stack.
#[derive(Debug, Clone)]
pub struct RouterProps {
    /// Deployment namespace.
    pub deployment_id: DeploymentId,
    /// Regional autonomous system number.
    pub region_asn: u32,
    /// Address space of the whole region.
    pub region_cidr: Cidr,
}

/// Provisions the regional routing hub and a secondary route table for edge
/// egress, and publishes both identifiers for dependent stacks.
#[derive(Debug)]
pub struct RouterStack {
    props: RouterProps,
}

impl RouterStack {
    /// Stack name.
    pub const NAME: &str = "core-network";

    /// Create the stack definition.
    #[must_use]
    pub fn new(props: RouterProps) -> Self {
        Self { props }
    }
}

impl StackDefinition for RouterStack {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn writes(&self) -> Vec<ParameterPath> {
        vec![
            ParameterPath::core_router_id(&self.props.deployment_id),
            ParameterPath::edge_route_table_id(&self.props.deployment_id),
        ]
    }

    fn synth(&self, _ctx: &SynthContext<'_>) -> EngineResult<Stack> {
        let props = &self.props;
        let mut stack = Stack::new(Self::NAME);

        let tgw = stack.add(
            "tgw",
            TransitGatewaySpec::new(props.region_asn).with_tags(
                TagSet::new()
                    .with("Name", "coreRouter")
                    .with("Network", "core")
                    .with("DeploymentId", props.deployment_id.as_str())
                    .with("asn", props.region_asn.to_string())
                    .with("cidr", props.region_cidr.as_str()),
            ),
        )?;

        stack.add(
            "tgwParam",
            ParameterSpec {
                path: ParameterPath::core_router_id(&props.deployment_id),
                value: Value::from(&tgw),
            },
        )?;

        let edge_route_table = stack.add(
            "edgeRouteTable",
            TransitGatewayRouteTableSpec {
                gateway: Value::from(&tgw),
                tags: TagSet::new()
                    .with("Name", "edge-TGW-RouteTable")
                    .with("Network", "edge"),
            },
        )?;

        stack.add(
            "edgeRtParam",
            ParameterSpec {
                path: ParameterPath::edge_route_table_id(&props.deployment_id),
                value: Value::from(&edge_route_table),
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

    fn definition() -> RouterStack {
        RouterStack::new(RouterProps {
            deployment_id: DeploymentId::new("test").unwrap(),
            region_asn: 65500,
            region_cidr: Cidr::new("10.0.0.0/16"),
        })
    }

    fn synth(def: &RouterStack) -> Stack {
        let store = ParameterStore::new();
        let ctx = SynthContext::new(&store, AwsRegion::default());
        def.synth(&ctx).unwrap()
    }

    #[test]
    fn test_should_declare_both_published_parameters() {
        let def = definition();
        let d = DeploymentId::new("test").unwrap();
        assert_eq!(
            def.writes(),
            vec![
                ParameterPath::core_router_id(&d),
                ParameterPath::edge_route_table_id(&d),
            ]
        );
        assert!(def.reads().is_empty());
    }

    #[test]
    fn test_should_tag_hub_with_asn_and_cidr() {
        let stack = synth(&definition());
        let decl = stack.get(&LogicalId::new("tgw")).unwrap();
        let ResourceSpec::TransitGateway(spec) = &decl.spec else {
            panic!("tgw is not a transit gateway");
        };
        assert_eq!(spec.amazon_side_asn, 65500);
        assert_eq!(spec.tags.get("asn"), Some("65500"));
        assert_eq!(spec.tags.get("cidr"), Some("10.0.0.0/16"));
        assert_eq!(spec.tags.get("DeploymentId"), Some("test"));
    }

    #[test]
    fn test_should_order_parameters_after_their_producers() {
        let stack = synth(&definition());
        let graph = stack.dependency_graph().unwrap();
        assert!(graph.depends_on(&LogicalId::new("tgwParam"), &LogicalId::new("tgw")));
        assert!(graph.depends_on(
            &LogicalId::new("edgeRtParam"),
            &LogicalId::new("edgeRouteTable")
        ));
        assert!(graph.depends_on(&LogicalId::new("edgeRouteTable"), &LogicalId::new("tgw")));
    }
}
