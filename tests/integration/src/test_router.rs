//! Hub router deployment tests.

#[cfg(test)]
mod tests {
    use netstack_model::{LogicalId, PhysicalId, TransitGatewayId, TransitRouteTableId};
    use netstack_params::ParameterPath;

    use crate::{deployer, deployment_id, router_stack};

    #[test]
    fn test_should_publish_hub_identifiers() {
        let deployer = deployer();
        let report = deployer.apply_definition(&router_stack()).expect("apply");
        assert_eq!(report.stack, "core-network");

        let id = deployment_id();
        let hub_raw = deployer
            .params()
            .resolve(&ParameterPath::core_router_id(&id))
            .expect("hub parameter");
        let rt_raw = deployer
            .params()
            .resolve(&ParameterPath::edge_route_table_id(&id))
            .expect("route table parameter");

        let hub = TransitGatewayId::parse(hub_raw).expect("well-formed hub id");
        let rt = TransitRouteTableId::parse(rt_raw).expect("well-formed route table id");

        let record = deployer.provider().transit_gateway(&hub).expect("hub record");
        assert_eq!(record.amazon_side_asn, 65500);
        assert_eq!(record.tags.get("Name"), Some("coreRouter"));
        assert_eq!(record.tags.get("Network"), Some("core"));
        assert_eq!(record.tags.get("DeploymentId"), Some("test"));

        let rt_record = deployer
            .provider()
            .transit_route_table(&rt)
            .expect("route table record");
        assert_eq!(rt_record.gateway, hub);
    }

    #[test]
    fn test_should_reapply_without_changes() {
        let deployer = deployer();
        let stack = router_stack();
        deployer.apply_definition(&stack).expect("first apply");

        let id = deployment_id();
        let path = ParameterPath::core_router_id(&id);
        let before = deployer.params().get(&path).expect("parameter");
        let hub_before = deployer.output("core-network", &LogicalId::new("tgw"));

        let report = deployer.apply_definition(&stack).expect("second apply");
        assert!(report.created.is_empty());
        assert_eq!(report.unchanged, 4);

        // Physical id and parameter version survive the re-apply.
        assert_eq!(
            deployer.output("core-network", &LogicalId::new("tgw")),
            hub_before
        );
        let after = deployer.params().get(&path).expect("parameter");
        assert_eq!(after.version, before.version);
        assert_eq!(after.value, before.value);
    }
}
