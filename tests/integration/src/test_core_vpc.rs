//! Core VPC deployment tests.

#[cfg(test)]
mod tests {
    use netstack_core::Cidr;
    use netstack_engine::RouteTargetRecord;
    use netstack_model::{
        AttachmentId, LogicalId, PhysicalId, RouteTableId, TransitGatewayId, VpcId,
    };
    use netstack_params::ParameterPath;
    use netstack_stacks::NatStrategy;

    use crate::{deploy_full, deployment_id};

    fn output_id<T: PhysicalId>(
        deployer: &netstack_engine::Deployer,
        stack: &str,
        logical: &str,
    ) -> T {
        let raw = deployer
            .output(stack, &LogicalId::new(logical))
            .unwrap_or_else(|| panic!("{stack}/{logical} has no output"));
        T::parse(raw).unwrap_or_else(|_| panic!("{stack}/{logical} has a malformed id"))
    }

    #[test]
    fn test_should_provision_one_subnet_per_zone() {
        let deployer = deploy_full(NatStrategy::Single);
        let vpc: VpcId = output_id(&deployer, "core-vpc", "vpc");

        let record = deployer.provider().vpc(&vpc).expect("vpc record");
        assert_eq!(record.cidr, Cidr::new("10.0.0.0/22"));
        assert_eq!(record.tags.get("Name"), Some("core/vpc"));

        for (n, (az, cidr)) in [
            ("us-east-1a", "10.0.0.0/24"),
            ("us-east-1b", "10.0.1.0/24"),
            ("us-east-1c", "10.0.2.0/24"),
        ]
        .iter()
        .enumerate()
        {
            let subnet = deployer
                .provider()
                .find_subnet_by_cidr(&Cidr::new(*cidr))
                .unwrap_or_else(|| panic!("subnet for {cidr}"));
            assert_eq!(subnet.vpc, vpc);
            assert_eq!(subnet.availability_zone.as_str(), *az);
            assert!(!subnet.map_public_ip_on_launch);
            assert_eq!(
                subnet.tags.get("Name"),
                Some(format!("core{:02}", n + 1).as_str())
            );
        }
    }

    #[test]
    fn test_should_attach_every_subnet_to_hub() {
        let deployer = deploy_full(NatStrategy::Single);
        let attachment: AttachmentId = output_id(&deployer, "core-vpc", "coreToTgw");
        let vpc: VpcId = output_id(&deployer, "core-vpc", "vpc");

        let record = deployer
            .provider()
            .attachment(&attachment)
            .expect("attachment record");
        assert_eq!(record.vpc, vpc);
        assert_eq!(record.subnets.len(), 3);

        let hub_raw = deployer
            .params()
            .resolve(&ParameterPath::core_router_id(&deployment_id()))
            .expect("hub parameter");
        assert_eq!(record.gateway, TransitGatewayId::parse(hub_raw).unwrap());
    }

    #[test]
    fn test_should_route_all_traffic_toward_hub() {
        let deployer = deploy_full(NatStrategy::Single);
        let rt: RouteTableId = output_id(&deployer, "core-vpc", "coreRouteTable");

        let record = deployer.provider().route_table(&rt).expect("route table");
        assert_eq!(record.tags.get("Name"), Some("gatewayConnected"));
        assert_eq!(record.associations.len(), 3);

        assert_eq!(record.routes.len(), 1);
        let route = &record.routes[0];
        assert_eq!(route.destination, Cidr::any());
        assert!(matches!(
            route.target,
            RouteTargetRecord::TransitGateway(_)
        ));
    }
}
