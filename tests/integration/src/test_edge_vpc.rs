//! Edge VPC deployment tests.

#[cfg(test)]
mod tests {
    use netstack_core::Cidr;
    use netstack_engine::{Deployer, RouteTargetRecord};
    use netstack_model::{
        AttachmentId, LogicalId, NatGatewayId, PhysicalId, RouteTableId, TransitRouteTableId,
        VpcId,
    };
    use netstack_params::ParameterPath;
    use netstack_stacks::NatStrategy;

    use crate::{deploy_full, deployment_id};

    fn output_id<T: PhysicalId>(deployer: &Deployer, logical: &str) -> T {
        let raw = deployer
            .output("edge-vpc", &LogicalId::new(logical))
            .unwrap_or_else(|| panic!("edge-vpc/{logical} has no output"));
        T::parse(raw).unwrap_or_else(|_| panic!("edge-vpc/{logical} has a malformed id"))
    }

    #[test]
    fn test_should_attach_only_private_subnets_to_hub() {
        let deployer = deploy_full(NatStrategy::Single);
        let attachment: AttachmentId = output_id(&deployer, "edgeToTgw");

        let record = deployer
            .provider()
            .attachment(&attachment)
            .expect("attachment record");
        assert_eq!(record.subnets.len(), 2);
        for subnet in &record.subnets {
            let subnet = deployer.provider().subnet(subnet).expect("subnet record");
            assert!(!subnet.map_public_ip_on_launch);
        }
    }

    #[test]
    fn test_should_place_nat_gateway_in_first_private_subnet() {
        let deployer = deploy_full(NatStrategy::Single);
        assert_eq!(deployer.provider().nat_gateway_count(), 1);

        let ngw: NatGatewayId = output_id(&deployer, "ngw1");
        let record = deployer.provider().nat_gateway(&ngw).expect("nat record");

        let home = deployer
            .provider()
            .find_subnet_by_cidr(&Cidr::new("10.0.5.0/24"))
            .expect("first private subnet");
        assert_eq!(record.subnet, home.id);
    }

    #[test]
    fn test_should_provision_one_nat_gateway_per_zone() {
        let deployer = deploy_full(NatStrategy::PerAz);
        assert_eq!(deployer.provider().nat_gateway_count(), 2);

        for (logical, cidr) in [("ngw1", "10.0.5.0/24"), ("ngw2", "10.0.7.0/24")] {
            let ngw: NatGatewayId = output_id(&deployer, logical);
            let record = deployer.provider().nat_gateway(&ngw).expect("nat record");
            let home = deployer
                .provider()
                .find_subnet_by_cidr(&Cidr::new(cidr))
                .expect("private subnet");
            assert_eq!(record.subnet, home.id);
        }
    }

    #[test]
    fn test_should_split_routing_between_tiers() {
        let deployer = deploy_full(NatStrategy::Single);

        let pub_rt: RouteTableId = output_id(&deployer, "pubRt");
        let pub_record = deployer
            .provider()
            .route_table(&pub_rt)
            .expect("public route table");
        assert_eq!(pub_record.tags.get("Name"), Some("pubRoutes"));
        assert_eq!(pub_record.associations.len(), 2);

        // Public tier: default to the internet gateway, region block to the hub.
        let default = pub_record
            .routes
            .iter()
            .find(|r| r.destination == Cidr::any())
            .expect("public default route");
        assert!(matches!(
            default.target,
            RouteTargetRecord::InternetGateway(_)
        ));
        let region = pub_record
            .routes
            .iter()
            .find(|r| r.destination == Cidr::new("10.0.0.0/16"))
            .expect("region route");
        assert!(matches!(region.target, RouteTargetRecord::TransitGateway(_)));

        // Private tier: a single NAT default, nothing toward the internet gateway.
        let priv_rt: RouteTableId = output_id(&deployer, "privRt");
        let priv_record = deployer
            .provider()
            .route_table(&priv_rt)
            .expect("private route table");
        assert_eq!(priv_record.associations.len(), 2);
        assert_eq!(priv_record.routes.len(), 1);
        assert_eq!(priv_record.routes[0].destination, Cidr::any());
        assert!(matches!(
            priv_record.routes[0].target,
            RouteTargetRecord::NatGateway(_)
        ));
    }

    #[test]
    fn test_should_join_secondary_hub_route_table() {
        let deployer = deploy_full(NatStrategy::Single);
        let attachment: AttachmentId = output_id(&deployer, "edgeToTgw");

        let rt_raw = deployer
            .params()
            .resolve(&ParameterPath::edge_route_table_id(&deployment_id()))
            .expect("route table parameter");
        let rt = TransitRouteTableId::parse(rt_raw).expect("well-formed id");

        let record = deployer
            .provider()
            .transit_route_table(&rt)
            .expect("hub route table");
        assert_eq!(record.associations, vec![attachment.clone()]);
        assert_eq!(record.routes, vec![(Cidr::any(), attachment)]);
    }

    #[test]
    fn test_should_isolate_edge_and_core_address_spaces() {
        let deployer = deploy_full(NatStrategy::Single);
        assert_eq!(deployer.provider().vpc_count(), 2);

        let core: VpcId = {
            let raw = deployer
                .output("core-vpc", &LogicalId::new("vpc"))
                .expect("core vpc output");
            VpcId::parse(raw).expect("well-formed id")
        };
        let edge: VpcId = output_id(&deployer, "vpc");
        assert_ne!(core, edge);

        let edge_record = deployer.provider().vpc(&edge).expect("edge vpc record");
        assert_eq!(edge_record.cidr, Cidr::new("10.0.4.0/22"));
        assert_eq!(edge_record.tags.get("Network"), Some("edge"));
    }
}
