//! Full deploy / re-deploy / destroy lifecycle tests.

#[cfg(test)]
mod tests {
    use netstack_params::ParameterPath;
    use netstack_stacks::NatStrategy;

    use crate::{deploy_full, deployment_id, full_planner};

    #[test]
    fn test_should_converge_on_redeploy() {
        let deployer = deploy_full(NatStrategy::Single);
        let subnets = deployer.provider().subnet_count();

        let reports = full_planner(NatStrategy::Single)
            .deploy_all(&deployer)
            .expect("second deployment");

        for report in &reports {
            assert!(
                report.created.is_empty(),
                "{} created resources on redeploy",
                report.stack
            );
        }
        assert_eq!(deployer.provider().subnet_count(), subnets);
        assert_eq!(deployer.provider().nat_gateway_count(), 1);
    }

    #[test]
    fn test_should_tear_down_in_reverse_order() {
        let deployer = deploy_full(NatStrategy::Single);

        // Consumers first, producer last.
        deployer.destroy("edge-vpc").expect("destroy edge");
        deployer.destroy("core-vpc").expect("destroy core");
        deployer.destroy("core-network").expect("destroy hub");

        assert_eq!(deployer.provider().vpc_count(), 0);
        assert_eq!(deployer.provider().subnet_count(), 0);
        assert_eq!(deployer.provider().nat_gateway_count(), 0);

        // Published identifiers are retracted with their stack.
        let id = deployment_id();
        assert!(!deployer.params().contains(&ParameterPath::core_router_id(&id)));
        assert!(
            !deployer
                .params()
                .contains(&ParameterPath::edge_route_table_id(&id))
        );
    }

    #[test]
    fn test_should_redeploy_after_destroy() {
        let deployer = deploy_full(NatStrategy::Single);
        deployer.destroy("edge-vpc").expect("destroy edge");

        let reports = full_planner(NatStrategy::Single)
            .deploy_all(&deployer)
            .expect("redeploy");

        let edge = reports
            .iter()
            .find(|r| r.stack == "edge-vpc")
            .expect("edge report");
        assert!(!edge.created.is_empty());
        assert_eq!(deployer.provider().vpc_count(), 2);
    }
}
