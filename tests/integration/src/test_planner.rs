//! Cross-stack ordering tests.

#[cfg(test)]
mod tests {
    use netstack_engine::{PlanError, Planner};
    use netstack_params::{ParameterPath, ParameterStore};
    use netstack_stacks::NatStrategy;

    use crate::{core_stack, deployment_id, edge_stack, full_planner, router_stack};

    #[test]
    fn test_should_order_producer_before_consumers() {
        let planner = full_planner(NatStrategy::Single);
        let order = planner.plan(&ParameterStore::new()).expect("plan");

        let names: Vec<&str> = order.iter().map(|s| s.name()).collect();
        let pos = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert_eq!(pos("core-network"), 0);
        assert!(pos("core-network") < pos("core-vpc"));
        assert!(pos("core-network") < pos("edge-vpc"));
    }

    #[test]
    fn test_should_refuse_consumer_without_producer() {
        let mut planner = Planner::new();
        planner.add(Box::new(edge_stack(NatStrategy::Single)));
        planner.add(Box::new(core_stack()));

        let err = planner.plan(&ParameterStore::new()).unwrap_err();
        assert!(matches!(err, PlanError::MissingProducer { .. }));
    }

    #[test]
    fn test_should_accept_reads_satisfied_by_the_store() {
        // A previous pipeline run already published the hub identifiers.
        let store = ParameterStore::new();
        let id = deployment_id();
        store.publish(ParameterPath::core_router_id(&id), "tgw-0123456789abcdef0");
        store.publish(
            ParameterPath::edge_route_table_id(&id),
            "tgw-rtb-0123456789abcdef0",
        );

        let mut planner = Planner::new();
        planner.add(Box::new(edge_stack(NatStrategy::Single)));
        planner.add(Box::new(core_stack()));

        let order = planner.plan(&store).expect("plan");
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn test_should_refuse_two_publishers_of_one_path() {
        let mut planner = Planner::new();
        planner.add(Box::new(router_stack()));
        planner.add(Box::new(router_stack()));

        let err = planner.plan(&ParameterStore::new()).unwrap_err();
        // Same stack twice trips either check first; both are rejections.
        assert!(matches!(
            err,
            PlanError::DuplicateStack(_) | PlanError::DuplicateWriter { .. }
        ));
    }
}
