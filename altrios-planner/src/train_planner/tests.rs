use super::*;
use crate::testing::*;
use polars::prelude::*;
use std::collections::HashMap;

fn demand_table() -> DataFrame {
    barstow_stockton_demand().to_dataframe().unwrap()
}

#[test]
fn test_run_train_planner() {
    let config = PlannerConfig::default();
    let outputs = run_train_planner(
        &demand_table(),
        &rail_vehicles_fixture(),
        &car_types_fixture(),
        &refueler_info_fixture(),
        &[],
        &config,
    )
    .unwrap();
    assert_eq!(outputs.nodes.len(), 3);
    assert!(outputs
        .plan
        .demand_returns
        .contains(&DemandRecord::new("Stockton", "Barstow", TrainType::UnitEmpty, 2394, 0)));
    assert!(outputs
        .plan
        .demand_returns
        .contains(&DemandRecord::new("Stockton", "Barstow", TrainType::ManifestEmpty, 1552, 0)));
    assert!(!outputs.plan.demand_trains.is_empty());
    assert!(!outputs.fleet.loco_pool.is_empty());
    // two locomotive types, identical at each of three nodes
    assert_eq!(outputs.fleet.refuelers.len(), 6);
    assert!(outputs
        .fleet
        .loco_pool
        .iter()
        .all(|l| l.battery_headroom_j == 0.0));
}

#[test]
fn test_plan_conserves_manifest_flow() {
    let demand = network_demand();
    let nodes = node_list(&demand);
    let plan = plan_train_demand(
        &demand,
        &nodes,
        &rail_vehicles_fixture(),
        &car_types_fixture(),
        &PlannerConfig::default(),
    )
    .unwrap();

    let mut out: HashMap<&NodeId, u64> = HashMap::new();
    let mut into: HashMap<&NodeId, u64> = HashMap::new();
    for t in plan
        .demand_trains
        .iter()
        .filter(|t| t.train_type == TrainType::Manifest)
    {
        *out.entry(&t.origin).or_default() += t.number_of_cars as u64;
        *into.entry(&t.destination).or_default() += t.number_of_cars as u64;
    }
    for node in &nodes {
        assert_eq!(out.get(node), into.get(node), "{node}");
    }
}

#[test]
fn test_rows_never_negative_or_empty() {
    let demand = network_demand();
    let nodes = node_list(&demand);
    let plan = plan_train_demand(
        &demand,
        &nodes,
        &rail_vehicles_fixture(),
        &car_types_fixture(),
        &PlannerConfig::default(),
    )
    .unwrap();
    assert!(plan.demand_returns.iter().all(|r| r.number_of_cars > 0));
    assert!(plan.demand_rebalancing.iter().all(|r| r.number_of_cars > 0));
    assert!(plan
        .demand_trains
        .iter()
        .all(|t| t.number_of_cars > 0 && t.number_of_trains > 0));
}

#[test]
fn test_over_capacity_containers_rejected() {
    let demand = vec![DemandRecord::new("A", "B", TrainType::Intermodal, 10, 50)];
    let result = plan_train_demand(
        &demand,
        &node_list(&demand),
        &rail_vehicles_fixture(),
        &car_types_fixture(),
        &PlannerConfig::default(),
    );
    assert!(matches!(result, Err(PlannerError::MalformedDemand(_))));
}

#[test]
fn test_parameter_sweep() {
    let demand = network_demand();
    let nodes = node_list(&demand);
    let configs: Vec<PlannerConfig> = [0.0, 0.3, 0.6, 1.0]
        .into_iter()
        .map(|ratio| PlannerConfig {
            manifest_empty_return_ratio: ratio,
            ..Default::default()
        })
        .chain(std::iter::once(PlannerConfig {
            containers_per_car: -1.0,
            ..Default::default()
        }))
        .collect();
    let results = run_parameter_sweep(
        &configs,
        &demand,
        &nodes,
        &rail_vehicles_fixture(),
        &car_types_fixture(),
    );
    assert_eq!(results.len(), 5);
    assert!(matches!(results[4], Err(PlannerError::InvalidConfig(_))));

    let sequential = plan_train_demand(
        &demand,
        &nodes,
        &rail_vehicles_fixture(),
        &car_types_fixture(),
        &configs[2],
    )
    .unwrap();
    assert_eq!(results[2].as_ref().unwrap(), &sequential);

    // fewer manifest empties return at lower ratios, so more rebalancing is needed
    let rebalanced = |i: usize| -> u64 {
        results[i]
            .as_ref()
            .unwrap()
            .demand_rebalancing
            .iter()
            .map(|b| b.number_of_cars as u64)
            .sum()
    };
    assert!(rebalanced(0) >= rebalanced(3));
}

#[test]
fn test_pipeline_from_resources() {
    let config = PlannerConfig::from_file("./resources/planner_config.yaml", false).unwrap();
    let (demand, nodes) =
        load_freight_demand_csv("./resources/demand_barstow_stockton.csv").unwrap();
    let rail_vehicles = crate::train::import_rail_vehicles("./resources/rail_vehicles.csv").unwrap();
    let refueler_info = import_refueler_info("./resources/refueler_info.csv").unwrap();
    let guidelines =
        import_charging_guidelines("./resources/network_charging_guidelines.csv").unwrap();

    let plan = plan_train_demand(&demand, &nodes, &rail_vehicles, &car_types_fixture(), &config)
        .unwrap();
    assert!(!plan.demand_trains.is_empty());

    let fleet = build_fleet(&demand, &nodes, &refueler_info, &guidelines, &config).unwrap();
    // 10 locomotives per node split 3/7 between the two catalog types
    assert_eq!(fleet.loco_pool.len(), 30);
    for node in &nodes {
        let minority = fleet
            .loco_pool
            .iter()
            .filter(|l| &l.node == node && l.locomotive_type == config.loco_info[0].locomotive_type)
            .count();
        assert_eq!(minority, 3);
    }
    // ports per type: ceil(3 * 9 / 30) = 1 and ceil(3 * 21 / 30) = 3
    let ports: Vec<u32> = fleet
        .refuelers
        .iter()
        .filter(|r| r.node == nodes[0])
        .map(|r| r.port_count)
        .collect();
    assert_eq!(ports.iter().sum::<u32>(), 4);
    assert!(fleet
        .loco_pool
        .iter()
        .any(|l| l.battery_headroom_j > 0.0));
}
