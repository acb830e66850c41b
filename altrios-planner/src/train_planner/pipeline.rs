use super::demand::{check_container_capacity, load_freight_demand};
use super::demand_trains::{generate_demand_trains, TrainDemandRecord};
use super::loco_pool::{build_locopool, LocomotiveRecord};
use super::planner_imports::*;
use super::rebalancing::{generate_manifest_rebalancing_demand, BalanceEntry};
use super::refuelers::{
    append_charging_guidelines, build_refuelers, NetworkChargingGuideline, RefuelerInfo,
    RefuelerRecord,
};
use super::return_demand::generate_return_demand;
use rayon::prelude::*;

/// Demand tables leading up to, and including, the train schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainPlan {
    pub demand_returns: Vec<DemandRecord>,
    pub demand_rebalancing: Vec<BalanceEntry>,
    pub demand_trains: Vec<TrainDemandRecord>,
}

/// Initial locomotive pool and refueling infrastructure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub loco_pool: Vec<LocomotiveRecord>,
    pub refuelers: Vec<RefuelerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerOutputs {
    pub demand: Vec<DemandRecord>,
    pub nodes: Vec<NodeId>,
    pub plan: TrainPlan,
    pub fleet: Fleet,
}

/// Runs return demand generation, manifest rebalancing and train aggregation
pub fn plan_train_demand(
    demand: &[DemandRecord],
    nodes: &[NodeId],
    rail_vehicles: &RailVehicleMap,
    freight_type_to_car_type: &HashMap<TrainType, String>,
    config: &PlannerConfig,
) -> PlannerResult<TrainPlan> {
    config.validate()?;
    check_container_capacity(demand, config)?;
    let demand_returns = generate_return_demand(demand, config);
    let demand_rebalancing = generate_manifest_rebalancing_demand(demand, &demand_returns, nodes)?;
    let demand_trains = generate_demand_trains(
        demand,
        &demand_returns,
        &demand_rebalancing,
        rail_vehicles,
        freight_type_to_car_type,
        config,
    )?;
    Ok(TrainPlan {
        demand_returns,
        demand_rebalancing,
        demand_trains,
    })
}

/// Builds the locomotive pool with the configured method, sizes refuelers
/// and applies charging guidelines
pub fn build_fleet(
    demand: &[DemandRecord],
    nodes: &[NodeId],
    refueler_info: &[RefuelerInfo],
    guidelines: &[NetworkChargingGuideline],
    config: &PlannerConfig,
) -> PlannerResult<Fleet> {
    let loco_pool = build_locopool(
        config,
        demand,
        nodes,
        &config.loco_pool_method,
        config.locomotives_per_node,
    )?;
    let refuelers = build_refuelers(
        nodes,
        &loco_pool,
        refueler_info,
        config.refuelers_per_incoming_corridor,
    )?;
    let (refuelers, loco_pool) =
        append_charging_guidelines(refuelers, loco_pool, demand, guidelines);
    Ok(Fleet {
        loco_pool,
        refuelers,
    })
}

/// Runs every planner stage on a raw demand table
pub fn run_train_planner(
    demand_table: &DataFrame,
    rail_vehicles: &RailVehicleMap,
    freight_type_to_car_type: &HashMap<TrainType, String>,
    refueler_info: &[RefuelerInfo],
    guidelines: &[NetworkChargingGuideline],
    config: &PlannerConfig,
) -> PlannerResult<PlannerOutputs> {
    config.validate()?;
    let (demand, nodes) = load_freight_demand(demand_table)?;
    let plan = plan_train_demand(&demand, &nodes, rail_vehicles, freight_type_to_car_type, config)?;
    let fleet = build_fleet(&demand, &nodes, refueler_info, guidelines, config)?;
    Ok(PlannerOutputs {
        demand,
        nodes,
        plan,
        fleet,
    })
}

/// Plans the same demand under each of `configs` in parallel.  Results are in
/// the order of `configs`.
pub fn run_parameter_sweep(
    configs: &[PlannerConfig],
    demand: &[DemandRecord],
    nodes: &[NodeId],
    rail_vehicles: &RailVehicleMap,
    freight_type_to_car_type: &HashMap<TrainType, String>,
) -> Vec<PlannerResult<TrainPlan>> {
    configs
        .par_iter()
        .map(|config| {
            plan_train_demand(demand, nodes, rail_vehicles, freight_type_to_car_type, config)
        })
        .collect()
}
