//! Shared fixtures for unit tests

pub(crate) use crate::prelude::*;
pub(crate) use crate::train_planner::defaults;
use crate::uc;
use std::collections::HashMap;

/// Three-node demand around Barstow, Stockton and Fresno
pub(crate) fn barstow_stockton_demand() -> Vec<DemandRecord> {
    vec![
        DemandRecord::new("Barstow", "Stockton", TrainType::Unit, 2394, 0),
        DemandRecord::new("Barstow", "Stockton", TrainType::Manifest, 2588, 0),
        DemandRecord::new("Barstow", "Stockton", TrainType::Intermodal, 2221, 2221),
        DemandRecord::new("Stockton", "Barstow", TrainType::Intermodal, 1500, 2800),
        DemandRecord::new("Stockton", "Fresno", TrainType::Manifest, 900, 0),
        DemandRecord::new("Fresno", "Barstow", TrainType::Manifest, 400, 0),
    ]
}

/// Five-node network with manifest traffic in both directions on some lanes
pub(crate) fn network_demand() -> Vec<DemandRecord> {
    vec![
        DemandRecord::new("Barstow", "Stockton", TrainType::Manifest, 2588, 0),
        DemandRecord::new("Stockton", "Barstow", TrainType::Manifest, 1210, 0),
        DemandRecord::new("Stockton", "Fresno", TrainType::Manifest, 733, 0),
        DemandRecord::new("Fresno", "Bakersfield", TrainType::Manifest, 415, 0),
        DemandRecord::new("Bakersfield", "Barstow", TrainType::Manifest, 97, 0),
        DemandRecord::new("Barstow", "Needles", TrainType::Manifest, 1801, 0),
        DemandRecord::new("Needles", "Fresno", TrainType::Manifest, 59, 0),
        DemandRecord::new("Barstow", "Needles", TrainType::Unit, 1200, 0),
        DemandRecord::new("Needles", "Barstow", TrainType::Intermodal, 950, 1900),
        DemandRecord::new("Barstow", "Needles", TrainType::Intermodal, 700, 1350),
    ]
}

pub(crate) fn rail_vehicles_fixture() -> RailVehicleMap {
    [
        ("Bulk", 20_000.0, 129_727.0),
        ("Manifest", 30_000.0, 110_000.0),
        ("Intermodal", 35_000.0, 105_000.0),
    ]
    .into_iter()
    .map(|(car_type, empty, loaded)| {
        (
            car_type.to_string(),
            RailVehicle {
                car_type: car_type.to_string(),
                axle_count: 4,
                mass_static_empty: empty * uc::KG,
                mass_static_loaded: loaded * uc::KG,
                mass_extra_per_axle: 1_500.0 * uc::LB,
            },
        )
    })
    .collect()
}

pub(crate) fn car_types_fixture() -> HashMap<TrainType, String> {
    HashMap::from([
        (TrainType::Unit, "Bulk".to_string()),
        (TrainType::Manifest, "Manifest".to_string()),
        (TrainType::Intermodal, "Intermodal".to_string()),
    ])
}

pub(crate) fn refueler_info_fixture() -> Vec<RefuelerInfo> {
    vec![
        RefuelerInfo {
            refueler_type: "Diesel_Fueler".into(),
            locomotive_type: "Diesel_Large".into(),
            fuel_type: FuelType::Diesel,
            refueler_j_per_hr: 3.3e11,
            refueler_efficiency: 1.0,
            lifespan_years: 20.0,
            cost_usd: 1_000_000.0,
        },
        RefuelerInfo {
            refueler_type: "BEL_Charger".into(),
            locomotive_type: "BEL".into(),
            fuel_type: FuelType::Electricity,
            refueler_j_per_hr: 2.88e9,
            refueler_efficiency: 0.95,
            lifespan_years: 20.0,
            cost_usd: 2_500_000.0,
        },
    ]
}

/// Train schedule of `demand` using the fixture catalogs
pub(crate) fn plan_fixture(
    demand: &[DemandRecord],
    config: &PlannerConfig,
) -> Vec<TrainDemandRecord> {
    let nodes = node_list(demand);
    plan_train_demand(
        demand,
        &nodes,
        &rail_vehicles_fixture(),
        &car_types_fixture(),
        config,
    )
    .unwrap()
    .demand_trains
}
