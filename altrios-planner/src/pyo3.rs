//! Python bindings for the planner stages.  Tables cross the boundary as
//! `polars` DataFrames.

pub use ::pyo3::exceptions::PyValueError;
pub use ::pyo3::prelude::*;
pub use pyo3_polars::PyDataFrame;

use crate::imports::*;
use crate::train::{import_rail_vehicles_py, RailVehicle, RailVehicleMap};
use crate::train_planner::*;

fn demand_records(table: PyDataFrame) -> anyhow::Result<Vec<DemandRecord>> {
    Ok(load_freight_demand(&table.0)?.0)
}

fn node_ids(nodes: Vec<String>) -> Vec<NodeId> {
    nodes.into_iter().map(NodeId::from).collect()
}

fn car_type_map(
    freight_type_to_car_type: HashMap<String, String>,
) -> anyhow::Result<HashMap<TrainType, String>> {
    freight_type_to_car_type
        .into_iter()
        .map(|(train_type, car_type)| Ok((train_type.parse()?, car_type)))
        .collect()
}

fn rail_vehicle_map(rail_vehicles: Vec<RailVehicle>) -> RailVehicleMap {
    rail_vehicles
        .into_iter()
        .map(|rv| (rv.car_type.clone(), rv))
        .collect()
}

/// Returns the validated demand table and its sorted node list
#[pyfunction(name = "load_freight_demand")]
fn load_freight_demand_py(demand: PyDataFrame) -> anyhow::Result<(PyDataFrame, Vec<String>)> {
    let (records, nodes) = load_freight_demand(&demand.0)?;
    Ok((
        PyDataFrame(records.to_dataframe()?),
        nodes.into_iter().map(|n| n.0).collect(),
    ))
}

#[pyfunction(name = "generate_return_demand")]
fn generate_return_demand_py(
    demand: PyDataFrame,
    config: PlannerConfig,
) -> anyhow::Result<PyDataFrame> {
    let demand = demand_records(demand)?;
    Ok(PyDataFrame(
        generate_return_demand(&demand, &config).to_dataframe()?,
    ))
}

#[pyfunction(name = "generate_manifest_rebalancing_demand")]
fn generate_manifest_rebalancing_demand_py(
    demand: PyDataFrame,
    demand_returns: PyDataFrame,
    nodes: Vec<String>,
) -> anyhow::Result<PyDataFrame> {
    let balance = generate_manifest_rebalancing_demand(
        &demand_records(demand)?,
        &demand_records(demand_returns)?,
        &node_ids(nodes),
    )?;
    Ok(PyDataFrame(balance.to_dataframe()?))
}

#[pyfunction(name = "generate_demand_trains")]
fn generate_demand_trains_py(
    demand: PyDataFrame,
    demand_returns: PyDataFrame,
    demand_rebalancing: PyDataFrame,
    rail_vehicles: Vec<RailVehicle>,
    freight_type_to_car_type: HashMap<String, String>,
    config: PlannerConfig,
) -> anyhow::Result<PyDataFrame> {
    let rebalancing: Vec<BalanceEntry> = demand_records(demand_rebalancing)?
        .into_iter()
        .map(|r| BalanceEntry {
            origin: r.origin,
            destination: r.destination,
            train_type: r.train_type,
            number_of_cars: r.number_of_cars,
        })
        .collect();
    let trains = generate_demand_trains(
        &demand_records(demand)?,
        &demand_records(demand_returns)?,
        &rebalancing,
        &rail_vehicle_map(rail_vehicles),
        &car_type_map(freight_type_to_car_type)?,
        &config,
    )?;
    Ok(PyDataFrame(trains.to_dataframe()?))
}

#[pyfunction(name = "build_locopool")]
#[pyo3(signature = (config, demand, method="tile", shares=vec![], locomotives_per_node=None))]
fn build_locopool_py(
    config: PlannerConfig,
    demand: PyDataFrame,
    method: &str,
    shares: Vec<f64>,
    locomotives_per_node: Option<u32>,
) -> anyhow::Result<PyDataFrame> {
    let (demand, nodes) = load_freight_demand(&demand.0)?;
    let method = LocoPoolMethod::from_name(method, shares)?;
    let pool = build_locopool(&config, &demand, &nodes, &method, locomotives_per_node)?;
    Ok(PyDataFrame(pool.to_dataframe()?))
}

/// Returns the locomotive pool and refuelers, with charging guidelines
/// applied when a guideline file is given
#[pyfunction(name = "build_fleet")]
#[pyo3(signature = (config, demand, refueler_info_file, charging_guidelines_file=None))]
fn build_fleet_py(
    config: PlannerConfig,
    demand: PyDataFrame,
    refueler_info_file: PathBuf,
    charging_guidelines_file: Option<PathBuf>,
) -> anyhow::Result<(PyDataFrame, PyDataFrame)> {
    let (demand, nodes) = load_freight_demand(&demand.0)?;
    let refueler_info = import_refueler_info(refueler_info_file)?;
    let guidelines = match charging_guidelines_file {
        Some(path) => import_charging_guidelines(path)?,
        None => vec![],
    };
    let fleet = build_fleet(&demand, &nodes, &refueler_info, &guidelines, &config)?;
    Ok((
        PyDataFrame(fleet.loco_pool.to_dataframe()?),
        PyDataFrame(fleet.refuelers.to_dataframe()?),
    ))
}

#[pyfunction(name = "prep_hourly_demand")]
fn prep_hourly_demand_py(
    total_demand: PyDataFrame,
    hourly_density_file: PathBuf,
    daily_density_file: PathBuf,
) -> anyhow::Result<PyDataFrame> {
    let read = |path: &Path| -> anyhow::Result<csv::Reader<File>> {
        Ok(csv::Reader::from_reader(File::open(path).with_context(|| {
            format!("Could not open demand density file: {path:?}")
        })?))
    };
    let hourly: Vec<HourlyDemandShare> = read(&hourly_density_file)?
        .deserialize()
        .collect::<Result<_, _>>()?;
    let daily: Vec<DailyDemandShare> = read(&daily_density_file)?
        .deserialize()
        .collect::<Result<_, _>>()?;
    let hourly_demand = prep_hourly_demand(&demand_records(total_demand)?, &hourly, &daily);
    Ok(PyDataFrame(hourly_demand.to_dataframe()?))
}

/// Returns the return, rebalancing and train demand tables
#[pyfunction(name = "plan_train_demand")]
fn plan_train_demand_py(
    demand: PyDataFrame,
    rail_vehicles: Vec<RailVehicle>,
    freight_type_to_car_type: HashMap<String, String>,
    config: PlannerConfig,
) -> anyhow::Result<(PyDataFrame, PyDataFrame, PyDataFrame)> {
    let (demand, nodes) = load_freight_demand(&demand.0)?;
    let plan = plan_train_demand(
        &demand,
        &nodes,
        &rail_vehicle_map(rail_vehicles),
        &car_type_map(freight_type_to_car_type)?,
        &config,
    )?;
    Ok((
        PyDataFrame(plan.demand_returns.to_dataframe()?),
        PyDataFrame(plan.demand_rebalancing.to_dataframe()?),
        PyDataFrame(plan.demand_trains.to_dataframe()?),
    ))
}

/// Adds the planner classes and functions to python module `m`
pub fn register_planner_api(m: &PyModule) -> PyResult<()> {
    m.add_class::<PlannerConfig>()?;
    m.add_class::<LocoInfo>()?;
    m.add_class::<RailVehicle>()?;
    m.add_function(wrap_pyfunction!(import_rail_vehicles_py, m)?)?;
    m.add_function(wrap_pyfunction!(load_freight_demand_py, m)?)?;
    m.add_function(wrap_pyfunction!(generate_return_demand_py, m)?)?;
    m.add_function(wrap_pyfunction!(generate_manifest_rebalancing_demand_py, m)?)?;
    m.add_function(wrap_pyfunction!(generate_demand_trains_py, m)?)?;
    m.add_function(wrap_pyfunction!(build_locopool_py, m)?)?;
    m.add_function(wrap_pyfunction!(build_fleet_py, m)?)?;
    m.add_function(wrap_pyfunction!(prep_hourly_demand_py, m)?)?;
    m.add_function(wrap_pyfunction!(plan_train_demand_py, m)?)?;
    Ok(())
}
