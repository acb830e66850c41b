use super::planner_imports::*;
use super::rebalancing::BalanceEntry;

/// Train demand for one lane, with loaded and empty cars of the same service
/// merged onto a single row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainDemandRecord {
    #[serde(rename = "Origin")]
    pub origin: NodeId,
    #[serde(rename = "Destination")]
    pub destination: NodeId,
    /// Loaded train type of the lane
    #[serde(rename = "Train_Type")]
    pub train_type: TrainType,
    #[serde(rename = "Number_of_Cars")]
    pub number_of_cars: u32,
    #[serde(rename = "Number_of_Cars_Loaded")]
    pub number_of_cars_loaded: u32,
    #[serde(rename = "Number_of_Cars_Empty")]
    pub number_of_cars_empty: u32,
    #[serde(rename = "Tons_Per_Car_Loaded")]
    pub tons_per_car_loaded: f64,
    #[serde(rename = "Tons_Per_Car_Empty")]
    pub tons_per_car_empty: f64,
    #[serde(rename = "HP_Required_Per_Ton_Loaded")]
    pub hp_required_per_ton_loaded: f64,
    #[serde(rename = "HP_Required_Per_Ton_Empty")]
    pub hp_required_per_ton_empty: f64,
    #[serde(rename = "Cars_Per_Train_Min")]
    pub cars_per_train_min: f64,
    #[serde(rename = "Cars_Per_Train_Target")]
    pub cars_per_train_target: f64,
    #[serde(rename = "Number_of_Trains")]
    pub number_of_trains: u32,
    #[serde(rename = "Number_of_Containers_Loaded")]
    pub number_of_containers_loaded: f64,
    #[serde(rename = "Number_of_Containers_Empty")]
    pub number_of_containers_empty: f64,
    #[serde(rename = "Number_of_Days")]
    pub number_of_days: u32,
}

impl TrainDemandRecord {
    /// Splits the row back into its loaded and empty car demand
    pub fn to_demand_records(&self) -> Vec<DemandRecord> {
        [
            (self.train_type, self.number_of_cars_loaded),
            (self.train_type.to_empty(), self.number_of_cars_empty),
        ]
        .into_iter()
        .filter(|(_, cars)| *cars > 0)
        .map(|(train_type, cars)| {
            DemandRecord::new(
                self.origin.clone(),
                self.destination.clone(),
                train_type,
                cars,
                0,
            )
        })
        .collect()
    }
}

/// Number of trains needed to move `cars` cars.  The first matching rule
/// applies:
/// 1. `single_train_mode` gives exactly one train
/// 2. no cars means no trains
/// 3. exactly `target` cars make one train
/// 4. a `target` of at most one car gives one train per car
/// 5. otherwise as many near-target trains as fit, capped by the count that
///    keeps every train at or above `min`, and never fewer than one
pub fn number_of_trains(cars: u32, min: f64, target: f64, single_train_mode: bool) -> u32 {
    if single_train_mode {
        return 1;
    }
    if cars == 0 {
        return 0;
    }
    let cars_f64 = cars as f64;
    if cars_f64 == target {
        1
    } else if target <= 1.0 {
        cars
    } else {
        let by_target = (cars_f64 / target).floor() + 1.0;
        let by_min = if min > 0.0 {
            (cars_f64 / min).floor()
        } else {
            f64::INFINITY
        };
        by_target.min(by_min).max(1.0) as u32
    }
}

/// Attributes of the loaded or empty half of a lane
#[derive(Debug, Default, Clone, Copy)]
struct LaneSide {
    cars: u32,
    tons_per_car: f64,
    hp_required_per_ton: f64,
    min: f64,
    target: f64,
}

#[derive(Debug, Default)]
struct LanePair {
    loaded: LaneSide,
    empty: LaneSide,
}

fn rail_vehicle_for<'a>(
    train_type: TrainType,
    rail_vehicles: &'a RailVehicleMap,
    freight_type_to_car_type: &HashMap<TrainType, String>,
) -> PlannerResult<&'a RailVehicle> {
    let car_type = freight_type_to_car_type
        .get(&train_type)
        .or_else(|| freight_type_to_car_type.get(&train_type.to_loaded()))
        .ok_or_else(|| {
            PlannerError::MissingCatalogEntry(format!(
                "no car type mapped to train type {train_type}"
            ))
        })?;
    rail_vehicles.get(car_type).ok_or_else(|| {
        PlannerError::MissingCatalogEntry(format!(
            "car type {car_type:?} (train type {train_type}) not found in rail vehicles"
        ))
    })
}

/// Converts car demand into trains per lane.
///
/// # Arguments
/// - `demand`: loaded demand
/// - `demand_returns`: empty-car return demand
/// - `demand_rebalancing`: manifest rebalancing demand
/// - `rail_vehicles`: rail vehicle catalog keyed by car type
/// - `freight_type_to_car_type`: car type of each train type; empty types
///   fall back to the entry for their loaded type
/// - `config`: planner configuration
///
/// # Returns
/// One row per (origin, destination, loaded train type), sorted by those keys
pub fn generate_demand_trains(
    demand: &[DemandRecord],
    demand_returns: &[DemandRecord],
    demand_rebalancing: &[BalanceEntry],
    rail_vehicles: &RailVehicleMap,
    freight_type_to_car_type: &HashMap<TrainType, String>,
    config: &PlannerConfig,
) -> PlannerResult<Vec<TrainDemandRecord>> {
    let rebalancing: Vec<DemandRecord> = demand_rebalancing.iter().map(DemandRecord::from).collect();
    let lane_cars = utils::grouped_sum(
        demand
            .iter()
            .chain(demand_returns)
            .chain(rebalancing.iter())
            .map(|r| {
                (
                    (r.origin.clone(), r.destination.clone(), r.train_type),
                    r.number_of_cars as u64,
                )
            }),
    );

    let mut lanes: BTreeMap<(NodeId, NodeId, TrainType), LanePair> = BTreeMap::new();
    for ((origin, destination, train_type), cars) in lane_cars {
        if cars == 0 {
            continue;
        }
        let cars = u32::try_from(cars).map_err(|_| {
            PlannerError::MalformedDemand(format!(
                "{origin} -> {destination} ({train_type}) totals {cars} cars, more than supported"
            ))
        })?;
        let rail_vehicle = rail_vehicle_for(train_type, rail_vehicles, freight_type_to_car_type)?;
        let side = LaneSide {
            cars,
            tons_per_car: rail_vehicle.tons_per_car(!train_type.is_empty()),
            hp_required_per_ton: config.hp_required_per_ton.lookup(train_type),
            min: config.min_cars_per_train.lookup(train_type) as f64,
            target: config.target_cars_per_train.lookup(train_type) as f64,
        };
        let pair = lanes
            .entry((origin, destination, train_type.to_loaded()))
            .or_default();
        if train_type.is_empty() {
            pair.empty = side;
        } else {
            pair.loaded = side;
        }
    }

    let trains: Vec<TrainDemandRecord> = lanes
        .into_iter()
        .map(|((origin, destination, train_type), LanePair { loaded, empty })| {
            let number_of_cars = loaded.cars.checked_add(empty.cars).ok_or_else(|| {
                PlannerError::MalformedDemand(format!(
                    "{origin} -> {destination} ({train_type}) totals {} loaded and {} empty cars, more than supported",
                    loaded.cars, empty.cars
                ))
            })?;
            let weighted = |l: f64, e: f64| {
                (l * loaded.cars as f64 + e * empty.cars as f64) / number_of_cars as f64
            };
            let cars_per_train_min = weighted(loaded.min, empty.min);
            let cars_per_train_target = weighted(loaded.target, empty.target);
            Ok(TrainDemandRecord {
                origin,
                destination,
                train_type,
                number_of_cars,
                number_of_cars_loaded: loaded.cars,
                number_of_cars_empty: empty.cars,
                tons_per_car_loaded: loaded.tons_per_car,
                tons_per_car_empty: empty.tons_per_car,
                hp_required_per_ton_loaded: loaded.hp_required_per_ton,
                hp_required_per_ton_empty: empty.hp_required_per_ton,
                cars_per_train_min,
                cars_per_train_target,
                number_of_trains: number_of_trains(
                    number_of_cars,
                    cars_per_train_min,
                    cars_per_train_target,
                    config.single_train_mode,
                ),
                number_of_containers_loaded: loaded.cars as f64 * config.containers_per_car,
                number_of_containers_empty: empty.cars as f64 * config.containers_per_car,
                number_of_days: config.simulation_days,
            })
        })
        .collect::<PlannerResult<_>>()?;

    log::info!(
        "Planned {} trains over {} lanes",
        trains.iter().map(|t| t.number_of_trains as u64).sum::<u64>(),
        trains.len()
    );
    Ok(trains)
}
