use super::planner_imports::*;

/// Generates the empty-car demand needed to move the cars of one loaded
/// train type back toward their origins
pub trait ReturnDemandGenerator {
    /// Loaded train type whose demand this generator handles
    fn train_type(&self) -> TrainType;

    /// # Arguments
    /// - `subset`: demand rows whose train type is [Self::train_type]
    /// - `config`: planner configuration
    ///
    /// Returned rows may carry zero cars; [generate_return_demand] drops them.
    fn generate(&self, subset: &[DemandRecord], config: &PlannerConfig) -> Vec<DemandRecord>;
}

/// Unit trains haul one commodity in one direction, so every car returns
/// empty along the reverse lane.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnitReturns;

impl ReturnDemandGenerator for UnitReturns {
    fn train_type(&self) -> TrainType {
        TrainType::Unit
    }

    fn generate(&self, subset: &[DemandRecord], _config: &PlannerConfig) -> Vec<DemandRecord> {
        subset.iter().map(DemandRecord::reversed_empty).collect()
    }
}

/// Manifest cars are partially reloaded at their destination; only
/// `manifest_empty_return_ratio` of them return empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestReturns;

impl ManifestReturns {
    /// Empty cars returned for `loaded_cars` loaded manifest cars
    pub fn empties(loaded_cars: u32, ratio: f64) -> u32 {
        (loaded_cars as f64 * ratio).floor() as u32
    }
}

impl ReturnDemandGenerator for ManifestReturns {
    fn train_type(&self) -> TrainType {
        TrainType::Manifest
    }

    fn generate(&self, subset: &[DemandRecord], config: &PlannerConfig) -> Vec<DemandRecord> {
        subset
            .iter()
            .map(|r| DemandRecord {
                number_of_cars: Self::empties(r.number_of_cars, config.manifest_empty_return_ratio),
                ..r.reversed_empty()
            })
            .collect()
    }
}

/// Intermodal cars are reloaded wherever there is freight, so only the net
/// imbalance between the two directions of a node pair returns empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntermodalReturns;

impl ReturnDemandGenerator for IntermodalReturns {
    fn train_type(&self) -> TrainType {
        TrainType::Intermodal
    }

    fn generate(&self, subset: &[DemandRecord], _config: &PlannerConfig) -> Vec<DemandRecord> {
        // reversed lane -> (cars, containers), in order of first appearance
        let mut order: Vec<(NodeId, NodeId)> = vec![];
        let mut totals: HashMap<(NodeId, NodeId), (u64, u64)> = HashMap::new();
        for r in subset.iter().map(DemandRecord::reversed_empty) {
            let key = (r.origin, r.destination);
            let (cars, containers) = totals.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (0, 0)
            });
            *cars += r.number_of_cars as u64;
            *containers += r.number_of_containers as u64;
        }

        order
            .into_iter()
            .filter_map(|(origin, destination)| {
                let (cars, containers) = *totals.get(&(origin.clone(), destination.clone()))?;
                // one-way pairs and ties leave nothing to return
                let (cars_back, containers_back) =
                    *totals.get(&(destination.clone(), origin.clone()))?;
                (cars > cars_back).then(|| DemandRecord {
                    origin,
                    destination,
                    train_type: TrainType::IntermodalEmpty,
                    number_of_cars: (cars - cars_back).min(u32::MAX as u64) as u32,
                    number_of_containers: containers
                        .abs_diff(containers_back)
                        .min(u32::MAX as u64) as u32,
                })
            })
            .collect()
    }
}

/// Return demand policy selectable from a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnDemandPolicy {
    Unit,
    Manifest,
    Intermodal,
}

impl ReturnDemandPolicy {
    /// Each loaded train type mapped to its own policy
    pub fn defaults() -> BTreeMap<TrainType, ReturnDemandPolicy> {
        BTreeMap::from([
            (TrainType::Unit, Self::Unit),
            (TrainType::Manifest, Self::Manifest),
            (TrainType::Intermodal, Self::Intermodal),
        ])
    }

    pub fn generator(&self) -> &'static dyn ReturnDemandGenerator {
        match self {
            Self::Unit => &UnitReturns,
            Self::Manifest => &ManifestReturns,
            Self::Intermodal => &IntermodalReturns,
        }
    }

    pub fn train_type(&self) -> TrainType {
        self.generator().train_type()
    }
}

/// Creates the demand needed to return empty cars to their origins.
///
/// Demand is partitioned by train type in order of first appearance and each
/// partition is handed to the generator configured for its type.  Types
/// without a configured generator are logged and skipped.  Rows with zero
/// cars are dropped from the result.
pub fn generate_return_demand(
    demand: &[DemandRecord],
    config: &PlannerConfig,
) -> Vec<DemandRecord> {
    let mut order: Vec<TrainType> = vec![];
    let mut partitions: HashMap<TrainType, Vec<DemandRecord>> = HashMap::new();
    for r in demand {
        partitions
            .entry(r.train_type)
            .or_insert_with(|| {
                order.push(r.train_type);
                vec![]
            })
            .push(r.clone());
    }

    let mut returns = vec![];
    for train_type in order {
        let subset = partitions.remove(&train_type).unwrap_or_default();
        match config.return_demand_generators.get(&train_type) {
            Some(policy) => returns.extend(policy.generator().generate(&subset, config)),
            None => log::warn!(
                "{}",
                PlannerError::UnimplementedReturnGenerator(train_type)
            ),
        }
    }
    returns.retain(|r| r.number_of_cars > 0);
    log::info!("Generated {} return demand rows", returns.len());
    returns
}
