use super::planner_imports::*;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FuelType {
    #[default]
    Diesel,
    Electricity,
    Hydrogen,
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocoStatus {
    #[default]
    Ready,
    Queued,
    Refueling,
    Dispatched,
}

impl fmt::Display for LocoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Onboard energy storage of a locomotive type, e.g. a traction battery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyStorageInfo {
    pub energy_capacity: si::Energy,
    /// Starting state of charge
    pub soc: si::Ratio,
    pub min_soc: si::Ratio,
    pub max_soc: si::Ratio,
}

/// Locomotive type catalog entry.  Attributes come from the locomotive models
/// of the train simulation.
#[planner_api(
    #[getter("hp")]
    fn get_hp_py(&self) -> f64 {
        self.hp()
    }

    #[getter("capacity_j")]
    fn get_capacity_j_py(&self) -> f64 {
        self.capacity_j()
    }
)]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, SerdeAPI)]
pub struct LocoInfo {
    pub locomotive_type: String,
    pub fuel_type: FuelType,
    pub pwr_rated: si::Power,
    pub mass: Option<si::Mass>,
    /// Energy storage, `None` for locomotives that only carry fuel
    pub res: Option<EnergyStorageInfo>,
}

impl LocoInfo {
    /// Diesel-electric road locomotive and battery-electric locomotive
    pub fn default_catalog() -> Vec<Self> {
        vec![
            Self {
                locomotive_type: "Diesel_Large".into(),
                fuel_type: FuelType::Diesel,
                pwr_rated: 3_255.0 * uc::KW,
                mass: Some(194_000.0 * uc::KG),
                res: None,
            },
            Self {
                locomotive_type: "BEL".into(),
                fuel_type: FuelType::Electricity,
                pwr_rated: 2_000.0 * uc::KW,
                mass: Some(192_000.0 * uc::KG),
                res: Some(EnergyStorageInfo {
                    energy_capacity: 3.2 * uc::MWH,
                    soc: 0.95 * uc::R,
                    min_soc: 0.05 * uc::R,
                    max_soc: 0.95 * uc::R,
                }),
            },
        ]
    }

    pub fn validate(&self) -> PlannerResult<()> {
        let invalid = |msg: String| {
            Err(PlannerError::InvalidConfig(format!(
                "locomotive type {:?}: {msg}",
                self.locomotive_type
            )))
        };
        if self.locomotive_type.is_empty() {
            return invalid("`locomotive_type` must not be empty".into());
        }
        if self.pwr_rated < si::Power::ZERO {
            return invalid("`pwr_rated` must be non-negative".into());
        }
        if let Some(res) = &self.res {
            let (min, soc, max) = (
                res.min_soc.get::<si::ratio>(),
                res.soc.get::<si::ratio>(),
                res.max_soc.get::<si::ratio>(),
            );
            if !(0.0 <= min && min <= soc && soc <= max && max <= 1.0) {
                return invalid(format!(
                    "state of charge must satisfy 0 <= min_soc <= soc <= max_soc <= 1, got {min}, {soc}, {max}"
                ));
            }
            if res.energy_capacity <= si::Energy::ZERO {
                return invalid("`energy_capacity` must be positive".into());
            }
        }
        Ok(())
    }

    pub fn hp(&self) -> f64 {
        self.pwr_rated.get::<si::watt>() / utils::W_PER_HP
    }

    pub fn mass_tons(&self) -> f64 {
        self.mass
            .map(|m| m.get::<si::kilogram>() / utils::KG_PER_TON)
            .unwrap_or_default()
    }

    /// Usable energy capacity; fuel-only locomotives are assigned a
    /// diesel-tank-equivalent reservoir
    pub fn capacity_j(&self) -> f64 {
        self.res
            .as_ref()
            .map(|res| res.energy_capacity.get::<si::joule>())
            .unwrap_or(defaults::DIESEL_TANK_CAPACITY_J)
    }

    pub fn soc_j(&self) -> f64 {
        self.res
            .as_ref()
            .map(|res| res.soc.get::<si::ratio>() * res.energy_capacity.get::<si::joule>())
            .unwrap_or(defaults::DIESEL_TANK_CAPACITY_J)
    }

    pub fn soc_min_j(&self) -> f64 {
        self.res
            .as_ref()
            .map(|res| res.min_soc.get::<si::ratio>() * res.energy_capacity.get::<si::joule>())
            .unwrap_or_default()
    }

    pub fn soc_max_j(&self) -> f64 {
        self.res
            .as_ref()
            .map(|res| res.max_soc.get::<si::ratio>() * res.energy_capacity.get::<si::joule>())
            .unwrap_or(defaults::DIESEL_TANK_CAPACITY_J)
    }
}

/// How locomotive types are assigned across the fleet
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocoPoolMethod {
    /// Cycle through the catalog types in order
    #[default]
    Tile,
    /// Split each node's locomotives between exactly two catalog types by
    /// the given shares
    SharesTwoway { shares: Vec<f64> },
}

impl LocoPoolMethod {
    /// Parses a method by name, e.g. `"tile"` or `"shares_twoway"`
    pub fn from_name(name: &str, shares: Vec<f64>) -> PlannerResult<Self> {
        match name.trim() {
            "tile" => Ok(Self::Tile),
            "shares_twoway" => Ok(Self::SharesTwoway { shares }),
            _ => Err(PlannerError::InvalidLocopoolConfig(format!(
                "locomotive pool build method {name:?} invalid or not implemented"
            ))),
        }
    }

    pub(crate) fn check_shares(shares: &[f64], n_types: usize) -> PlannerResult<()> {
        if n_types != 2 || shares.len() != 2 {
            return Err(PlannerError::InvalidLocopoolConfig(format!(
                "two-way prescribed locomotive pool requires 2 locomotive types and 2 shares, got {n_types} type(s) and {} share(s)",
                shares.len()
            )));
        }
        if shares.iter().any(|s| !(0.0..=1.0).contains(s)) {
            return Err(PlannerError::InvalidLocopoolConfig(format!(
                "locomotive type shares must lie in [0, 1], got {shares:?}"
            )));
        }
        Ok(())
    }
}

/// One locomotive of the initial fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocomotiveRecord {
    #[serde(rename = "Locomotive_ID")]
    pub locomotive_id: u32,
    #[serde(rename = "Locomotive_Type")]
    pub locomotive_type: String,
    /// Home node
    #[serde(rename = "Node")]
    pub node: NodeId,
    #[serde(rename = "Arrival_Time")]
    pub arrival_time: f64,
    #[serde(rename = "Servicing_Done_Time")]
    pub servicing_done_time: f64,
    #[serde(rename = "Refueling_Done_Time")]
    pub refueling_done_time: f64,
    #[serde(rename = "Status")]
    pub status: LocoStatus,
    #[serde(rename = "SOC_Target_J")]
    pub soc_target_j: f64,
    #[serde(rename = "Refuel_Duration")]
    pub refuel_duration: f64,
    #[serde(rename = "Refueler_J_Per_Hr")]
    pub refueler_j_per_hr: f64,
    #[serde(rename = "Refueler_Efficiency")]
    pub refueler_efficiency: f64,
    #[serde(rename = "Port_Count")]
    pub port_count: u32,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: FuelType,
    #[serde(rename = "HP")]
    pub hp: f64,
    #[serde(rename = "Loco_Mass_Tons")]
    pub loco_mass_tons: f64,
    #[serde(rename = "SOC_J")]
    pub soc_j: f64,
    #[serde(rename = "SOC_Min_J")]
    pub soc_min_j: f64,
    #[serde(rename = "SOC_Max_J")]
    pub soc_max_j: f64,
    #[serde(rename = "Capacity_J")]
    pub capacity_j: f64,
    #[serde(rename = "Battery_Headroom_J")]
    pub battery_headroom_j: f64,
}

impl LocomotiveRecord {
    /// Ready locomotive of catalog type `info` at `node`
    pub fn new(locomotive_id: u32, node: NodeId, info: &LocoInfo) -> Self {
        Self {
            locomotive_id,
            locomotive_type: info.locomotive_type.clone(),
            node,
            arrival_time: 0.0,
            servicing_done_time: 0.0,
            refueling_done_time: 0.0,
            status: LocoStatus::Ready,
            soc_target_j: 0.0,
            refuel_duration: 0.0,
            refueler_j_per_hr: 0.0,
            refueler_efficiency: 0.0,
            port_count: 0,
            fuel_type: info.fuel_type,
            hp: info.hp(),
            loco_mass_tons: info.mass_tons(),
            soc_j: info.soc_j(),
            soc_min_j: info.soc_min_j(),
            soc_max_j: info.soc_max_j(),
            capacity_j: info.capacity_j(),
            battery_headroom_j: 0.0,
        }
    }
}

/// Per-node type sequence for two locomotive types.  The minority type gets
/// `round(locomotives_per_node * min(shares))` slots, each followed by `k` or
/// `k + 1` majority locomotives so both counts are met exactly.
fn shares_twoway_pattern<'a>(
    types: [&'a str; 2],
    shares: &[f64],
    locomotives_per_node: usize,
) -> Vec<&'a str> {
    // first minimum wins ties
    let idx_one = if shares[1] < shares[0] { 1 } else { 0 };
    let (type_one, type_two) = (types[idx_one], types[1 - idx_one]);
    let num_one = ((locomotives_per_node as f64 * shares[idx_one]).round() as usize)
        .min(locomotives_per_node);
    if num_one == 0 {
        return vec![type_two; locomotives_per_node];
    }
    let num_two = locomotives_per_node - num_one;
    let (two_per_one, num_extra_two) = (num_two / num_one, num_two % num_one);

    let mut pattern = Vec::with_capacity(locomotives_per_node);
    for i in 0..num_one {
        pattern.push(type_one);
        let run = two_per_one + usize::from(i < num_extra_two);
        pattern.extend(std::iter::repeat(type_two).take(run));
    }
    pattern
}

/// ID block size large enough that each node's sequence numbers fit
fn loco_id_stride(locomotives_per_node: usize) -> u64 {
    let mut stride = defaults::LOCO_ID_STRIDE as u64;
    while stride <= locomotives_per_node as u64 {
        stride *= 10;
    }
    stride
}

/// Builds the initial locomotive pool.
///
/// # Arguments
/// - `config`: planner configuration providing the locomotive catalog
/// - `demand`: loaded demand used to size the fleet
/// - `nodes`: sorted node list
/// - `method`: how locomotive types are assigned
/// - `locomotives_per_node`: fleet size per node; derived from mean cars
///   per demand row, `cars_per_locomotive` and destinations per node when
///   `None`
pub fn build_locopool(
    config: &PlannerConfig,
    demand: &[DemandRecord],
    nodes: &[NodeId],
    method: &LocoPoolMethod,
    locomotives_per_node: Option<u32>,
) -> PlannerResult<Vec<LocomotiveRecord>> {
    config.validate()?;
    let num_nodes = nodes.len();
    let (initial_size, rows) = match locomotives_per_node {
        Some(lpn) => (lpn as usize, lpn as usize * num_nodes),
        None => {
            let cars_per_od = utils::mean(demand.iter().map(|r| r.number_of_cars as f64))
                .unwrap_or_default();
            let locos_per_od =
                cars_per_od / *config.cars_per_locomotive.default_value() as f64;
            if config.single_train_mode {
                let initial_size = locos_per_od.ceil() as usize;
                (initial_size, initial_size)
            } else if num_nodes == 0 {
                (0, 0)
            } else {
                let destinations_per_node = demand.len() as f64 / num_nodes as f64;
                let initial_size = (locos_per_od * destinations_per_node).ceil() as usize;
                (initial_size, initial_size * num_nodes)
            }
        }
    };
    if rows == 0 {
        log::warn!("Locomotive pool is empty; demand has no cars or no nodes");
        return Ok(vec![]);
    }
    if config.loco_info.is_empty() {
        return Err(PlannerError::InvalidLocopoolConfig(
            "`loco_info` has no locomotive types".into(),
        ));
    }

    let loco_types: Vec<&str> = config
        .loco_info
        .iter()
        .map(|li| li.locomotive_type.as_str())
        .collect();
    let types: Vec<&str> = match method {
        LocoPoolMethod::Tile => loco_types.iter().copied().cycle().take(rows).collect(),
        LocoPoolMethod::SharesTwoway { shares } => {
            LocoPoolMethod::check_shares(shares, loco_types.len())?;
            let pattern =
                shares_twoway_pattern([loco_types[0], loco_types[1]], shares, initial_size);
            pattern.into_iter().cycle().take(rows).collect()
        }
    };

    let placements: Vec<(u64, NodeId)> = if config.single_train_mode {
        let first_origin = demand.first().map(|r| r.origin.clone()).ok_or_else(|| {
            PlannerError::MalformedDemand("single train mode requires demand".into())
        })?;
        (0..rows as u64).map(|i| (i, first_origin.clone())).collect()
    } else {
        let stride = loco_id_stride(initial_size);
        let ranks = utils::dense_rank(nodes);
        let mut sorted_nodes: Vec<&NodeId> = nodes.iter().collect();
        sorted_nodes.sort();
        sorted_nodes
            .into_iter()
            .flat_map(|node| {
                let rank = ranks[node] as u64;
                (0..initial_size as u64).map(move |seq| (rank * stride + seq, node.clone()))
            })
            .collect()
    };

    let pool = placements
        .into_iter()
        .zip(types)
        .map(|((id, node), loco_type)| {
            let locomotive_id = u32::try_from(id).map_err(|_| {
                PlannerError::InvalidLocopoolConfig(format!(
                    "locomotive ID {id} exceeds the supported range"
                ))
            })?;
            Ok(LocomotiveRecord::new(
                locomotive_id,
                node,
                config.loco_info_for(loco_type)?,
            ))
        })
        .collect::<PlannerResult<Vec<_>>>()?;
    log::info!(
        "Built locomotive pool of {} locomotives ({} per node)",
        pool.len(),
        initial_size
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn test_tile_pool() {
        let config = PlannerConfig::default();
        let demand = barstow_stockton_demand();
        let nodes = node_list(&demand);
        let pool = build_locopool(&config, &demand, &nodes, &LocoPoolMethod::Tile, Some(3)).unwrap();
        assert_eq!(pool.len(), 9);
        assert_eq!(pool[0].locomotive_type, "Diesel_Large");
        assert_eq!(pool[1].locomotive_type, "BEL");
        assert_eq!(pool[2].locomotive_type, "Diesel_Large");
        assert_eq!(pool[0].locomotive_id, 1000);
        assert_eq!(pool[2].locomotive_id, 1002);
        assert_eq!(pool[3].locomotive_id, 2000);
        assert_eq!(pool[3].node, NodeId::from("Fresno"));
        assert_eq!(pool[8].locomotive_id, 3002);
        assert_eq!(pool[8].node, NodeId::from("Stockton"));
        assert!(pool.iter().all(|l| l.status == LocoStatus::Ready));
    }

    #[test]
    fn test_shares_twoway_exact() {
        let config = PlannerConfig::default();
        let demand = network_demand();
        let nodes = node_list(&demand);
        let method = LocoPoolMethod::SharesTwoway {
            shares: vec![0.3, 0.7],
        };
        let pool = build_locopool(&config, &demand, &nodes, &method, Some(10)).unwrap();
        assert_eq!(pool.len(), 10 * nodes.len());
        for node in &nodes {
            let at_node: Vec<_> = pool.iter().filter(|l| &l.node == node).collect();
            assert_eq!(at_node.len(), 10);
            let n_diesel = at_node
                .iter()
                .filter(|l| l.locomotive_type == "Diesel_Large")
                .count();
            assert_eq!(n_diesel, 3);
            assert_eq!(at_node.len() - n_diesel, 7);
        }
    }

    #[test]
    fn test_shares_twoway_pattern() {
        let pattern = shares_twoway_pattern(["A", "B"], &[0.3, 0.7], 10);
        assert_eq!(pattern, vec!["A", "B", "B", "B", "A", "B", "B", "A", "B", "B"]);
        let pattern = shares_twoway_pattern(["A", "B"], &[0.9, 0.1], 10);
        assert_eq!(pattern.iter().filter(|t| **t == "B").count(), 1);
        assert_eq!(pattern[0], "B");
        assert_eq!(shares_twoway_pattern(["A", "B"], &[0.0, 1.0], 4), vec!["B"; 4]);
        assert_eq!(shares_twoway_pattern(["A", "B"], &[0.5, 0.5], 4), vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn test_shares_twoway_invalid() {
        let demand = barstow_stockton_demand();
        let nodes = node_list(&demand);
        let config = PlannerConfig::default();
        let method = LocoPoolMethod::SharesTwoway {
            shares: vec![0.2, 0.3, 0.5],
        };
        assert!(matches!(
            build_locopool(&config, &demand, &nodes, &method, Some(10)),
            Err(PlannerError::InvalidLocopoolConfig(_))
        ));
        let mut three_types = PlannerConfig::default();
        three_types.loco_info.push(LocoInfo {
            locomotive_type: "Hydrogen_Fuel_Cell".into(),
            fuel_type: FuelType::Hydrogen,
            pwr_rated: 2_500.0 * uc::KW,
            ..Default::default()
        });
        let method = LocoPoolMethod::SharesTwoway {
            shares: vec![0.3, 0.7],
        };
        assert!(matches!(
            build_locopool(&three_types, &demand, &nodes, &method, Some(10)),
            Err(PlannerError::InvalidLocopoolConfig(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PlannerConfig::default();
        config.cars_per_locomotive = TrainTypeMap::new(0);
        let demand = barstow_stockton_demand();
        let nodes = node_list(&demand);
        assert!(matches!(
            build_locopool(&config, &demand, &nodes, &LocoPoolMethod::Tile, None),
            Err(PlannerError::InvalidConfig(_))
        ));
        assert!(matches!(
            build_fleet(&demand, &nodes, &refueler_info_fixture(), &[], &config),
            Err(PlannerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_method() {
        assert!(matches!(
            LocoPoolMethod::from_name("random", vec![]),
            Err(PlannerError::InvalidLocopoolConfig(_))
        ));
        assert_eq!(
            LocoPoolMethod::from_name("tile", vec![]).unwrap(),
            LocoPoolMethod::Tile
        );
    }

    #[test]
    fn test_derived_fleet_size() {
        // mean of 2394, 2588, 2221, 1500, 900, 400 cars is 1667.17 per row;
        // 6 rows over 3 nodes gives 2 destinations per node
        let config = PlannerConfig::default();
        let demand = barstow_stockton_demand();
        let nodes = node_list(&demand);
        let pool = build_locopool(&config, &demand, &nodes, &LocoPoolMethod::Tile, None).unwrap();
        let per_node = (10003.0_f64 / 6.0 / 70.0 * 2.0).ceil() as usize;
        assert_eq!(pool.len(), per_node * 3);
    }

    #[test]
    fn test_single_train_mode_pool() {
        let config = PlannerConfig {
            single_train_mode: true,
            ..Default::default()
        };
        let demand = barstow_stockton_demand();
        let nodes = node_list(&demand);
        let pool = build_locopool(&config, &demand, &nodes, &LocoPoolMethod::Tile, None).unwrap();
        assert_eq!(pool.len(), (10003.0_f64 / 6.0 / 70.0).ceil() as usize);
        assert!(pool.iter().all(|l| l.node == NodeId::from("Barstow")));
        let ids: Vec<u32> = pool.iter().map(|l| l.locomotive_id).collect();
        assert_eq!(ids, (0..pool.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_large_nodes_keep_ids_unique() {
        let config = PlannerConfig::default();
        let demand = barstow_stockton_demand();
        let nodes = node_list(&demand);
        let pool =
            build_locopool(&config, &demand, &nodes, &LocoPoolMethod::Tile, Some(1200)).unwrap();
        let ids: HashSet<u32> = pool.iter().map(|l| l.locomotive_id).collect();
        assert_eq!(ids.len(), pool.len());
        assert_eq!(pool[0].locomotive_id, 10_000);
        assert_eq!(loco_id_stride(999), 1000);
        assert_eq!(loco_id_stride(1000), 10_000);
    }

    #[test]
    fn test_soc_bounds() {
        let config = PlannerConfig::default();
        let demand = barstow_stockton_demand();
        let nodes = node_list(&demand);
        let pool = build_locopool(&config, &demand, &nodes, &LocoPoolMethod::Tile, Some(4)).unwrap();
        for loco in &pool {
            assert!(loco.soc_min_j <= loco.soc_j);
            assert!(loco.soc_j <= loco.soc_max_j);
            assert!(loco.soc_max_j <= loco.capacity_j);
            assert!(loco.hp > 0.0 && loco.loco_mass_tons > 0.0);
        }
        let diesel = pool.iter().find(|l| l.fuel_type == FuelType::Diesel).unwrap();
        assert_eq!(diesel.capacity_j, defaults::DIESEL_TANK_CAPACITY_J);
        assert_eq!(diesel.soc_min_j, 0.0);
    }

    #[test]
    fn test_invalid_soc_rejected() {
        let mut info = LocoInfo::default_catalog().remove(1);
        if let Some(res) = info.res.as_mut() {
            res.min_soc = 0.99 * uc::R;
        }
        assert!(matches!(info.validate(), Err(PlannerError::InvalidConfig(_))));
    }
}
