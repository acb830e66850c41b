use super::planner_imports::*;

/// Train planner configuration.  Every field has a default, so a config file
/// only needs the values it overrides.
#[planner_api(
    #[staticmethod]
    #[pyo3(name = "with_loco_pool_method")]
    fn with_loco_pool_method_py(
        method: &str,
        shares: Option<Vec<f64>>,
        locomotives_per_node: Option<u32>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            loco_pool_method: LocoPoolMethod::from_name(method, shares.unwrap_or_default())?,
            locomotives_per_node,
            ..Default::default()
        })
    }

    #[getter]
    fn get_single_train_mode(&self) -> bool {
        self.single_train_mode
    }

    #[setter]
    fn set_single_train_mode(&mut self, single_train_mode: bool) {
        self.single_train_mode = single_train_mode;
    }

    #[getter]
    fn get_manifest_empty_return_ratio(&self) -> f64 {
        self.manifest_empty_return_ratio
    }

    #[setter]
    fn set_manifest_empty_return_ratio(&mut self, ratio: f64) -> anyhow::Result<()> {
        ensure!(ratio >= 0.0, "`manifest_empty_return_ratio` must be non-negative");
        self.manifest_empty_return_ratio = ratio;
        Ok(())
    }

    #[getter]
    fn get_simulation_days(&self) -> u32 {
        self.simulation_days
    }

    #[setter]
    fn set_simulation_days(&mut self, simulation_days: u32) {
        self.simulation_days = simulation_days;
    }
)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Share of loaded manifest cars that return empty along the reverse lane
    pub manifest_empty_return_ratio: f64,
    pub min_cars_per_train: TrainTypeMap<u32>,
    pub target_cars_per_train: TrainTypeMap<u32>,
    /// Containers carried per intermodal car
    pub containers_per_car: f64,
    /// Cars hauled per locomotive, used to size the initial fleet
    pub cars_per_locomotive: TrainTypeMap<u32>,
    pub hp_required_per_ton: TrainTypeMap<f64>,
    /// Days of demand represented by each planning run
    pub simulation_days: u32,
    /// Plan exactly one train per lane, for debugging and demos
    pub single_train_mode: bool,
    /// Return demand policy by loaded train type.  Loaded types without an
    /// entry produce no return demand.
    pub return_demand_generators: BTreeMap<TrainType, ReturnDemandPolicy>,
    /// Locomotive type catalog
    pub loco_info: Vec<LocoInfo>,
    pub refuelers_per_incoming_corridor: u32,
    pub loco_pool_method: LocoPoolMethod,
    /// Locomotives per home node; derived from demand when `None`
    pub locomotives_per_node: Option<u32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            manifest_empty_return_ratio: defaults::MANIFEST_EMPTY_RETURN_RATIO,
            min_cars_per_train: TrainTypeMap::new(defaults::MIN_CARS_PER_TRAIN),
            target_cars_per_train: TrainTypeMap::new(defaults::TARGET_CARS_PER_TRAIN),
            containers_per_car: defaults::CONTAINERS_PER_CAR,
            cars_per_locomotive: TrainTypeMap::new(defaults::CARS_PER_LOCOMOTIVE),
            hp_required_per_ton: TrainTypeMap::new(defaults::HP_REQUIRED_PER_TON_LOADED)
                .with(TrainType::UnitEmpty, defaults::HP_REQUIRED_PER_TON_EMPTY)
                .with(TrainType::ManifestEmpty, defaults::HP_REQUIRED_PER_TON_EMPTY)
                .with(TrainType::IntermodalEmpty, defaults::HP_REQUIRED_PER_TON_EMPTY),
            simulation_days: defaults::SIMULATION_DAYS,
            single_train_mode: false,
            return_demand_generators: ReturnDemandPolicy::defaults(),
            loco_info: LocoInfo::default_catalog(),
            refuelers_per_incoming_corridor: defaults::REFUELERS_PER_INCOMING_CORRIDOR,
            loco_pool_method: LocoPoolMethod::default(),
            locomotives_per_node: None,
        }
    }
}

impl SerdeAPI for PlannerConfig {
    fn init(&mut self) -> PlannerResult<()> {
        self.validate()
    }
}

impl PlannerConfig {
    /// Checks the invariants serde cannot express
    pub fn validate(&self) -> PlannerResult<()> {
        let invalid = |msg: String| Err(PlannerError::InvalidConfig(msg));
        if !(self.manifest_empty_return_ratio >= 0.0) {
            return invalid(format!(
                "`manifest_empty_return_ratio` must be non-negative, got {}",
                self.manifest_empty_return_ratio
            ));
        }
        if !(self.containers_per_car > 0.0) {
            return invalid(format!(
                "`containers_per_car` must be positive, got {}",
                self.containers_per_car
            ));
        }
        for tt in TrainType::ALL {
            let (min, target) = (
                self.min_cars_per_train.lookup(tt),
                self.target_cars_per_train.lookup(tt),
            );
            if min == 0 || target == 0 || min > target {
                return invalid(format!(
                    "cars per train for {tt} must satisfy 0 < min <= target, got min {min} and target {target}"
                ));
            }
        }
        if self.cars_per_locomotive.values().any(|(_, cpl)| *cpl == 0) {
            return invalid("`cars_per_locomotive` entries must be positive".into());
        }
        for (tt, policy) in &self.return_demand_generators {
            if tt.is_empty() || policy.train_type() != *tt {
                return invalid(format!(
                    "return demand policy {policy:?} cannot be used for train type {tt}"
                ));
            }
        }
        let mut seen = HashSet::new();
        for loco in &self.loco_info {
            if !seen.insert(loco.locomotive_type.as_str()) {
                return invalid(format!(
                    "duplicate locomotive type {:?} in `loco_info`",
                    loco.locomotive_type
                ));
            }
            loco.validate()?;
        }
        if let LocoPoolMethod::SharesTwoway { shares } = &self.loco_pool_method {
            LocoPoolMethod::check_shares(shares, self.loco_info.len())?;
        }
        Ok(())
    }

    /// Catalog entry for `locomotive_type`
    pub fn loco_info_for(&self, locomotive_type: &str) -> PlannerResult<&LocoInfo> {
        self.loco_info
            .iter()
            .find(|li| li.locomotive_type == locomotive_type)
            .ok_or_else(|| {
                PlannerError::MissingCatalogEntry(format!(
                    "locomotive type {locomotive_type:?} not found in `loco_info`"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PlannerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.min_cars_per_train.lookup(TrainType::Unit), 60);
        assert_eq!(config.target_cars_per_train.lookup(TrainType::ManifestEmpty), 180);
        assert_eq!(config.hp_required_per_ton.lookup(TrainType::Manifest), 2.0);
        assert_eq!(config.hp_required_per_ton.lookup(TrainType::ManifestEmpty), 0.5);
        assert_eq!(config.return_demand_generators.len(), 3);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = PlannerConfig::from_yaml(
            "manifest_empty_return_ratio: 0.5\nmin_cars_per_train:\n  Default: 50\n  Intermodal: 40\n",
            false,
        )
        .unwrap();
        assert_eq!(config.manifest_empty_return_ratio, 0.5);
        assert_eq!(config.min_cars_per_train.lookup(TrainType::Intermodal), 40);
        assert_eq!(config.min_cars_per_train.lookup(TrainType::Unit), 50);
        assert_eq!(config.target_cars_per_train.lookup(TrainType::Unit), 180);
        assert_eq!(config.loco_info, PlannerConfig::default().loco_info);
    }

    #[test]
    fn test_resource_config() {
        let config =
            PlannerConfig::from_file("./resources/planner_config.yaml", false).unwrap();
        assert_eq!(config.refuelers_per_incoming_corridor, 3);
        assert_eq!(
            config.loco_pool_method,
            LocoPoolMethod::SharesTwoway {
                shares: vec![0.3, 0.7]
            }
        );
        assert_eq!(config.locomotives_per_node, Some(10));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(PlannerConfig::from_yaml("manifest_empty_return_ratio: -0.1\n", false).is_err());
        assert!(PlannerConfig::from_yaml("containers_per_car: 0.0\n", false).is_err());
        assert!(PlannerConfig::from_yaml(
            "min_cars_per_train:\n  Default: 200\n",
            false
        )
        .is_err());
        // skipping init leaves validation to the caller
        let unchecked =
            PlannerConfig::from_yaml("manifest_empty_return_ratio: -0.1\n", true).unwrap();
        assert!(matches!(
            unchecked.validate(),
            Err(PlannerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_mismatched_return_policy_rejected() {
        let mut config = PlannerConfig::default();
        config
            .return_demand_generators
            .insert(TrainType::Unit, ReturnDemandPolicy::Intermodal);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_loco_info_lookup() {
        let config = PlannerConfig::default();
        assert_eq!(
            config.loco_info_for("BEL").unwrap().fuel_type,
            FuelType::Electricity
        );
        assert!(matches!(
            config.loco_info_for("Steam"),
            Err(PlannerError::MissingCatalogEntry(_))
        ));
    }
}
