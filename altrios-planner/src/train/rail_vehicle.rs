use crate::imports::*;
use crate::utils::KG_PER_TON;

/// Railcar attributes the planner needs to estimate train tonnage.  Columns of
/// a full rail vehicle file that are not listed here are ignored on import.
#[planner_api]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, SerdeAPI)]
pub struct RailVehicle {
    /// Unique user-defined identifier for the car type
    #[serde(alias = "Car Type")]
    pub car_type: String,

    /// Railcar axle count (typically 4)
    #[serde(alias = "Axle Count")]
    pub axle_count: u8,
    /// Railcar empty mass (excluding freight)
    #[serde(alias = "Mass Static Empty (kg)")]
    pub mass_static_empty: si::Mass,
    /// Railcar loaded mass (including freight)
    #[serde(alias = "Mass Static Loaded (kg)")]
    pub mass_static_loaded: si::Mass,
    /// Additional mass value to adjust for rotating mass in wheels and axles (typically 1,500 lbs)
    #[serde(alias = "Mass Extra per Axle (kg)")]
    pub mass_extra_per_axle: si::Mass,
}

impl RailVehicle {
    /// Mass of one car including rotating-mass allowance
    pub fn mass_per_car(&self, loaded: bool) -> si::Mass {
        let mass_static = if loaded {
            self.mass_static_loaded
        } else {
            self.mass_static_empty
        };
        mass_static + self.mass_extra_per_axle * self.axle_count as f64
    }

    /// Short tons per car, as used by the train planner's tonnage and
    /// horsepower requirements
    pub fn tons_per_car(&self, loaded: bool) -> f64 {
        self.mass_per_car(loaded).get::<si::kilogram>() / KG_PER_TON
    }
}

pub type RailVehicleMap = HashMap<String, RailVehicle>;

#[cfg(feature = "pyo3")]
#[cfg_attr(feature = "pyo3", pyfunction(name = "import_rail_vehicles"))]
pub fn import_rail_vehicles_py(filepath: PathBuf) -> anyhow::Result<RailVehicleMap> {
    import_rail_vehicles(filepath)
}

pub fn import_rail_vehicles<P: AsRef<Path>>(filename: P) -> anyhow::Result<RailVehicleMap> {
    let file_read = File::open(filename.as_ref())
        .with_context(|| format!("Could not open rail vehicle file: {:?}", filename.as_ref()))?;
    let mut reader = csv::Reader::from_reader(file_read);
    let mut rail_vehicle_map = RailVehicleMap::default();
    for result in reader.deserialize() {
        let rail_vehicle: RailVehicle = result?;
        rail_vehicle_map.insert(rail_vehicle.car_type.clone(), rail_vehicle);
    }
    Ok(rail_vehicle_map)
}
