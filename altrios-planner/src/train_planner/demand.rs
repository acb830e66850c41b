use super::planner_imports::*;

/// Opaque identifier of a demand node, e.g. a yard or terminal
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Train service type.  Loaded types carry revenue freight; `*_Empty` types
/// move empty cars back toward their loading origins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TrainType {
    Unit,
    Manifest,
    Intermodal,
    #[serde(rename = "Unit_Empty")]
    UnitEmpty,
    #[serde(rename = "Manifest_Empty")]
    ManifestEmpty,
    #[serde(rename = "Intermodal_Empty")]
    IntermodalEmpty,
}

impl TrainType {
    pub const ALL: [TrainType; 6] = [
        Self::Unit,
        Self::Manifest,
        Self::Intermodal,
        Self::UnitEmpty,
        Self::ManifestEmpty,
        Self::IntermodalEmpty,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unit => "Unit",
            Self::Manifest => "Manifest",
            Self::Intermodal => "Intermodal",
            Self::UnitEmpty => "Unit_Empty",
            Self::ManifestEmpty => "Manifest_Empty",
            Self::IntermodalEmpty => "Intermodal_Empty",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            Self::UnitEmpty | Self::ManifestEmpty | Self::IntermodalEmpty
        )
    }

    /// Empty-car counterpart; empty types map to themselves
    pub fn to_empty(self) -> Self {
        match self {
            Self::Unit | Self::UnitEmpty => Self::UnitEmpty,
            Self::Manifest | Self::ManifestEmpty => Self::ManifestEmpty,
            Self::Intermodal | Self::IntermodalEmpty => Self::IntermodalEmpty,
        }
    }

    /// Loaded counterpart; loaded types map to themselves
    pub fn to_loaded(self) -> Self {
        match self {
            Self::Unit | Self::UnitEmpty => Self::Unit,
            Self::Manifest | Self::ManifestEmpty => Self::Manifest,
            Self::Intermodal | Self::IntermodalEmpty => Self::Intermodal,
        }
    }
}

impl fmt::Display for TrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TrainType {
    type Err = PlannerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|tt| tt.label() == s.trim())
            .copied()
            .ok_or_else(|| {
                PlannerError::MalformedDemand(format!(
                    "unrecognized train type {s:?}, must be one of {:?}",
                    Self::ALL.map(|tt| tt.label())
                ))
            })
    }
}

/// Key of the fallback entry in every [TrainTypeMap]
pub const DEFAULT_KEY: &str = "Default";

/// Per-train-type parameter with a mandatory `"Default"` fallback.  Serialized
/// as a map from train type label (or `"Default"`) to value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, T>",
    into = "BTreeMap<String, T>",
    bound(
        serialize = "T: Clone + Serialize",
        deserialize = "T: Deserialize<'de>"
    )
)]
pub struct TrainTypeMap<T> {
    default: T,
    by_type: BTreeMap<TrainType, T>,
}

impl<T> TrainTypeMap<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            by_type: BTreeMap::new(),
        }
    }

    /// Builder-style setter for a type-specific value
    pub fn with(mut self, train_type: TrainType, value: T) -> Self {
        self.by_type.insert(train_type, value);
        self
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Value for `train_type`, falling back to the `"Default"` entry
    pub fn get(&self, train_type: TrainType) -> &T {
        self.by_type.get(&train_type).unwrap_or(&self.default)
    }

    pub fn values(&self) -> impl Iterator<Item = (Option<TrainType>, &T)> {
        std::iter::once((None, &self.default))
            .chain(self.by_type.iter().map(|(tt, v)| (Some(*tt), v)))
    }
}

impl<T: Copy> TrainTypeMap<T> {
    pub fn lookup(&self, train_type: TrainType) -> T {
        *self.get(train_type)
    }
}

impl<T> TryFrom<BTreeMap<String, T>> for TrainTypeMap<T> {
    type Error = PlannerError;
    fn try_from(mut value: BTreeMap<String, T>) -> Result<Self, Self::Error> {
        let default = value.remove(DEFAULT_KEY).ok_or_else(|| {
            PlannerError::InvalidConfig(format!("per-train-type map requires a {DEFAULT_KEY:?} entry"))
        })?;
        let by_type = value
            .into_iter()
            .map(|(key, v)| {
                key.parse::<TrainType>()
                    .map(|tt| (tt, v))
                    .map_err(|err| PlannerError::InvalidConfig(err.to_string()))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { default, by_type })
    }
}

impl<T> From<TrainTypeMap<T>> for BTreeMap<String, T> {
    fn from(value: TrainTypeMap<T>) -> Self {
        let mut map: BTreeMap<String, T> = value
            .by_type
            .into_iter()
            .map(|(tt, v)| (tt.label().to_string(), v))
            .collect();
        map.insert(DEFAULT_KEY.to_string(), value.default);
        map
    }
}

/// One row of origin-destination freight demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRecord {
    #[serde(rename = "Origin")]
    pub origin: NodeId,
    #[serde(rename = "Destination")]
    pub destination: NodeId,
    #[serde(rename = "Train_Type")]
    pub train_type: TrainType,
    #[serde(rename = "Number_of_Cars")]
    pub number_of_cars: u32,
    #[serde(rename = "Number_of_Containers")]
    pub number_of_containers: u32,
}

impl DemandRecord {
    pub fn new<O: Into<NodeId>, D: Into<NodeId>>(
        origin: O,
        destination: D,
        train_type: TrainType,
        number_of_cars: u32,
        number_of_containers: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            train_type,
            number_of_cars,
            number_of_containers,
        }
    }

    /// Same demand headed back from `destination` to `origin` as empty cars
    pub fn reversed_empty(&self) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
            train_type: self.train_type.to_empty(),
            number_of_cars: self.number_of_cars,
            number_of_containers: self.number_of_containers,
        }
    }
}

pub const DEMAND_COLUMNS: [&str; 5] = [
    "Origin",
    "Destination",
    "Train_Type",
    "Number_of_Cars",
    "Number_of_Containers",
];

#[ext(DemandFrameExt)]
impl DataFrame {
    /// Column of `name` as owned strings; nulls are rejected
    fn string_column(&self, name: &str) -> PlannerResult<Vec<String>> {
        let series = self.column(name)?;
        if series.null_count() > 0 {
            return Err(PlannerError::MalformedDemand(format!(
                "column {name:?} has {} missing value(s)",
                series.null_count()
            )));
        }
        Ok(series
            .utf8()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    }

    /// Column of `name` as unsigned counts; nulls and negatives are rejected
    fn count_column(&self, name: &str) -> PlannerResult<Vec<u32>> {
        let series = self.column(name)?;
        series
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                None => Err(PlannerError::MalformedDemand(format!(
                    "column {name:?} row {row} is missing or not an integer"
                ))),
                Some(v) => u32::try_from(v).map_err(|_| {
                    PlannerError::MalformedDemand(format!(
                        "column {name:?} row {row} has invalid count {v}"
                    ))
                }),
            })
            .collect()
    }
}

/// Validates the demand table and extracts the node list.
///
/// # Arguments
/// - `demand_table`: DataFrame with columns `Origin`, `Destination`,
///   `Train_Type`, `Number_of_Cars`, `Number_of_Containers`
///
/// # Returns
/// Parsed demand rows in table order, plus the sorted, deduplicated union of
/// origins and destinations.
pub fn load_freight_demand(
    demand_table: &DataFrame,
) -> PlannerResult<(Vec<DemandRecord>, Vec<NodeId>)> {
    let present = demand_table.get_column_names();
    let missing: Vec<&str> = DEMAND_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        return Err(PlannerError::MalformedDemand(format!(
            "missing required column(s) {missing:?}"
        )));
    }

    // non-strict casts turn uncoercible values into nulls, which
    // `count_column` reports along with genuinely missing values
    let coerced = demand_table
        .clone()
        .lazy()
        .select([
            col("Origin").cast(DataType::Utf8),
            col("Destination").cast(DataType::Utf8),
            col("Train_Type").cast(DataType::Utf8),
            col("Number_of_Cars").cast(DataType::Int64),
            col("Number_of_Containers").cast(DataType::Int64),
        ])
        .collect()?;

    let origins = coerced.string_column("Origin")?;
    let destinations = coerced.string_column("Destination")?;
    let train_types = coerced.string_column("Train_Type")?;
    let cars = coerced.count_column("Number_of_Cars")?;
    let containers = coerced.count_column("Number_of_Containers")?;

    let records = origins
        .into_iter()
        .zip(destinations)
        .zip(train_types)
        .zip(cars.into_iter().zip(containers))
        .map(|(((origin, destination), train_type), (cars, containers))| {
            Ok(DemandRecord::new(
                origin,
                destination,
                train_type.parse()?,
                cars,
                containers,
            ))
        })
        .collect::<PlannerResult<Vec<_>>>()?;

    let nodes = node_list(&records);
    log::info!(
        "Loaded {} demand rows spanning {} nodes",
        records.len(),
        nodes.len()
    );
    Ok((records, nodes))
}

/// Raw CSV row; counts stay textual until validated
#[derive(Debug, Deserialize)]
struct DemandCsvRow {
    #[serde(rename = "Origin")]
    origin: String,
    #[serde(rename = "Destination")]
    destination: String,
    #[serde(rename = "Train_Type")]
    train_type: String,
    #[serde(rename = "Number_of_Cars")]
    number_of_cars: String,
    #[serde(rename = "Number_of_Containers")]
    number_of_containers: String,
}

fn parse_count(raw: &str, column: &str, row: usize) -> PlannerResult<u32> {
    let raw = raw.trim();
    let parsed = raw
        .parse::<i64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && v.is_finite())
                .map(|v| v as i64)
        })
        .ok_or_else(|| {
            PlannerError::MalformedDemand(format!(
                "column {column:?} row {row} value {raw:?} is not an integer"
            ))
        })?;
    u32::try_from(parsed).map_err(|_| {
        PlannerError::MalformedDemand(format!(
            "column {column:?} row {row} has invalid count {parsed}"
        ))
    })
}

/// Reads and validates demand from a CSV file with the same columns as
/// [load_freight_demand].
pub fn load_freight_demand_csv<P: AsRef<Path>>(
    filepath: P,
) -> anyhow::Result<(Vec<DemandRecord>, Vec<NodeId>)> {
    let filepath = filepath.as_ref();
    let file = File::open(filepath)
        .with_context(|| format!("Could not open demand file: {filepath:?}"))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = DEMAND_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h.trim() == *c))
        .collect();
    if !missing.is_empty() {
        return Err(PlannerError::MalformedDemand(format!(
            "missing required column(s) {missing:?} in {filepath:?}"
        ))
        .into());
    }

    let mut records = vec![];
    for (row, result) in reader.deserialize().enumerate() {
        let raw: DemandCsvRow = result.with_context(|| format_dbg!(row))?;
        records.push(DemandRecord::new(
            raw.origin.trim(),
            raw.destination.trim(),
            raw.train_type.parse()?,
            parse_count(&raw.number_of_cars, "Number_of_Cars", row)?,
            parse_count(&raw.number_of_containers, "Number_of_Containers", row)?,
        ));
    }
    let nodes = node_list(&records);
    Ok((records, nodes))
}

/// Sorted unique union of origins and destinations
pub fn node_list(demand: &[DemandRecord]) -> Vec<NodeId> {
    demand
        .iter()
        .flat_map(|r| [&r.origin, &r.destination])
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Checks that container-bearing demand does not carry more containers than
/// its cars can hold.
pub fn check_container_capacity(
    demand: &[DemandRecord],
    config: &PlannerConfig,
) -> PlannerResult<()> {
    for r in demand
        .iter()
        .filter(|r| r.train_type.to_loaded() == TrainType::Intermodal)
    {
        let capacity = r.number_of_cars as f64 * config.containers_per_car;
        if r.number_of_containers as f64 > capacity {
            return Err(PlannerError::MalformedDemand(format!(
                "{} -> {} ({}) has {} containers but {} cars hold at most {capacity}",
                r.origin, r.destination, r.train_type, r.number_of_containers, r.number_of_cars
            )));
        }
    }
    Ok(())
}
