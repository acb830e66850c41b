use super::loco_pool::LocomotiveRecord;
use super::planner_imports::*;
use serde_this_or_that::as_f64;

/// Refueling or charging equipment suited to one locomotive and fuel type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefuelerInfo {
    #[serde(rename = "Refueler_Type")]
    pub refueler_type: String,
    #[serde(rename = "Locomotive_Type")]
    pub locomotive_type: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: FuelType,
    #[serde(rename = "Refueler_J_Per_Hr", deserialize_with = "as_f64")]
    pub refueler_j_per_hr: f64,
    #[serde(rename = "Refueler_Efficiency", deserialize_with = "as_f64")]
    pub refueler_efficiency: f64,
    #[serde(rename = "Lifespan_Years", deserialize_with = "as_f64")]
    pub lifespan_years: f64,
    #[serde(rename = "Cost_USD", deserialize_with = "as_f64")]
    pub cost_usd: f64,
}

/// Refueling ports of one type at one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefuelerRecord {
    #[serde(rename = "Node")]
    pub node: NodeId,
    #[serde(rename = "Refueler_Type")]
    pub refueler_type: String,
    #[serde(rename = "Locomotive_Type")]
    pub locomotive_type: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: FuelType,
    #[serde(rename = "Refueler_J_Per_Hr")]
    pub refueler_j_per_hr: f64,
    #[serde(rename = "Refueler_Efficiency")]
    pub refueler_efficiency: f64,
    #[serde(rename = "Lifespan_Years")]
    pub lifespan_years: f64,
    #[serde(rename = "Cost_USD")]
    pub cost_usd: f64,
    #[serde(rename = "Port_Count")]
    pub port_count: u32,
    #[serde(rename = "Battery_Headroom_J")]
    pub battery_headroom_j: f64,
}

/// Battery headroom that locomotives departing `origin` for `destination`
/// must keep free
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkChargingGuideline {
    #[serde(rename = "Origin")]
    pub origin: NodeId,
    #[serde(rename = "Destination")]
    pub destination: NodeId,
    #[serde(rename = "Allowable_Battery_Headroom_MWh", deserialize_with = "as_f64")]
    pub allowable_battery_headroom_mwh: f64,
}

impl NetworkChargingGuideline {
    pub fn allowable_battery_headroom(&self) -> si::Energy {
        si::Energy::new::<si::megawatt_hour>(self.allowable_battery_headroom_mwh)
    }
}

fn import_csv<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(
    filepath: P,
    what: &str,
) -> anyhow::Result<Vec<T>> {
    let filepath = filepath.as_ref();
    let file = File::open(filepath)
        .with_context(|| format!("Could not open {what} file: {filepath:?}"))?;
    csv::Reader::from_reader(file)
        .deserialize()
        .enumerate()
        .map(|(row, result)| result.with_context(|| format!("{what} row {row} in {filepath:?}")))
        .collect()
}

pub fn import_refueler_info<P: AsRef<Path>>(filepath: P) -> anyhow::Result<Vec<RefuelerInfo>> {
    import_csv(filepath, "refueler info")
}

pub fn import_charging_guidelines<P: AsRef<Path>>(
    filepath: P,
) -> anyhow::Result<Vec<NetworkChargingGuideline>> {
    import_csv(filepath, "network charging guideline")
}

/// Sizes the refueling ports of every node.
///
/// Each (locomotive type, fuel type) present in the fleet gets
/// `ceil(refuelers_per_incoming_corridor * count / fleet size)` ports of its
/// matching refueler, and every node gets the same set.
pub fn build_refuelers(
    nodes: &[NodeId],
    loco_pool: &[LocomotiveRecord],
    refueler_info: &[RefuelerInfo],
    refuelers_per_incoming_corridor: u32,
) -> PlannerResult<Vec<RefuelerRecord>> {
    if loco_pool.is_empty() {
        return Ok(vec![]);
    }
    let fleet_size = loco_pool.len() as u64;
    let ports_per_node = utils::counts_in_order(
        loco_pool
            .iter()
            .map(|l| (l.locomotive_type.as_str(), l.fuel_type)),
    )
    .into_iter()
    .map(|((locomotive_type, fuel_type), count)| {
        let info = refueler_info
            .iter()
            .find(|ri| ri.locomotive_type == locomotive_type && ri.fuel_type == fuel_type)
            .ok_or_else(|| {
                PlannerError::MissingCatalogEntry(format!(
                    "no refueler for locomotive type {locomotive_type:?} with fuel type {fuel_type}"
                ))
            })?;
        let port_count =
            utils::div_ceil(refuelers_per_incoming_corridor as u64 * count as u64, fleet_size);
        Ok((info, port_count as u32))
    })
    .collect::<PlannerResult<Vec<_>>>()?;

    let mut sorted_nodes: Vec<&NodeId> = nodes.iter().collect();
    sorted_nodes.sort();
    Ok(sorted_nodes
        .into_iter()
        .flat_map(|node| {
            ports_per_node.iter().map(|(info, port_count)| RefuelerRecord {
                node: node.clone(),
                refueler_type: info.refueler_type.clone(),
                locomotive_type: info.locomotive_type.clone(),
                fuel_type: info.fuel_type,
                refueler_j_per_hr: info.refueler_j_per_hr,
                refueler_efficiency: info.refueler_efficiency,
                lifespan_years: info.lifespan_years,
                cost_usd: info.cost_usd,
                port_count: *port_count,
                battery_headroom_j: 0.0,
            })
        })
        .collect())
}

/// Smallest allowable battery headroom, in joules, over the guideline lanes
/// leaving each origin that carry demand
fn headroom_by_origin(
    demand: &[DemandRecord],
    guidelines: &[NetworkChargingGuideline],
) -> HashMap<NodeId, f64> {
    let active_ods: HashSet<(&NodeId, &NodeId)> = demand
        .iter()
        .map(|r| (&r.origin, &r.destination))
        .collect();
    let mut headroom: HashMap<NodeId, f64> = HashMap::new();
    for g in guidelines
        .iter()
        .filter(|g| active_ods.contains(&(&g.origin, &g.destination)))
    {
        let h = g.allowable_battery_headroom().get::<si::joule>();
        headroom
            .entry(g.origin.clone())
            .and_modify(|min| *min = min.min(h))
            .or_insert(h);
    }
    headroom
}

/// Applies network charging guidelines to refuelers and locomotives.
///
/// Electric refuelers and locomotives at each origin get the smallest
/// allowable headroom over that origin's active lanes, or zero when no
/// guideline applies.  Other fuel types get zero.  Each locomotive's starting
/// and target state of charge become
/// `max(soc_max_j - battery_headroom_j, soc_min_j)`.
pub fn append_charging_guidelines(
    mut refuelers: Vec<RefuelerRecord>,
    mut loco_pool: Vec<LocomotiveRecord>,
    demand: &[DemandRecord],
    guidelines: &[NetworkChargingGuideline],
) -> (Vec<RefuelerRecord>, Vec<LocomotiveRecord>) {
    let headroom = headroom_by_origin(demand, guidelines);
    let headroom_at = |node: &NodeId, fuel_type: FuelType| match fuel_type {
        FuelType::Electricity => headroom.get(node).copied().unwrap_or_default(),
        _ => 0.0,
    };
    for (node, h) in &headroom {
        log::debug!("Battery headroom at {node}: {} J", h.format_eng(Some(5)));
    }

    for refueler in refuelers.iter_mut() {
        refueler.battery_headroom_j = headroom_at(&refueler.node, refueler.fuel_type);
    }
    for loco in loco_pool.iter_mut() {
        loco.battery_headroom_j = headroom_at(&loco.node, loco.fuel_type);
        loco.soc_j = (loco.soc_max_j - loco.battery_headroom_j).max(loco.soc_min_j);
        loco.soc_target_j = loco.soc_j;
    }
    (refuelers, loco_pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    fn pool_of(counts: &[(&str, FuelType, usize)]) -> Vec<LocomotiveRecord> {
        let mut pool = vec![];
        for (locomotive_type, fuel_type, count) in counts {
            let info = LocoInfo {
                locomotive_type: locomotive_type.to_string(),
                fuel_type: *fuel_type,
                ..Default::default()
            };
            for _ in 0..*count {
                let id = pool.len() as u32;
                pool.push(LocomotiveRecord::new(id, "A".into(), &info));
            }
        }
        pool
    }

    fn refueler(locomotive_type: &str, fuel_type: FuelType) -> RefuelerInfo {
        RefuelerInfo {
            refueler_type: format!("{locomotive_type}_Refueler"),
            locomotive_type: locomotive_type.into(),
            fuel_type,
            refueler_j_per_hr: 1.0e9,
            refueler_efficiency: 0.95,
            lifespan_years: 20.0,
            cost_usd: 1.0e6,
        }
    }

    #[test]
    fn test_port_count_example() {
        let pool = pool_of(&[
            ("A", FuelType::Diesel, 60),
            ("B", FuelType::Electricity, 40),
        ]);
        let info = vec![
            refueler("A", FuelType::Diesel),
            refueler("B", FuelType::Electricity),
        ];
        let nodes = vec![NodeId::from("Y"), NodeId::from("X")];
        let refuelers = build_refuelers(&nodes, &pool, &info, 3).unwrap();
        assert_eq!(refuelers.len(), 4);
        assert!(refuelers.iter().all(|r| r.port_count == 2));
        assert_eq!(refuelers[0].node, NodeId::from("X"));
        assert_eq!(refuelers[0].locomotive_type, "A");
        assert_eq!(refuelers[1].locomotive_type, "B");
        assert_eq!(refuelers[2].node, NodeId::from("Y"));
    }

    #[test]
    fn test_present_type_gets_a_port() {
        let pool = pool_of(&[
            ("A", FuelType::Diesel, 99),
            ("B", FuelType::Electricity, 1),
        ]);
        let info = vec![
            refueler("A", FuelType::Diesel),
            refueler("B", FuelType::Electricity),
        ];
        let refuelers = build_refuelers(&[NodeId::from("X")], &pool, &info, 4).unwrap();
        assert_eq!(refuelers[0].port_count, 4);
        assert_eq!(refuelers[1].port_count, 1);
    }

    #[test]
    fn test_missing_refueler_info() {
        let pool = pool_of(&[("A", FuelType::Diesel, 2)]);
        let info = vec![refueler("A", FuelType::Electricity)];
        assert!(matches!(
            build_refuelers(&[NodeId::from("X")], &pool, &info, 4),
            Err(PlannerError::MissingCatalogEntry(_))
        ));
    }

    #[test]
    fn test_charging_guidelines() {
        let config = PlannerConfig::default();
        let demand = barstow_stockton_demand();
        let nodes = node_list(&demand);
        let pool =
            build_locopool(&config, &demand, &nodes, &LocoPoolMethod::Tile, Some(2)).unwrap();
        let refuelers =
            build_refuelers(&nodes, &pool, &refueler_info_fixture(), 4).unwrap();
        let guidelines = vec![
            NetworkChargingGuideline {
                origin: "Barstow".into(),
                destination: "Stockton".into(),
                allowable_battery_headroom_mwh: 1.0,
            },
            NetworkChargingGuideline {
                origin: "Barstow".into(),
                destination: "Fresno".into(),
                allowable_battery_headroom_mwh: 0.5,
            },
            NetworkChargingGuideline {
                origin: "Stockton".into(),
                destination: "Barstow".into(),
                allowable_battery_headroom_mwh: 0.25,
            },
        ];
        let (refuelers, pool) = append_charging_guidelines(refuelers, pool, &demand, &guidelines);

        let mwh = 3.6e9;
        // Barstow -> Fresno carries no demand, so only Barstow -> Stockton applies
        let barstow_bel = pool
            .iter()
            .find(|l| l.node.as_str() == "Barstow" && l.fuel_type == FuelType::Electricity)
            .unwrap();
        assert!(almost_eq(barstow_bel.battery_headroom_j, mwh, None));
        assert!(almost_eq(barstow_bel.soc_j, barstow_bel.soc_max_j - mwh, None));
        assert_eq!(barstow_bel.soc_target_j, barstow_bel.soc_j);

        let fresno_bel = pool
            .iter()
            .find(|l| l.node.as_str() == "Fresno" && l.fuel_type == FuelType::Electricity)
            .unwrap();
        assert_eq!(fresno_bel.battery_headroom_j, 0.0);
        assert_eq!(fresno_bel.soc_j, fresno_bel.soc_max_j);

        let stockton_charger = refuelers
            .iter()
            .find(|r| r.node.as_str() == "Stockton" && r.fuel_type == FuelType::Electricity)
            .unwrap();
        assert!(almost_eq(stockton_charger.battery_headroom_j, 0.25 * mwh, None));
        assert!(refuelers
            .iter()
            .filter(|r| r.fuel_type == FuelType::Diesel)
            .all(|r| r.battery_headroom_j == 0.0));
        assert!(pool.iter().all(|l| l.soc_min_j <= l.soc_j && l.soc_j <= l.soc_max_j));
    }

    #[test]
    fn test_headroom_clipped_at_min_soc() {
        let config = PlannerConfig::default();
        let demand = vec![DemandRecord::new("A", "B", TrainType::Intermodal, 10, 20)];
        let nodes = node_list(&demand);
        let pool =
            build_locopool(&config, &demand, &nodes, &LocoPoolMethod::Tile, Some(2)).unwrap();
        let guidelines = vec![NetworkChargingGuideline {
            origin: "A".into(),
            destination: "B".into(),
            allowable_battery_headroom_mwh: 100.0,
        }];
        let (_, pool) = append_charging_guidelines(vec![], pool, &demand, &guidelines);
        let bel = pool
            .iter()
            .find(|l| l.node.as_str() == "A" && l.fuel_type == FuelType::Electricity)
            .unwrap();
        assert_eq!(bel.soc_j, bel.soc_min_j);
    }

    #[test]
    fn test_import_catalogs() {
        let info = import_refueler_info("./resources/refueler_info.csv").unwrap();
        assert_eq!(info.len(), 2);
        assert!(info.iter().any(|ri| ri.fuel_type == FuelType::Electricity));
        let guidelines =
            import_charging_guidelines("./resources/network_charging_guidelines.csv").unwrap();
        assert!(!guidelines.is_empty());
        assert!(guidelines
            .iter()
            .all(|g| g.allowable_battery_headroom() >= si::Energy::ZERO));
    }
}
