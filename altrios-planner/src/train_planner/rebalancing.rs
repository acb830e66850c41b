use super::planner_imports::*;

/// Extra empty manifest cars moved from a node with surplus cars to a node
/// short of cars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    #[serde(rename = "Origin")]
    pub origin: NodeId,
    #[serde(rename = "Destination")]
    pub destination: NodeId,
    #[serde(rename = "Train_Type")]
    pub train_type: TrainType,
    #[serde(rename = "Number_of_Cars")]
    pub number_of_cars: u32,
}

impl From<&BalanceEntry> for DemandRecord {
    fn from(value: &BalanceEntry) -> Self {
        DemandRecord {
            origin: value.origin.clone(),
            destination: value.destination.clone(),
            train_type: value.train_type,
            number_of_cars: value.number_of_cars,
            number_of_containers: 0,
        }
    }
}

/// Manifest cars received and dispatched at one node
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub received: u64,
    pub dispatched: u64,
}

impl LedgerEntry {
    pub fn is_balanced(&self) -> bool {
        self.received == self.dispatched
    }
}

/// Per-node manifest car ledger in stable node order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ManifestLedger(pub Vec<(NodeId, LedgerEntry)>);

impl ManifestLedger {
    /// Builds the ledger from loaded manifest demand and the manifest empties
    /// already generated as return demand.  Only nodes touched by manifest
    /// traffic are included, ordered as in `nodes`; nodes absent from
    /// `nodes` follow in sorted order.
    pub fn from_demand(
        demand: &[DemandRecord],
        demand_returns: &[DemandRecord],
        nodes: &[NodeId],
    ) -> Self {
        let mut entries: HashMap<&NodeId, LedgerEntry> = HashMap::new();
        for r in demand
            .iter()
            .filter(|r| r.train_type == TrainType::Manifest)
            .chain(
                demand_returns
                    .iter()
                    .filter(|r| r.train_type == TrainType::ManifestEmpty),
            )
        {
            entries.entry(&r.origin).or_default().dispatched += r.number_of_cars as u64;
            entries.entry(&r.destination).or_default().received += r.number_of_cars as u64;
        }
        let mut ledger: Vec<(NodeId, LedgerEntry)> = nodes
            .iter()
            .filter_map(|node| entries.remove(node).map(|e| (node.clone(), e)))
            .collect();
        let mut unlisted: Vec<(NodeId, LedgerEntry)> = entries
            .into_iter()
            .map(|(node, e)| (node.clone(), e))
            .collect();
        unlisted.sort_by(|a, b| a.0.cmp(&b.0));
        ledger.extend(unlisted);
        Self(ledger)
    }

    pub fn unbalanced_nodes(&self) -> Vec<NodeId> {
        self.0
            .iter()
            .filter(|(_, e)| !e.is_balanced())
            .map(|(node, _)| node.clone())
            .collect()
    }

    /// Iteration budget of the balancing loop
    pub fn max_iterations(&self) -> usize {
        let n = self.0.len();
        n * n.saturating_sub(1) / 2
    }

    /// Closes the books of every node by moving each surplus node's excess
    /// cars to the first node in deficit.
    ///
    /// Each transfer settles the surplus node, so a ledger whose network-wide
    /// received and dispatched totals agree balances in fewer than
    /// `n` steps.  A ledger left unbalanced when the loop stops is an error.
    pub fn balance(&mut self) -> PlannerResult<Vec<BalanceEntry>> {
        let max_iter = self.max_iterations();
        let mut transfers = vec![];
        let mut step = 0;
        while step < max_iter && self.0.iter().any(|(_, e)| !e.is_balanced()) {
            let deficit = self.0.iter().position(|(_, e)| e.received < e.dispatched);
            let surplus = self.0.iter().position(|(_, e)| e.received > e.dispatched);
            let (Some(deficit), Some(surplus)) = (deficit, surplus) else {
                break;
            };
            let amount = self.0[surplus].1.received - self.0[surplus].1.dispatched;
            let number_of_cars = u32::try_from(amount).map_err(|_| {
                PlannerError::MalformedDemand(format!(
                    "rebalancing transfer of {amount} cars exceeds the supported count"
                ))
            })?;
            log::debug!(
                "Rebalancing {amount} manifest empties from {} to {}",
                self.0[surplus].0,
                self.0[deficit].0
            );
            transfers.push(BalanceEntry {
                origin: self.0[surplus].0.clone(),
                destination: self.0[deficit].0.clone(),
                train_type: TrainType::ManifestEmpty,
                number_of_cars,
            });
            self.0[deficit].1.received += amount;
            let surplus_entry = &mut self.0[surplus].1;
            surplus_entry.dispatched = surplus_entry.received;
            step += 1;
        }

        let unbalanced_nodes = self.unbalanced_nodes();
        if !unbalanced_nodes.is_empty() {
            return Err(PlannerError::RebalanceDiverged {
                iterations: step,
                unbalanced_nodes,
            });
        }
        Ok(transfers)
    }
}

/// Synthesizes the `Manifest_Empty` demand that makes every node dispatch as
/// many manifest cars as it receives.
///
/// # Arguments
/// - `demand`: loaded demand; only `Manifest` rows are considered
/// - `demand_returns`: return demand; only `Manifest_Empty` rows are considered
/// - `nodes`: node list in the order deficit and surplus nodes are searched
pub fn generate_manifest_rebalancing_demand(
    demand: &[DemandRecord],
    demand_returns: &[DemandRecord],
    nodes: &[NodeId],
) -> PlannerResult<Vec<BalanceEntry>> {
    let mut ledger = ManifestLedger::from_demand(demand, demand_returns, nodes);
    let transfers = ledger.balance()?;
    log::info!(
        "Manifest rebalancing added {} lanes and {} cars",
        transfers.len(),
        transfers.iter().map(|t| t.number_of_cars as u64).sum::<u64>()
    );
    Ok(transfers)
}
