//! Custom error types

use crate::train_planner::{NodeId, TrainType};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// Demand table has missing columns, uncoercible or negative counts, or
    /// unknown train types
    #[error("Malformed demand table: {0}")]
    MalformedDemand(String),
    /// No return demand generator is configured for the train type.  Callers
    /// log this and carry on without return demand for the type.
    #[error("Return demand generator not implemented for train type: {0}")]
    UnimplementedReturnGenerator(TrainType),
    #[error(
        "Manifest rebalancing did not converge after {iterations} iteration(s); \
         unbalanced nodes: {unbalanced_nodes:?}"
    )]
    RebalanceDiverged {
        iterations: usize,
        unbalanced_nodes: Vec<NodeId>,
    },
    #[error("Invalid locomotive pool configuration: {0}")]
    InvalidLocopoolConfig(String),
    #[error("Missing catalog entry: {0}")]
    MissingCatalogEntry(String),
    #[error("Invalid planner configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
