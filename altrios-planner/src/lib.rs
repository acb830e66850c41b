//! Crate containing the ALTRIOS train planner: starting from annual
//! origin-destination freight demand, it generates empty-car return demand,
//! rebalances manifest car flows so every node dispatches as many cars as it
//! receives, converts car demand into discrete train counts, and builds the
//! initial locomotive pool and refueling/charging infrastructure consumed by
//! the dispatch and train simulation models.
//!
//! # Helpful Tips
//! Every configuration and catalog struct in this crate implements methods for
//! serializing/deserializing itself to/from a handful of standard data formats
//! as strings or file read/write operations using [traits::SerdeAPI].  Output
//! tables convert to `polars` DataFrames via [train_planner::ToDataFrame].
//!
//! # Feature Flags
#![doc = document_features::document_features!()]

#[macro_use]
pub mod macros;

#[cfg(test)]
pub mod testing;

pub mod error;
pub mod imports;
pub mod prelude;
pub mod si;
pub mod train;
pub mod train_planner;
pub mod traits;
pub mod uc;
pub mod utils;

#[cfg(feature = "pyo3")]
pub mod pyo3;
