//! Crate that wraps `altrios-planner` and enables the `pyo3` feature to
//! expose the train planner to Python.
//!
//! # Feature Flags
#![doc = document_features::document_features!()]

use altrios_planner::prelude::*;
pub use pyo3::prelude::*;

#[pymodule]
fn altrios_planner_pyo3(_py: Python, m: &PyModule) -> PyResult<()> {
    #[cfg(feature = "logging")]
    pyo3_log::init();
    register_planner_api(m)?;
    Ok(())
}
