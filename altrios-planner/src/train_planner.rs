//! Train planner: turns origin-destination freight demand into a balanced
//! train schedule, an initial locomotive pool and the refueling
//! infrastructure serving it.

pub mod defaults;
mod demand;
mod demand_trains;
mod hourly_demand;
mod loco_pool;
mod pipeline;
mod planner_config;
mod planner_imports;
mod rebalancing;
mod refuelers;
mod return_demand;
mod tables;

#[cfg(test)]
mod tests;

pub use demand::*;
pub use demand_trains::*;
pub use hourly_demand::*;
pub use loco_pool::*;
pub use pipeline::*;
pub use planner_config::*;
pub use rebalancing::*;
pub use refuelers::*;
pub use return_demand::*;
pub use tables::*;
