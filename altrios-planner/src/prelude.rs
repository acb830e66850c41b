pub use crate::error::{PlannerError, PlannerResult};
#[cfg(feature = "pyo3")]
pub use crate::pyo3::register_planner_api;
pub use crate::train::{import_rail_vehicles, RailVehicle, RailVehicleMap};
pub use crate::train_planner::{
    append_charging_guidelines, build_fleet, build_locopool, build_refuelers,
    check_container_capacity, generate_demand_trains, generate_manifest_rebalancing_demand,
    generate_return_demand, import_charging_guidelines, import_refueler_info,
    load_freight_demand, load_freight_demand_csv, node_list, number_of_trains, plan_train_demand,
    prep_hourly_demand, run_parameter_sweep, run_train_planner, BalanceEntry,
    DailyDemandShare, DemandRecord, EnergyStorageInfo, Fleet, FuelType, HourlyDemandRecord,
    HourlyDemandShare, LocoInfo, LocoPoolMethod, LocoStatus, LocomotiveRecord,
    NetworkChargingGuideline, NodeId, PlannerConfig, PlannerOutputs, RefuelerInfo,
    RefuelerRecord, ReturnDemandGenerator, ReturnDemandPolicy, ToDataFrame, TrainDemandRecord,
    TrainPlan, TrainType, TrainTypeMap, Weekday,
};
pub use crate::traits::SerdeAPI;
