#![allow(unused_imports)]

pub(crate) use crate::imports::*;
pub(crate) use crate::utils;

pub(crate) use super::defaults;
pub(crate) use super::demand::{DemandRecord, NodeId, TrainType, TrainTypeMap};
pub(crate) use super::loco_pool::{FuelType, LocoInfo, LocoPoolMethod};
pub(crate) use super::planner_config::PlannerConfig;
pub(crate) use super::return_demand::ReturnDemandPolicy;
pub(crate) use crate::train::{RailVehicle, RailVehicleMap};

pub(crate) use polars::prelude::*;
pub(crate) use polars_lazy::prelude::*;
