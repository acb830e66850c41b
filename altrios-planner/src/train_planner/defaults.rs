//! Default parameter values for the train planner

use crate::imports::*;

/// Energy-equivalent reservoir assumed for locomotives without an energy
/// storage device, roughly a 5,000 gallon diesel tank
pub const DIESEL_TANK_CAPACITY_J: f64 = 5000.0 * utils::LITER_PER_GALLON * DIESEL_ENERGY_DENSITY_J_PER_L;
/// Lower heating value of diesel fuel
pub const DIESEL_ENERGY_DENSITY_J_PER_L: f64 = 35.8e6;

pub const MANIFEST_EMPTY_RETURN_RATIO: f64 = 0.6;
pub const MIN_CARS_PER_TRAIN: u32 = 60;
pub const TARGET_CARS_PER_TRAIN: u32 = 180;
pub const CARS_PER_LOCOMOTIVE: u32 = 70;
pub const CONTAINERS_PER_CAR: f64 = 2.0;
pub const HP_REQUIRED_PER_TON_LOADED: f64 = 2.0;
pub const HP_REQUIRED_PER_TON_EMPTY: f64 = 0.5;
pub const SIMULATION_DAYS: u32 = 7;
pub const REFUELERS_PER_INCOMING_CORRIDOR: u32 = 4;

/// Spacing between the locomotive ID blocks of consecutive home nodes
pub const LOCO_ID_STRIDE: u32 = 1000;
