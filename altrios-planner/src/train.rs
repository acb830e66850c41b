mod rail_vehicle;

pub use rail_vehicle::*;
