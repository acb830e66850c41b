//! Import uom si system and add unit constants
//! Zero values should be created using standard uom syntax ($Quantity::ZERO) after adding "use crate::imports::*"
//! Non-zero values should be created using standard uom syntax ($Quantity::new::<$unit>($value)) or multiplication syntax ($value * $UNIT_CONSTANT)

use uom::si;

pub use si::energy::{joule, megawatt_hour};
pub use si::f64::{Energy, Mass, Power, Ratio};
pub use si::mass::kilogram;
pub use si::power::watt;
pub use si::ratio::ratio;
