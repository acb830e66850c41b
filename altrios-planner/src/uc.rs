//! Unit constants for building `uom` quantities via multiplication, e.g.
//! `4_000.0 * uc::KW`

use crate::si;

unit_const!(MWH, si::Energy, 3.6e9);

unit_const!(KW, si::Power, 1.0e3);

unit_const!(KG, si::Mass, 1.0);
unit_const!(LB, si::Mass, 0.45359237);

unit_const!(R, si::Ratio, 1.0);
