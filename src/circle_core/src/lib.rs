#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod angle;
pub mod fixed;
pub mod permutation;
pub mod unit_arcs;

pub use angle::Angle;
pub use fixed::{Fixed, FixedError};
pub use permutation::Permutation;
pub use unit_arcs::UnitArcs;
