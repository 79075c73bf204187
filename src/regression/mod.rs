//! Ordinary least squares over the enriched table.
//!
//! [`Design`] selects and stacks the configured columns, [`Solver`] finds β
//! minimising ‖Xβ − y‖₂ and [`fit`] scores the result with R².

mod design;
mod fit;
mod solver;

pub use design::Design;
pub use fit::{fit, Fit};
pub use solver::{SolveDiagnostics, Solver};
