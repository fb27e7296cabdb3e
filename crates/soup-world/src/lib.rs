//! Cellular automaton engine.
//!
//! A double-buffered grid of organisms stepped one generation at a time:
//! every cell reads the pre-step snapshot, writes into the back buffer, and
//! the buffers swap once the sweep completes.

pub mod grid;
pub mod neighbors;
pub mod behavior;
pub mod reproduction;
pub mod engine;
pub mod clock;
pub mod brush;
pub mod simulation;

pub use grid::{Grid, GridStore};
pub use neighbors::{Neighborhood, Tally};
pub use engine::RuleEngine;
pub use clock::SimulationClock;
pub use brush::Brush;
pub use simulation::Simulation;
