pub mod simulate;
pub mod state;

pub use simulate::{accepts, simulate, SimulationResult, Simulator};
