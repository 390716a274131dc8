// Export our modules for use in binaries and tests
pub mod api;
pub mod config;
pub mod db;
pub mod domain;

pub use domain::{GateEvent, MoonPhase, MoonReading, PositionReading};
