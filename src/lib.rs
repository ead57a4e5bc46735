pub mod config;
pub mod constants;
pub mod control;
pub mod error;
pub mod processing;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::PlayerConfig;
pub use control::FilterControl;
pub use error::{HipassError, Result};
pub use processing::{ChannelMismatch, FilterProcessor};
