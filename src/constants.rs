//! Default parameters of the playback high-pass filter
//!
//! These mirror the behaviour of the player the filter core was built for:
//! a fixed quality factor, a gain value that the high-pass variant ignores,
//! and a cutoff control ranging over the audible band.

/// Quality factor applied to every coefficient computation.
pub const DEFAULT_Q: f32 = 0.75;

/// Linear gain passed to the solver. Ignored by `FilterType::HighPass2`.
pub const DEFAULT_GAIN: f32 = 0.1;

/// Cutoff in Hz used before the control thread publishes a value.
pub const DEFAULT_CUTOFF_HZ: f32 = 100.0;

/// Lower bound of the cutoff control in Hz.
pub const MIN_CUTOFF_HZ: f32 = 20.0;

/// Upper bound of the cutoff control in Hz.
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;

pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Stereo output.
pub const DEFAULT_CHANNELS: usize = 2;
