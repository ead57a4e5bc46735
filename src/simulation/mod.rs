mod measure;
mod signal;

pub use measure::{BlockLevels, StatsSummary, gain_db, rms, tone_gain_db};
pub use signal::{SignalKind, deinterleave, generate, impulse, interleave, sine, white_noise};
