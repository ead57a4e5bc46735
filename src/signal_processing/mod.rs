pub mod bank;
pub mod biquad;
pub mod coefficients;
pub mod response;

pub use bank::FilterBank;
pub use biquad::{BiquadChannelFilter, ChannelState};
pub use coefficients::{FilterCoefficients, FilterSpec, FilterType, compute_coefficients};
pub use response::{ResponsePoint, magnitude, magnitude_db, response_curve};
