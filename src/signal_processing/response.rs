//! Frequency response of a biquad coefficient set.
//!
//! Evaluates `H(e^jω)` directly from the coefficients, so the curve reflects
//! exactly what the per-sample recursion does, including the f32 rounding of
//! the coefficients themselves.

use num_complex::Complex64;
use serde::Serialize;

use super::coefficients::FilterCoefficients;

/// One point of a magnitude response curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponsePoint {
    pub frequency_hz: f64,
    pub magnitude: f64,
    pub magnitude_db: f64,
}

/// Complex response `H(e^jω)` at `frequency_hz`
pub fn complex_response(
    coeffs: &FilterCoefficients,
    frequency_hz: f64,
    sample_rate: f64,
) -> Complex64 {
    let omega = 2.0 * std::f64::consts::PI * frequency_hz / sample_rate;
    let z1 = Complex64::from_polar(1.0, -omega);
    let z2 = z1 * z1;

    let numerator = coeffs.b0 as f64 + z1 * coeffs.b1 as f64 + z2 * coeffs.b2 as f64;
    let denominator = 1.0 + z1 * coeffs.a1 as f64 + z2 * coeffs.a2 as f64;
    numerator / denominator
}

/// Linear magnitude `|H(e^jω)|` at `frequency_hz`
pub fn magnitude(coeffs: &FilterCoefficients, frequency_hz: f64, sample_rate: f64) -> f64 {
    complex_response(coeffs, frequency_hz, sample_rate).norm()
}

/// Magnitude in dB. Returns `f64::NEG_INFINITY` at a zero of the response.
pub fn magnitude_db(coeffs: &FilterCoefficients, frequency_hz: f64, sample_rate: f64) -> f64 {
    20.0 * magnitude(coeffs, frequency_hz, sample_rate).log10()
}

/// Sample the magnitude response at `points` log-spaced frequencies
/// from `min_hz` to `max_hz` inclusive.
pub fn response_curve(
    coeffs: &FilterCoefficients,
    sample_rate: f64,
    min_hz: f64,
    max_hz: f64,
    points: usize,
) -> Vec<ResponsePoint> {
    log_spaced(min_hz, max_hz, points)
        .map(|frequency_hz| {
            let magnitude = magnitude(coeffs, frequency_hz, sample_rate);
            ResponsePoint {
                frequency_hz,
                magnitude,
                magnitude_db: 20.0 * magnitude.log10(),
            }
        })
        .collect()
}

fn log_spaced(min_hz: f64, max_hz: f64, points: usize) -> impl Iterator<Item = f64> {
    let log_min = min_hz.ln();
    let log_max = max_hz.ln();
    let steps = points.saturating_sub(1).max(1) as f64;
    (0..points).map(move |i| (log_min + (log_max - log_min) * i as f64 / steps).exp())
}
