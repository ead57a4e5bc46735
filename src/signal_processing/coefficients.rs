use serde::{Deserialize, Serialize};

use crate::error::{HipassError, Result};

/// Filter response selected for coefficient computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum FilterType {
    /// Second-order high-pass
    #[default]
    #[serde(rename = "highpass2")]
    #[value(name = "highpass2")]
    HighPass2,
}

/// Physical parameters of a biquad, recomputed on every audio callback
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterSpec {
    /// Cutoff frequency in Hz
    pub cutoff_hz: f32,
    /// Quality factor
    pub q: f32,
    /// Linear gain. Not applied by `FilterType::HighPass2`.
    pub gain: f32,
    pub filter_type: FilterType,
    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl FilterSpec {
    /// Check that the spec describes a realisable filter.
    ///
    /// The solver never calls this; it is meant for configuration and other
    /// boundaries where values arrive from outside the audio thread.
    ///
    /// # Errors
    /// Returns `HipassError::InvalidSpec` for non-finite or non-positive
    /// cutoff, Q or sample rate, a non-finite gain, or a cutoff at or above
    /// Nyquist.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(HipassError::InvalidSpec(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if !self.cutoff_hz.is_finite() || self.cutoff_hz <= 0.0 {
            return Err(HipassError::InvalidSpec(format!(
                "cutoff must be positive, got {} Hz",
                self.cutoff_hz
            )));
        }
        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(HipassError::InvalidSpec(format!(
                "Q must be positive, got {}",
                self.q
            )));
        }
        if !self.gain.is_finite() {
            return Err(HipassError::InvalidSpec(format!(
                "gain must be finite, got {}",
                self.gain
            )));
        }

        let nyquist = self.sample_rate / 2.0;
        if self.cutoff_hz as f64 >= nyquist {
            return Err(HipassError::InvalidSpec(format!(
                "cutoff {} Hz is at or above Nyquist ({} Hz)",
                self.cutoff_hz, nyquist
            )));
        }

        Ok(())
    }

    pub fn coefficients(&self) -> FilterCoefficients {
        compute_coefficients(self)
    }
}

/// Normalised biquad coefficients (a0 divided out)
///
/// Transfer function:
/// `H(z) = (b0 + b1 z^-1 + b2 z^-2) / (1 + a1 z^-1 + a2 z^-2)`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FilterCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl FilterCoefficients {
    /// Whether both poles lie strictly inside the unit circle
    pub fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }
}

/// Compute biquad coefficients for `spec`.
///
/// Pure and allocation-free, safe to call from the audio callback. The
/// high-pass design is the bilinear transform of `s² / (s² + (w0/Q)s + w0²)`
/// without frequency pre-warping, so the digital cutoff drifts slightly below
/// `cutoff_hz` as it approaches Nyquist.
///
/// Inputs are not guarded. A cutoff at or above Nyquist, a zero Q or a zero
/// sample rate yields NaN, infinite or unstable coefficients; use
/// [`FilterSpec::validate`] at the boundary if that matters.
///
/// `spec.gain` is ignored by `FilterType::HighPass2`.
pub fn compute_coefficients(spec: &FilterSpec) -> FilterCoefficients {
    match spec.filter_type {
        FilterType::HighPass2 => highpass2(spec),
    }
}

fn highpass2(spec: &FilterSpec) -> FilterCoefficients {
    let ts = (1.0 / spec.sample_rate) as f32;
    let w0 = (2.0 * std::f64::consts::PI * spec.cutoff_hz as f64) as f32;
    let q = spec.q;

    let ts2 = ts * ts;
    let w02 = w0 * w0;

    let a0 = q * ts2 * w02 + 2.0 * ts * w0 + 4.0 * q;

    FilterCoefficients {
        b0: (4.0 * q) / a0,
        b1: (-8.0 * q) / a0,
        b2: (4.0 * q) / a0,
        a1: (2.0 * q * ts2 * w02 - 8.0 * q) / a0,
        a2: (q * ts2 * w02 - 2.0 * ts * w0 + 4.0 * q) / a0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn spec(cutoff_hz: f32, sample_rate: f64) -> FilterSpec {
        FilterSpec {
            cutoff_hz,
            q: 0.75,
            gain: 0.1,
            filter_type: FilterType::HighPass2,
            sample_rate,
        }
    }

    #[test]
    fn test_coefficient_symmetry() {
        for &(cutoff, rate) in &[
            (20.0, 44100.0),
            (100.0, 44100.0),
            (500.0, 44100.0),
            (1000.0, 48000.0),
            (8000.0, 96000.0),
            (15000.0, 44100.0),
        ] {
            let c = compute_coefficients(&spec(cutoff, rate));
            assert_eq!(c.b0, c.b2, "b0 != b2 at {} Hz / {} Hz", cutoff, rate);
            assert_eq!(
                c.b1,
                -2.0 * c.b0,
                "b1 != -2*b0 at {} Hz / {} Hz",
                cutoff,
                rate
            );
        }
    }

    #[test]
    fn test_deterministic_output() {
        let s = spec(500.0, 44100.0);
        let first = compute_coefficients(&s);
        assert_eq!(s.coefficients(), first);
        for _ in 0..100 {
            let again = compute_coefficients(&s);
            assert_eq!(first.b0.to_bits(), again.b0.to_bits());
            assert_eq!(first.b1.to_bits(), again.b1.to_bits());
            assert_eq!(first.b2.to_bits(), again.b2.to_bits());
            assert_eq!(first.a1.to_bits(), again.a1.to_bits());
            assert_eq!(first.a2.to_bits(), again.a2.to_bits());
        }
    }

    #[test]
    fn test_gain_is_ignored_for_highpass() {
        let mut quiet = spec(500.0, 44100.0);
        quiet.gain = 0.1;
        let mut loud = quiet;
        loud.gain = 4.0;
        assert_eq!(compute_coefficients(&quiet), compute_coefficients(&loud));
    }

    #[test]
    fn test_known_values_500hz() {
        let c = compute_coefficients(&spec(500.0, 44100.0));
        assert_abs_diff_eq!(c.b0, 0.953_506_4, epsilon = 1e-5);
        assert_abs_diff_eq!(c.b1, -1.907_012_8, epsilon = 1e-5);
        assert_abs_diff_eq!(c.a1, -1.904_593_4, epsilon = 1e-5);
        assert_abs_diff_eq!(c.a2, 0.909_432_2, epsilon = 1e-5);
    }

    #[test]
    fn test_dc_gain_is_zero() {
        let c = compute_coefficients(&spec(250.0, 48000.0));
        assert_eq!(c.b0 + c.b1 + c.b2, 0.0);
    }

    #[test]
    fn test_stable_across_audible_range() {
        let mut cutoff = 20.0;
        while cutoff <= 20000.0 {
            let c = compute_coefficients(&spec(cutoff, 44100.0));
            assert!(c.is_stable(), "unstable at {} Hz: {:?}", cutoff, c);
            cutoff *= 1.5;
        }
    }

    #[test]
    fn test_degenerate_inputs_do_not_panic() {
        let _ = compute_coefficients(&spec(22050.0, 44100.0));
        let _ = compute_coefficients(&spec(500.0, 0.0));
        let mut zero_q = spec(500.0, 44100.0);
        zero_q.q = 0.0;
        // Zero Q collapses the numerator
        let c = compute_coefficients(&zero_q);
        assert_eq!(c.b0, 0.0);
    }

    #[test]
    fn test_validate_accepts_typical_spec() {
        assert!(spec(500.0, 44100.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_specs() {
        assert!(spec(0.0, 44100.0).validate().is_err());
        assert!(spec(-10.0, 44100.0).validate().is_err());
        assert!(spec(500.0, 0.0).validate().is_err());
        assert!(spec(22050.0, 44100.0).validate().is_err());
        assert!(spec(f32::NAN, 44100.0).validate().is_err());

        let mut bad_q = spec(500.0, 44100.0);
        bad_q.q = 0.0;
        assert!(bad_q.validate().is_err());

        let mut bad_gain = spec(500.0, 44100.0);
        bad_gain.gain = f32::INFINITY;
        assert!(bad_gain.validate().is_err());
    }
}
