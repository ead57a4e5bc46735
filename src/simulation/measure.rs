use rolling_stats::Stats;

use crate::signal_processing::{BiquadChannelFilter, FilterCoefficients};

use super::sine;

/// Root mean square of `samples`, zero for an empty slice
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Level change from `input` to `output` in dB
pub fn gain_db(input: &[f32], output: &[f32]) -> f32 {
    20.0 * (rms(output) / rms(input)).log10()
}

/// Measured steady-state gain of a tone through a fresh filter.
///
/// The first `settle` samples are discarded so the start-up transient does
/// not skew the result.
pub fn tone_gain_db(
    coeffs: &FilterCoefficients,
    frequency_hz: f32,
    sample_rate: f32,
    len: usize,
    settle: usize,
) -> f32 {
    let input = sine(frequency_hz, sample_rate, len, 1.0);
    let mut output = input.clone();
    BiquadChannelFilter::new().process_block(coeffs, &mut output);

    let settle = settle.min(len);
    gain_db(&input[settle..], &output[settle..])
}

/// Summary of a rolling statistic
#[derive(Debug, Clone)]
pub struct StatsSummary {
    pub count: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
}

impl StatsSummary {
    pub fn from_stats(stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

/// Per-block input/output levels accumulated over a stream
pub struct BlockLevels {
    input_rms: Stats<f32>,
    output_rms: Stats<f32>,
    gain_db: Stats<f32>,
}

impl BlockLevels {
    pub fn new() -> Self {
        Self {
            input_rms: Stats::new(),
            output_rms: Stats::new(),
            gain_db: Stats::new(),
        }
    }

    /// Record one block. Silent input blocks contribute levels but no gain.
    pub fn update(&mut self, input: &[f32], output: &[f32]) {
        self.record(rms(input), rms(output));
    }

    /// Record precomputed block levels
    pub fn record(&mut self, input_rms: f32, output_rms: f32) {
        self.input_rms.update(input_rms);
        self.output_rms.update(output_rms);
        if input_rms > 0.0 && output_rms > 0.0 {
            self.gain_db.update(20.0 * (output_rms / input_rms).log10());
        }
    }

    pub fn input_rms(&self) -> Option<StatsSummary> {
        StatsSummary::from_stats(&self.input_rms)
    }

    pub fn output_rms(&self) -> Option<StatsSummary> {
        StatsSummary::from_stats(&self.output_rms)
    }

    pub fn gain_db(&self) -> Option<StatsSummary> {
        StatsSummary::from_stats(&self.gain_db)
    }
}

impl Default for BlockLevels {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::{FilterSpec, FilterType, compute_coefficients};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rms_of_sine() {
        let s = sine(1000.0, 48000.0, 48000, 1.0);
        assert_abs_diff_eq!(rms(&s), std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-3);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_tone_gain_matches_response() {
        let coeffs = compute_coefficients(&FilterSpec {
            cutoff_hz: 500.0,
            q: 0.75,
            gain: 0.1,
            filter_type: FilterType::HighPass2,
            sample_rate: 44100.0,
        });
        let measured = tone_gain_db(&coeffs, 100.0, 44100.0, 44100, 4410);
        let predicted = crate::signal_processing::magnitude_db(&coeffs, 100.0, 44100.0) as f32;
        assert_abs_diff_eq!(measured, predicted, epsilon = 0.5);
    }

    #[test]
    fn test_block_levels() {
        let mut levels = BlockLevels::new();
        assert!(levels.gain_db().is_none());

        let input = vec![1.0_f32; 16];
        let output = vec![0.5_f32; 16];
        levels.update(&input, &output);
        levels.update(&[0.0; 16], &[0.0; 16]);

        assert_eq!(levels.input_rms().map(|s| s.count), Some(2));
        let gain = levels.gain_db().unwrap();
        assert_eq!(gain.count, 1);
        assert_abs_diff_eq!(gain.mean, -6.0206, epsilon = 1e-3);
    }
}
