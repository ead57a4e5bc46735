use super::coefficients::FilterCoefficients;

/// Delay registers of a transposed direct form II biquad
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelState {
    pub v1: f32,
    pub v2: f32,
}

/// Biquad state for a single audio channel
///
/// Coefficients are supplied on every call so one coefficient set can drive
/// every channel of a callback. State persists across calls until
/// [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct BiquadChannelFilter {
    state: ChannelState,
}

impl BiquadChannelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one sample, advancing the delay registers
    #[inline]
    pub fn process_sample(&mut self, coeffs: &FilterCoefficients, input: f32) -> f32 {
        let ChannelState { v1, v2 } = self.state;

        let output = coeffs.b0 * input + v1;
        self.state.v1 = coeffs.b1 * input + v2 - coeffs.a1 * output;
        self.state.v2 = coeffs.b2 * input - coeffs.a2 * output;

        output
    }

    /// Filter a block in place, left to right
    pub fn process_block(&mut self, coeffs: &FilterCoefficients, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(coeffs, *sample);
        }
    }

    /// Clear the delay registers so the next block starts from silence
    pub fn reset(&mut self) {
        self.state = ChannelState::default();
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }
}
