use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use std::f32::consts::PI;

/// Synthetic source fed through the filter in simulations
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SignalKind {
    /// Gaussian white noise
    Noise,
    /// Single sine tone
    Sine,
    /// Unit impulse followed by silence
    Impulse,
}

/// Sine tone of `len` samples
pub fn sine(frequency_hz: f32, sample_rate: f32, len: usize, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * frequency_hz * i as f32 / sample_rate).sin())
        .collect()
}

/// `1.0` followed by `len - 1` zeros
pub fn impulse(len: usize) -> Vec<f32> {
    let mut samples = vec![0.0; len];
    if let Some(first) = samples.first_mut() {
        *first = 1.0;
    }
    samples
}

/// Reproducible Gaussian white noise with standard deviation `amplitude`
pub fn white_noise(len: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let n: f32 = StandardNormal.sample(&mut rng);
            amplitude * n
        })
        .collect()
}

/// Generate one channel of `kind`
pub fn generate(
    kind: SignalKind,
    len: usize,
    sample_rate: f32,
    tone_hz: f32,
    seed: u64,
) -> Vec<f32> {
    match kind {
        SignalKind::Noise => white_noise(len, 0.25, seed),
        SignalKind::Sine => sine(tone_hz, sample_rate, len, 0.5),
        SignalKind::Impulse => impulse(len),
    }
}

/// Interleave equal-length planar channels into `[c0, c1, .., c0, c1, ..]`.
/// Output length is set by the shortest channel.
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        for channel in channels {
            out.push(channel[i]);
        }
    }
    out
}

/// Split an interleaved buffer into planar channels, dropping any trailing
/// partial frame
pub fn deinterleave(buffer: &[f32], channels: usize) -> Vec<Vec<f32>> {
    if channels == 0 {
        return Vec::new();
    }
    let mut out = vec![Vec::with_capacity(buffer.len() / channels); channels];
    for frame in buffer.chunks_exact(channels) {
        for (channel, &sample) in out.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_shape() {
        let s = impulse(4);
        assert_eq!(s, vec![1.0, 0.0, 0.0, 0.0]);
        assert!(impulse(0).is_empty());
    }

    #[test]
    fn test_noise_is_reproducible() {
        assert_eq!(white_noise(256, 0.5, 7), white_noise(256, 0.5, 7));
        assert_ne!(white_noise(256, 0.5, 7), white_noise(256, 0.5, 8));
    }

    #[test]
    fn test_interleave_roundtrip_shape() {
        let left = vec![1.0, 2.0, 3.0];
        let right = vec![-1.0, -2.0, -3.0];
        let mixed = interleave(&[left.clone(), right.clone()]);
        assert_eq!(mixed, vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);

        let split = deinterleave(&mixed, 2);
        assert_eq!(split, vec![left, right]);
        assert!(deinterleave(&mixed, 0).is_empty());
    }
}
