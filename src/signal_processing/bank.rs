use super::biquad::BiquadChannelFilter;
use super::coefficients::FilterCoefficients;

/// One biquad per output channel, sharing a coefficient set per block
///
/// The number of channels is fixed at construction. Changing it goes through
/// [`reconfigure`](Self::reconfigure), which clears every channel since the
/// old state no longer lines up with the new layout.
#[derive(Debug, Clone)]
pub struct FilterBank {
    channels: Vec<BiquadChannelFilter>,
}

impl FilterBank {
    pub fn new(channel_count: usize) -> Self {
        Self {
            channels: vec![BiquadChannelFilter::new(); channel_count],
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&BiquadChannelFilter> {
        self.channels.get(index)
    }

    /// Resize to `channel_count` channels and reset all of them
    pub fn reconfigure(&mut self, channel_count: usize) {
        self.channels.resize_with(channel_count, BiquadChannelFilter::new);
        self.reset();
    }

    pub fn reset(&mut self) {
        for filter in self.channels.iter_mut() {
            filter.reset();
        }
    }

    /// Filter planar buffers in place, one slice per channel.
    ///
    /// Processes `min(self.channel_count(), buffers.len())` channels. Returns
    /// the number of channels filtered; any remaining buffers are untouched.
    pub fn process_planar(
        &mut self,
        coeffs: &FilterCoefficients,
        buffers: &mut [&mut [f32]],
    ) -> usize {
        let count = self.channels.len().min(buffers.len());
        for (filter, buffer) in self.channels.iter_mut().zip(buffers.iter_mut()) {
            filter.process_block(coeffs, buffer);
        }
        count
    }

    /// Filter an interleaved buffer in place.
    ///
    /// `buffer_channels` is the frame width of `buffer`. Processes
    /// `min(self.channel_count(), buffer_channels)` channels and returns that
    /// count; samples of the remaining channels are left as they are. A
    /// trailing partial frame is ignored.
    pub fn process_interleaved(
        &mut self,
        coeffs: &FilterCoefficients,
        buffer: &mut [f32],
        buffer_channels: usize,
    ) -> usize {
        if buffer_channels == 0 {
            return 0;
        }

        let count = self.channels.len().min(buffer_channels);
        let frames = buffer.len() / buffer_channels;
        let usable = &mut buffer[..frames * buffer_channels];

        for (channel, filter) in self.channels.iter_mut().take(count).enumerate() {
            for sample in usable.iter_mut().skip(channel).step_by(buffer_channels) {
                *sample = filter.process_sample(coeffs, *sample);
            }
        }
        count
    }
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_CHANNELS)
    }
}
