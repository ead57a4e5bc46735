use crate::config::FilterConfig;
use crate::control::FilterControl;
use crate::error::{HipassError, Result};
use crate::signal_processing::{FilterBank, FilterCoefficients, compute_coefficients};

/// Sample rate and block size fixed by the last `prepare`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamFormat {
    pub sample_rate: f64,
    pub block_size: usize,
}

/// Buffer and filter-bank channel counts that disagreed in a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMismatch {
    pub buffer_channels: usize,
    pub filter_channels: usize,
}

impl ChannelMismatch {
    /// Number of channels actually filtered
    pub fn filtered(&self) -> usize {
        self.buffer_channels.min(self.filter_channels)
    }
}

/// Audio-callback side of the filter core
///
/// Owns the per-channel filter state. The host calls [`prepare`] when a
/// stream starts or changes format, one of the `process_*` methods per
/// callback, and [`release`] when the stream stops. Each callback reads the
/// cutoff from the shared [`FilterControl`] exactly once and recomputes the
/// coefficients from it.
///
/// The `process_*` methods never log. A channel-count mismatch seen by the
/// callback is recorded and reported by [`report_channel_mismatch`] from a
/// non-real-time thread.
///
/// [`prepare`]: Self::prepare
/// [`report_channel_mismatch`]: Self::report_channel_mismatch
/// [`release`]: Self::release
pub struct FilterProcessor {
    filter_config: FilterConfig,
    control: FilterControl,
    bank: FilterBank,
    format: Option<StreamFormat>,
    coefficients: FilterCoefficients,
    cutoff_hz: f32,
    channel_mismatch: Option<ChannelMismatch>,
    channel_mismatch_reported: bool,
}

impl FilterProcessor {
    pub fn new(filter_config: &FilterConfig, channels: usize, control: FilterControl) -> Self {
        let cutoff_hz = control.cutoff_hz();
        Self {
            filter_config: filter_config.clone(),
            control,
            bank: FilterBank::new(channels),
            format: None,
            coefficients: FilterCoefficients::default(),
            cutoff_hz,
            channel_mismatch: None,
            channel_mismatch_reported: false,
        }
    }

    /// Configure for a new stream and clear all filter state.
    ///
    /// Not real-time safe; call before the first callback of a stream.
    ///
    /// # Errors
    /// Returns `HipassError::InvalidStream` for a non-finite or non-positive
    /// sample rate, or a zero block size.
    pub fn prepare(&mut self, sample_rate: f64, block_size: usize) -> Result<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(HipassError::InvalidStream(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        if block_size == 0 {
            return Err(HipassError::InvalidStream("block size must be non-zero".into()));
        }

        let format = StreamFormat {
            sample_rate,
            block_size,
        };
        if self.format != Some(format) {
            log::info!(
                "Preparing stream: {} Hz, {} frames per block, {} channels",
                sample_rate,
                block_size,
                self.bank.channel_count()
            );
        }

        self.format = Some(format);
        self.clear_channel_mismatch();
        // A stale reset request is satisfied by the reset below
        self.control.take_reset_request();
        self.refresh_coefficients(sample_rate);
        self.bank.reset();
        Ok(())
    }

    /// Change the number of filtered channels, clearing all filter state
    pub fn set_channel_count(&mut self, channels: usize) {
        log::info!(
            "Reconfiguring filter bank: {} -> {} channels",
            self.bank.channel_count(),
            channels
        );
        self.bank.reconfigure(channels);
        self.clear_channel_mismatch();
    }

    /// Filter one interleaved callback buffer in place.
    ///
    /// `buffer_channels` is the frame width of `buffer`. Channels beyond the
    /// configured count pass through unfiltered. Before `prepare` the buffer
    /// is left untouched.
    pub fn process_interleaved(&mut self, buffer: &mut [f32], buffer_channels: usize) {
        if !self.begin_block() {
            return;
        }

        self.check_channel_count(buffer_channels);
        self.bank.process_interleaved(&self.coefficients, buffer, buffer_channels);
    }

    /// Filter planar callback buffers in place, one slice per channel.
    ///
    /// Same channel policy as [`process_interleaved`](Self::process_interleaved).
    pub fn process_planar(&mut self, buffers: &mut [&mut [f32]]) {
        if !self.begin_block() {
            return;
        }

        self.check_channel_count(buffers.len());
        self.bank.process_planar(&self.coefficients, buffers);
    }

    /// Clear filter state, e.g. when the transport returns to the start
    pub fn reset(&mut self) {
        self.bank.reset();
    }

    /// Stream stopped: clear state and forget the stream format
    pub fn release(&mut self) {
        log::debug!("Releasing filter stream");
        self.bank.reset();
        self.format = None;
    }

    /// Log the first channel-count mismatch seen since the last `prepare`
    /// or `set_channel_count`. Not real-time safe.
    pub fn report_channel_mismatch(&mut self) {
        if self.channel_mismatch_reported {
            return;
        }
        if let Some(mismatch) = self.channel_mismatch {
            log::warn!(
                "Buffer has {} channels, filter bank has {}; filtering {}",
                mismatch.buffer_channels,
                mismatch.filter_channels,
                mismatch.filtered()
            );
            self.channel_mismatch_reported = true;
        }
    }

    /// Most recent channel-count mismatch, if any
    pub fn channel_mismatch(&self) -> Option<ChannelMismatch> {
        self.channel_mismatch
    }

    /// Coefficients used for the most recent block
    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    /// Cutoff the most recent block was filtered with
    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn format(&self) -> Option<StreamFormat> {
        self.format
    }

    pub fn channel_count(&self) -> usize {
        self.bank.channel_count()
    }

    pub fn control(&self) -> &FilterControl {
        &self.control
    }

    pub fn bank(&self) -> &FilterBank {
        &self.bank
    }

    /// Per-callback preamble: honour reset requests and pick up the latest
    /// cutoff. Returns `false` when no stream is prepared.
    fn begin_block(&mut self) -> bool {
        let Some(format) = self.format else {
            return false;
        };

        if self.control.take_reset_request() {
            self.bank.reset();
        }
        self.refresh_coefficients(format.sample_rate);
        true
    }

    fn refresh_coefficients(&mut self, sample_rate: f64) {
        self.cutoff_hz = self.control.cutoff_hz();
        let spec = self.filter_config.spec(self.cutoff_hz, sample_rate);
        self.coefficients = compute_coefficients(&spec);
    }

    fn check_channel_count(&mut self, buffer_channels: usize) {
        let filter_channels = self.bank.channel_count();
        if buffer_channels != filter_channels {
            self.channel_mismatch = Some(ChannelMismatch {
                buffer_channels,
                filter_channels,
            });
        }
    }

    fn clear_channel_mismatch(&mut self) {
        self.channel_mismatch = None;
        self.channel_mismatch_reported = false;
    }
}
