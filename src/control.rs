//! Control-thread to audio-thread parameter handoff.
//!
//! The cutoff is published as `f32` bits in an `AtomicU32`: the audio thread
//! reads whatever was stored last, once per callback. Reset requests are a
//! flag the audio thread clears when it acts on them. Neither side ever
//! blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::ControlConfig;

/// Shared handle to the filter's live parameters
///
/// Cloning is cheap; all clones observe the same values.
#[derive(Debug, Clone)]
pub struct FilterControl {
    cutoff_bits: Arc<AtomicU32>,
    reset_requested: Arc<AtomicBool>,
    min_cutoff_hz: f32,
    max_cutoff_hz: f32,
}

impl FilterControl {
    pub fn new(initial_cutoff_hz: f32, config: &ControlConfig) -> Self {
        let control = Self {
            cutoff_bits: Arc::new(AtomicU32::new(0.0_f32.to_bits())),
            reset_requested: Arc::new(AtomicBool::new(false)),
            min_cutoff_hz: config.min_cutoff_hz,
            max_cutoff_hz: config.max_cutoff_hz,
        };
        control.set_cutoff_hz(initial_cutoff_hz);
        control
    }

    /// Publish a new cutoff, clamped to the control range.
    ///
    /// Non-finite values are dropped and the previous cutoff stays in effect.
    pub fn set_cutoff_hz(&self, hz: f32) {
        if !hz.is_finite() {
            log::warn!("Ignoring non-finite cutoff {}", hz);
            return;
        }
        let clamped = hz.max(self.min_cutoff_hz).min(self.max_cutoff_hz);
        if clamped != hz {
            log::debug!("Cutoff {:.1} Hz clamped to {:.1} Hz", hz, clamped);
        }
        self.cutoff_bits.store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Most recently published cutoff in Hz
    pub fn cutoff_hz(&self) -> f32 {
        f32::from_bits(self.cutoff_bits.load(Ordering::Relaxed))
    }

    pub fn cutoff_range(&self) -> (f32, f32) {
        (self.min_cutoff_hz, self.max_cutoff_hz)
    }

    /// Ask the audio thread to clear filter state before its next block
    pub fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
    }

    /// Consume a pending reset request. Returns `true` at most once per request.
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::Acquire)
    }
}

impl Default for FilterControl {
    fn default() -> Self {
        Self::new(
            crate::constants::DEFAULT_CUTOFF_HZ,
            &ControlConfig::default(),
        )
    }
}
