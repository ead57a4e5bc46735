//! Configuration for the playback high-pass filter.
//!
//! A [`PlayerConfig`] can be built from defaults, loaded from TOML, and then
//! overridden field by field from the command line. Every TOML key is
//! optional:
//!
//! ```toml
//! [filter]
//! cutoff_hz = 100.0
//! q = 0.75
//! gain = 0.1
//! filter_type = "highpass2"
//!
//! [stream]
//! sample_rate = 44100.0
//! block_size = 512
//! channels = 2
//!
//! [control]
//! min_cutoff_hz = 20.0
//! max_cutoff_hz = 20000.0
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_CHANNELS, DEFAULT_CUTOFF_HZ, DEFAULT_GAIN, DEFAULT_Q,
    DEFAULT_SAMPLE_RATE, MAX_CUTOFF_HZ, MIN_CUTOFF_HZ,
};
use crate::error::{HipassError, Result};
use crate::signal_processing::{FilterSpec, FilterType};

/// Cutoff frequency parsed from user input
///
/// # Parsing formats
/// - `500` - frequency in Hz (no suffix)
/// - `500hz` or `500Hz` - frequency in Hz (explicit)
/// - `1.5khz` or `1.5kHz` - frequency in kHz
///
/// # Example
/// ```
/// use hipass::config::CutoffFrequency;
///
/// let freq: CutoffFrequency = "1.5khz".parse().unwrap();
/// assert!((freq.as_hz() - 1500.0).abs() < 0.001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffFrequency(f32);

impl CutoffFrequency {
    pub fn from_hz(hz: f32) -> Self {
        Self(hz)
    }

    pub fn as_hz(&self) -> f32 {
        self.0
    }
}

impl Default for CutoffFrequency {
    fn default() -> Self {
        Self(DEFAULT_CUTOFF_HZ)
    }
}

impl fmt::Display for CutoffFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}hz", self.0)
    }
}

impl FromStr for CutoffFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        let (num, scale) = if let Some(num) = lower.strip_suffix("khz") {
            (num, 1000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let value: f32 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        let hz = value * scale;
        if !hz.is_finite() || hz <= 0.0 {
            return Err("frequency must be positive".to_string());
        }
        Ok(Self::from_hz(hz))
    }
}

/// Complete filter core configuration
///
/// # Example
/// ```
/// use hipass::config::PlayerConfig;
///
/// let mut config = PlayerConfig::default();
/// config.filter.cutoff_hz = 250.0;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    pub filter: FilterConfig,
    pub stream: StreamConfig,
    pub control: ControlConfig,
}

/// Filter design parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Initial cutoff in Hz, before any control update
    pub cutoff_hz: f32,
    /// Quality factor
    pub q: f32,
    /// Linear gain (ignored by the high-pass design)
    pub gain: f32,
    pub filter_type: FilterType,
}

/// Stream layout the host hands to the filter core
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Frames per callback
    pub block_size: usize,
    /// Number of filtered channels
    pub channels: usize,
}

/// Range accepted by the cutoff control
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    pub min_cutoff_hz: f32,
    pub max_cutoff_hz: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            q: DEFAULT_Q,
            gain: DEFAULT_GAIN,
            filter_type: FilterType::HighPass2,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            min_cutoff_hz: MIN_CUTOFF_HZ,
            max_cutoff_hz: MAX_CUTOFF_HZ,
        }
    }
}

impl FilterConfig {
    /// Filter spec for `cutoff_hz` at `sample_rate`, using this config's
    /// Q, gain and filter type
    pub fn spec(&self, cutoff_hz: f32, sample_rate: f64) -> FilterSpec {
        FilterSpec {
            cutoff_hz,
            q: self.q,
            gain: self.gain,
            filter_type: self.filter_type,
            sample_rate,
        }
    }
}

impl PlayerConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::info!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Filter spec for the configured initial cutoff and stream rate
    pub fn initial_spec(&self) -> FilterSpec {
        self.filter
            .spec(self.filter.cutoff_hz, self.stream.sample_rate)
    }

    /// Check values that would otherwise produce garbage coefficients
    /// or an unusable stream.
    ///
    /// A control range reaching past Nyquist is allowed but logged, since the
    /// user can then dial in a cutoff the solver cannot handle.
    pub fn validate(&self) -> Result<()> {
        self.initial_spec().validate()?;

        if self.stream.block_size == 0 {
            return Err(HipassError::Config("block_size must be non-zero".into()));
        }
        if self.stream.channels == 0 {
            return Err(HipassError::Config("channels must be non-zero".into()));
        }

        let ControlConfig {
            min_cutoff_hz,
            max_cutoff_hz,
        } = self.control;
        if !min_cutoff_hz.is_finite() || !max_cutoff_hz.is_finite() || min_cutoff_hz <= 0.0 {
            return Err(HipassError::Config(format!(
                "invalid cutoff range {}..{} Hz",
                min_cutoff_hz, max_cutoff_hz
            )));
        }
        if min_cutoff_hz >= max_cutoff_hz {
            return Err(HipassError::Config(format!(
                "min_cutoff_hz ({}) must be below max_cutoff_hz ({})",
                min_cutoff_hz, max_cutoff_hz
            )));
        }

        let nyquist = self.stream.sample_rate / 2.0;
        if max_cutoff_hz as f64 >= nyquist {
            log::warn!(
                "Cutoff range reaches {} Hz, at or above Nyquist ({} Hz)",
                max_cutoff_hz,
                nyquist
            );
        }

        Ok(())
    }
}
