//! PCM sample widths and write configuration.

use crate::{ChannelError, Result};

/// Signed integer PCM sample width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    /// 1 byte, `i8`
    Byte,
    /// 2 bytes, `i16`
    Short,
    /// 4 bytes, `i32`
    Int,
    /// 8 bytes, `i64`
    Long,
}

impl SampleWidth {
    pub fn bytes(self) -> u16 {
        match self {
            SampleWidth::Byte => 1,
            SampleWidth::Short => 2,
            SampleWidth::Int => 4,
            SampleWidth::Long => 8,
        }
    }

    pub fn bits(self) -> u16 {
        self.bytes() * 8
    }

    /// Largest representable magnitude, `2^(bits - 1) - 1`.
    pub fn max_value(self) -> i64 {
        match self {
            SampleWidth::Byte => i64::from(i8::MAX),
            SampleWidth::Short => i64::from(i16::MAX),
            SampleWidth::Int => i64::from(i32::MAX),
            SampleWidth::Long => i64::MAX,
        }
    }

    /// `round(max * value)`, clamped to `[-max, max]`.
    pub fn quantize(self, value: f64) -> i64 {
        let max = self.max_value() as f64;
        (value * max).round().clamp(-max, max) as i64
    }

    pub fn dequantize(self, sample: i64) -> f64 {
        sample as f64 / self.max_value() as f64
    }

    /// Width from a container's bits-per-sample field.
    pub fn from_bits(bits: u16) -> Result<Self> {
        if bits % 8 != 0 {
            return Err(ChannelError::UnsupportedFormat(format!(
                "{bits}-bit samples"
            )));
        }
        Self::try_from(bits / 8)
    }
}

impl TryFrom<u16> for SampleWidth {
    type Error = ChannelError;

    fn try_from(bytes: u16) -> Result<Self> {
        match bytes {
            1 => Ok(SampleWidth::Byte),
            2 => Ok(SampleWidth::Short),
            4 => Ok(SampleWidth::Int),
            8 => Ok(SampleWidth::Long),
            other => Err(ChannelError::UnsupportedFormat(format!(
                "sample width of {other} bytes"
            ))),
        }
    }
}

/// Output settings for [`Track::write`](crate::Track::write).
///
/// # Examples
///
/// ```
/// use synthexpr::WavConfig;
///
/// let config = WavConfig::default();
/// assert_eq!(config.sample_rate, 48000);
/// assert_eq!(config.width, 2);
///
/// let lofi = WavConfig::default().with_sample_rate(8000).with_width(1);
/// assert!(lofi.validate().is_ok());
/// assert!(WavConfig::default().with_width(3).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavConfig {
    pub sample_rate: u32,
    /// Bytes per sample: 1, 2, 4 or 8.
    pub width: u16,
}

impl WavConfig {
    pub fn new(sample_rate: u32, width: u16) -> Self {
        Self { sample_rate, width }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Checks the configuration without touching the filesystem.
    pub fn validate(&self) -> Result<SampleWidth> {
        if self.sample_rate == 0 {
            return Err(ChannelError::UnsupportedFormat(
                "sample rate of 0 Hz".to_string(),
            ));
        }
        SampleWidth::try_from(self.width)
    }
}

impl Default for WavConfig {
    fn default() -> Self {
        Self::new(48000, 2)
    }
}
