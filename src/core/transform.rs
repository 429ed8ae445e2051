//! Affine time/amplitude parameters for the Transform node.

/// Parameters of a Transform node: `amplitude * f(frequency * t - shift)`.
///
/// # Examples
///
/// ```
/// use synthexpr::TransformConfig;
///
/// let config = TransformConfig::default().with_frequency(1000.0).with_amplitude(0.5);
/// assert_eq!(config.shift, 0.0);
/// assert_eq!(config.frequency, 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformConfig {
    pub shift: f64,
    pub amplitude: f64,
    pub frequency: f64,
}

impl TransformConfig {
    pub fn new(shift: f64, amplitude: f64, frequency: f64) -> Self {
        Self {
            shift,
            amplitude,
            frequency,
        }
    }

    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Maps an outer time onto the inner channel's time axis.
    pub fn inner_time(&self, t: f64) -> f64 {
        self.frequency * t - self.shift
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }
}
