//! Periodic waveform leaves.
//!
//! Every waveform has period 1 in `t`; use a Transform (for example
//! [`ChannelExt::frequency`](crate::ChannelExt::frequency)) to tune it.

mod sawtooth;
mod sine;
mod square;

use std::f64::consts::TAU;

use crate::{Channel, ChannelError, Result, Signal, add, mul, pow};

/// The built-in oscillator shapes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Waveform {
    /// `sin(2πt)`
    #[default]
    Sine,
    /// `cos(2πt)`
    Cosine,
    /// `tan(2πt)`
    Tangent,
    /// Rising ramp from -1 to 1 over each period.
    Sawtooth,
    /// `1` for the first `duty` of each period, `-1` for the rest.
    Square { duty: f64 },
}

impl Waveform {
    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Cosine => "cosine",
            Waveform::Tangent => "tangent",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Square { .. } => "square",
        }
    }

    /// Analytic time derivative of the waveform.
    ///
    /// # Errors
    ///
    /// Sawtooth and square waves are discontinuous and return
    /// [`ChannelError::UnsupportedOperation`].
    pub fn derivative(&self) -> Result<Channel> {
        match self {
            Waveform::Sine => Ok(mul(TAU, Channel::cosine())),
            Waveform::Cosine => Ok(mul(-TAU, Channel::sine())),
            // d/dt tan(2πt) = 2π (1 + tan²(2πt))
            Waveform::Tangent => Ok(mul(TAU, add(1.0, pow(Channel::tangent(), 2.0)))),
            Waveform::Sawtooth | Waveform::Square { .. } => {
                Err(ChannelError::unsupported("derivative", self.name()))
            }
        }
    }
}

impl Signal for Waveform {
    fn eval(&self, t: f64) -> Result<f64> {
        let value = match *self {
            Waveform::Sine => sine::sine(t),
            Waveform::Cosine => sine::cosine(t),
            Waveform::Tangent => sine::tangent(t),
            Waveform::Sawtooth => sawtooth::sawtooth(t),
            Waveform::Square { duty } => square::square(t, duty),
        };
        Ok(value)
    }
}

/// Position within the current period, in `[0, 1)`.
fn phase(t: f64) -> f64 {
    t - t.floor()
}
