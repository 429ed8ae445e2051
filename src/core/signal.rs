//! Core signal trait.
//!
//! This module provides the fundamental `Signal` trait: anything that can be
//! evaluated as a function of time. Channel nodes, oscillators and sampled
//! buffers all implement it.

use crate::Result;

/// Common interface for everything that is a function of time.
///
/// Unlike a streaming oscillator, a `Signal` keeps no playback state:
/// `eval` is pure and may be called at any `t`, in any order, any number of
/// times.
///
/// The trait provides two operations:
/// - Point evaluation via `eval()`
/// - Batch evaluation on a sample grid via `process()`
pub trait Signal {
    /// Evaluates the signal at time `t` (in seconds).
    ///
    /// # Errors
    ///
    /// Propagates any domain or division error raised inside the expression.
    fn eval(&self, t: f64) -> Result<f64>;

    /// Evaluates the signal on the grid `i / sample_rate` into `buffer`.
    ///
    /// Default implementation calls `eval()` for each element. Evaluation
    /// stops at the first error, leaving the rest of the buffer untouched.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Mutable slice to fill with samples
    /// * `sample_rate` - Grid rate in Hz
    fn process(&self, buffer: &mut [f64], sample_rate: u32) -> Result<()> {
        let rate = f64::from(sample_rate);
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample = self.eval(i as f64 / rate)?;
        }
        Ok(())
    }
}

/// Implementation of `Signal` for `f64` representing a constant value.
///
/// # Examples
///
/// ```
/// use synthexpr::Signal;
///
/// let constant = 0.5_f64;
/// assert_eq!(constant.eval(3.0).unwrap(), 0.5);
///
/// let mut buffer = vec![0.0; 4];
/// constant.process(&mut buffer, 48000).unwrap();
/// assert_eq!(buffer, vec![0.5, 0.5, 0.5, 0.5]);
/// ```
impl Signal for f64 {
    fn eval(&self, _t: f64) -> Result<f64> {
        Ok(*self)
    }

    fn process(&self, buffer: &mut [f64], _sample_rate: u32) -> Result<()> {
        buffer.fill(*self);
        Ok(())
    }
}

impl<S: Signal + ?Sized> Signal for &S {
    fn eval(&self, t: f64) -> Result<f64> {
        (**self).eval(t)
    }
}
