//! Discretized channels.
//!
//! # Design Overview
//!
//! `SampledChannel` turns a fixed-rate table of samples back into a function
//! of time. It has two states:
//!
//! 1. **Empty**: freshly allocated with [`SampledChannel::new`], zero-filled.
//! 2. **Populated**: after [`SampledChannel::sample`] succeeded, or when built
//!    directly from decoded PCM with [`SampledChannel::from_samples`].
//!
//! Sampling needs `&mut self`, while building expressions on top of the
//! buffer needs it converted into a shared [`Channel`](crate::Channel). Once
//! converted, the buffer is frozen, so a graph can never observe a re-sample.
//!
//! ## Interpolation
//!
//! `eval(t)` maps `t` onto the fractional index `t * sample_rate` and blends
//! the two neighbouring samples linearly. Every index outside the buffer
//! reads as exactly `0.0`, which gives tracks a silent edge on both sides.

use crate::{ChannelError, Result, Signal};

/// Number of grid points in `[0, duration)` at `sample_rate`.
///
/// Products within `1e-9` of an integer are snapped to it so that
/// `0.1 s * 48000 Hz` yields 4800 frames rather than 4801. Non-positive and
/// non-finite durations yield no frames.
pub fn frame_count(duration: f64, sample_rate: u32) -> usize {
    let exact = duration * f64::from(sample_rate);
    if !exact.is_finite() || exact <= 0.0 {
        return 0;
    }
    let nearest = exact.round();
    if (exact - nearest).abs() < 1e-9 {
        nearest as usize
    } else {
        exact.ceil() as usize
    }
}

/// A channel backed by a fixed-rate sample buffer.
///
/// # Examples
///
/// ```
/// use synthexpr::{Channel, SampledChannel, Signal};
///
/// let mut sampled = SampledChannel::new(1.0, 4);
/// sampled.sample(&Channel::identity()).unwrap();
/// assert_eq!(sampled.data(), &[0.0, 0.25, 0.5, 0.75]);
///
/// let channel = Channel::from(sampled);
/// assert_eq!(channel.eval(0.125).unwrap(), 0.125);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampledChannel {
    data: Vec<f64>,
    sample_rate: u32,
    populated: bool,
}

impl SampledChannel {
    /// Allocates a zero-filled buffer of `ceil(duration * sample_rate)` frames.
    ///
    /// # Arguments
    ///
    /// * `duration` - Length in seconds; non-finite or non-positive values give an empty buffer
    /// * `sample_rate` - Grid rate in Hz
    ///
    /// # Panics
    ///
    /// Like `vec!`, panics if the frame count cannot be allocated.
    pub fn new(duration: f64, sample_rate: u32) -> Self {
        Self {
            data: vec![0.0; frame_count(duration, sample_rate)],
            sample_rate,
            populated: false,
        }
    }

    /// Wraps already decoded samples; the channel starts out populated.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthexpr::{SampledChannel, Signal};
    ///
    /// let ramp = SampledChannel::from_samples(1, vec![0.0, 1.0]);
    /// assert!(ramp.is_populated());
    /// assert_eq!(ramp.eval(0.5).unwrap(), 0.5);
    /// ```
    pub fn from_samples(sample_rate: u32, data: Vec<f64>) -> Self {
        Self {
            data,
            sample_rate,
            populated: true,
        }
    }

    /// Fills the buffer with `source` evaluated at `i / sample_rate`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::AlreadySampled`] if the buffer is already
    /// populated. Errors from `source` propagate as-is; the buffer is then
    /// left partially written and the channel stays empty.
    pub fn sample<S: Signal + ?Sized>(&mut self, source: &S) -> Result<()> {
        if self.populated {
            return Err(ChannelError::AlreadySampled);
        }
        log::trace!(
            "sampling {} frames at {} Hz",
            self.data.len(),
            self.sample_rate
        );
        source.process(&mut self.data, self.sample_rate)?;
        self.populated = true;
        Ok(())
    }

    /// Sample at integer index `i`, or `0.0` outside the buffer.
    pub fn get(&self, i: i64) -> f64 {
        usize::try_from(i)
            .ok()
            .and_then(|i| self.data.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// The raw samples, one per grid point.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of samples in the buffer.
    pub fn frame_count(&self) -> usize {
        self.data.len()
    }

    /// Grid rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length of the buffer in seconds.
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 / f64::from(self.sample_rate)
    }

    /// True once the buffer holds samples from a source or a decoded file.
    pub fn is_populated(&self) -> bool {
        self.populated
    }
}

impl Signal for SampledChannel {
    fn eval(&self, t: f64) -> Result<f64> {
        let index = t * f64::from(self.sample_rate);
        let floor = index.floor();
        let frac = index - floor;
        let i = floor as i64;
        Ok(self.get(i) * (1.0 - frac) + self.get(i.saturating_add(1)) * frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Channel, div, sub};

    #[test]
    fn test_frame_count_rounds_up() {
        assert_eq!(frame_count(1.0, 8000), 8000);
        assert_eq!(frame_count(0.1, 48000), 4800);
        assert_eq!(frame_count(0.5, 3), 2);
        assert_eq!(frame_count(0.0, 48000), 0);
        assert_eq!(frame_count(-1.0, 48000), 0);
    }

    #[test]
    fn test_non_finite_durations_have_no_frames() {
        assert_eq!(frame_count(f64::INFINITY, 48000), 0);
        assert_eq!(frame_count(f64::NEG_INFINITY, 48000), 0);
        assert_eq!(frame_count(f64::NAN, 48000), 0);
        assert_eq!(SampledChannel::new(f64::INFINITY, 48000).frame_count(), 0);
        assert_eq!(SampledChannel::new(f64::MAX, 48000).frame_count(), 0);
    }

    #[test]
    fn test_new_is_empty_and_zeroed() {
        let sampled = SampledChannel::new(0.5, 10);
        assert_eq!(sampled.frame_count(), 5);
        assert!(!sampled.is_populated());
        assert!(sampled.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_out_of_range_reads_are_zero() {
        let sampled = SampledChannel::from_samples(1, vec![3.0, 4.0]);
        assert_eq!(sampled.get(-1), 0.0);
        assert_eq!(sampled.get(0), 3.0);
        assert_eq!(sampled.get(1), 4.0);
        assert_eq!(sampled.get(2), 0.0);
        assert_eq!(sampled.get(i64::MAX), 0.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let sampled = SampledChannel::from_samples(1, vec![0.0, 1.0]);
        assert_eq!(sampled.eval(0.5).unwrap(), 0.5);
        assert_eq!(sampled.eval(0.25).unwrap(), 0.25);
        assert_eq!(sampled.eval(1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_edges_fade_to_zero() {
        let sampled = SampledChannel::from_samples(2, vec![1.0, 1.0]);
        // Past the last frame the next neighbour is silence
        assert_eq!(sampled.eval(0.75).unwrap(), 0.5);
        assert_eq!(sampled.eval(5.0).unwrap(), 0.0);
        // Before the first frame the previous neighbour is silence
        assert_eq!(sampled.eval(-0.25).unwrap(), 0.5);
        assert_eq!(sampled.eval(-3.0).unwrap(), 0.0);
        assert_eq!(sampled.eval(1e30).unwrap(), 0.0);
    }

    #[test]
    fn test_sample_populates_once() {
        let mut sampled = SampledChannel::new(1.0, 4);
        sampled.sample(&Channel::identity()).unwrap();
        assert!(sampled.is_populated());
        assert!(matches!(
            sampled.sample(&Channel::identity()),
            Err(ChannelError::AlreadySampled)
        ));
    }

    #[test]
    fn test_failed_sample_propagates_and_stays_empty() {
        let mut sampled = SampledChannel::new(1.0, 4);
        // 1 / (t - 0.5) fails at the third grid point
        let source = div(1.0, sub(Channel::identity(), 0.5));
        let err = sampled.sample(&source).unwrap_err();
        assert!(matches!(err, ChannelError::DivisionByZero { .. }));
        assert!(!sampled.is_populated());
        assert_eq!(sampled.get(0), -2.0);
        assert_eq!(sampled.get(1), -4.0);
    }

    #[test]
    fn test_duration() {
        let sampled = SampledChannel::new(0.25, 48000);
        assert_eq!(sampled.duration(), 0.25);
    }
}
