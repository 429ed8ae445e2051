//! Multi-channel tracks.
//!
//! A [`Track`] holds one channel root per output audio channel. It evaluates
//! all roots at a common time to form a frame, and renders a time range into
//! frames on a fixed grid. The WAV container itself is handled by `hound`
//! (feature `wav`), with 64-bit samples written by a small `byteorder`
//! codec; the track only quantizes samples and hands them over in
//! interleaved channel order.

mod format;
mod frames;
#[cfg(feature = "wav")]
mod pcm64;
#[cfg(feature = "wav")]
mod wav;

pub use format::{SampleWidth, WavConfig};
pub use frames::Frames;

use crate::{Channel, Node, Result, Signal};

/// One value per channel, in track order.
pub type Frame = Vec<f64>;

/// An ordered set of channels rendered together.
///
/// # Examples
///
/// ```
/// use synthexpr::{Channel, ChannelExt, Track};
///
/// let left = Channel::sine().frequency(440.0);
/// let right = Channel::sine().frequency(660.0).amplitude(0.5);
/// let track = Track::new([left, right]);
///
/// let frame = track.eval_frame(0.0).unwrap();
/// assert_eq!(frame.len(), 2);
/// assert_eq!(track.render(0.5, 48000).len(), 24000);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    channels: Vec<Channel>,
}

impl Track {
    /// Creates a track with one output channel per item, in order.
    ///
    /// # Arguments
    ///
    /// * `channels` - Channels or anything that coerces into one, such as `f64`
    pub fn new<I>(channels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Channel>,
    {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
        }
    }

    /// All channel roots in output order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Channel at `index`, if there is one.
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Number of output channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Duration of the longest sampled channel, if the track has any.
    pub fn duration(&self) -> Option<f64> {
        self.channels
            .iter()
            .filter_map(|channel| match channel.node() {
                Node::Sampled(sampled) => Some(sampled.duration()),
                _ => None,
            })
            .reduce(f64::max)
    }

    /// Evaluates every channel at `t`.
    pub fn eval_frame(&self, t: f64) -> Result<Frame> {
        self.channels.iter().map(|channel| channel.eval(t)).collect()
    }

    /// Frames at `i / sample_rate` for every grid point in `[0, duration)`.
    pub fn render(&self, duration: f64, sample_rate: u32) -> Frames<'_> {
        Frames::new(self, duration, sample_rate)
    }
}

impl<C: Into<Channel>> FromIterator<C> for Track {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Track::new(iter)
    }
}
