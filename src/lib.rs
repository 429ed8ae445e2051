//! synthexpr - continuous-time signal expressions rendered to audio files
//!
//! Channels are pure functions of time built from a small algebra of
//! nodes (constants, time, arithmetic, composition, affine transforms,
//! oscillators and sampled buffers). They can be differentiated, constant
//! folded, and rendered through a [`Track`] into multi-channel PCM WAV.
//!
//! ```
//! use synthexpr::{Channel, ChannelExt, Signal, Track, compose};
//!
//! let fast = Channel::sine().frequency(1000.0);
//! let slow = Channel::sine().frequency(0.5);
//! let warbled = compose(fast.clone(), slow);
//!
//! let track = Track::new([warbled, fast]);
//! assert_eq!(track.eval_frame(0.0).unwrap().len(), 2);
//! ```

pub mod calculus;
pub mod core;
pub mod error;
pub mod oscillators;
pub mod sampled;
pub mod track;

// Re-export commonly used types at the crate root
pub use crate::core::{
    Channel, ChannelExt, Node, Signal, TransformConfig, abs, add, coerce, compose, div, log, mul,
    neg, pow, sub, transform,
};
pub use error::{ChannelError, Result};
pub use oscillators::Waveform;
pub use sampled::SampledChannel;
pub use track::{Frame, Frames, SampleWidth, Track, WavConfig};

#[cfg(feature = "macros")]
pub use synthexpr_macros::expr;
