//! Core expression types and traits.
//!
//! This module provides the fundamental abstractions of the channel algebra:
//! - `Signal` trait for anything that is a function of time
//! - `Node` / `Channel` for the shared expression graph
//! - Combinator functions and the `ChannelExt` fluent trait
//! - `TransformConfig` for the affine Transform node

mod channel;
pub mod combinators;
mod signal;
mod transform;

pub use channel::{Channel, Node};
pub use combinators::{
    ChannelExt, abs, add, coerce, compose, div, log, mul, neg, pow, sub, transform,
};
pub use signal::Signal;
pub use transform::TransformConfig;
