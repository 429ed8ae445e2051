//! Symbolic operations over channel expressions.
//!
//! - [`Channel::derivative`](crate::Channel::derivative): analytic `d/dt`
//! - [`Channel::reduce`](crate::Channel::reduce): bottom-up constant folding

mod derivative;
mod reduce;
