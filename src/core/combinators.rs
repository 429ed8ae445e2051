//! Combinators for composing channels.
//!
//! Every builder takes its operands as `impl Into<Channel>`, so plain `f64`
//! literals are coerced into Constant leaves at the call boundary. Builders
//! never evaluate anything; they only allocate a new node that shares its
//! operands.

use super::{Channel, Node, TransformConfig};

/// Coerces a number (or an existing channel) into a channel.
///
/// This is the only place raw numbers enter the algebra.
///
/// # Examples
///
/// ```
/// use synthexpr::{coerce, Signal};
///
/// let half = coerce(0.5);
/// assert_eq!(half.as_constant(), Some(0.5));
/// ```
pub fn coerce(value: impl Into<Channel>) -> Channel {
    value.into()
}

/// `a + b`
pub fn add(a: impl Into<Channel>, b: impl Into<Channel>) -> Channel {
    Node::Sum(a.into(), b.into()).into()
}

/// `a - b`
pub fn sub(a: impl Into<Channel>, b: impl Into<Channel>) -> Channel {
    Node::Difference(a.into(), b.into()).into()
}

/// `a * b`
pub fn mul(a: impl Into<Channel>, b: impl Into<Channel>) -> Channel {
    Node::Product(a.into(), b.into()).into()
}

/// `a / b`; evaluation fails on a zero denominator.
pub fn div(a: impl Into<Channel>, b: impl Into<Channel>) -> Channel {
    Node::Quotient(a.into(), b.into()).into()
}

/// `a ^ b`
pub fn pow(a: impl Into<Channel>, b: impl Into<Channel>) -> Channel {
    Node::Power(a.into(), b.into()).into()
}

/// `-a`
pub fn neg(a: impl Into<Channel>) -> Channel {
    Node::Invert(a.into()).into()
}

/// `|a|`
pub fn abs(a: impl Into<Channel>) -> Channel {
    Node::Abs(a.into()).into()
}

/// `ln(a)`; evaluation fails for non-positive operands.
pub fn log(a: impl Into<Channel>) -> Channel {
    Node::Log(a.into()).into()
}

/// Composition `outer(inner(t))`.
///
/// # Examples
///
/// ```
/// use synthexpr::{Channel, Signal, compose, mul};
///
/// let double = mul(2.0, Channel::identity());
/// let square = mul(Channel::identity(), Channel::identity());
/// // square(double(t)) = 4t^2
/// assert_eq!(compose(square, double).eval(1.5).unwrap(), 9.0);
/// ```
pub fn compose(outer: impl Into<Channel>, inner: impl Into<Channel>) -> Channel {
    Node::PassThrough {
        outer: outer.into(),
        inner: inner.into(),
    }
    .into()
}

/// `amplitude * inner(frequency * t - shift)`
pub fn transform(inner: impl Into<Channel>, config: TransformConfig) -> Channel {
    Node::Transform {
        inner: inner.into(),
        config,
    }
    .into()
}

/// Fluent combinator methods on [`Channel`].
///
/// # Examples
///
/// ```
/// use synthexpr::{Channel, ChannelExt, Signal};
///
/// // 0.5 * sin(2π · 440 t) + 0.1
/// let tone = Channel::sine().frequency(440.0).amplitude(0.5).add(0.1);
/// assert!((tone.eval(0.0).unwrap() - 0.1).abs() < 1e-12);
/// ```
pub trait ChannelExt: Into<Channel> + Sized {
    fn add(self, other: impl Into<Channel>) -> Channel {
        add(self, other)
    }

    fn sub(self, other: impl Into<Channel>) -> Channel {
        sub(self, other)
    }

    fn mul(self, other: impl Into<Channel>) -> Channel {
        mul(self, other)
    }

    fn div(self, other: impl Into<Channel>) -> Channel {
        div(self, other)
    }

    fn pow(self, exponent: impl Into<Channel>) -> Channel {
        pow(self, exponent)
    }

    fn neg(self) -> Channel {
        neg(self)
    }

    fn abs(self) -> Channel {
        abs(self)
    }

    fn log(self) -> Channel {
        log(self)
    }

    /// Feeds `inner` into this channel.
    fn compose(self, inner: impl Into<Channel>) -> Channel {
        compose(self, inner)
    }

    fn transform(self, config: TransformConfig) -> Channel {
        transform(self, config)
    }

    fn amplitude(self, amplitude: f64) -> Channel {
        transform(self, TransformConfig::default().with_amplitude(amplitude))
    }

    fn frequency(self, frequency: f64) -> Channel {
        transform(self, TransformConfig::default().with_frequency(frequency))
    }

    fn shift(self, shift: f64) -> Channel {
        transform(self, TransformConfig::default().with_shift(shift))
    }
}

impl ChannelExt for Channel {}
