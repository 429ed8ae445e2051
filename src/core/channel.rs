//! Channel expression nodes.
//!
//! A [`Channel`] is a cheap, shared handle to an immutable [`Node`]. Nodes
//! reference their operands through further `Channel` handles, so one
//! sub-expression may feed several parents; the graph is a DAG and can never
//! contain a cycle because a node only ever points at nodes built before it.

use std::fmt;
use std::rc::Rc;

use super::TransformConfig;
use crate::oscillators::Waveform;
use crate::sampled::SampledChannel;
use crate::{ChannelError, Result, Signal};

/// The closed set of channel variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(f64),
    Identity,
    Invert(Channel),
    Abs(Channel),
    Log(Channel),
    Sum(Channel, Channel),
    Difference(Channel, Channel),
    Product(Channel, Channel),
    Quotient(Channel, Channel),
    Power(Channel, Channel),
    /// Function composition: `outer(inner(t))`.
    PassThrough { outer: Channel, inner: Channel },
    Transform {
        inner: Channel,
        config: TransformConfig,
    },
    Sampled(SampledChannel),
    Oscillator(Waveform),
}

impl Node {
    /// Static tag of the variant, used for diagnostics and `Display`.
    pub fn name(&self) -> &'static str {
        match self {
            Node::Constant(_) => "constant",
            Node::Identity => "identity",
            Node::Invert(_) => "invert",
            Node::Abs(_) => "abs",
            Node::Log(_) => "log",
            Node::Sum(..) => "sum",
            Node::Difference(..) => "difference",
            Node::Product(..) => "product",
            Node::Quotient(..) => "quotient",
            Node::Power(..) => "power",
            Node::PassThrough { .. } => "pass_through",
            Node::Transform { .. } => "transform",
            Node::Sampled(_) => "sampled",
            Node::Oscillator(waveform) => waveform.name(),
        }
    }
}

/// Shared handle to a channel node.
///
/// Cloning a `Channel` clones the handle, not the expression.
///
/// # Examples
///
/// ```
/// use synthexpr::{Channel, Signal, add, mul};
///
/// let t = Channel::identity();
/// // 2t + 1, with `t` shared by the product
/// let line = add(mul(2.0, t.clone()), 1.0);
/// assert_eq!(line.eval(3.0).unwrap(), 7.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Channel(Rc<Node>);

impl Channel {
    /// Wraps a node in a new shared handle.
    pub fn from_node(node: Node) -> Self {
        Channel(Rc::new(node))
    }

    /// A channel that returns `value` at every time.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthexpr::{Channel, Signal};
    ///
    /// let half = Channel::constant(0.5);
    /// assert_eq!(half.eval(12.0).unwrap(), 0.5);
    /// ```
    pub fn constant(value: f64) -> Self {
        Self::from_node(Node::Constant(value))
    }

    /// The time itself: `f(t) = t`.
    pub fn identity() -> Self {
        Self::from_node(Node::Identity)
    }

    /// `sin(2πt)`, one cycle per second.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthexpr::{Channel, ChannelExt, Signal};
    ///
    /// // A4 at 440 Hz
    /// let a4 = Channel::sine().frequency(440.0);
    /// assert!(a4.eval(0.0).unwrap().abs() < 1e-12);
    /// ```
    pub fn sine() -> Self {
        Waveform::Sine.into()
    }

    /// `cos(2πt)`
    pub fn cosine() -> Self {
        Waveform::Cosine.into()
    }

    /// `tan(2πt)`
    pub fn tangent() -> Self {
        Waveform::Tangent.into()
    }

    /// Rising ramp from -1 to 1 once per second.
    pub fn sawtooth() -> Self {
        Waveform::Sawtooth.into()
    }

    /// Square wave with period 1.
    ///
    /// # Arguments
    ///
    /// * `duty` - Fraction of each period spent at `1.0`; the rest is `-1.0`
    pub fn square(duty: f64) -> Self {
        Waveform::Square { duty }.into()
    }

    /// The node this handle points at.
    pub fn node(&self) -> &Node {
        &self.0
    }

    /// Static name of the root node's variant.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Returns the value if this node is a Constant leaf.
    pub fn as_constant(&self) -> Option<f64> {
        match *self.0 {
            Node::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.as_constant().is_some()
    }

    /// True when both handles point at the very same node.
    pub fn ptr_eq(&self, other: &Channel) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Signal for Channel {
    fn eval(&self, t: f64) -> Result<f64> {
        match self.node() {
            Node::Constant(value) => Ok(*value),
            Node::Identity => Ok(t),
            Node::Invert(a) => Ok(-a.eval(t)?),
            Node::Abs(a) => Ok(a.eval(t)?.abs()),
            Node::Log(a) => {
                let value = a.eval(t)?;
                if value <= 0.0 {
                    return Err(ChannelError::Domain {
                        operation: "log",
                        t,
                        value,
                    });
                }
                Ok(value.ln())
            }
            Node::Sum(a, b) => Ok(a.eval(t)? + b.eval(t)?),
            Node::Difference(a, b) => Ok(a.eval(t)? - b.eval(t)?),
            Node::Product(a, b) => Ok(a.eval(t)? * b.eval(t)?),
            Node::Quotient(a, b) => {
                let numerator = a.eval(t)?;
                let denominator = b.eval(t)?;
                if denominator == 0.0 {
                    return Err(ChannelError::DivisionByZero { t, numerator });
                }
                Ok(numerator / denominator)
            }
            Node::Power(a, b) => power(t, a.eval(t)?, b.eval(t)?),
            Node::PassThrough { outer, inner } => outer.eval(inner.eval(t)?),
            Node::Transform { inner, config } => {
                Ok(config.amplitude * inner.eval(config.inner_time(t))?)
            }
            Node::Sampled(sampled) => sampled.eval(t),
            Node::Oscillator(waveform) => waveform.eval(t),
        }
    }
}

/// Real power with the crate's domain policy: negative bases need integral
/// exponents, and a zero base cannot take a negative exponent.
fn power(t: f64, base: f64, exponent: f64) -> Result<f64> {
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(ChannelError::Domain {
            operation: "pow",
            t,
            value: base,
        });
    }
    if base == 0.0 && exponent < 0.0 {
        return Err(ChannelError::DivisionByZero { t, numerator: 1.0 });
    }
    Ok(base.powf(exponent))
}

impl From<f64> for Channel {
    fn from(value: f64) -> Self {
        Channel::constant(value)
    }
}

impl From<Node> for Channel {
    fn from(node: Node) -> Self {
        Channel::from_node(node)
    }
}

impl From<Waveform> for Channel {
    fn from(waveform: Waveform) -> Self {
        Channel::from_node(Node::Oscillator(waveform))
    }
}

impl From<SampledChannel> for Channel {
    fn from(sampled: SampledChannel) -> Self {
        Channel::from_node(Node::Sampled(sampled))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self.node() {
            Node::Constant(value) => write!(f, "{value}"),
            Node::Identity => f.write_str("t"),
            Node::Invert(a) | Node::Abs(a) | Node::Log(a) => write!(f, "{name}({a})"),
            Node::Sum(a, b)
            | Node::Difference(a, b)
            | Node::Product(a, b)
            | Node::Quotient(a, b)
            | Node::Power(a, b) => write!(f, "{name}({a}, {b})"),
            Node::PassThrough { outer, inner } => write!(f, "{name}({outer}, {inner})"),
            Node::Transform { inner, config } => write!(
                f,
                "{name}({inner}; shift={}, amplitude={}, frequency={})",
                config.shift, config.amplitude, config.frequency
            ),
            Node::Sampled(sampled) => write!(
                f,
                "{name}[{} @ {} Hz]",
                sampled.frame_count(),
                sampled.sample_rate()
            ),
            Node::Oscillator(Waveform::Square { duty }) => write!(f, "{name}({duty})"),
            Node::Oscillator(_) => f.write_str(name),
        }
    }
}
