//! Analytic differentiation.

use crate::{
    Channel, ChannelError, Node, Result, TransformConfig, add, compose, div, log, mul, neg, pow,
    sub, transform,
};

impl Channel {
    /// Builds a new channel representing `d/dt` of this one.
    ///
    /// The result is constructed lazily: singularities (an `abs` at a zero
    /// crossing, `ln` of a non-positive base in a general power) only show up
    /// as errors when the derivative is evaluated at the offending `t`.
    ///
    /// # Errors
    ///
    /// [`ChannelError::UnsupportedOperation`] for sampled channels and for
    /// discontinuous oscillators (sawtooth, square), anywhere in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthexpr::{Channel, Signal, mul};
    ///
    /// let t = Channel::identity();
    /// let square = mul(t.clone(), t);
    /// assert_eq!(square.derivative().unwrap().eval(3.0).unwrap(), 6.0);
    /// ```
    pub fn derivative(&self) -> Result<Channel> {
        let derivative = match self.node() {
            Node::Constant(_) => Channel::constant(0.0),
            Node::Identity => Channel::constant(1.0),
            Node::Invert(a) => neg(a.derivative()?),
            // a * a' / sqrt(a^2)
            Node::Abs(a) => div(
                mul(a.clone(), a.derivative()?),
                pow(pow(a.clone(), 2.0), 0.5),
            ),
            // a' / a, plus a zero-weighted ln(a) so the result keeps ln's domain
            Node::Log(a) => add(div(a.derivative()?, a.clone()), mul(0.0, log(a.clone()))),
            Node::Sum(a, b) => add(a.derivative()?, b.derivative()?),
            Node::Difference(a, b) => sub(a.derivative()?, b.derivative()?),
            Node::Product(a, b) => add(
                mul(a.derivative()?, b.clone()),
                mul(a.clone(), b.derivative()?),
            ),
            Node::Quotient(a, b) => div(
                sub(
                    mul(a.derivative()?, b.clone()),
                    mul(a.clone(), b.derivative()?),
                ),
                pow(b.clone(), 2.0),
            ),
            Node::Power(a, b) => power_rule(a, b)?,
            Node::PassThrough { outer, inner } => {
                mul(compose(outer.derivative()?, inner.clone()), inner.derivative()?)
            }
            Node::Transform { inner, config } => transform(
                inner.derivative()?,
                TransformConfig {
                    amplitude: config.amplitude * config.frequency,
                    ..*config
                },
            ),
            Node::Oscillator(waveform) => waveform.derivative()?,
            Node::Sampled(_) => return Err(ChannelError::unsupported("derivative", self.name())),
        };
        Ok(derivative)
    }
}

/// `d/dt a^b`.
///
/// A constant exponent takes the plain power rule, which stays defined for
/// negative bases. Otherwise the general form
/// `a^(b-1) * (b*a' + a*ln(a)*b')` is used, which needs `a > 0`.
fn power_rule(base: &Channel, exponent: &Channel) -> Result<Channel> {
    let base_derivative = base.derivative()?;
    if let Some(c) = exponent.reduce().as_constant() {
        return Ok(mul(mul(c, pow(base.clone(), c - 1.0)), base_derivative));
    }
    Ok(mul(
        pow(base.clone(), sub(exponent.clone(), 1.0)),
        add(
            mul(exponent.clone(), base_derivative),
            mul(mul(base.clone(), log(base.clone())), exponent.derivative()?),
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChannelExt, SampledChannel, Signal, abs};

    const H: f64 = 1e-6;

    fn finite_difference(channel: &Channel, t: f64) -> f64 {
        (channel.eval(t + H).unwrap() - channel.eval(t - H).unwrap()) / (2.0 * H)
    }

    fn assert_matches_finite_difference(channel: &Channel, times: &[f64]) {
        let derivative = channel.derivative().unwrap();
        for &t in times {
            let analytic = derivative.eval(t).unwrap();
            let estimate = finite_difference(channel, t);
            assert!(
                (analytic - estimate).abs() < 1e-4,
                "{channel}: analytic {analytic} vs estimate {estimate} at t = {t}"
            );
        }
    }

    #[test]
    fn test_leaves() {
        assert_eq!(Channel::constant(4.0).derivative().unwrap().eval(1.0).unwrap(), 0.0);
        assert_eq!(Channel::identity().derivative().unwrap().eval(1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_invert_sum_difference() {
        let t = Channel::identity();
        let square = mul(t.clone(), t.clone());
        assert_matches_finite_difference(&neg(square.clone()), &[0.5, 2.0]);
        assert_matches_finite_difference(&add(square.clone(), t.clone()), &[0.5, 2.0]);
        assert_matches_finite_difference(&sub(square, mul(3.0, t)), &[-1.0, 2.0]);
    }

    #[test]
    fn test_product_rule() {
        let t = Channel::identity();
        let product = mul(Channel::sine(), add(t, 2.0));
        assert_matches_finite_difference(&product, &[0.0, 0.3, 0.7]);
    }

    #[test]
    fn test_quotient_and_log() {
        let t = Channel::identity();
        let ratio = div(Channel::cosine(), add(t.clone(), 3.0));
        assert_matches_finite_difference(&ratio, &[0.0, 0.4, 1.2]);
        assert_matches_finite_difference(&log(add(t, 1.0)), &[0.5, 2.0]);
    }

    #[test]
    fn test_power_with_time_varying_exponent() {
        let t = Channel::identity();
        let cases = [
            (add(t.clone(), 2.0), Channel::sine()),
            (add(mul(t.clone(), t.clone()), 1.0), t.clone()),
            (Channel::constant(3.0), mul(2.0, t.clone())),
            (add(Channel::cosine(), 1.5), sub(1.0, t.clone())),
        ];
        for (base, exponent) in cases {
            assert_matches_finite_difference(&pow(base, exponent), &[0.1, 0.45, 0.8]);
        }
    }

    #[test]
    fn test_power_with_constant_exponent_allows_negative_base() {
        let cube = pow(Channel::identity(), 3.0);
        let derivative = cube.derivative().unwrap();
        assert!((derivative.eval(-2.0).unwrap() - 12.0).abs() < 1e-12);

        let folded_exponent = pow(Channel::identity(), add(1.0, 1.0));
        assert!((folded_exponent.derivative().unwrap().eval(-3.0).unwrap() + 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_derivative_keeps_log_domain() {
        let ln = log(Channel::identity());
        let derivative = ln.derivative().unwrap();
        assert_eq!(derivative.eval(0.5).unwrap(), 2.0);
        assert!(matches!(
            derivative.eval(-1.0),
            Err(ChannelError::Domain { operation: "log", .. })
        ));
        assert!(derivative.eval(0.0).is_err());
    }

    #[test]
    fn test_general_power_needs_positive_base() {
        let t = Channel::identity();
        let derivative = pow(sub(t.clone(), 5.0), t).derivative().unwrap();
        assert!(matches!(
            derivative.eval(2.0),
            Err(ChannelError::Domain { .. })
        ));
    }

    #[test]
    fn test_abs_is_singular_at_zero() {
        let shifted = abs(sub(Channel::identity(), 1.0));
        assert_matches_finite_difference(&shifted, &[0.2, 1.8]);
        let derivative = shifted.derivative().unwrap();
        assert!(matches!(
            derivative.eval(1.0),
            Err(ChannelError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_chain_rule_for_pass_through() {
        let outer = Channel::sine();
        let inner = mul(Channel::identity(), Channel::identity());
        assert_matches_finite_difference(&compose(outer, inner), &[0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_transform_scales_by_frequency() {
        let tone = Channel::sine().frequency(3.0).amplitude(0.5).shift(0.1);
        assert_matches_finite_difference(&tone, &[0.0, 0.2, 0.65]);
    }

    #[test]
    fn test_unsupported_variants() {
        let sampled = Channel::from(SampledChannel::from_samples(10, vec![0.0; 10]));
        assert!(matches!(
            sampled.derivative(),
            Err(ChannelError::UnsupportedOperation {
                operation: "derivative",
                variant: "sampled"
            })
        ));
        // Nested unsupported leaves still fail
        let nested = add(Channel::identity(), mul(2.0, Channel::sawtooth()));
        assert!(nested.derivative().is_err());
    }
}
