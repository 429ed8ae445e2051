//! Trigonometric waveforms.

use std::f64::consts::TAU;

pub(super) fn sine(t: f64) -> f64 {
    (TAU * t).sin()
}

pub(super) fn cosine(t: f64) -> f64 {
    (TAU * t).cos()
}

pub(super) fn tangent(t: f64) -> f64 {
    (TAU * t).tan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_quarter_points() {
        assert!(sine(0.0).abs() < 1e-12);
        assert!((sine(0.25) - 1.0).abs() < 1e-12);
        assert!((sine(0.75) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_range() {
        // One full cycle at 44.1 kHz stays within [-1.0, 1.0]
        for i in 0..44100 {
            let t = i as f64 / 44100.0;
            assert!((-1.0..=1.0).contains(&sine(t)));
            assert!((-1.0..=1.0).contains(&cosine(t)));
        }
    }

    #[test]
    fn test_cosine_leads_sine_by_quarter_period() {
        for t in [0.0, 0.1, 0.6] {
            assert!((cosine(t) - sine(t + 0.25)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tangent_is_ratio() {
        let t = 0.1;
        assert!((tangent(t) - sine(t) / cosine(t)).abs() < 1e-12);
    }
}
