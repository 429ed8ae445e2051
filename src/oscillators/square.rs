//! Square (pulse) waveform.

use super::phase;

pub(super) fn square(t: f64, duty: f64) -> f64 {
    if phase(t) < duty { 1.0 } else { -1.0 }
}
