//! Sawtooth waveform.

use super::phase;

/// Rises linearly from -1.0 at the start of each period towards 1.0.
pub(super) fn sawtooth(t: f64) -> f64 {
    -1.0 + 2.0 * phase(t)
}
