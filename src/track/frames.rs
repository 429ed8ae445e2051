//! Lazy frame rendering.

use super::{Frame, Track};
use crate::Result;
use crate::sampled::frame_count;

/// Iterator over the frames of a [`Track`] on a fixed time grid.
///
/// Created by [`Track::render`]. Each frame is evaluated on demand; cloning
/// the iterator (or calling `render` again) restarts from any position.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    track: &'a Track,
    sample_rate: u32,
    index: usize,
    count: usize,
}

impl<'a> Frames<'a> {
    pub(super) fn new(track: &'a Track, duration: f64, sample_rate: u32) -> Self {
        Self {
            track,
            sample_rate,
            index: 0,
            count: frame_count(duration, sample_rate),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let t = self.index as f64 / f64::from(self.sample_rate);
        self.index += 1;
        Some(self.track.eval_frame(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}
