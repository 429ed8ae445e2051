//! WAV read/write.
//!
//! Widths up to 4 bytes go through `hound`; 8-byte samples use the
//! [`pcm64`](super::pcm64) codec.

use std::path::Path;

use super::pcm64::{Pcm64Reader, Pcm64Writer};
use super::{Frames, SampleWidth, Track, WavConfig};
use crate::{Channel, ChannelError, Result, SampledChannel};

impl Track {
    /// Renders `duration` seconds of the track into a PCM WAV file.
    ///
    /// Every sample is quantized to `round(max * value)` and clamped to the
    /// width's range; frames are interleaved in channel order. The file is
    /// closed on every exit path, including evaluation errors part-way
    /// through, in which case it is left truncated.
    ///
    /// # Errors
    ///
    /// [`ChannelError::UnsupportedFormat`] or [`ChannelError::EmptyTrack`]
    /// before any file is created; evaluation and codec errors afterwards.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use synthexpr::{Channel, ChannelExt, Track, WavConfig};
    ///
    /// let tone = Channel::sine().frequency(1000.0);
    /// Track::new([tone]).write("sin-mono.wav", 1.0, WavConfig::default())?;
    /// # Ok::<(), synthexpr::ChannelError>(())
    /// ```
    pub fn write(&self, path: impl AsRef<Path>, duration: f64, config: WavConfig) -> Result<()> {
        let width = config.validate()?;
        if self.is_empty() {
            return Err(ChannelError::EmptyTrack);
        }
        let channels = u16::try_from(self.channel_count()).map_err(|_| {
            ChannelError::UnsupportedFormat(format!("{} channels", self.channel_count()))
        })?;

        let path = path.as_ref();
        let frames = self.render(duration, config.sample_rate);
        log::debug!(
            "writing {} frames x {} channels at {} Hz, {} bytes/sample to {}",
            frames.len(),
            channels,
            config.sample_rate,
            width.bytes(),
            path.display()
        );

        let clipped = match width {
            SampleWidth::Long => {
                let mut writer = Pcm64Writer::create(path, channels, config.sample_rate)?;
                let clipped = write_frames(frames, width, |sample| writer.write_sample(sample))?;
                writer.finalize()?;
                clipped
            }
            SampleWidth::Byte | SampleWidth::Short | SampleWidth::Int => {
                let spec = hound::WavSpec {
                    channels,
                    sample_rate: config.sample_rate,
                    bits_per_sample: width.bits(),
                    sample_format: hound::SampleFormat::Int,
                };
                let mut writer = hound::WavWriter::create(path, spec)?;
                // Widths up to 4 bytes always fit in i32 after clamping
                let clipped = write_frames(frames, width, |sample| {
                    Ok(writer.write_sample(sample as i32)?)
                })?;
                writer.finalize()?;
                clipped
            }
        };

        if clipped > 0 {
            log::warn!("{clipped} samples clipped while writing {}", path.display());
        }
        Ok(())
    }

    /// Reads a PCM WAV file back into a track of sampled channels.
    ///
    /// Each container channel becomes one populated [`SampledChannel`] at the
    /// file's frame rate, decoded as `sample / max`.
    ///
    /// # Errors
    ///
    /// [`ChannelError::UnsupportedFormat`] for float or 24-bit sample
    /// formats; codec errors otherwise.
    pub fn read(path: impl AsRef<Path>) -> Result<Track> {
        let path = path.as_ref();
        if let Some(reader) = Pcm64Reader::open(path) {
            let channel_count = usize::from(reader.channels());
            let sample_rate = reader.sample_rate();
            let frame_count = reader.frame_count();
            log::debug!(
                "reading {frame_count} frames x {channel_count} channels at {sample_rate} Hz, 8 bytes/sample from {}",
                path.display()
            );
            return deinterleave(
                reader.into_samples(),
                SampleWidth::Long,
                channel_count,
                sample_rate,
                frame_count,
            );
        }

        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int {
            return Err(ChannelError::UnsupportedFormat(
                "floating point samples".to_string(),
            ));
        }
        let width = SampleWidth::from_bits(spec.bits_per_sample)?;
        let channel_count = usize::from(spec.channels);
        if channel_count == 0 {
            return Err(ChannelError::UnsupportedFormat("zero channels".to_string()));
        }
        let frame_count = reader.duration() as usize;
        log::debug!(
            "reading {frame_count} frames x {channel_count} channels at {} Hz from {}",
            spec.sample_rate,
            path.display()
        );

        let samples = reader
            .into_samples::<i32>()
            .map(|sample| -> Result<i64> { Ok(i64::from(sample?)) });
        deinterleave(samples, width, channel_count, spec.sample_rate, frame_count)
    }
}

/// Quantizes every frame into `sink` in interleaved order and returns the
/// number of clipped samples.
fn write_frames(
    frames: Frames<'_>,
    width: SampleWidth,
    mut sink: impl FnMut(i64) -> Result<()>,
) -> Result<usize> {
    let mut clipped = 0;
    for frame in frames {
        for value in frame? {
            if value.abs() > 1.0 {
                clipped += 1;
            }
            sink(width.quantize(value))?;
        }
    }
    Ok(clipped)
}

fn deinterleave(
    samples: impl Iterator<Item = Result<i64>>,
    width: SampleWidth,
    channel_count: usize,
    sample_rate: u32,
    frame_count: usize,
) -> Result<Track> {
    let mut buffers: Vec<Vec<f64>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frame_count))
        .collect();
    for (i, sample) in samples.enumerate() {
        buffers[i % channel_count].push(width.dequantize(sample?));
    }

    Ok(buffers
        .into_iter()
        .map(|data| Channel::from(SampledChannel::from_samples(sample_rate, data)))
        .collect())
}
