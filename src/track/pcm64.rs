//! 64-bit integer PCM WAV.
//!
//! `hound` carries integer PCM up to 32 bits per sample, so the widest
//! sample format goes through this small RIFF codec instead. Files are
//! written with a plain 16-byte `fmt ` chunk (format tag 1), little-endian
//! and interleaved. Reading also accepts `WAVE_FORMAT_EXTENSIBLE` headers
//! whose sub-format is PCM.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{ChannelError, Result};

const BITS: u16 = 64;
const BYTES: u16 = 8;
const FORMAT_PCM: u16 = 1;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;
/// RIFF header, `fmt ` chunk and `data` chunk header.
const HEADER_LEN: u64 = 44;

fn too_large() -> ChannelError {
    ChannelError::UnsupportedFormat("data exceeds the 4 GiB RIFF limit".to_string())
}

/// Streaming writer for 64-bit PCM; chunk sizes are patched on finalize.
pub(super) struct Pcm64Writer<W: Write + Seek> {
    writer: W,
    samples_written: u64,
}

impl Pcm64Writer<BufWriter<File>> {
    pub(super) fn create(path: &Path, channels: u16, sample_rate: u32) -> Result<Self> {
        Self::new(BufWriter::new(File::create(path)?), channels, sample_rate)
    }
}

impl<W: Write + Seek> Pcm64Writer<W> {
    pub(super) fn new(mut writer: W, channels: u16, sample_rate: u32) -> Result<Self> {
        let block_align = channels
            .checked_mul(BYTES)
            .ok_or_else(|| ChannelError::UnsupportedFormat(format!("{channels} channels")))?;
        let byte_rate = sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or_else(|| ChannelError::UnsupportedFormat(format!("{sample_rate} Hz")))?;

        writer.write_all(b"RIFF")?;
        writer.write_u32::<LittleEndian>(0)?;
        writer.write_all(b"WAVE")?;

        writer.write_all(b"fmt ")?;
        writer.write_u32::<LittleEndian>(16)?;
        writer.write_u16::<LittleEndian>(FORMAT_PCM)?;
        writer.write_u16::<LittleEndian>(channels)?;
        writer.write_u32::<LittleEndian>(sample_rate)?;
        writer.write_u32::<LittleEndian>(byte_rate)?;
        writer.write_u16::<LittleEndian>(block_align)?;
        writer.write_u16::<LittleEndian>(BITS)?;

        writer.write_all(b"data")?;
        writer.write_u32::<LittleEndian>(0)?;

        Ok(Self {
            writer,
            samples_written: 0,
        })
    }

    pub(super) fn write_sample(&mut self, sample: i64) -> Result<()> {
        self.writer.write_i64::<LittleEndian>(sample)?;
        self.samples_written += 1;
        Ok(())
    }

    /// Patches the RIFF and `data` sizes, flushes, and returns the sink.
    pub(super) fn finalize(mut self) -> Result<W> {
        let data_len = self
            .samples_written
            .checked_mul(u64::from(BYTES))
            .and_then(|len| u32::try_from(len).ok())
            .ok_or_else(too_large)?;
        let riff_len = data_len
            .checked_add((HEADER_LEN - 8) as u32)
            .ok_or_else(too_large)?;

        self.writer.seek(SeekFrom::Start(4))?;
        self.writer.write_u32::<LittleEndian>(riff_len)?;
        self.writer.seek(SeekFrom::Start(HEADER_LEN - 4))?;
        self.writer.write_u32::<LittleEndian>(data_len)?;
        self.writer.seek(SeekFrom::End(0))?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Reader positioned at the first sample of a 64-bit PCM `data` chunk.
pub(super) struct Pcm64Reader<R: Read> {
    reader: R,
    channels: u16,
    sample_rate: u32,
    len: u32,
}

impl Pcm64Reader<BufReader<File>> {
    /// Opens `path` when it holds 64-bit integer PCM.
    ///
    /// Every other file, including ones that fail to parse, yields `None` and
    /// is left to `hound`, which reports its own errors.
    pub(super) fn open(path: &Path) -> Option<Self> {
        let file = File::open(path).ok()?;
        Self::new(BufReader::new(file)).ok().flatten()
    }
}

impl<R: Read> Pcm64Reader<R> {
    /// Walks the RIFF chunks up to `data`.
    pub(super) fn new(mut reader: R) -> io::Result<Option<Self>> {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag)?;
        if &tag != b"RIFF" {
            return Ok(None);
        }
        reader.read_u32::<LittleEndian>()?;
        reader.read_exact(&mut tag)?;
        if &tag != b"WAVE" {
            return Ok(None);
        }

        let mut format = None;
        loop {
            reader.read_exact(&mut tag)?;
            let len = reader.read_u32::<LittleEndian>()?;
            match &tag {
                b"fmt " => {
                    if len < 16 {
                        return Ok(None);
                    }
                    let mut format_tag = reader.read_u16::<LittleEndian>()?;
                    let channels = reader.read_u16::<LittleEndian>()?;
                    let sample_rate = reader.read_u32::<LittleEndian>()?;
                    let _byte_rate = reader.read_u32::<LittleEndian>()?;
                    let block_align = reader.read_u16::<LittleEndian>()?;
                    let bits = reader.read_u16::<LittleEndian>()?;
                    let mut consumed = 16;
                    if format_tag == FORMAT_EXTENSIBLE && len >= 40 {
                        // cbSize, valid bits and channel mask precede the sub-format GUID
                        let mut extension = [0u8; 24];
                        reader.read_exact(&mut extension)?;
                        format_tag = u16::from_le_bytes([extension[8], extension[9]]);
                        consumed = 40;
                    }
                    skip(&mut reader, u64::from(len - consumed) + u64::from(len % 2))?;

                    let aligned = u32::from(block_align) == u32::from(channels) * u32::from(BYTES);
                    if format_tag != FORMAT_PCM || bits != BITS || channels == 0 || !aligned {
                        return Ok(None);
                    }
                    format = Some((channels, sample_rate));
                }
                b"data" => {
                    let Some((channels, sample_rate)) = format else {
                        return Ok(None);
                    };
                    return Ok(Some(Self {
                        reader,
                        channels,
                        sample_rate,
                        len: len / u32::from(BYTES),
                    }));
                }
                _ => skip(&mut reader, u64::from(len) + u64::from(len % 2))?,
            }
        }
    }

    pub(super) fn channels(&self) -> u16 {
        self.channels
    }

    pub(super) fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whole frames in the `data` chunk.
    pub(super) fn frame_count(&self) -> usize {
        (self.len / u32::from(self.channels)) as usize
    }

    /// Interleaved samples in file order.
    pub(super) fn into_samples(mut self) -> impl Iterator<Item = Result<i64>> {
        (0..self.len).map(move |_| -> Result<i64> { Ok(self.reader.read_i64::<LittleEndian>()?) })
    }
}

fn skip<R: Read>(reader: &mut R, len: u64) -> io::Result<()> {
    let skipped = io::copy(&mut reader.by_ref().take(len), &mut io::sink())?;
    if skipped < len {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded(channels: u16, samples: &[i64]) -> Vec<u8> {
        let mut writer = Pcm64Writer::new(Cursor::new(Vec::new()), channels, 8000).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap().into_inner()
    }

    #[test]
    fn test_header_layout() {
        let bytes = encoded(2, &[1, -1, i64::MAX, -i64::MAX]);
        assert_eq!(bytes.len(), 44 + 32);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 36 + 32);
        assert_eq!(&bytes[8..16], b"WAVEfmt ");
        // channels, block align and bits per sample
        assert_eq!(u16::from_le_bytes([bytes[22], bytes[23]]), 2);
        assert_eq!(u16::from_le_bytes([bytes[32], bytes[33]]), 16);
        assert_eq!(u16::from_le_bytes([bytes[34], bytes[35]]), 64);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 32);
        assert_eq!(&bytes[44..52], &1_i64.to_le_bytes());
    }

    #[test]
    fn test_samples_read_back_in_order() {
        let samples = [0, 5, -7, i64::MAX, -i64::MAX, 42];
        let reader = Pcm64Reader::new(Cursor::new(encoded(3, &samples)))
            .unwrap()
            .unwrap();
        assert_eq!(reader.channels(), 3);
        assert_eq!(reader.sample_rate(), 8000);
        assert_eq!(reader.frame_count(), 2);
        let decoded: Vec<i64> = reader.into_samples().collect::<Result<_>>().unwrap();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn test_unknown_chunks_are_skipped() {
        let plain = encoded(1, &[9]);
        let mut bytes = plain[..12].to_vec();
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&3_u32.to_le_bytes());
        bytes.extend_from_slice(&[1, 2, 3, 0]);
        bytes.extend_from_slice(&plain[12..]);

        let reader = Pcm64Reader::new(Cursor::new(bytes)).unwrap().unwrap();
        let decoded: Vec<i64> = reader.into_samples().collect::<Result<_>>().unwrap();
        assert_eq!(decoded, vec![9]);
    }

    #[test]
    fn test_narrower_formats_are_declined() {
        let mut bytes = encoded(1, &[]);
        // 16-bit mono: block align 2, bits 16
        bytes[32..34].copy_from_slice(&2_u16.to_le_bytes());
        bytes[34..36].copy_from_slice(&16_u16.to_le_bytes());
        assert!(Pcm64Reader::new(Cursor::new(bytes)).unwrap().is_none());
        assert!(Pcm64Reader::new(Cursor::new(b"RIFX\0\0\0\0WAVE".to_vec())).unwrap().is_none());
    }

    #[test]
    fn test_truncated_header_is_an_error() {
        let bytes = encoded(1, &[1]);
        assert!(Pcm64Reader::new(Cursor::new(bytes[..30].to_vec())).is_err());
    }
}
