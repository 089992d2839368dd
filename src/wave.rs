//! Reading and writing RIFF/WAVE files, backed by `hound`.
//!
//! These wrappers expose the container at the resampler's boundary: format
//! metadata for constructing a [`Resampler`](crate::Resampler), and chunked
//! planar f64 frames in and out. Header size fields are backpatched by
//! `hound` when the writer is finalized, so non-seekable pipelines should
//! buffer through a seekable writer.

use std::io::{Read, Seek, Write};

use dasp_sample::Sample;
use hound::{SampleFormat, WavSpec};

/// Failure while reading or writing a WAVE stream.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    #[error("could not parse wave header")]
    Open(#[source] hound::Error),
    #[error("could not read samples")]
    Read(#[source] hound::Error),
    #[error("could not create wave writer")]
    Create(#[source] hound::Error),
    #[error("could not write samples")]
    Write(#[source] hound::Error),
    #[error("could not backpatch the wave header")]
    Finalize(#[source] hound::Error),
    #[error("unsupported sample format: {bits}-bit {format:?}")]
    UnsupportedFormat { bits: u16, format: SampleFormat },
}

fn check_format(spec: WavSpec) -> Result<(), WaveError> {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8 | 16 | 24 | 32) | (SampleFormat::Float, 32) => Ok(()),
        (format, bits) => Err(WaveError::UnsupportedFormat { bits, format }),
    }
}

/// Reads a WAVE stream as normalized planar f64 frames.
pub struct WaveReader<R: Read> {
    inner: hound::WavReader<R>,
}

impl<R: Read> WaveReader<R> {
    /// Parses the WAVE header. Fails on malformed headers and on sample
    /// formats other than 8/16/24/32-bit integer and 32-bit float PCM.
    pub fn new(reader: R) -> Result<WaveReader<R>, WaveError> {
        let inner = hound::WavReader::new(reader).map_err(WaveError::Open)?;
        check_format(inner.spec())?;
        Ok(WaveReader { inner })
    }

    /// Format metadata from the header.
    pub fn spec(&self) -> WavSpec {
        self.inner.spec()
    }

    /// Total stream length in frames (samples per channel).
    pub fn frames(&self) -> u32 {
        self.inner.duration()
    }

    /// Reads up to `max_frames` frames, appending each channel's samples to
    /// its buffer in `channels`. Returns the number of frames read; 0 means
    /// end of stream. A trailing partial frame is dropped.
    ///
    /// # Panics
    /// Panics if `channels`' length differs from the stream's channel count.
    pub fn read_planar(
        &mut self,
        channels: &mut [Vec<f64>],
        max_frames: usize,
    ) -> Result<usize, WaveError> {
        let spec = self.inner.spec();
        assert_eq!(
            channels.len(),
            spec.channels as usize,
            "one buffer per stream channel is required"
        );

        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, _) => self.fill(channels, max_frames, |s: f32| s.to_sample()),
            (SampleFormat::Int, 8) => {
                self.fill(channels, max_frames, |s: i8| s.to_sample())
            }
            (SampleFormat::Int, 16) => self.fill(channels, max_frames, |s: i16| s.to_sample()),
            (SampleFormat::Int, 24) => {
                // hound yields 24-bit data sign-extended in i32, scale 2^23.
                self.fill(channels, max_frames, |s: i32| s as f64 / 8_388_608.0)
            }
            (SampleFormat::Int, _) => self.fill(channels, max_frames, |s: i32| s.to_sample()),
        }
    }

    fn fill<S: hound::Sample>(
        &mut self,
        channels: &mut [Vec<f64>],
        max_frames: usize,
        convert: impl Fn(S) -> f64,
    ) -> Result<usize, WaveError> {
        let start = channels[0].len();
        let mut samples = self.inner.samples::<S>();
        let mut frames = 0;

        'frames: while frames < max_frames {
            for channel in &mut *channels {
                match samples.next() {
                    Some(sample) => channel.push(convert(sample.map_err(WaveError::Read)?)),
                    None => break 'frames,
                }
            }
            frames += 1;
        }

        // Drop a trailing partial frame so all channels stay equally long.
        for channel in channels {
            channel.truncate(start + frames);
        }
        Ok(frames)
    }
}

/// Writes normalized planar f64 frames to a WAVE stream.
pub struct WaveWriter<W: Write + Seek> {
    inner: hound::WavWriter<W>,
}

impl<W: Write + Seek> WaveWriter<W> {
    /// Starts a WAVE stream with the given format. The header's size fields
    /// are provisional until [`WaveWriter::finalize`].
    pub fn new(writer: W, spec: WavSpec) -> Result<WaveWriter<W>, WaveError> {
        check_format(spec)?;
        let inner = hound::WavWriter::new(writer, spec).map_err(WaveError::Create)?;
        Ok(WaveWriter { inner })
    }

    /// Format metadata this writer encodes to.
    pub fn spec(&self) -> WavSpec {
        self.inner.spec()
    }

    /// Writes one slice of frames per channel, interleaving and encoding to
    /// the stream's sample format. All channels must supply the same number
    /// of frames; returns that count.
    ///
    /// # Panics
    /// Panics if `channels`' length differs from the stream's channel count,
    /// or the per-channel slices have different lengths.
    pub fn write_planar(&mut self, channels: &[&[f64]]) -> Result<usize, WaveError> {
        let spec = self.inner.spec();
        assert_eq!(
            channels.len(),
            spec.channels as usize,
            "one slice per stream channel is required"
        );
        let frames = channels.first().map_or(0, |c| c.len());
        assert!(
            channels.iter().all(|c| c.len() == frames),
            "all channels must supply the same number of frames"
        );

        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, _) => self.drain(channels, frames, |s| s.to_sample::<f32>()),
            (SampleFormat::Int, 8) => self.drain(channels, frames, |s| s.to_sample::<i8>()),
            (SampleFormat::Int, 16) => self.drain(channels, frames, |s| s.to_sample::<i16>()),
            (SampleFormat::Int, 24) => {
                self.drain(channels, frames, |s| (s * 8_388_607.0) as i32)
            }
            (SampleFormat::Int, _) => self.drain(channels, frames, |s| s.to_sample::<i32>()),
        }?;
        Ok(frames)
    }

    fn drain<S: hound::Sample>(
        &mut self,
        channels: &[&[f64]],
        frames: usize,
        convert: impl Fn(f64) -> S,
    ) -> Result<(), WaveError> {
        for frame in 0..frames {
            for channel in channels {
                self.inner
                    .write_sample(convert(channel[frame]))
                    .map_err(WaveError::Write)?;
            }
        }
        Ok(())
    }

    /// Flushes buffered samples and backpatches the header's length fields.
    ///
    /// Dropping the writer without calling this leaves a header hound will
    /// try to patch on drop, but errors are then silently discarded.
    pub fn finalize(self) -> Result<(), WaveError> {
        self.inner.finalize().map_err(WaveError::Finalize)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Cursor;

    fn spec(bits: u16, format: SampleFormat) -> WavSpec {
        WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: bits,
            sample_format: format,
        }
    }

    fn round_trip(spec: WavSpec, epsilon: f64) {
        let left: Vec<f64> = (0..200).map(|i| (i as f64 / 200.0) - 0.5).collect();
        let right: Vec<f64> = left.iter().map(|s| -s).collect();

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WaveWriter::new(&mut cursor, spec).unwrap();
        assert_eq!(writer.write_planar(&[&left, &right]).unwrap(), 200);
        writer.finalize().unwrap();

        cursor.set_position(0);
        let mut reader = WaveReader::new(cursor).unwrap();
        assert_eq!(reader.spec(), spec);
        assert_eq!(reader.frames(), 200);

        let mut channels = vec![Vec::new(), Vec::new()];
        assert_eq!(reader.read_planar(&mut channels, 500).unwrap(), 200);
        assert_eq!(reader.read_planar(&mut channels, 500).unwrap(), 0);

        for i in 0..200 {
            assert_abs_diff_eq!(channels[0][i], left[i], epsilon = epsilon);
            assert_abs_diff_eq!(channels[1][i], right[i], epsilon = epsilon);
        }
    }

    #[test]
    fn float32_round_trip() {
        round_trip(spec(32, SampleFormat::Float), 1e-7);
    }

    #[test]
    fn int16_round_trip() {
        round_trip(spec(16, SampleFormat::Int), 1.0 / 16_000.0);
    }

    #[test]
    fn int24_round_trip() {
        round_trip(spec(24, SampleFormat::Int), 1.0 / 4_000_000.0);
    }

    #[test]
    fn chunked_reads_match_stream_length() {
        let samples: Vec<f64> = (0..333).map(|i| (i % 7) as f64 / 10.0).collect();
        let mono = WavSpec {
            channels: 1,
            ..spec(16, SampleFormat::Int)
        };

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WaveWriter::new(&mut cursor, mono).unwrap();
        writer.write_planar(&[&samples]).unwrap();
        writer.finalize().unwrap();

        cursor.set_position(0);
        let mut reader = WaveReader::new(cursor).unwrap();
        let mut channels = vec![Vec::new()];
        let mut total = 0;
        loop {
            let frames = reader.read_planar(&mut channels, 100).unwrap();
            if frames == 0 {
                break;
            }
            total += frames;
        }
        assert_eq!(total, 333);
        assert_eq!(channels[0].len(), 333);
    }

    #[test]
    fn rejects_unsupported_formats() {
        let bad = spec(64, SampleFormat::Float);
        let cursor = Cursor::new(Vec::new());
        assert!(matches!(
            WaveWriter::new(cursor, bad),
            Err(WaveError::UnsupportedFormat { bits: 64, .. })
        ));
    }
}
