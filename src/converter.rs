//! PCM byte stream encoding and decoding.
//!
//! Converts between little-endian PCM bytes and normalized floating-point
//! samples, in both packed (single channel) and interleaved (bytes) to
//! planar (per-channel buffers) shapes. Numeric scaling follows
//! [`dasp_sample`]'s conversion conventions, except the 24-bit path which
//! packs three bytes directly.
//!
//! Inputs are expected in `[-1, 1]`; run the [saturator](crate::saturator)
//! first if the signal may overshoot.

use dasp_sample::Sample;

/// On-the-wire PCM sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Unsigned 8-bit, midpoint 128.
    Uint8,
    /// Signed 16-bit little-endian.
    Int16,
    /// Signed 24-bit little-endian, three bytes per sample.
    Int24,
    /// Signed 32-bit little-endian.
    Int32,
    /// IEEE 754 single precision, little-endian.
    Float32,
    /// IEEE 754 double precision, little-endian.
    Float64,
}

/// Full scale of the 24-bit encoding: 2^23 - 1.
const INT24_MAX: f64 = 8_388_607.0;
/// Decode scale of the 24-bit encoding: 1 / 2^23.
const INT24_SCALE: f64 = 1.0 / 8_388_608.0;

impl SampleFormat {
    /// Bytes occupied by one encoded sample.
    pub fn sample_size(self) -> usize {
        match self {
            SampleFormat::Uint8 => 1,
            SampleFormat::Int16 => 2,
            SampleFormat::Int24 => 3,
            SampleFormat::Int32 | SampleFormat::Float32 => 4,
            SampleFormat::Float64 => 8,
        }
    }

    fn decode_one(self, bytes: &[u8]) -> f64 {
        match self {
            SampleFormat::Uint8 => bytes[0].to_sample(),
            SampleFormat::Int16 => i16::from_le_bytes([bytes[0], bytes[1]]).to_sample(),
            SampleFormat::Int24 => {
                // Sign-extend three little-endian bytes through the i32 top.
                let wide =
                    (bytes[0] as i32) << 8 | (bytes[1] as i32) << 16 | ((bytes[2] as i8) as i32) << 24;
                (wide >> 8) as f64 * INT24_SCALE
            }
            SampleFormat::Int32 => {
                i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).to_sample()
            }
            SampleFormat::Float32 => {
                f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
            }
            SampleFormat::Float64 => f64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
        }
    }

    fn encode_one(self, sample: f64, bytes: &mut [u8]) {
        match self {
            SampleFormat::Uint8 => bytes[0] = sample.to_sample(),
            SampleFormat::Int16 => {
                bytes[..2].copy_from_slice(&sample.to_sample::<i16>().to_le_bytes())
            }
            SampleFormat::Int24 => {
                // The cast saturates at i32 bounds, which keeps exact full
                // scale at +/-(2^23 - 1); anything past +/-1 must be clamped
                // upstream or the 3-byte truncation wraps.
                let wide = (sample * INT24_MAX) as i32;
                bytes[0] = wide as u8;
                bytes[1] = (wide >> 8) as u8;
                bytes[2] = (wide >> 16) as u8;
            }
            SampleFormat::Int32 => {
                bytes[..4].copy_from_slice(&sample.to_sample::<i32>().to_le_bytes())
            }
            SampleFormat::Float32 => bytes[..4].copy_from_slice(&(sample as f32).to_le_bytes()),
            SampleFormat::Float64 => bytes[..8].copy_from_slice(&sample.to_le_bytes()),
        }
    }

    /// Decodes packed bytes into f64 samples. Returns the number of samples
    /// decoded: whole encoded samples available, capped by `output`'s length.
    pub fn decode_f64(self, input: &[u8], output: &mut [f64]) -> usize {
        let size = self.sample_size();
        let count = (input.len() / size).min(output.len());
        for (bytes, out) in input.chunks_exact(size).zip(&mut output[..count]) {
            *out = self.decode_one(bytes);
        }
        count
    }

    /// Decodes packed bytes into f32 samples. See [`SampleFormat::decode_f64`].
    pub fn decode_f32(self, input: &[u8], output: &mut [f32]) -> usize {
        let size = self.sample_size();
        let count = (input.len() / size).min(output.len());
        for (bytes, out) in input.chunks_exact(size).zip(&mut output[..count]) {
            *out = self.decode_one(bytes) as f32;
        }
        count
    }

    /// Encodes f64 samples into packed bytes. Returns the number of samples
    /// encoded: `input`'s length, capped by the whole samples `output` can hold.
    pub fn encode_f64(self, input: &[f64], output: &mut [u8]) -> usize {
        let size = self.sample_size();
        let count = input.len().min(output.len() / size);
        for (&sample, bytes) in input[..count].iter().zip(output.chunks_exact_mut(size)) {
            self.encode_one(sample, bytes);
        }
        count
    }

    /// Encodes f32 samples into packed bytes. See [`SampleFormat::encode_f64`].
    pub fn encode_f32(self, input: &[f32], output: &mut [u8]) -> usize {
        let size = self.sample_size();
        let count = input.len().min(output.len() / size);
        for (&sample, bytes) in input[..count].iter().zip(output.chunks_exact_mut(size)) {
            self.encode_one(sample as f64, bytes);
        }
        count
    }

    /// Decodes channel-interleaved bytes into planar f64 buffers. Returns
    /// the number of frames decoded: whole frames available in `input`,
    /// capped by the shortest output buffer.
    pub fn decode_planar_f64(self, input: &[u8], outputs: &mut [&mut [f64]]) -> usize {
        let size = self.sample_size();
        let channels = outputs.len();
        let capacity = outputs.iter().map(|o| o.len()).min().unwrap_or(0);
        let frames = (input.len() / (size * channels)).min(capacity);

        for (channel, output) in outputs.iter_mut().enumerate() {
            let mut offset = channel * size;
            for out in &mut output[..frames] {
                *out = self.decode_one(&input[offset..offset + size]);
                offset += channels * size;
            }
        }
        frames
    }

    /// Decodes channel-interleaved bytes into planar f32 buffers. See
    /// [`SampleFormat::decode_planar_f64`].
    pub fn decode_planar_f32(self, input: &[u8], outputs: &mut [&mut [f32]]) -> usize {
        let size = self.sample_size();
        let channels = outputs.len();
        let capacity = outputs.iter().map(|o| o.len()).min().unwrap_or(0);
        let frames = (input.len() / (size * channels)).min(capacity);

        for (channel, output) in outputs.iter_mut().enumerate() {
            let mut offset = channel * size;
            for out in &mut output[..frames] {
                *out = self.decode_one(&input[offset..offset + size]) as f32;
                offset += channels * size;
            }
        }
        frames
    }

    /// Encodes planar f64 buffers into channel-interleaved bytes. Returns
    /// the number of frames encoded: the shortest input buffer, capped by
    /// the whole frames `output` can hold.
    pub fn encode_interleaved_f64(self, inputs: &[&[f64]], output: &mut [u8]) -> usize {
        let size = self.sample_size();
        let channels = inputs.len();
        let available = inputs.iter().map(|i| i.len()).min().unwrap_or(0);
        let frames = available.min(output.len() / (size * channels));

        let mut offset = 0;
        for frame in 0..frames {
            for input in inputs {
                self.encode_one(input[frame], &mut output[offset..offset + size]);
                offset += size;
            }
        }
        frames
    }

    /// Encodes planar f32 buffers into channel-interleaved bytes. See
    /// [`SampleFormat::encode_interleaved_f64`].
    pub fn encode_interleaved_f32(self, inputs: &[&[f32]], output: &mut [u8]) -> usize {
        let size = self.sample_size();
        let channels = inputs.len();
        let available = inputs.iter().map(|i| i.len()).min().unwrap_or(0);
        let frames = available.min(output.len() / (size * channels));

        let mut offset = 0;
        for frame in 0..frames {
            for input in inputs {
                self.encode_one(input[frame] as f64, &mut output[offset..offset + size]);
                offset += size;
            }
        }
        frames
    }
}
