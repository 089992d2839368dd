//! Amplitude clamping to the normalized `[-1, 1]` range.
//!
//! The resampler's ringing can push samples slightly past full scale;
//! saturate before handing floats to an integer PCM encoder. NaN is passed
//! through untouched.

/// Clamps one f64 sample to `[-1, 1]`.
#[inline]
pub fn saturate(sample: f64) -> f64 {
    sample.clamp(-1.0, 1.0)
}

/// Clamps one f32 sample to `[-1, 1]`.
#[inline]
pub fn saturate_f32(sample: f32) -> f32 {
    sample.clamp(-1.0, 1.0)
}

/// Clamps a slice of f64 samples in place.
pub fn saturate_slice(samples: &mut [f64]) {
    for sample in samples {
        *sample = saturate(*sample);
    }
}

/// Clamps a slice of f32 samples in place.
pub fn saturate_slice_f32(samples: &mut [f32]) {
    for sample in samples {
        *sample = saturate_f32(*sample);
    }
}
