//! End-to-end resampling scenarios on a known ramp waveform.
//!
//! The test signal ramps -1 to 1 over 8 samples, holds, ramps back and
//! holds again, so its peak and trough sit at known sample offsets. After
//! resampling, those extremes must reappear at the offsets scaled by the
//! rate ratio, once the filter's output latency is discounted.

use rateshift::{Quality, Resampler};
use rstest::rstest;

#[rustfmt::skip]
const RAMP: [f64; 32] = [
    // -1 to 1 (16 samples)
    -1.0, -0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    // 1 to -1 (16 samples)
    1.0, 0.75, 0.5, 0.25, 0.0, -0.25, -0.5, -0.75, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
];

/// Resamples 10 ms of signal (the ramp followed by silence) and returns the
/// output aligned past the filter's latency, trimmed to the ramp's length at
/// the output rate.
fn resample_ramp_f64(from: u32, to: u32, quality: Quality) -> Vec<f64> {
    let mut resampler = Resampler::new(1, from, to, quality);

    let mut input = vec![0.0f64; (from / 100) as usize];
    input[..RAMP.len()].copy_from_slice(&RAMP);
    let mut output = vec![0.0f64; (to / 100) as usize];

    let (read, written) = resampler.process_f64(0, Some(&input), &mut output);
    assert!(read <= input.len() && written <= output.len());

    let skip = resampler.output_latency();
    let keep = RAMP.len() * to as usize / from as usize;
    assert!(written >= skip + keep, "not enough output to inspect");
    output[skip..skip + keep].to_vec()
}

/// f32 twin of [`resample_ramp_f64`].
fn resample_ramp_f32(from: u32, to: u32, quality: Quality) -> Vec<f32> {
    let mut resampler = Resampler::new(1, from, to, quality);

    let mut input = vec![0.0f32; (from / 100) as usize];
    for (i, s) in RAMP.iter().enumerate() {
        input[i] = *s as f32;
    }
    let mut output = vec![0.0f32; (to / 100) as usize];

    let (read, _written) = resampler.process_f32(0, Some(&input), &mut output);
    assert!(read <= input.len());

    let skip = resampler.output_latency();
    let keep = RAMP.len() * to as usize / from as usize;
    output[skip..skip + keep].to_vec()
}

fn all_qualities() -> impl Iterator<Item = Quality> {
    (0..=10).map(|q| Quality::new(q).unwrap())
}

#[rstest]
// Identity: peak and trough where the input put them.
#[case::identity(48_000, 48_000, 8, 24)]
// Polyphase down-sampling by 2: offsets halve.
#[case::direct_down(48_000, 24_000, 4, 12)]
// Polyphase up-sampling by 2: offsets double.
#[case::direct_up(24_000, 48_000, 16, 48)]
// Coprime rates force the interpolated sinc table.
#[case::interpolated_down(48_000, 23_999, 4, 12)]
#[case::interpolated_up(23_999, 48_000, 16, 48)]
fn ramp_extremes_land_on_scaled_offsets(
    #[case] from: u32,
    #[case] to: u32,
    #[case] peak: usize,
    #[case] trough: usize,
) {
    for quality in all_qualities() {
        let output = resample_ramp_f64(from, to, quality);
        assert!(
            (output[peak] - 1.0).abs() <= 0.1,
            "quality {}: peak at {peak} was {}",
            quality.index(),
            output[peak]
        );
        assert!(
            (output[trough] + 1.0).abs() <= 0.1,
            "quality {}: trough at {trough} was {}",
            quality.index(),
            output[trough]
        );
    }
}

#[rstest]
#[case::identity(48_000, 48_000, 8, 24)]
#[case::direct_down(48_000, 24_000, 4, 12)]
#[case::direct_up(24_000, 48_000, 16, 48)]
#[case::interpolated_down(48_000, 23_999, 4, 12)]
#[case::interpolated_up(23_999, 48_000, 16, 48)]
fn ramp_extremes_f32(
    #[case] from: u32,
    #[case] to: u32,
    #[case] peak: usize,
    #[case] trough: usize,
) {
    for quality in all_qualities() {
        let output = resample_ramp_f32(from, to, quality);
        assert!((output[peak] - 1.0).abs() <= 0.1);
        assert!((output[trough] + 1.0).abs() <= 0.1);
    }
}

/// Down-sampling then up-sampling by the reciprocal ratio approximately
/// reconstructs a mid-band tone away from the filter edges.
#[test]
fn reciprocal_round_trip_reconstructs_the_signal() {
    use std::f64::consts::TAU;

    let original: Vec<f64> = (0..8_000)
        .map(|i| (TAU * 440.0 * i as f64 / 48_000.0).sin())
        .collect();

    let quality = Quality::new(7).unwrap();
    let mut down = Resampler::with_skip_zeros(1, 48_000, 32_000, quality);
    let mut up = Resampler::with_skip_zeros(1, 32_000, 48_000, quality);

    let mut mid = vec![0.0f64; 8_000];
    let mut restored = vec![0.0f64; 10_000];

    let mut read_total = 0;
    let mut mid_len = 0;
    while read_total < original.len() {
        let (read, written) = down.process_f64(0, Some(&original[read_total..]), &mut mid[mid_len..]);
        read_total += read;
        mid_len += written;
    }

    let mut mid_read = 0;
    let mut restored_len = 0;
    while mid_read < mid_len {
        let (read, written) =
            up.process_f64(0, Some(&mid[mid_read..mid_len]), &mut restored[restored_len..]);
        mid_read += read;
        restored_len += written;
    }

    // Skipping the zero-padded warm-up on both legs keeps the round trip
    // time-aligned with the original; compare the middle, clear of edges.
    assert!(restored_len > 5_000);
    for i in 500..restored_len.min(7_000) - 500 {
        assert!(
            (restored[i] - original[i]).abs() < 0.08,
            "sample {i}: {} vs {}",
            restored[i],
            original[i]
        );
    }
}

/// Higher quality never designs a shorter filter.
#[test]
fn quality_cost_is_monotone() {
    let mut previous = 0;
    for quality in all_qualities() {
        let resampler = Resampler::new(1, 44_100, 48_000, quality);
        assert!(resampler.filter_length() >= previous);
        previous = resampler.filter_length();
    }
}
