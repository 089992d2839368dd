//! The streaming resampling engine.
//!
//! A [`Resampler`] is built once for a channel count, a rate pair, and a
//! [`Quality`] preset. Filter design happens at construction; processing is
//! pure table lookups and dot products. Each channel carries its own rolling
//! memory and read cursors, so output is identical no matter how the caller
//! chunks the input.

use num_rational::Ratio;

use crate::common::{ChannelCount, SampleRate};
use crate::quality::Quality;

mod filter;

use filter::Convolution;

/// Samples of fresh input accepted per internal iteration, per channel.
const BUFFER_SIZE: usize = 160;

/// f64 scratch samples used by the f32 processing path.
const SCRATCH_SIZE: usize = 1024;

/// Streaming state owned by a single channel. Never touched by any other
/// channel's processing.
#[derive(Debug, Default, Clone)]
struct ChannelState {
    /// Read cursor into `mem` for the next output sample.
    last_sample: usize,
    /// Fractional sample position, in `[0, den_rate)`.
    samp_frac_num: usize,
    /// Samples retained from a filter reconfiguration, to be emitted before
    /// any new input is accepted.
    magic_samples: usize,
    /// Filter history (`filt_len - 1` samples) followed by incoming input.
    mem: Vec<f64>,
}

/// Windowed-sinc audio resampler with per-channel streaming state.
///
/// See the [crate docs](crate) for the streaming contract and an example.
#[derive(Debug, Clone)]
pub struct Resampler {
    num_rate: usize,
    den_rate: usize,

    quality: Quality,
    filt_len: usize,
    int_advance: usize,
    frac_advance: usize,
    cutoff: f64,
    oversample: usize,

    started: bool,
    skip_zeros: bool,

    channels: Vec<ChannelState>,
    sinc_table: Vec<f64>,
    convolution: Convolution,
}

/// Resamples a one-channel f64 stream in a single call.
///
/// Initial filter latency is skipped, so the output starts at the first real
/// sample. Returns `(read, written)`. For long or chunked streams build a
/// [`Resampler`] instead.
pub fn resample_f64(
    input: &[f64],
    from: SampleRate,
    output: &mut [f64],
    to: SampleRate,
    quality: Quality,
) -> (usize, usize) {
    Resampler::with_skip_zeros(1, from, to, quality).process_f64(0, Some(input), output)
}

/// Resamples a one-channel f32 stream in a single call.
///
/// See [`resample_f64`].
pub fn resample_f32(
    input: &[f32],
    from: SampleRate,
    output: &mut [f32],
    to: SampleRate,
    quality: Quality,
) -> (usize, usize) {
    Resampler::with_skip_zeros(1, from, to, quality).process_f32(0, Some(input), output)
}

impl Resampler {
    /// Creates a resampler converting `from` Hz to `to` Hz.
    ///
    /// The rate ratio is reduced to lowest terms, so `(48_000, 24_000)`
    /// designs the same filter as `(2, 1)`.
    ///
    /// # Panics
    /// Panics if `channels`, `from` or `to` is 0.
    pub fn new(
        channels: ChannelCount,
        from: SampleRate,
        to: SampleRate,
        quality: Quality,
    ) -> Resampler {
        assert!(channels >= 1, "need at least one channel");
        assert!(from >= 1, "input sample rate must not be zero");
        assert!(to >= 1, "output sample rate must not be zero");

        let (num_rate, den_rate) = Ratio::new(from, to).into_raw();

        let mut resampler = Resampler {
            num_rate: num_rate as usize,
            den_rate: den_rate as usize,
            quality,
            filt_len: 0,
            int_advance: 0,
            frac_advance: 0,
            cutoff: 1.0,
            oversample: 0,
            started: false,
            skip_zeros: false,
            channels: vec![ChannelState::default(); channels as usize],
            sinc_table: Vec::new(),
            convolution: Convolution::Direct,
        };
        resampler.update_filter();
        resampler
    }

    /// Like [`Resampler::new`], but the first `process` call skips the
    /// filter's initial zero-padding so the output begins with the first
    /// real sample instead of `input_latency` samples of warm-up.
    ///
    /// # Panics
    /// Panics if `channels`, `from` or `to` is 0.
    pub fn with_skip_zeros(
        channels: ChannelCount,
        from: SampleRate,
        to: SampleRate,
        quality: Quality,
    ) -> Resampler {
        let mut resampler = Resampler::new(channels, from, to, quality);
        resampler.skip_zeros = true;
        resampler
    }

    /// Number of channels this resampler was built for.
    pub fn channels(&self) -> ChannelCount {
        self.channels.len() as ChannelCount
    }

    /// The active quality preset.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// The rate ratio reduced to lowest terms, as `(input, output)`.
    pub fn rate_ratio(&self) -> (SampleRate, SampleRate) {
        (self.num_rate as SampleRate, self.den_rate as SampleRate)
    }

    /// Number of taps in the designed filter.
    ///
    /// Down-sampling stretches the preset's base length by the rate ratio
    /// (rounded up to a multiple of 8) to keep aliasing in check.
    pub fn filter_length(&self) -> usize {
        self.filt_len
    }

    /// Delay introduced by the filter, in input-rate samples.
    pub fn input_latency(&self) -> usize {
        self.filt_len >> 1
    }

    /// Delay introduced by the filter, in output-rate samples.
    pub fn output_latency(&self) -> usize {
        ((self.filt_len >> 1) * self.den_rate + (self.num_rate >> 1)) / self.num_rate
    }

    /// Resamples one channel's f64 samples.
    ///
    /// Consumes as much of `input` and fills as much of `output` as fits,
    /// returning `(read, written)`. Unread input must be fed again on the
    /// next call; filter history carries over internally. `input: None`
    /// feeds zeros, which drains the filter tail at end of stream (bounded
    /// only by `output`'s length).
    ///
    /// # Panics
    /// Panics if `channel_index` is out of range.
    pub fn process_f64(
        &mut self,
        channel_index: usize,
        input: Option<&[f64]>,
        output: &mut [f64],
    ) -> (usize, usize) {
        self.prime_skip_zeros();

        let filt_offs = self.filt_len - 1;
        let chunk_capacity = self.channels[channel_index].mem.len() - filt_offs;

        let mut read = 0;
        let mut written = 0;

        // Leftovers from a filter reconfiguration go out before any new
        // input is accepted.
        if self.channels[channel_index].magic_samples != 0 {
            written += self.drain_magic(channel_index, output);
            if self.channels[channel_index].magic_samples != 0 {
                return (read, written);
            }
        }

        loop {
            let remaining_in = match input {
                Some(input) => input.len() - read,
                None => usize::MAX,
            };
            if remaining_in == 0 || written == output.len() {
                break;
            }
            let ichunk = chunk_capacity.min(remaining_in);

            let mem = &mut self.channels[channel_index].mem;
            match input {
                Some(input) => {
                    mem[filt_offs..filt_offs + ichunk].copy_from_slice(&input[read..read + ichunk])
                }
                None => mem[filt_offs..filt_offs + ichunk].fill(0.0),
            }

            let (consumed, produced) = self.process_native(channel_index, ichunk, &mut output[written..]);
            if input.is_some() {
                read += consumed;
            }
            written += produced;
        }
        (read, written)
    }

    /// Resamples one channel's f32 samples. Behaviorally identical to
    /// [`Resampler::process_f64`]; samples pass through an f64 scratch
    /// buffer internally.
    ///
    /// # Panics
    /// Panics if `channel_index` is out of range.
    pub fn process_f32(
        &mut self,
        channel_index: usize,
        input: Option<&[f32]>,
        output: &mut [f32],
    ) -> (usize, usize) {
        let mut scratch = [0.0f64; SCRATCH_SIZE];
        self.prime_skip_zeros();

        let filt_offs = self.filt_len - 1;
        let chunk_capacity = self.channels[channel_index].mem.len() - filt_offs;

        let mut read = 0;
        let mut written = 0;

        if self.channels[channel_index].magic_samples != 0 {
            let capacity = scratch.len().min(output.len());
            let produced = self.drain_magic(channel_index, &mut scratch[..capacity]);
            for (out, s) in output[..produced].iter_mut().zip(&scratch[..produced]) {
                *out = *s as f32;
            }
            written += produced;
            if self.channels[channel_index].magic_samples != 0 {
                return (read, written);
            }
        }

        loop {
            let remaining_in = match input {
                Some(input) => input.len() - read,
                None => usize::MAX,
            };
            let remaining_out = output.len() - written;
            if remaining_in == 0 || remaining_out == 0 {
                break;
            }
            let ichunk = chunk_capacity.min(remaining_in);
            let ochunk = scratch.len().min(remaining_out);

            let mem = &mut self.channels[channel_index].mem;
            match input {
                Some(input) => {
                    for (m, s) in mem[filt_offs..filt_offs + ichunk]
                        .iter_mut()
                        .zip(&input[read..read + ichunk])
                    {
                        *m = *s as f64;
                    }
                }
                None => mem[filt_offs..filt_offs + ichunk].fill(0.0),
            }

            let (consumed, produced) =
                self.process_native(channel_index, ichunk, &mut scratch[..ochunk]);
            for (out, s) in output[written..written + produced]
                .iter_mut()
                .zip(&scratch[..produced])
            {
                *out = *s as f32;
            }
            if input.is_some() {
                read += consumed;
            }
            written += produced;
        }
        (read, written)
    }

    /// On the first call after construction with skip-zeros, advance every
    /// channel's read cursor past the filter's zero-padded warm-up region.
    fn prime_skip_zeros(&mut self) {
        if self.skip_zeros {
            let latency = self.input_latency();
            for channel in &mut self.channels {
                channel.last_sample = latency;
            }
            self.skip_zeros = false;
        }
    }

    /// Runs the selected convolution over the `in_len` fresh samples sitting
    /// in the channel's memory, then slides the memory left so the last
    /// `filt_len - 1` samples remain as history. Returns
    /// `(input consumed, output produced)`.
    fn process_native(
        &mut self,
        channel_index: usize,
        in_len: usize,
        output: &mut [f64],
    ) -> (usize, usize) {
        self.started = true;

        let produced = match self.convolution {
            Convolution::Direct => self.convolve_direct(channel_index, in_len, output),
            Convolution::Interpolated => self.convolve_interpolated(channel_index, in_len, output),
        };

        let filt_offs = self.filt_len - 1;
        let channel = &mut self.channels[channel_index];
        let consumed = channel.last_sample.min(in_len);
        channel.last_sample -= consumed;
        // Overlapping regions: the history window slides over itself.
        channel.mem.copy_within(consumed..consumed + filt_offs, 0);
        (consumed, produced)
    }

    /// Emits pending magic samples through the convolution routine. They
    /// live in the channel memory already, so no caller input is consumed.
    fn drain_magic(&mut self, channel_index: usize, output: &mut [f64]) -> usize {
        let filt_offs = self.filt_len - 1;
        let magic = self.channels[channel_index].magic_samples;

        let (consumed, produced) = self.process_native(channel_index, magic, output);

        let channel = &mut self.channels[channel_index];
        channel.magic_samples -= consumed;
        // Whatever could not be processed stays queued for the next call.
        if channel.magic_samples != 0 {
            let left = channel.magic_samples;
            channel
                .mem
                .copy_within(filt_offs + consumed..filt_offs + consumed + left, filt_offs);
        }
        produced
    }

    /// Polyphase convolution: the filter row for the current fractional
    /// phase against the matching window of channel memory.
    fn convolve_direct(&mut self, channel_index: usize, in_len: usize, output: &mut [f64]) -> usize {
        let taps = self.filt_len;
        let channel = &mut self.channels[channel_index];
        let mut last_sample = channel.last_sample;
        let mut samp_frac_num = channel.samp_frac_num;
        let mut out_sample = 0;

        while last_sample < in_len && out_sample < output.len() {
            let filter = &self.sinc_table[samp_frac_num * taps..samp_frac_num * taps + taps];
            let window = &channel.mem[last_sample..last_sample + taps];
            output[out_sample] = filter.iter().zip(window).map(|(c, s)| c * s).sum();
            out_sample += 1;

            last_sample += self.int_advance;
            samp_frac_num += self.frac_advance;
            if samp_frac_num >= self.den_rate {
                samp_frac_num -= self.den_rate;
                last_sample += 1;
            }
        }

        channel.last_sample = last_sample;
        channel.samp_frac_num = samp_frac_num;
        out_sample
    }

    /// Interpolated convolution: four strided accumulators over the shared
    /// oversampled table, blended with cubic coefficients derived from the
    /// sub-table offset.
    fn convolve_interpolated(
        &mut self,
        channel_index: usize,
        in_len: usize,
        output: &mut [f64],
    ) -> usize {
        let taps = self.filt_len;
        let oversample = self.oversample;
        let channel = &mut self.channels[channel_index];
        let mut last_sample = channel.last_sample;
        let mut samp_frac_num = channel.samp_frac_num;
        let mut out_sample = 0;

        while last_sample < in_len && out_sample < output.len() {
            let offset = samp_frac_num * oversample / self.den_rate;
            let frac = ((samp_frac_num * oversample) % self.den_rate) as f64 / self.den_rate as f64;

            let mut accum = [0.0f64; 4];
            for (j, &s) in channel.mem[last_sample..last_sample + taps].iter().enumerate() {
                let t = 4 + (j + 1) * oversample - offset;
                accum[0] += s * self.sinc_table[t - 2];
                accum[1] += s * self.sinc_table[t - 1];
                accum[2] += s * self.sinc_table[t];
                accum[3] += s * self.sinc_table[t + 1];
            }
            let [c0, c1, c2, c3] = crate::math::cubic_coef(frac);
            output[out_sample] = c0 * accum[0] + c1 * accum[1] + c2 * accum[2] + c3 * accum[3];
            out_sample += 1;

            last_sample += self.int_advance;
            samp_frac_num += self.frac_advance;
            if samp_frac_num >= self.den_rate {
                samp_frac_num -= self.den_rate;
                last_sample += 1;
            }
        }

        channel.last_sample = last_sample;
        channel.samp_frac_num = samp_frac_num;
        out_sample
    }
}
