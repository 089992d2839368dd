//! Filter design: windowed-sinc evaluation and sinc table construction.
//!
//! Everything here runs when a [`Resampler`](super::Resampler) is (re)built,
//! never in the per-sample loop. The convolution routines in the parent
//! module only ever read the finished table.

use crate::math::cubic_coef;
use crate::quality::KaiserTable;

use super::{Resampler, BUFFER_SIZE};

/// Convolution strategy, fixed at design time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Convolution {
    /// Full polyphase bank: one precomputed filter per output phase.
    Direct,
    /// Shared oversampled sinc table, cubic-interpolated per output sample.
    /// Used when the phase count would make the polyphase bank too large.
    Interpolated,
}

/// Evaluates the continuous window function at `y` in `[0, 1]` by cubic
/// interpolation over the discrete Kaiser table.
///
/// The table's peak sits at index 1, so the blend weights are applied in
/// reverse order relative to [`cubic_coef`]'s natural orientation; at
/// `frac == 0` this selects `table[ind + 1]` exactly.
fn window_value(y: f64, window: &KaiserTable) -> f64 {
    let pos = y * window.oversample as f64;
    let ind = pos.floor() as usize;
    let [c0, c1, c2, c3] = cubic_coef(pos - ind as f64);
    let t = window.table;
    c3 * t[ind] + c2 * t[ind + 1] + c1 * t[ind + 2] + c0 * t[ind + 3]
}

/// The ideal windowed sinc at tap position `x`, for a filter of `taps` taps
/// with the given cutoff. Zero outside the filter's support.
fn sinc(cutoff: f64, x: f64, taps: f64, window: &KaiserTable) -> f64 {
    let xabs = x.abs();
    if xabs < 1e-6 {
        return cutoff;
    } else if xabs > 0.5 * taps {
        return 0.0;
    }
    let xx = x * cutoff * std::f64::consts::PI;
    cutoff * xx.sin() / xx * window_value(2.0 * xabs / taps, window)
}

impl Resampler {
    /// Rederives cutoff, filter length, oversampling, and the sinc table from
    /// the current rate ratio and quality preset.
    pub(super) fn update_filter(&mut self) {
        let old_length = self.filt_len;
        let preset = self.quality.preset();
        self.oversample = preset.oversample;
        self.filt_len = preset.base_length;

        if self.num_rate > self.den_rate {
            // Down-sampling: lower the cutoff and stretch the filter so the
            // stop band still lands below the output Nyquist frequency.
            self.cutoff = preset.downsample_bandwidth * self.den_rate as f64 / self.num_rate as f64;
            self.filt_len = self.filt_len * self.num_rate / self.den_rate;
            // Round up to a multiple of 8.
            self.filt_len = ((self.filt_len - 1) & !0x7) + 8;
            if self.den_rate << 1 < self.num_rate {
                self.oversample >>= 1;
            }
            if self.den_rate << 2 < self.num_rate {
                self.oversample >>= 1;
            }
            if self.den_rate << 3 < self.num_rate {
                self.oversample >>= 1;
            }
            if self.den_rate << 4 < self.num_rate {
                self.oversample >>= 1;
            }
            if self.oversample < 1 {
                self.oversample = 1;
            }
        } else {
            // Up-sampling or unity ratio.
            self.cutoff = preset.upsample_bandwidth;
        }

        // Choose the strategy that needs the least memory: a full polyphase
        // bank while the phase count stays small, otherwise one shared
        // oversampled table read back with cubic interpolation.
        if self.den_rate <= 16 * (self.oversample + 8) {
            if self.sinc_table.len() < self.filt_len * self.den_rate {
                self.sinc_table = vec![0.0; self.filt_len * self.den_rate];
            }
            let half = (self.filt_len >> 1) as f64;
            for i in 0..self.den_rate {
                let phase = i as f64 / self.den_rate as f64;
                for j in 0..self.filt_len {
                    self.sinc_table[i * self.filt_len + j] = sinc(
                        self.cutoff,
                        (j as f64 - half + 1.0) - phase,
                        self.filt_len as f64,
                        preset.window,
                    );
                }
            }
            self.convolution = Convolution::Direct;
        } else {
            let needed = self.filt_len * self.oversample + 8;
            if self.sinc_table.len() < needed {
                self.sinc_table = vec![0.0; needed];
            }
            let half = (self.filt_len >> 1) as f64;
            // Four guard entries on each side keep the cubic reads in range.
            for i in -4i64..(self.oversample * self.filt_len + 4) as i64 {
                self.sinc_table[(i + 4) as usize] = sinc(
                    self.cutoff,
                    i as f64 / self.oversample as f64 - half,
                    self.filt_len as f64,
                    preset.window,
                );
            }
            self.convolution = Convolution::Interpolated;
        }

        self.int_advance = self.num_rate / self.den_rate;
        self.frac_advance = self.num_rate % self.den_rate;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            num_rate = self.num_rate,
            den_rate = self.den_rate,
            filter_length = self.filt_len,
            oversample = self.oversample,
            cutoff = self.cutoff,
            convolution = ?self.convolution,
            "designed resampler filter"
        );

        // Lay out the per-channel memory for the new filter length. Changing
        // the length once samples have flowed would require redistributing
        // history and magic samples between the old and new layouts; that
        // transition is not implemented.
        if !self.started || self.channels[0].mem.is_empty() {
            let size = self.filt_len - 1 + BUFFER_SIZE;
            for channel in &mut self.channels {
                channel.mem = vec![0.0; size];
            }
        } else if self.filt_len > old_length {
            unimplemented!("cannot grow the filter length once processing has started");
        } else if self.filt_len < old_length {
            unimplemented!("cannot shrink the filter length once processing has started");
        }
    }
}
