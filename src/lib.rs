//! Streaming audio sample rate conversion with selectable quality.
//!
//! `rateshift` converts audio between sample rates using a windowed-sinc
//! filter, processing unbounded streams delivered in arbitrarily sized
//! chunks. Output is bit-identical regardless of how the input is chunked.
//!
//! # Quick Start
//!
//! ```rust
//! use rateshift::{Quality, Resampler};
//!
//! // Stereo, 44.1 kHz -> 48 kHz, default quality.
//! let mut resampler = Resampler::new(2, 44_100, 48_000, Quality::DEFAULT);
//!
//! let input = vec![0.0f32; 441];
//! let mut output = vec![0.0f32; 480];
//! let (read, written) = resampler.process_f32(0, Some(&input), &mut output);
//! assert!(read <= input.len() && written <= output.len());
//! ```
//!
//! Short streams can skip the streaming state entirely:
//!
//! ```rust
//! let input = vec![0.0f64; 480];
//! let mut output = vec![0.0f64; 441];
//! rateshift::resample_f64(&input, 48_000, &mut output, 44_100, rateshift::Quality::DEFAULT);
//! ```
//!
//! # Quality Presets
//!
//! Quality is an integer from 0 (fastest) to 10 (best). Higher presets use
//! longer sinc filters and finer window tables, increasing both fidelity and
//! latency. See [`Quality`] for the preset parameters.
//!
//! # Streaming Contract
//!
//! [`Resampler::process_f64`] consumes as much input and produces as much
//! output as fits; it reports `(read, written)` counts and retains filter
//! history internally, so callers simply loop, feeding the unread remainder
//! of their input into the next call. Passing `None` as input feeds zeros,
//! which drains the filter tail at end of stream.
//!
//! Channels are processed independently and share no streaming state, so
//! per-channel calls may be interleaved in any order; feeding every channel
//! the same sample counts keeps their outputs aligned.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod common;
pub mod converter;
pub mod math;
pub mod quality;
pub mod resampler;
pub mod saturator;
#[cfg(feature = "wav")]
#[cfg_attr(docsrs, doc(cfg(feature = "wav")))]
pub mod wave;

pub use common::{ChannelCount, SampleRate};
pub use quality::Quality;
pub use resampler::{resample_f32, resample_f64, Resampler};
