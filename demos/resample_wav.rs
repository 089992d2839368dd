//! Resamples a WAV file by a frequency ratio.
//!
//! Usage: `resample_wav <infile> [ratio] [quality]`
//!
//! Writes `<infile>.out.wav` at `ratio` times the input sample rate
//! (default 0.8) using the given quality preset 0-10 (default 5).

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use rateshift::wave::{WaveReader, WaveWriter};
use rateshift::{saturator, Quality, Resampler};

const CHUNK_FRAMES: usize = 4096;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: resample_wav <infile> [ratio] [quality]");
        return Ok(());
    };
    let ratio: f64 = args.next().map(|a| a.parse()).transpose()?.unwrap_or(0.8);
    let quality = args.next().map(|a| a.parse()).transpose()?.unwrap_or(5);
    let quality = Quality::new(quality).ok_or("quality must be 0-10")?;

    let mut reader = WaveReader::new(File::open(&path)?)?;
    let spec = reader.spec();
    let from = spec.sample_rate;
    let to = (spec.sample_rate as f64 * ratio) as u32;

    let out_path = format!("{path}.out.wav");
    let out_spec = hound::WavSpec {
        sample_rate: to,
        ..spec
    };
    let mut writer = WaveWriter::new(BufWriter::new(File::create(&out_path)?), out_spec)?;

    println!("{path}: {from} Hz -> {out_path}: {to} Hz ({} ch, quality {})", spec.channels, quality.index());

    let channel_count = spec.channels as usize;
    let mut resampler = Resampler::with_skip_zeros(spec.channels, from, to, quality);

    let mut input = vec![Vec::new(); channel_count];
    let mut output = vec![vec![0.0f64; 2 * CHUNK_FRAMES + 64]; channel_count];

    loop {
        for channel in &mut input {
            channel.clear();
        }
        let frames = reader.read_planar(&mut input, CHUNK_FRAMES)?;
        if frames == 0 {
            break;
        }

        // Feed every channel the same frame count; the resampler then
        // produces identical counts, keeping the channels aligned.
        let mut fed = 0;
        while fed < frames {
            let mut step = (0, 0);
            for (index, channel) in input.iter().enumerate() {
                step = resampler.process_f64(index, Some(&channel[fed..]), &mut output[index]);
            }
            let (read, written) = step;
            fed += read;
            write_chunk(&mut writer, &mut output, written)?;
        }
    }

    // Drain the filter tail with zero input.
    let tail = resampler.output_latency().min(output[0].len());
    let mut written = 0;
    for index in 0..channel_count {
        (_, written) = resampler.process_f64(index, None, &mut output[index][..tail]);
    }
    write_chunk(&mut writer, &mut output, written)?;

    writer.finalize()?;
    Ok(())
}

fn write_chunk(
    writer: &mut WaveWriter<BufWriter<File>>,
    output: &mut [Vec<f64>],
    written: usize,
) -> Result<(), Box<dyn Error>> {
    for channel in output.iter_mut() {
        saturator::saturate_slice(&mut channel[..written]);
    }
    let planar: Vec<&[f64]> = output.iter().map(|channel| &channel[..written]).collect();
    writer.write_planar(&planar)?;
    Ok(())
}
