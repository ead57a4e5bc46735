use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossbeam_channel::{Receiver, bounded};

use hipass::config::{CutoffFrequency, PlayerConfig};
use hipass::simulation::{BlockLevels, SignalKind, generate, interleave, rms};
use hipass::{FilterControl, FilterProcessor};

#[derive(Parser, Debug)]
#[command(name = "simulate_stream")]
#[command(about = "Stream a synthetic signal through the high-pass filter while sweeping the cutoff", long_about = None)]
struct Args {
    /// Signal to generate: noise, sine, impulse
    #[arg(short = 's', long, value_enum, default_value = "noise")]
    signal: SignalKind,

    /// Duration in seconds
    #[arg(short = 'd', long, default_value = "2.0")]
    duration: f32,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(short = 'r', long)]
    sample_rate: Option<f64>,

    /// Frames per block
    #[arg(short = 'b', long)]
    block_size: Option<usize>,

    /// Number of channels
    #[arg(long)]
    channels: Option<usize>,

    /// Cutoff at the start of the sweep
    #[arg(long, default_value = "20")]
    sweep_from: CutoffFrequency,

    /// Cutoff at the end of the sweep
    #[arg(long, default_value = "2khz")]
    sweep_to: CutoffFrequency,

    /// Tone frequency in Hz for the sine signal
    #[arg(long, default_value = "1000")]
    tone: f32,

    /// Random seed for the noise signal
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Print every Nth block
    #[arg(long, default_value = "8")]
    report_every: usize,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct Block {
    index: usize,
    samples: Vec<f32>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    };
    if let Some(sample_rate) = args.sample_rate {
        config.stream.sample_rate = sample_rate;
    }
    if let Some(block_size) = args.block_size {
        config.stream.block_size = block_size;
    }
    if let Some(channels) = args.channels {
        config.stream.channels = channels;
    }
    config.filter.cutoff_hz = args.sweep_from.as_hz();
    config.validate()?;

    if args.duration <= 0.0 {
        anyhow::bail!("duration must be positive, got {}", args.duration);
    }

    println!("=== hipass - streaming simulation ===");
    println!("Signal: {:?}", args.signal);
    println!("Sample rate: {} Hz", config.stream.sample_rate);
    println!(
        "Block size: {} frames x {} channels",
        config.stream.block_size, config.stream.channels
    );
    println!("Cutoff sweep: {} -> {}", args.sweep_from, args.sweep_to);

    let control = FilterControl::new(config.filter.cutoff_hz, &config.control);
    let (min_cutoff_hz, max_cutoff_hz) = control.cutoff_range();
    println!(
        "Control range: {:.1} - {:.1} Hz",
        min_cutoff_hz, max_cutoff_hz
    );
    println!();

    let (block_tx, block_rx) = bounded(8);

    let producer = {
        let control = control.clone();
        let config = config.clone();
        let from = args.sweep_from.as_hz();
        let to = args.sweep_to.as_hz();
        let signal = args.signal;
        let tone = args.tone;
        let seed = args.seed;
        let duration = args.duration;

        thread::spawn(move || {
            let sample_rate = config.stream.sample_rate as f32;
            let frames = (duration * sample_rate) as usize;
            let channels: Vec<Vec<f32>> = (0..config.stream.channels)
                .map(|ch| generate(signal, frames, sample_rate, tone, seed + ch as u64))
                .collect();
            let interleaved = interleave(&channels);

            let block_len = config.stream.block_size * config.stream.channels;
            let block_count = interleaved.len().div_ceil(block_len).max(1);

            for (index, chunk) in interleaved.chunks(block_len).enumerate() {
                let t = if block_count > 1 {
                    index as f32 / (block_count - 1) as f32
                } else {
                    0.0
                };
                // Queued blocks pick up whichever cutoff is current when
                // they are filtered, not the one set here
                control.set_cutoff_hz(from * (to / from).powf(t));

                let block = Block {
                    index,
                    samples: chunk.to_vec(),
                };
                if block_tx.send(block).is_err() {
                    log::warn!("Processing thread hung up");
                    break;
                }
            }
        })
    };

    let mut processor = FilterProcessor::new(&config.filter, config.stream.channels, control);
    processor.prepare(config.stream.sample_rate, config.stream.block_size)?;

    let levels = run_processing_loop(block_rx, &mut processor, &config, args.report_every.max(1));
    processor.release();

    if producer.join().is_err() {
        anyhow::bail!("signal generator thread panicked");
    }

    print_summary(&levels);
    Ok(())
}

fn run_processing_loop(
    block_rx: Receiver<Block>,
    processor: &mut FilterProcessor,
    config: &PlayerConfig,
    report_every: usize,
) -> BlockLevels {
    let _rt_handle = match audio_thread_priority::promote_current_thread_to_real_time(
        config.stream.block_size as u32,
        config.stream.sample_rate as u32,
    ) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Could not set real-time priority: {}", e);
            None
        }
    };

    let channels = config.stream.channels;
    let mut levels = BlockLevels::new();

    println!(
        "{:<8} {:>12} {:>12} {:>12} {:>10}",
        "Block", "Cutoff (Hz)", "In RMS", "Out RMS", "Gain (dB)"
    );
    println!("{}", "-".repeat(58));

    // Blocks are filtered on this thread only; the producer's cutoff writes
    // reach the processor through the shared control.
    for mut block in block_rx {
        let input_rms = rms(&block.samples);
        processor.process_interleaved(&mut block.samples, channels);
        let output_rms = rms(&block.samples);
        levels.record(input_rms, output_rms);

        if block.index % report_every == 0 {
            processor.report_channel_mismatch();
            let gain = if input_rms > 0.0 && output_rms > 0.0 {
                format!("{:.2}", 20.0 * (output_rms / input_rms).log10())
            } else {
                "-".to_string()
            };
            println!(
                "{:<8} {:>12.1} {:>12.5} {:>12.5} {:>10}",
                block.index,
                processor.cutoff_hz(),
                input_rms,
                output_rms,
                gain
            );
        }
    }

    levels
}

fn print_summary(levels: &BlockLevels) {
    println!("\n{}", "=".repeat(58));
    println!("Statistics:");

    if let Some(input) = levels.input_rms() {
        println!("  Blocks: {}", input.count);
        println!(
            "  Input RMS: {:.5} (min {:.5}, max {:.5})",
            input.mean, input.min, input.max
        );
    }
    if let Some(output) = levels.output_rms() {
        println!(
            "  Output RMS: {:.5} (min {:.5}, max {:.5})",
            output.mean, output.min, output.max
        );
    }
    match levels.gain_db() {
        Some(gain) => println!(
            "  Gain: {:.2} dB mean, {:.2} dB std dev, {:.2}..{:.2} dB",
            gain.mean, gain.std_dev, gain.min, gain.max
        ),
        None => println!("  Gain: no non-silent blocks"),
    }
}
