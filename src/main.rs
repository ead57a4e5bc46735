use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use hipass::config::{CutoffFrequency, PlayerConfig};
use hipass::signal_processing::{
    FilterCoefficients, FilterSpec, FilterType, ResponsePoint, response_curve,
};

#[derive(Parser, Debug)]
#[command(name = "hipass")]
#[command(about = "Design the playback high-pass biquad and report its response", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Cutoff frequency (e.g., "500", "500hz", "1.5khz")
    #[arg(long)]
    cutoff: Option<CutoffFrequency>,

    /// Quality factor
    #[arg(short = 'q', long)]
    q: Option<f32>,

    /// Linear gain (ignored by highpass2)
    #[arg(short = 'g', long)]
    gain: Option<f32>,

    /// Sample rate in Hz
    #[arg(short = 'r', long)]
    sample_rate: Option<f64>,

    /// Filter type
    #[arg(short = 't', long, value_enum)]
    filter_type: Option<FilterType>,

    /// Number of log-spaced response points
    #[arg(short = 'p', long, default_value = "24")]
    points: usize,

    /// Lowest response frequency in Hz
    #[arg(long, default_value = "20")]
    min_freq: f64,

    /// Highest response frequency in Hz (default: Nyquist)
    #[arg(long)]
    max_freq: Option<f64>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Serialize)]
struct FilterReport {
    spec: FilterSpec,
    coefficients: FilterCoefficients,
    stable: bool,
    response: Vec<ResponsePoint>,
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

    if let Some(cutoff) = args.cutoff {
        config.filter.cutoff_hz = cutoff.as_hz();
    }
    if let Some(q) = args.q {
        config.filter.q = q;
    }
    if let Some(gain) = args.gain {
        config.filter.gain = gain;
    }
    if let Some(sample_rate) = args.sample_rate {
        config.stream.sample_rate = sample_rate;
    }
    if let Some(filter_type) = args.filter_type {
        config.filter.filter_type = filter_type;
    }
    config.validate()?;

    let spec = config.initial_spec();
    let nyquist = spec.sample_rate / 2.0;
    let max_freq = args.max_freq.unwrap_or(nyquist).min(nyquist);
    if args.min_freq <= 0.0 || args.min_freq >= max_freq {
        anyhow::bail!(
            "response range must satisfy 0 < min ({}) < max ({})",
            args.min_freq,
            max_freq
        );
    }

    log::info!(
        "Designing {:?} at {} Hz, Q {}, sample rate {} Hz",
        spec.filter_type,
        spec.cutoff_hz,
        spec.q,
        spec.sample_rate
    );

    let coefficients = spec.coefficients();
    let stable = coefficients.is_stable();
    if !stable {
        log::warn!("Coefficients are unstable: {:?}", coefficients);
    }

    let report = FilterReport {
        spec,
        coefficients,
        stable,
        response: response_curve(
            &coefficients,
            spec.sample_rate,
            args.min_freq,
            max_freq,
            args.points,
        ),
    };

    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Csv => print_csv(&report),
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}

fn print_text(report: &FilterReport) {
    let spec = &report.spec;
    let c = &report.coefficients;

    println!("=== hipass - {:?} ===", spec.filter_type);
    println!("Cutoff: {} Hz", spec.cutoff_hz);
    println!("Q: {}", spec.q);
    println!("Gain: {} (not applied)", spec.gain);
    println!("Sample rate: {} Hz", spec.sample_rate);
    println!();
    println!("Coefficients:");
    println!("  b0 = {:>12.9}", c.b0);
    println!("  b1 = {:>12.9}", c.b1);
    println!("  b2 = {:>12.9}", c.b2);
    println!("  a1 = {:>12.9}", c.a1);
    println!("  a2 = {:>12.9}", c.a2);
    println!("Stable: {}", if report.stable { "yes" } else { "NO" });

    if report.response.is_empty() {
        return;
    }

    println!();
    println!(
        "{:>12} {:>12} {:>12}",
        "Freq (Hz)", "Magnitude", "Gain (dB)"
    );
    println!("{}", "-".repeat(38));
    for point in &report.response {
        println!(
            "{:>12.1} {:>12.6} {:>12.2}",
            point.frequency_hz, point.magnitude, point.magnitude_db
        );
    }
}

fn print_csv(report: &FilterReport) {
    println!("frequency_hz,magnitude,magnitude_db");
    for point in &report.response {
        println!(
            "{:.3},{:.8},{:.4}",
            point.frequency_hz, point.magnitude, point.magnitude_db
        );
    }
}

fn print_json(report: &FilterReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}
