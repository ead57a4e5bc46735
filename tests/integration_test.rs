use hipass::config::{ControlConfig, FilterConfig, PlayerConfig};
use hipass::signal_processing::{
    BiquadChannelFilter, FilterSpec, FilterType, compute_coefficients,
};
use hipass::simulation::{interleave, rms, sine};
use hipass::{FilterControl, FilterProcessor};

fn processor_with_cutoff(cutoff_hz: f32, channels: usize) -> FilterProcessor {
    let control = FilterControl::new(cutoff_hz, &ControlConfig::default());
    FilterProcessor::new(&FilterConfig::default(), channels, control)
}

/// Interleaved stereo: `left_hz` on the left, `right_hz` on the right
fn stereo_tones(left_hz: f32, right_hz: f32, frames: usize, sample_rate: f32) -> Vec<f32> {
    interleave(&[
        sine(left_hz, sample_rate, frames, 1.0),
        sine(right_hz, sample_rate, frames, 1.0),
    ])
}

fn run_in_blocks(
    processor: &mut FilterProcessor,
    signal: &mut [f32],
    frames: usize,
    channels: usize,
) {
    for chunk in signal.chunks_mut(frames * channels) {
        processor.process_interleaved(chunk, channels);
    }
}

#[test]
fn test_impulse_response_at_500hz() {
    let coeffs = compute_coefficients(&FilterSpec {
        cutoff_hz: 500.0,
        q: 0.75,
        gain: 0.1,
        filter_type: FilterType::HighPass2,
        sample_rate: 44100.0,
    });
    assert!(coeffs.is_stable());

    let mut filter = BiquadChannelFilter::new();
    filter.reset();

    let mut response = vec![0.0_f32; 512];
    response[0] = 1.0;
    filter.process_block(&coeffs, &mut response);

    assert_eq!(response[0], coeffs.b0);

    // Envelope shrinks window over window
    let peaks: Vec<f32> = response
        .chunks(64)
        .map(|w| w.iter().fold(0.0_f32, |m, s| m.max(s.abs())))
        .collect();
    for pair in peaks.windows(2).take(4) {
        assert!(
            pair[1] < pair[0],
            "impulse response not decaying: {:?}",
            peaks
        );
    }
    assert!(peaks[peaks.len() - 1] < 1e-6);
}

#[test]
fn test_stereo_pipeline_separates_bands() {
    let mut processor = processor_with_cutoff(500.0, 2);
    processor.prepare(44100.0, 512).unwrap();

    let input = stereo_tones(50.0, 5000.0, 44100, 44100.0);
    let mut output = input.clone();
    run_in_blocks(&mut processor, &mut output, 512, 2);

    // Skip the start-up transient
    let settle = 2 * 4410;
    let channel = |buf: &[f32], ch: usize| -> Vec<f32> {
        buf[settle..].iter().skip(ch).step_by(2).copied().collect()
    };

    let low_in = rms(&channel(&input[..], 0));
    let low_out = rms(&channel(&output[..], 0));
    let high_in = rms(&channel(&input[..], 1));
    let high_out = rms(&channel(&output[..], 1));

    let low_db = 20.0 * (low_out / low_in).log10();
    let high_db = 20.0 * (high_out / high_in).log10();

    assert!(low_db < -20.0, "50 Hz only attenuated by {} dB", low_db);
    assert!(high_db.abs() < 1.0, "5 kHz changed by {} dB", high_db);
}

#[test]
fn test_block_size_does_not_change_output() {
    let input = stereo_tones(120.0, 3000.0, 12000, 48000.0);

    let mut small = input.clone();
    let mut p_small = processor_with_cutoff(300.0, 2);
    p_small.prepare(48000.0, 64).unwrap();
    run_in_blocks(&mut p_small, &mut small, 64, 2);

    let mut large = input.clone();
    let mut p_large = processor_with_cutoff(300.0, 2);
    p_large.prepare(48000.0, 1000).unwrap();
    run_in_blocks(&mut p_large, &mut large, 1000, 2);

    assert_eq!(small, large);
}

#[test]
fn test_reset_makes_playback_repeatable() {
    let input = stereo_tones(80.0, 800.0, 8820, 44100.0);
    let mut processor = processor_with_cutoff(400.0, 2);
    processor.prepare(44100.0, 256).unwrap();

    let mut first = input.clone();
    run_in_blocks(&mut processor, &mut first, 256, 2);

    // Stop, rewind, play again
    processor.reset();
    let mut second = input.clone();
    run_in_blocks(&mut processor, &mut second, 256, 2);

    assert_eq!(first, second);
}

#[test]
fn test_without_reset_state_carries_over() {
    let input = stereo_tones(80.0, 800.0, 2205, 44100.0);
    let mut processor = processor_with_cutoff(400.0, 2);
    processor.prepare(44100.0, 256).unwrap();

    let mut first = input.clone();
    run_in_blocks(&mut processor, &mut first, 256, 2);
    let mut second = input.clone();
    run_in_blocks(&mut processor, &mut second, 256, 2);

    assert_ne!(first, second);
}

#[test]
fn test_sample_rate_change_reprepares() {
    let mut processor = processor_with_cutoff(1000.0, 1);
    processor.prepare(44100.0, 128).unwrap();
    let mut block = sine(440.0, 44100.0, 441, 1.0);
    processor.process_interleaved(&mut block, 1);
    let at_44k = *processor.coefficients();

    processor.prepare(96000.0, 128).unwrap();
    let mut silence = vec![0.0_f32; 128];
    processor.process_interleaved(&mut silence, 1);

    assert!(silence.iter().all(|&s| s == 0.0));
    assert_ne!(at_44k, *processor.coefficients());
}

#[test]
fn test_mono_buffer_into_stereo_processor() {
    let mut processor = processor_with_cutoff(500.0, 2);
    processor.prepare(44100.0, 256).unwrap();

    let input = sine(5000.0, 44100.0, 2205, 1.0);
    let mut mono = input.clone();
    run_in_blocks(&mut processor, &mut mono, 256, 1);

    let mut reference = input.clone();
    let mut filter = BiquadChannelFilter::new();
    filter.process_block(processor.coefficients(), &mut reference);
    assert_eq!(mono, reference);
}

#[test]
fn test_config_drives_processor() {
    let config = PlayerConfig::from_toml_str(
        r#"
        [filter]
        cutoff_hz = 250.0
        q = 0.9

        [stream]
        sample_rate = 48000.0
        block_size = 128
        channels = 1
        "#,
    )
    .unwrap();

    let control = FilterControl::new(config.filter.cutoff_hz, &config.control);
    let mut processor = FilterProcessor::new(&config.filter, config.stream.channels, control);
    processor
        .prepare(config.stream.sample_rate, config.stream.block_size)
        .unwrap();

    let mut block = vec![0.0_f32; 128];
    processor.process_interleaved(&mut block, 1);
    assert_eq!(
        *processor.coefficients(),
        compute_coefficients(&config.initial_spec())
    );
}
