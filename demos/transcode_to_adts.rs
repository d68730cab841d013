//! Audio-only transcode demo: AAC into an ADTS container.
//!
//! Run with: `cargo run --example transcode_to_adts -- <input> <output>`
//!
//! A scripted engine stands in for a real media stack: it advertises one
//! AAC output format built from the catalog presets and finalizes a stub
//! output file when the session closes. Swap in any `MediaEngine`
//! implementation to drive real codecs.

use transmux::attr::{AttrKey, AttrValue, AttributeBag};
use transmux::catalog::AAC_PRESETS;
use transmux::engine::ScriptedEngine;
use transmux::format::{AudioCodec, CandidateFormat, ContainerType};
use transmux::transcoder::Transcoder;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("transmux=info")
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <input> <output>", args[0]);
        std::process::exit(2);
    }

    match run(&args[1], &args[2]) {
        Ok(()) => println!("Output file created: {}", args[2]),
        Err(e) => {
            eprintln!("Transcode failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(input: &str, output: &str) -> transmux::Result<()> {
    let engine = ScriptedEngine::new()
        .with_audio_formats(AudioCodec::Aac, vec![advertised_aac()?])
        .write_output(true);

    let mut transcoder = Transcoder::new(engine);
    transcoder.open(input)?;
    transcoder.configure_audio_output(AudioCodec::Aac)?;
    transcoder.configure_container(ContainerType::Adts)?;
    transcoder.encode_to_file(output)?;
    transcoder.shutdown()
}

/// An advertised AAC format filled from the second catalog preset
/// (48 kHz stereo).
fn advertised_aac() -> transmux::Result<CandidateFormat> {
    let preset = &AAC_PRESETS[1];
    let mut attrs = AttributeBag::new();
    attrs.set(AttrKey::SampleRate, AttrValue::U32(preset.sample_rate))?;
    attrs.set(AttrKey::ChannelCount, AttrValue::U32(preset.channels))?;
    attrs.set(AttrKey::BitsPerSample, AttrValue::U32(preset.bits_per_sample))?;
    attrs.set(
        AttrKey::AvgBytesPerSecond,
        AttrValue::U32(preset.bytes_per_second),
    )?;
    attrs.set(AttrKey::AacProfileLevel, AttrValue::U32(preset.profile_level))?;
    CandidateFormat::audio(AudioCodec::Aac, attrs)
}
