//! Audio+video transcode demo: MP3 audio and preset-driven H.264 video
//! into an MPEG-4 container.
//!
//! Run with: `cargo run --example transcode_to_mp4 -- <input> <output>`
//!
//! The scripted engine advertises a WMA format for the MP3 request, so
//! this demo exercises the derive path: the negotiator overwrites the
//! subtype and pulls every required field from the candidate with its
//! default. Video attributes come straight from the default catalog
//! preset; video is never negotiated against the engine.

use transmux::attr::{AttrKey, AttrValue, AttributeBag};
use transmux::catalog::{DEFAULT_H264_PRESET, H264_PRESETS};
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
        .with_audio_formats(AudioCodec::Mp3, vec![advertised_wma()?])
        .write_output(true);

    let mut transcoder = Transcoder::new(engine);
    transcoder.open(input)?;
    transcoder.configure_audio_output(AudioCodec::Mp3)?;
    transcoder.configure_video_output(&H264_PRESETS[DEFAULT_H264_PRESET])?;
    transcoder.configure_container(ContainerType::Mpeg4)?;
    transcoder.encode_to_file(output)?;
    transcoder.shutdown()
}

/// The engine's encoder advertises WMA; negotiation derives the MP3
/// attribute set from it.
fn advertised_wma() -> transmux::Result<CandidateFormat> {
    let mut attrs = AttributeBag::new();
    attrs.set(AttrKey::SampleRate, AttrValue::U32(44100))?;
    attrs.set(AttrKey::ChannelCount, AttrValue::U32(2))?;
    attrs.set(AttrKey::AvgBytesPerSecond, AttrValue::U32(20000))?;
    attrs.set(AttrKey::BlockAlignment, AttrValue::U32(4096))?;
    CandidateFormat::audio(AudioCodec::Wma9, attrs)
}
