//! Profile negotiation benchmarks.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use transmux::attr::{AttrKey, AttrValue, AttributeBag};
use transmux::engine::ScriptedEngine;
use transmux::format::{AudioCodec, CandidateFormat};
use transmux::profile::Negotiator;

fn candidate(codec: AudioCodec) -> CandidateFormat {
    let mut attrs = AttributeBag::new();
    attrs.set(AttrKey::SampleRate, AttrValue::U32(48000)).unwrap();
    attrs.set(AttrKey::ChannelCount, AttrValue::U32(2)).unwrap();
    attrs.set(AttrKey::BitsPerSample, AttrValue::U32(16)).unwrap();
    attrs
        .set(AttrKey::AvgBytesPerSecond, AttrValue::U32(24000))
        .unwrap();
    CandidateFormat::audio(codec, attrs).unwrap()
}

fn bench_negotiate_audio(c: &mut Criterion) {
    let mut group = c.benchmark_group("negotiate_audio");

    // Exact subtype match: the advertised bag is kept verbatim.
    group.bench_function("passthrough", |b| {
        b.iter_batched(
            || {
                ScriptedEngine::new()
                    .with_audio_formats(AudioCodec::Aac, vec![candidate(AudioCodec::Aac)])
            },
            |mut engine| {
                Negotiator::default()
                    .negotiate_audio(&mut engine, AudioCodec::Aac)
                    .unwrap()
            },
            BatchSize::SmallInput,
        );
    });

    // Subtype mismatch: every required field is pulled with its default.
    group.bench_function("derive", |b| {
        b.iter_batched(
            || {
                ScriptedEngine::new()
                    .with_audio_formats(AudioCodec::Aac, vec![candidate(AudioCodec::Wma9)])
            },
            |mut engine| {
                Negotiator::default()
                    .negotiate_audio(&mut engine, AudioCodec::Aac)
                    .unwrap()
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_negotiate_audio);
criterion_main!(benches);
