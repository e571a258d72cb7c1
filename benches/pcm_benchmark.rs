//! Benchmark tests for the encoder front end
//!
//! These benchmarks measure the parts of the pipeline that live in this
//! crate: header parsing, payload reads, and sample decoding.

use std::io::Cursor;

use aacenc_rs::pcm_utils::{chunk_len_bytes, decode_le_i16_into};
use aacenc_rs::WavReader;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use util::{pcm16_wav, sine_wave};

fn benchmark_decode_chunk(c: &mut Criterion) {
    let bytes: Vec<u8> = (0..chunk_len_bytes(2)).map(|i| i as u8).collect();
    let mut samples = Vec::with_capacity(bytes.len() / 2);

    c.bench_function("decode_le_i16_stereo_chunk", |b| {
        b.iter(|| {
            decode_le_i16_into(black_box(&bytes), &mut samples);
            black_box(&samples);
        })
    });
}

fn benchmark_header_parse(c: &mut Criterion) {
    let wav = pcm16_wav(2, 44_100, &sine_wave(1024, 2, 44_100, 440.0));

    c.bench_function("wav_header_parse", |b| {
        b.iter(|| {
            let reader = WavReader::new(Cursor::new(black_box(wav.as_slice()))).unwrap();
            black_box(*reader.header());
        })
    });
}

fn benchmark_drain_payload(c: &mut Criterion) {
    // Ten seconds of stereo audio
    let wav = pcm16_wav(2, 44_100, &sine_wave(441_000, 2, 44_100, 440.0));
    let chunk = chunk_len_bytes(2);

    c.bench_function("wav_drain_10s_stereo", |b| {
        b.iter(|| {
            let mut reader = WavReader::new(Cursor::new(wav.as_slice())).unwrap();
            let mut buf = vec![0u8; chunk];
            let mut samples = Vec::with_capacity(chunk / 2);
            while reader.read_data(&mut buf).unwrap() == chunk {
                decode_le_i16_into(&buf, &mut samples);
                black_box(&samples);
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_decode_chunk,
    benchmark_header_parse,
    benchmark_drain_payload
);
criterion_main!(benches);
