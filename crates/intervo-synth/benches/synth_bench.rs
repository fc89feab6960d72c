//! Criterion benchmarks for the oscillator families and the voice pool.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use intervo_synth::{
    AdditiveOsc, FmAlgorithm, FmOsc, LorenzOsc, NoiseColor, NoiseGen, QuantumOsc, VoiceAllocator,
    Waveform, WavetableOsc,
};

const BLOCK: usize = 256;

fn bench_oscillators(c: &mut Criterion) {
    let mut group = c.benchmark_group("oscillators");

    group.bench_function("quantum_saw_morph", |b| {
        let mut osc = QuantumOsc::new(48000.0);
        osc.set_waveforms(Waveform::Saw, Waveform::Square);
        osc.set_morph(0.5);
        osc.set_frequency(440.0);
        let mut out = [0.0f32; BLOCK];
        b.iter(|| {
            osc.process_block(&mut out);
            black_box(out[0]);
        });
    });

    group.bench_function("lorenz", |b| {
        let mut osc = LorenzOsc::new(48000.0);
        let mut out = [0.0f32; BLOCK];
        b.iter(|| {
            osc.process_block(&mut out);
            black_box(out[0]);
        });
    });

    group.bench_function("wavetable", |b| {
        let mut osc = WavetableOsc::with_default_tables(48000.0);
        osc.set_table_position(1.5);
        osc.set_frequency(440.0);
        let mut out = [0.0f32; BLOCK];
        b.iter(|| {
            osc.process_block(&mut out);
            black_box(out[0]);
        });
    });

    group.bench_function("fm_6op_stack", |b| {
        let mut osc = FmOsc::new(48000.0);
        osc.set_num_operators(6);
        osc.set_algorithm(FmAlgorithm::Stack);
        osc.set_frequency(440.0);
        let mut out = [0.0f32; BLOCK];
        b.iter(|| {
            osc.process_block(&mut out);
            black_box(out[0]);
        });
    });

    group.bench_function("additive_64", |b| {
        let mut osc = AdditiveOsc::new(48000.0);
        osc.set_harmonic_series(1.0);
        osc.set_frequency(110.0);
        let mut out = [0.0f32; BLOCK];
        b.iter(|| {
            osc.process_block(&mut out);
            black_box(out[0]);
        });
    });

    group.bench_function("pink_noise", |b| {
        let mut noise = NoiseGen::new(48000.0);
        noise.set_color(NoiseColor::Pink);
        let mut out = [0.0f32; BLOCK];
        b.iter(|| {
            noise.process_block(&mut out);
            black_box(out[0]);
        });
    });

    group.finish();
}

fn bench_voice_pool(c: &mut Criterion) {
    c.bench_function("voice_pool_16_full", |b| {
        let mut alloc: VoiceAllocator<16> = VoiceAllocator::new(48000.0);
        for note in 48..64 {
            alloc.note_on(note, 0.8);
        }
        let mut out = [0.0f32; BLOCK];
        b.iter(|| {
            out.fill(0.0);
            alloc.render(&mut out);
            black_box(out[0]);
        });
    });
}

criterion_group!(benches, bench_oscillators, bench_voice_pool);
criterion_main!(benches);
