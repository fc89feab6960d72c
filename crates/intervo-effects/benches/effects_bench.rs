//! Criterion benchmarks for the effect kinds and a full chain.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use intervo_effects::{EffectChain, EffectKind, EffectState};
use intervo_core::Effect;

const BLOCK: usize = 256;

fn bench_individual_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("effects");

    for kind in EffectKind::ALL {
        group.bench_function(kind.name(), |b| {
            let mut state = EffectState::new(kind, 48000.0);
            let mut left = [0.1f32; BLOCK];
            let mut right = [0.1f32; BLOCK];
            b.iter(|| {
                state.process_block(&mut left, &mut right);
                black_box(left[0]);
            });
        });
    }

    group.finish();
}

fn bench_full_chain(c: &mut Criterion) {
    c.bench_function("chain_all_ten", |b| {
        let mut chain = EffectChain::new(48000.0);
        for kind in EffectKind::ALL {
            chain.add(kind);
        }
        let mut left = [0.1f32; BLOCK];
        let mut right = [0.1f32; BLOCK];
        b.iter(|| {
            chain.process_block(&mut left, &mut right);
            black_box(left[0]);
        });
    });
}

criterion_group!(benches, bench_individual_effects, bench_full_chain);
criterion_main!(benches);
