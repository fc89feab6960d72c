//! Integration tests spanning the oscillator families and voice pool.

use intervo_synth::{
    AdsrEnvelope, FractalOsc, LorenzOsc, NoiseColor, NoiseGen, QuantumOsc, Voice, VoiceAllocator,
    Waveform, WavetableOsc,
};

/// Every oscillator family produces bounded, finite output over a long run.
#[test]
fn all_families_bounded() {
    let sr = 48000.0;
    let mut outputs: Vec<(&str, Vec<f32>)> = Vec::new();

    let mut quantum = QuantumOsc::new(sr);
    quantum.set_waveforms(Waveform::Saw, Waveform::Pulse);
    quantum.set_morph(0.4);
    quantum.set_frequency(440.0);
    outputs.push(("quantum", (0..48000).map(|_| quantum.process()).collect()));

    let mut lorenz = LorenzOsc::new(sr);
    outputs.push(("lorenz", (0..48000).map(|_| lorenz.process()).collect()));

    let mut wavetable = WavetableOsc::with_default_tables(sr);
    wavetable.set_frequency(440.0);
    wavetable.set_table_position(2.3);
    outputs.push(("wavetable", (0..48000).map(|_| wavetable.process()).collect()));

    let mut fractal = FractalOsc::new(sr);
    fractal.set_frequency(110.0);
    outputs.push(("fractal", (0..48000).map(|_| fractal.process()).collect()));

    let mut noise = NoiseGen::new(sr);
    noise.set_color(NoiseColor::Pink);
    outputs.push(("pink", (0..48000).map(|_| noise.process()).collect()));

    for (name, samples) in outputs {
        let mut energy = 0.0f32;
        for &s in &samples {
            assert!(s.is_finite(), "{name} produced non-finite output");
            assert!((-2.0..=2.0).contains(&s), "{name} out of range: {s}");
            energy += s.abs();
        }
        assert!(energy > 0.0, "{name} produced only silence");
    }
}

/// A voice driven through a full note lifecycle ends silent and inactive.
#[test]
fn voice_note_lifecycle() {
    let mut voice = Voice::new(48000.0);
    voice.amp_env.set_attack_s(0.005);
    voice.amp_env.set_release_s(0.05);

    voice.note_on(69, 1.0);

    let mut peak = 0.0f32;
    for _ in 0..4800 {
        peak = peak.max(voice.process().abs());
    }
    assert!(peak > 0.05, "voice should reach audible level, peak {peak}");

    voice.note_off();
    for _ in 0..48000 {
        voice.process();
    }
    assert!(!voice.is_active());
    assert_eq!(voice.process(), 0.0);
}

/// Seventeen simultaneous note-ons on a 16-voice pool leave exactly 16
/// active voices, and the new note is among them.
#[test]
fn seventeen_notes_steal_one() {
    let mut alloc: VoiceAllocator<16> = VoiceAllocator::new(48000.0);

    for note in 48..64 {
        alloc.note_on(note, 0.8);
    }
    assert_eq!(alloc.active_count(), 16);

    alloc.note_on(72, 0.8);
    assert_eq!(alloc.active_count(), 16);

    let has_72 = alloc.voices().iter().any(|v| v.is_active() && v.note() == 72);
    assert!(has_72, "17th note must be sounding");
}

/// At any time, at most one voice per pitch holds an open gate.
#[test]
fn gate_exclusivity_under_churn() {
    let mut alloc: VoiceAllocator<16> = VoiceAllocator::new(48000.0);

    // Hammer the same few pitches with interleaved on/offs
    for round in 0..50u32 {
        let note = 60 + (round % 4) as u8;
        alloc.note_on(note, 0.8);
        if round % 3 == 0 {
            alloc.note_off(60 + ((round + 1) % 4) as u8);
        }
        alloc.tick_ages();

        for pitch in 60..64u8 {
            let gated = alloc
                .voices()
                .iter()
                .filter(|v| v.gate() && v.note() == pitch)
                .count();
            assert!(gated <= 1, "pitch {pitch} has {gated} gated voices");
        }
    }
}

/// Identical seeds and event sequences give bitwise-identical audio.
#[test]
fn deterministic_rendering() {
    let build = || {
        let mut alloc: VoiceAllocator<8> = VoiceAllocator::new(48000.0);
        for voice in alloc.voices_mut() {
            voice.set_mix(0.6, 0.0, 0.4);
        }
        alloc
    };

    let mut a = build();
    let mut b = build();

    for (alloc, _) in [(&mut a, 0), (&mut b, 1)] {
        alloc.note_on(60, 0.8);
        alloc.note_on(67, 0.6);
    }

    let mut block_a = [0.0f32; 256];
    let mut block_b = [0.0f32; 256];
    for _ in 0..100 {
        block_a.fill(0.0);
        block_b.fill(0.0);
        a.render(&mut block_a);
        b.render(&mut block_b);
        a.tick_ages();
        b.tick_ages();

        for (sa, sb) in block_a.iter().zip(block_b.iter()) {
            assert_eq!(sa.to_bits(), sb.to_bits(), "renders diverged");
        }
    }
}

/// The envelope's linear stages land on exact levels.
#[test]
fn envelope_linear_levels() {
    let mut env = AdsrEnvelope::new(48000.0);
    env.set_attack_s(0.01);
    env.set_decay_s(0.02);
    env.set_sustain(0.25);
    env.set_release_s(0.01);

    env.gate_on();
    // Through attack and decay
    for _ in 0..48000 / 10 {
        env.advance();
    }
    assert_eq!(env.level(), 0.25, "sustain must hold exactly");

    env.gate_off();
    for _ in 0..4800 {
        env.advance();
    }
    assert_eq!(env.level(), 0.0, "release must land on zero");
}
