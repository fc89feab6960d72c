//! Built-in demo project: two tracks, a loop, and a few effects.

use clap::Args;
use std::path::PathBuf;

use super::{engine_config, render_to_wav};
use intervo_effects::EffectKind;
use intervo_engine::{Command, create};

/// Arguments for `intervo demo`.
#[derive(Args)]
pub struct DemoArgs {
    /// Output WAV path
    #[arg(short, long, default_value = "demo.wav")]
    pub out: PathBuf,

    /// Seconds of audio to render
    #[arg(short, long, default_value_t = 8.0)]
    pub seconds: f32,
}

/// Run the demo command.
pub fn run(args: DemoArgs) -> anyhow::Result<()> {
    let (mut audio, mut handle) = create(engine_config());

    // Second track for the bass line
    handle.submit(Command::AddTrack { name: "Bass".into() })?;
    handle.submit(Command::AddPattern {
        name: "Bassline".into(),
        length_beats: 4.0,
    })?;

    let snapshot = handle.snapshot();
    let lead_track = snapshot.tracks()[0].id();
    let bass_track = snapshot.tracks()[1].id();
    let lead_pattern = snapshot.patterns()[0].id;
    let bass_pattern = snapshot.patterns()[1].id;

    // A little arpeggio on the lead
    for (i, pitch) in [60u8, 64, 67, 72, 67, 64].iter().enumerate() {
        handle.submit(Command::AddNote {
            pattern: lead_pattern,
            pitch: *pitch,
            velocity: 0.8,
            start_beat: i as f64 * 0.5,
            duration_beats: 0.45,
        })?;
    }

    // Root-fifth bass
    for (i, pitch) in [36u8, 36, 43, 36].iter().enumerate() {
        handle.submit(Command::AddNote {
            pattern: bass_pattern,
            pitch: *pitch,
            velocity: 0.9,
            start_beat: i as f64,
            duration_beats: 0.9,
        })?;
    }

    handle.submit(Command::AddArrangement {
        pattern: lead_pattern,
        track: lead_track,
        start_beat: 0.0,
        muted: false,
    })?;
    handle.submit(Command::AddArrangement {
        pattern: bass_pattern,
        track: bass_track,
        start_beat: 0.0,
        muted: false,
    })?;

    // Space on the lead, weight on the bass
    handle.submit(Command::AddEffect {
        track: lead_track,
        kind: EffectKind::Delay,
    })?;
    handle.submit(Command::SetEffectParam {
        track: lead_track,
        slot: 0,
        param: 0,
        value: 0.375,
    })?;
    handle.submit(Command::AddEffect {
        track: lead_track,
        kind: EffectKind::Reverb,
    })?;
    handle.submit(Command::AddEffect {
        track: bass_track,
        kind: EffectKind::Distortion,
    })?;
    handle.submit(Command::SetEffectParam {
        track: bass_track,
        slot: 0,
        param: 0,
        value: 0.3,
    })?;
    handle.submit(Command::SetPan {
        track: lead_track,
        pan: 0.2,
    })?;
    handle.submit(Command::SetPan {
        track: bass_track,
        pan: -0.1,
    })?;

    handle.submit(Command::SetBpm { bpm: 110.0 })?;
    handle.submit(Command::SetLoop { start: 0.0, end: 4.0 })?;
    handle.submit(Command::ToggleLoop)?;

    render_to_wav(&mut audio, &mut handle, &args.out, args.seconds.max(0.1))
}
