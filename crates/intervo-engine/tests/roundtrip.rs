//! Save/load round-trips through the engine handle.

use intervo_engine::{Command, EngineConfig, create};

fn config() -> EngineConfig {
    EngineConfig {
        sample_rate: 48000.0,
        block_size: 256,
        name: "roundtrip".into(),
    }
}

/// Build a non-trivial project, save it, load it into a fresh engine, and
/// compare the structures.
#[test]
fn save_load_preserves_project() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.intv");

    let (mut audio, mut handle) = create(config());

    handle.submit(Command::AddTrack { name: "Bass".into() }).unwrap();
    handle
        .submit(Command::AddPattern {
            name: "Verse".into(),
            length_beats: 8.0,
        })
        .unwrap();
    handle.submit(Command::SetBpm { bpm: 96.0 }).unwrap();
    handle.submit(Command::SetLoop { start: 0.0, end: 8.0 }).unwrap();
    handle.submit(Command::ToggleLoop).unwrap();
    handle.submit(Command::SetMasterVolume { volume: 0.9 }).unwrap();

    let snapshot = handle.snapshot();
    let tracks: Vec<_> = snapshot.tracks().iter().map(|t| t.id()).collect();
    let patterns: Vec<_> = snapshot.patterns().iter().map(|p| p.id).collect();

    handle
        .submit(Command::AddEffect {
            track: tracks[1],
            kind: intervo_effects::EffectKind::Distortion,
        })
        .unwrap();
    handle
        .submit(Command::SetEffectParam {
            track: tracks[1],
            slot: 0,
            param: 0,
            value: 0.9,
        })
        .unwrap();
    for (i, pitch) in [36u8, 38, 43].iter().enumerate() {
        handle
            .submit(Command::AddNote {
                pattern: patterns[1],
                pitch: *pitch,
                velocity: 0.7,
                start_beat: i as f64 * 2.0,
                duration_beats: 1.0,
            })
            .unwrap();
    }
    handle
        .submit(Command::AddArrangement {
            pattern: patterns[1],
            track: tracks[1],
            start_beat: 0.0,
            muted: false,
        })
        .unwrap();

    // Let the audio side apply everything, then save from the mirror
    let mut l = [0.0f32; 256];
    let mut r = [0.0f32; 256];
    audio.render(&mut l, &mut r);
    handle.save(&path).unwrap();

    // Load into a fresh engine
    let (mut audio2, mut handle2) = create(config());
    handle2.load(&path).unwrap();
    audio2.render(&mut l, &mut r);

    let original = handle.snapshot();
    let loaded = handle2.snapshot();

    assert_eq!(loaded.tracks().len(), original.tracks().len());
    assert_eq!(loaded.patterns().len(), original.patterns().len());
    assert_eq!(loaded.arrangement().len(), original.arrangement().len());
    assert!((loaded.transport.bpm() - 96.0).abs() < 1e-3);
    assert!(loaded.transport.is_looping());
    assert!((loaded.master_volume - 0.9).abs() < 1e-6);

    for (a, b) in original.tracks().iter().zip(loaded.tracks().iter()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.name, b.name);
        assert_eq!(a.mute, b.mute);
        assert_eq!(a.solo, b.solo);
        assert_eq!(a.effects.len(), b.effects.len());
        for (sa, sb) in a.effects.slots().iter().zip(b.effects.slots().iter()) {
            assert_eq!(sa.kind(), sb.kind());
            assert_eq!(sa.bypass, sb.bypass);
            assert_eq!(sa.param_values(), sb.param_values());
        }
    }

    for (a, b) in original.patterns().iter().zip(loaded.patterns().iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.notes().len(), b.notes().len());
        // Note ordering by id survives the round trip
        for (na, nb) in a.notes().iter().zip(b.notes().iter()) {
            assert_eq!(na.id, nb.id);
            assert_eq!(na.pitch, nb.pitch);
            assert!((na.velocity - nb.velocity).abs() < 1e-6);
        }
    }

    // The loaded engine renders sound from the loaded arrangement
    handle2.submit(Command::Play).unwrap();
    let mut any_signal = false;
    for _ in 0..200 {
        audio2.render(&mut l, &mut r);
        if l.iter().any(|&s| s != 0.0) {
            any_signal = true;
            break;
        }
    }
    assert!(any_signal, "loaded project must be playable");
}

/// AddTrack then RemoveTrack restores the track count; patterns are
/// untouched; a later AddTrack gets a fresh id.
#[test]
fn add_remove_track_roundtrip() {
    let (mut audio, mut handle) = create(config());
    let mut l = [0.0f32; 256];
    let mut r = [0.0f32; 256];

    let before_tracks = handle.snapshot().tracks().len();
    let before_patterns = handle.snapshot().patterns().len();

    handle.submit(Command::AddTrack { name: "Temp".into() }).unwrap();
    audio.render(&mut l, &mut r);
    let added = handle.snapshot().tracks().last().unwrap().id();

    handle.submit(Command::RemoveTrack { track: added }).unwrap();
    audio.render(&mut l, &mut r);

    assert_eq!(handle.snapshot().tracks().len(), before_tracks);
    assert_eq!(handle.snapshot().patterns().len(), before_patterns);
    assert_eq!(audio.project().tracks().len(), before_tracks);

    handle.submit(Command::AddTrack { name: "Next".into() }).unwrap();
    audio.render(&mut l, &mut r);
    let newest = handle.snapshot().tracks().last().unwrap().id();
    assert_ne!(newest, added, "ids are never reused");
}

/// Loading a bad file leaves the engine untouched.
#[test]
fn failed_load_preserves_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.intv");
    std::fs::write(&path, b"not a project at all").unwrap();

    let (mut audio, mut handle) = create(config());
    handle.submit(Command::AddTrack { name: "Keep".into() }).unwrap();
    let mut l = [0.0f32; 256];
    let mut r = [0.0f32; 256];
    audio.render(&mut l, &mut r);

    assert!(handle.load(&path).is_err());

    assert_eq!(handle.snapshot().tracks().len(), 2, "mirror unchanged");
    audio.render(&mut l, &mut r);
    assert_eq!(audio.project().tracks().len(), 2, "audio side unchanged");
}

/// The mirror and the audio-side project stay in lockstep across a long
/// mixed command stream.
#[test]
fn mirror_stays_in_lockstep() {
    let (mut audio, mut handle) = create(config());
    let mut l = [0.0f32; 256];
    let mut r = [0.0f32; 256];

    let pattern = handle.snapshot().patterns()[0].id;
    let track = handle.snapshot().tracks()[0].id();

    let commands = vec![
        Command::AddTrack { name: "Two".into() },
        Command::SetVolume { track, volume: 1.4 },
        Command::SetPan { track, pan: 0.3 },
        Command::ToggleMute { track },
        Command::AddEffect {
            track,
            kind: intervo_effects::EffectKind::Chorus,
        },
        Command::SetEffectParam {
            track,
            slot: 0,
            param: 1,
            value: 0.8,
        },
        Command::AddNote {
            pattern,
            pitch: 72,
            velocity: 0.9,
            start_beat: 0.25,
            duration_beats: 0.5,
        },
        Command::AddArrangement {
            pattern,
            track,
            start_beat: 1.0,
            muted: true,
        },
        Command::SetBpm { bpm: 174.0 },
        Command::ToggleLoop,
    ];
    for command in commands {
        handle.submit(command).unwrap();
        audio.render(&mut l, &mut r);
    }

    let mirror = handle.snapshot();
    let live = audio.project();

    assert_eq!(mirror.tracks().len(), live.tracks().len());
    assert_eq!(mirror.patterns().len(), live.patterns().len());
    assert_eq!(mirror.arrangement().len(), live.arrangement().len());
    assert_eq!(mirror.transport.bpm(), live.transport.bpm());
    assert_eq!(mirror.transport.is_looping(), live.transport.is_looping());

    let mt = mirror.track(track).unwrap();
    let lt = live.track(track).unwrap();
    assert_eq!(mt.volume(), lt.volume());
    assert_eq!(mt.pan(), lt.pan());
    assert_eq!(mt.mute, lt.mute);
    assert_eq!(mt.effects.len(), lt.effects.len());
    assert_eq!(mt.effects.get_param(0, 1), lt.effects.get_param(0, 1));

    let mp = mirror.pattern(pattern).unwrap();
    let lp = live.pattern(pattern).unwrap();
    assert_eq!(mp.notes(), lp.notes());
}
