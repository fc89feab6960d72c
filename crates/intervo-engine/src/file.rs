//! Project file I/O.
//!
//! Binary little-endian format. Header: 4-byte magic `INTV`, `u32`
//! version. Body: transport, tracks (with effect chains), patterns (with
//! notes), arrangement items, master volume — in that order. Strings are
//! `u32`-length-prefixed UTF-8. A reader ignores unknown trailing bytes so
//! newer writers can append sections.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use intervo_effects::EffectKind;

use crate::error::ProjectFileError;
use crate::pattern::{Pattern, PatternNote};
use crate::project::{ArrangementItem, PatternId, Project, TrackId};
use crate::track::Track;
use crate::{MAX_ARRANGEMENT_ITEMS, MAX_NOTES_PER_PATTERN, MAX_PATTERNS, MAX_TRACKS};

/// File magic.
const MAGIC: [u8; 4] = *b"INTV";

/// Current format version.
const VERSION: u32 = 1;

/// Serialized parameter values per effect slot.
const PARAMS_PER_SLOT: usize = 8;

/// Upper bound on serialized string lengths.
const MAX_STRING_LEN: u32 = 4096;

// -- Write helpers --

fn write_u8<W: Write>(w: &mut W, value: u8) -> std::io::Result<()> {
    w.write_all(&[value])
}

fn write_u32<W: Write>(w: &mut W, value: u32) -> std::io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

fn write_f32<W: Write>(w: &mut W, value: f32) -> std::io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

fn write_string<W: Write>(w: &mut W, value: &str) -> std::io::Result<()> {
    write_u32(w, value.len() as u32)?;
    w.write_all(value.as_bytes())
}

// -- Read helpers --

fn read_u8<R: Read>(r: &mut R) -> std::io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(r: &mut R) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32<R: Read>(r: &mut R) -> std::io::Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_string<R: Read>(r: &mut R) -> Result<String, ProjectFileError> {
    let len = read_u32(r)?;
    if len > MAX_STRING_LEN {
        return Err(ProjectFileError::Corrupt("string length out of range"));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| ProjectFileError::Corrupt("invalid UTF-8 in string"))
}

// -- Save --

/// Serialize a project to `path`.
pub fn save_project(project: &Project, path: &Path) -> Result<(), ProjectFileError> {
    let mut w = BufWriter::new(File::create(path)?);

    w.write_all(&MAGIC)?;
    write_u32(&mut w, VERSION)?;

    // Transport
    let transport = &project.transport;
    let (beats_per_bar, beat_unit) = transport.time_signature();
    let (loop_start, loop_end) = transport.loop_region();
    write_f32(&mut w, transport.bpm() as f32)?;
    write_u8(&mut w, beats_per_bar)?;
    write_u8(&mut w, beat_unit)?;
    write_u8(&mut w, u8::from(transport.is_looping()))?;
    write_f32(&mut w, loop_start as f32)?;
    write_f32(&mut w, loop_end as f32)?;

    // Tracks
    write_u32(&mut w, project.tracks().len() as u32)?;
    for track in project.tracks() {
        write_u32(&mut w, track.id().0)?;
        write_string(&mut w, &track.name)?;
        write_f32(&mut w, track.volume())?;
        write_f32(&mut w, track.pan())?;
        write_u8(&mut w, u8::from(track.mute))?;
        write_u8(&mut w, u8::from(track.solo))?;
        w.write_all(&track.color)?;

        write_u8(&mut w, track.effects.len() as u8)?;
        for slot in track.effects.slots() {
            write_u8(&mut w, slot.kind() as u8)?;
            write_u8(&mut w, u8::from(slot.bypass))?;
            for value in slot.param_values() {
                write_f32(&mut w, value)?;
            }
        }
    }

    // Patterns
    write_u32(&mut w, project.patterns().len() as u32)?;
    for pattern in project.patterns() {
        write_u32(&mut w, pattern.id.0)?;
        write_string(&mut w, &pattern.name)?;
        write_f32(&mut w, pattern.length_beats as f32)?;
        write_u32(&mut w, pattern.notes().len() as u32)?;
        for note in pattern.notes() {
            write_u32(&mut w, note.id)?;
            write_u8(&mut w, note.pitch)?;
            write_f32(&mut w, note.velocity)?;
            write_f32(&mut w, note.start_beat as f32)?;
            write_f32(&mut w, note.duration_beats as f32)?;
            write_f32(&mut w, note.pan)?;
            w.write_all(&note.color)?;
        }
    }

    // Arrangement
    write_u32(&mut w, project.arrangement().len() as u32)?;
    for item in project.arrangement() {
        write_u32(&mut w, item.pattern_id.0)?;
        write_u32(&mut w, item.track_id.0)?;
        write_f32(&mut w, item.start_beat as f32)?;
        write_u8(&mut w, u8::from(item.muted))?;
    }

    write_f32(&mut w, project.master_volume)?;
    w.flush()?;
    Ok(())
}

// -- Load --

/// Deserialize a project from `path` at the engine's sample rate.
///
/// Fails without side effects; the caller's project is untouched on error.
pub fn load_project(path: &Path, sample_rate: f32) -> Result<Project, ProjectFileError> {
    let mut r = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ProjectFileError::BadMagic);
    }
    let version = read_u32(&mut r)?;
    if version > VERSION {
        return Err(ProjectFileError::UnsupportedVersion(version));
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let mut project = Project::empty(name, sample_rate);

    // Transport
    let bpm = read_f32(&mut r)?;
    let beats_per_bar = read_u8(&mut r)?;
    let beat_unit = read_u8(&mut r)?;
    let looping = read_u8(&mut r)? != 0;
    let loop_start = read_f32(&mut r)?;
    let loop_end = read_f32(&mut r)?;
    project.transport.set_bpm(f64::from(bpm));
    project.transport.set_time_signature(beats_per_bar, beat_unit);
    project
        .transport
        .set_loop(f64::from(loop_start), f64::from(loop_end));
    project.transport.set_looping(looping);

    // Tracks
    let track_count = read_u32(&mut r)? as usize;
    if track_count > MAX_TRACKS {
        return Err(ProjectFileError::Corrupt("track count out of range"));
    }
    for _ in 0..track_count {
        let id = read_u32(&mut r)?;
        let name = read_string(&mut r)?;
        let mut track = Track::new(TrackId(id), &name, sample_rate);
        track.set_volume(read_f32(&mut r)?);
        track.set_pan(read_f32(&mut r)?);
        track.mute = read_u8(&mut r)? != 0;
        track.solo = read_u8(&mut r)? != 0;
        r.read_exact(&mut track.color)?;

        let slot_count = read_u8(&mut r)? as usize;
        if slot_count > intervo_effects::MAX_EFFECTS {
            return Err(ProjectFileError::Corrupt("effect slot count out of range"));
        }
        for slot_index in 0..slot_count {
            let kind_byte = read_u8(&mut r)?;
            let Some(kind) = EffectKind::from_u8(kind_byte) else {
                return Err(ProjectFileError::Corrupt("unknown effect kind"));
            };
            let bypass = read_u8(&mut r)? != 0;
            track.effects.add(kind);
            for param in 0..PARAMS_PER_SLOT {
                let value = read_f32(&mut r)?;
                track.effects.set_param(slot_index, param, value);
            }
            if bypass {
                track.effects.toggle_bypass(slot_index);
            }
        }

        if project.install_track(Box::new(track)).is_err() {
            return Err(ProjectFileError::Corrupt("track capacity exceeded"));
        }
    }

    // Patterns
    let pattern_count = read_u32(&mut r)? as usize;
    if pattern_count > MAX_PATTERNS {
        return Err(ProjectFileError::Corrupt("pattern count out of range"));
    }
    for _ in 0..pattern_count {
        let id = read_u32(&mut r)?;
        let name = read_string(&mut r)?;
        let length = read_f32(&mut r)?;
        let mut pattern = Pattern::new(PatternId(id), &name, f64::from(length));

        let note_count = read_u32(&mut r)? as usize;
        if note_count > MAX_NOTES_PER_PATTERN {
            return Err(ProjectFileError::Corrupt("note count out of range"));
        }
        for _ in 0..note_count {
            let note_id = read_u32(&mut r)?;
            let pitch = read_u8(&mut r)?;
            let velocity = read_f32(&mut r)?;
            let start = read_f32(&mut r)?;
            let duration = read_f32(&mut r)?;
            let pan = read_f32(&mut r)?;
            let mut color = [0u8; 3];
            r.read_exact(&mut color)?;
            pattern.restore_note(PatternNote {
                id: note_id,
                pitch: pitch.min(127),
                velocity: velocity.clamp(0.0, 1.0),
                start_beat: f64::from(start),
                duration_beats: f64::from(duration.max(0.0)),
                pan: pan.clamp(-1.0, 1.0),
                color,
            });
        }

        if project.install_pattern(Box::new(pattern)).is_err() {
            return Err(ProjectFileError::Corrupt("pattern capacity exceeded"));
        }
    }

    // Arrangement: items referencing dead ids are dropped, not fatal
    let item_count = read_u32(&mut r)? as usize;
    if item_count > MAX_ARRANGEMENT_ITEMS {
        return Err(ProjectFileError::Corrupt("arrangement count out of range"));
    }
    for _ in 0..item_count {
        let pattern_id = PatternId(read_u32(&mut r)?);
        let track_id = TrackId(read_u32(&mut r)?);
        let start = read_f32(&mut r)?;
        let muted = read_u8(&mut r)? != 0;
        project.add_arrangement(ArrangementItem {
            pattern_id,
            track_id,
            start_beat: f64::from(start),
            muted,
        });
    }

    let master = read_f32(&mut r)?;
    project.set_master_volume(master);

    // Trailing bytes from newer writers are ignored
    Ok(project)
}
