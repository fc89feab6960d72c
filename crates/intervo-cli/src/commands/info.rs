//! Inspect a project file.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use intervo_engine::file::load_project;

/// Arguments for `intervo info`.
#[derive(Args)]
pub struct InfoArgs {
    /// Project file (.intv)
    pub project: PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let project = load_project(&args.project, 48000.0)
        .with_context(|| format!("loading {}", args.project.display()))?;

    println!("project: {}", project.name);
    let (beats, unit) = project.transport.time_signature();
    let (loop_start, loop_end) = project.transport.loop_region();
    println!(
        "tempo:   {:.1} BPM, {beats}/{unit}, loop [{loop_start}, {loop_end}) {}",
        project.transport.bpm(),
        if project.transport.is_looping() {
            "on"
        } else {
            "off"
        }
    );
    println!("master:  {:.2}", project.master_volume);

    println!("tracks:  {}", project.tracks().len());
    for track in project.tracks() {
        let effects: Vec<&str> = track
            .effects
            .slots()
            .iter()
            .map(|s| s.kind().name())
            .collect();
        println!(
            "  [{}] {:24} vol {:.2}  pan {:+.2}{}{}  fx: {}",
            track.id().0,
            track.name,
            track.volume(),
            track.pan(),
            if track.mute { "  [mute]" } else { "" },
            if track.solo { "  [solo]" } else { "" },
            if effects.is_empty() {
                "-".to_string()
            } else {
                effects.join(" > ")
            }
        );
    }

    println!("patterns: {}", project.patterns().len());
    for pattern in project.patterns() {
        println!(
            "  [{}] {:24} {:.2} beats, {} notes",
            pattern.id.0,
            pattern.name,
            pattern.length_beats,
            pattern.notes().len()
        );
    }

    println!("arrangement: {} items", project.arrangement().len());
    for item in project.arrangement() {
        println!(
            "  pattern {} on track {} @ beat {}{}",
            item.pattern_id.0,
            item.track_id.0,
            item.start_beat,
            if item.muted { " [muted]" } else { "" }
        );
    }

    Ok(())
}
