//! CLI subcommands.

pub mod demo;
pub mod info;
pub mod play;
pub mod render;

use anyhow::Context;
use intervo_engine::{AudioEngine, Command, EngineConfig, EngineHandle, create};
use std::path::Path;

/// Default engine configuration for CLI sessions.
pub fn engine_config() -> EngineConfig {
    EngineConfig {
        sample_rate: 48000.0,
        block_size: 256,
        name: "cli".into(),
    }
}

/// Submit JSON-lines commands from a script file, draining the queue
/// between batches so large scripts cannot overflow it.
pub fn apply_script(
    audio: &mut AudioEngine,
    handle: &mut EngineHandle,
    path: &Path,
) -> anyhow::Result<usize> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;

    let mut scratch_l = vec![0.0f32; audio.block_size()];
    let mut scratch_r = vec![0.0f32; audio.block_size()];
    let mut applied = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: Command = serde_json::from_str(line)
            .with_context(|| format!("script line {}: {line}", line_no + 1))?;
        handle
            .submit(command)
            .with_context(|| format!("script line {}", line_no + 1))?;
        applied += 1;

        // The engine drains a bounded number of commands per block; while
        // stopped a render just absorbs the queue without advancing time
        if applied % 32 == 0 {
            audio.render(&mut scratch_l, &mut scratch_r);
        }
    }
    audio.render(&mut scratch_l, &mut scratch_r);

    tracing::debug!(applied, "script applied");
    Ok(applied)
}

/// Render `seconds` of playing audio into a 16-bit stereo WAV file.
pub fn render_to_wav(
    audio: &mut AudioEngine,
    handle: &mut EngineHandle,
    out_path: &Path,
    seconds: f32,
) -> anyhow::Result<()> {
    let config = engine_config();
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: config.sample_rate as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(out_path, spec)
        .with_context(|| format!("creating {}", out_path.display()))?;

    handle.submit(Command::Play)?;

    let block = audio.block_size();
    let mut left = vec![0.0f32; block];
    let mut right = vec![0.0f32; block];
    let total_blocks = (seconds * config.sample_rate / block as f32).ceil() as usize;

    for _ in 0..total_blocks {
        audio.render(&mut left, &mut right);
        for (l, r) in left.iter().zip(right.iter()) {
            writer.write_sample((l * f32::from(i16::MAX)) as i16)?;
            writer.write_sample((r * f32::from(i16::MAX)) as i16)?;
        }
    }
    writer.finalize()?;

    for event in handle.poll_events() {
        tracing::warn!(?event, "engine event during render");
    }

    let (peak_l, peak_r) = handle.read_meters();
    println!(
        "wrote {} ({:.1}s, peaks L {:.3} / R {:.3})",
        out_path.display(),
        seconds,
        peak_l,
        peak_r
    );
    Ok(())
}
