//! Real-time playback through the default output device.

use anyhow::{Context, anyhow};
use clap::Args;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::path::PathBuf;
use std::time::Duration;

use intervo_engine::{Command, EngineConfig, create};

/// Arguments for `intervo play`.
#[derive(Args)]
pub struct PlayArgs {
    /// Project file (.intv)
    pub project: PathBuf,

    /// Seconds to play before stopping
    #[arg(short, long, default_value_t = 30.0)]
    pub seconds: f32,
}

/// Run the play command.
pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))?;
    let config = device.default_output_config()?;
    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(anyhow!(
            "unsupported output sample format {:?}",
            config.sample_format()
        ));
    }

    let sample_rate = config.sample_rate() as f32;
    let channels = config.channels() as usize;
    println!("output: {sample_rate} Hz, {channels} channels");

    let (mut audio, mut handle) = create(EngineConfig {
        sample_rate,
        block_size: 256,
        name: "play".into(),
    });

    handle
        .load(&args.project)
        .with_context(|| format!("loading {}", args.project.display()))?;
    handle.submit(Command::Play)?;

    let mut left = vec![0.0f32; 4096];
    let mut right = vec![0.0f32; 4096];
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            data.fill(0.0);
            let frames = (data.len() / channels).min(left.len());
            audio.render(&mut left[..frames], &mut right[..frames]);

            for (i, frame) in data.chunks_mut(channels).enumerate().take(frames) {
                frame[0] = left[i];
                if channels > 1 {
                    frame[1] = right[i];
                }
                for extra in frame.iter_mut().skip(2) {
                    *extra = 0.0;
                }
            }
        },
        |err| tracing::error!("audio stream error: {err}"),
        None,
    )?;

    stream.play()?;

    // Report progress from the control side while the stream runs
    let deadline = std::time::Instant::now() + Duration::from_secs_f32(args.seconds.max(0.1));
    while std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(500));
        let (peak_l, peak_r) = handle.read_meters();
        println!(
            "beat {:7.2}  peaks L {:.3} / R {:.3}",
            handle.playhead_beats(),
            peak_l,
            peak_r
        );
        handle.poll_events();
    }

    drop(stream);
    Ok(())
}
