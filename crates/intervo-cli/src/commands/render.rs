//! Offline render of a project file to WAV.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use super::{apply_script, engine_config, render_to_wav};
use intervo_engine::create;

/// Arguments for `intervo render`.
#[derive(Args)]
pub struct RenderArgs {
    /// Project file (.intv)
    pub project: PathBuf,

    /// Output WAV path
    #[arg(short, long, default_value = "render.wav")]
    pub out: PathBuf,

    /// Seconds of audio to render
    #[arg(short, long, default_value_t = 10.0)]
    pub seconds: f32,

    /// JSON-lines command script applied before rendering
    #[arg(long)]
    pub script: Option<PathBuf>,
}

/// Run the render command.
pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let (mut audio, mut handle) = create(engine_config());

    handle
        .load(&args.project)
        .with_context(|| format!("loading {}", args.project.display()))?;

    // Install the loaded project on the audio side before anything else
    let block = audio.block_size();
    let mut l = vec![0.0f32; block];
    let mut r = vec![0.0f32; block];
    audio.render(&mut l, &mut r);

    if let Some(script) = &args.script {
        let applied = apply_script(&mut audio, &mut handle, script)?;
        println!("applied {applied} script commands");
    }

    render_to_wav(&mut audio, &mut handle, &args.out, args.seconds.max(0.1))
}
