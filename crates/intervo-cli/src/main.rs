//! Intervo CLI - drive the intervo engine from the command line.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "intervo")]
#[command(author, version, about = "Intervo multi-track audio engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a project file to a WAV file
    Render(commands::render::RenderArgs),

    /// Play a project through the default output device
    Play(commands::play::PlayArgs),

    /// Display a project file's contents
    Info(commands::info::InfoArgs),

    /// Render the built-in demo project
    Demo(commands::demo::DemoArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Demo(args) => commands::demo::run(args),
    }
}
