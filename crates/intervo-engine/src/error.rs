//! Engine error types.
//!
//! The audio path never returns errors — it clamps, drops, or degrades to
//! silence. These types cover the control-plane operations that can fail:
//! project file I/O and command submission under back-pressure.

use thiserror::Error;

/// Errors from loading or saving a project file.
#[derive(Debug, Error)]
pub enum ProjectFileError {
    /// Underlying I/O failure, including truncated files.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the `INTV` magic.
    #[error("not an intervo project file (bad magic)")]
    BadMagic,

    /// The file's format version is newer than this reader.
    #[error("unsupported project file version {0}")]
    UnsupportedVersion(u32),

    /// A count or value in the file is out of range.
    #[error("corrupt project file: {0}")]
    Corrupt(&'static str),

    /// The loaded project could not be handed to the audio thread because
    /// the command queue is full. The engine keeps its current project.
    #[error("engine busy: command queue full")]
    EngineBusy,
}

/// Errors from submitting a command to the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The command queue is full; the producer may retry or drop.
    #[error("command queue is full")]
    QueueFull,
}
