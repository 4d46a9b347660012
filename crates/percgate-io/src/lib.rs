//! WAV I/O boundary for the percgate engine.
//!
//! The gate mutates planar per-channel buffers in place and must see
//! integer PCM as integers (it rounds and clamps on write-back itself),
//! so this crate reads WAV files into [`PlanarAudio`]: deinterleaved
//! channels kept in their source format, 16-bit PCM or 32-bit float.
//! Writing preserves that format, making an open gate a lossless
//! passthrough.
//!
//! Decoding other containers, resampling, and streaming devices are
//! out of scope here; hosts needing those bring their own front end and
//! hand the engine plain sample buffers.

mod wav;

pub use wav::{ChannelData, PlanarAudio, read_mono, read_planar, write_planar};

/// Error types for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file's sample format is not one the gate processes.
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The file contains no audio frames.
    #[error("file contains no audio data")]
    Empty,

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
