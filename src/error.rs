use std::collections::TryReserveError;
use thiserror::Error;

pub type MorseResult<T> = Result<T, MorseError>;

/// Returned when morse rendering or conversion fails.
#[derive(Error, Debug)]
pub enum MorseError {
    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate { rate: u32 },
    #[error("failed to grow sample buffer to {frames} frames")]
    Allocation {
        frames: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("audio data too large for a wav file: {bytes} bytes")]
    DataTooLarge { bytes: u64 },
    #[error("not morse code: {0:?}")]
    InvalidMorse(String),
    #[error("not hexadecimal morse: {0:?}")]
    InvalidHex(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
