//! Error types for the MIDI output driver.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("MIDI device enumeration failed: {0}")]
    EnumerationFailed(String),

    #[error("MIDI output {0} not found")]
    NotFound(String),

    #[error("Invalid output descriptor: {0}")]
    InvalidDescriptor(#[from] regex::Error),

    #[error("Failed to open MIDI output '{device}': {reason}")]
    OpenFailed { device: String, reason: String },

    #[error("No MIDI output is open")]
    NotReady,

    #[error("MIDI message has no bytes")]
    EmptyMessage,

    #[error("MIDI send error: {0}")]
    SendFailed(String),

    #[error("MIDI close error: {0}")]
    CloseFailed(String),

    #[error("MIDI platform init error: {0}")]
    PlatformInit(String),
}

impl Error {
    /// True for conditions a caller is expected to handle routinely
    /// (missing device, bad pattern, nothing open) as opposed to platform faults.
    pub fn is_routine(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::InvalidDescriptor(_) | Error::NotReady
        )
    }

    /// `OpenFailed` for `device`, carrying the platform's own message.
    pub(crate) fn open_failed(device: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::OpenFailed {
            device: device.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::InitError> for Error {
    fn from(e: midir::InitError) -> Self {
        Error::PlatformInit(e.to_string())
    }
}

// The port name is not recoverable from a midir connect error; call sites
// that know it use `Error::open_failed` instead.
#[cfg(feature = "midi-io")]
impl From<midir::ConnectError<midir::MidiOutput>> for Error {
    fn from(e: midir::ConnectError<midir::MidiOutput>) -> Self {
        Error::open_failed("output port", e)
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::SendError> for Error {
    fn from(e: midir::SendError) -> Self {
        Error::SendFailed(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
