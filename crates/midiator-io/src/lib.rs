//! MIDI output driver for Midiator.
//!
//! Enumerates output devices, resolves a descriptor (index or pattern) to one
//! of them, keeps exactly one open at a time, and forwards raw MIDI bytes.
//!
//! Feature gates: `midi-io` (hardware output via midir).

pub mod error;
pub use error::{Error, Result};

pub mod backend;
pub use backend::{MidiBackend, ReceiverCount, SentMessage, VirtualBackend, VirtualPortId};

#[cfg(feature = "midi-io")]
pub use backend::{MidirBackend, MidirPort};

mod descriptor;
pub use descriptor::Descriptor;

mod registry;
pub use registry::{Device, DeviceRegistry};

mod driver;
pub use driver::{DriverConfig, MidiDriver, MidiDriverBuilder, SharedDriver};

/// Re-export for building compiled descriptors.
pub use regex::Regex;
