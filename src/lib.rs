//! # Midiator - MIDI output driver
//!
//! Pick a MIDI output by index or by a pattern over its description, keep
//! exactly one output open, and send it raw MIDI bytes.
//!
//! ## Architecture
//!
//! Midiator is an umbrella crate over:
//! - **midiator-io** - Device registry, descriptor resolution, driver session,
//!   and the platform bindings (midir hardware, in-memory virtual ports)
//!
//! ## Quick Start
//!
//! ```ignore
//! use midiator::prelude::*;
//!
//! let mut midi = MidiDriver::builder()
//!     .case_insensitive(true)
//!     .build()?;
//!
//! println!("{:?}", midi.descriptions().collect::<Vec<_>>());
//!
//! midi.open("iac")?;                   // first output matching /iac/i
//! midi.message(&[0x90, 0x3C, 0x64])?;  // note on, middle C
//! midi.open(1usize)?;                  // closes IAC, opens output #1
//! ```
//!
//! The open output is closed when the driver is dropped, including while
//! unwinding from a panic. Keep the driver owned by a scope that outlives
//! your MIDI use (for example, `main`); values in `static`s are never dropped.
//!
//! ## Feature Flags
//!
//! - `default` - Hardware output
//! - `midi-io` - Hardware output via midir

/// Re-export of midiator-io for direct access
pub use midiator_io as io;

pub use midiator_io::{
    // Platform bindings
    MidiBackend,
    ReceiverCount,
    SentMessage,
    VirtualBackend,
    VirtualPortId,

    // Registry
    Descriptor,
    Device,
    DeviceRegistry,
    Regex,

    // Driver
    DriverConfig,
    MidiDriver,
    MidiDriverBuilder,
    SharedDriver,

    // Error
    Error,
    Result,
};

#[cfg(feature = "midi-io")]
pub use midiator_io::{MidirBackend, MidirPort};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Descriptor, Device, MidiDriver, MidiDriverBuilder};

    pub use crate::{MidiBackend, VirtualBackend};

    #[cfg(feature = "midi-io")]
    pub use crate::MidirBackend;
}
