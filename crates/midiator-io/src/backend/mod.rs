//! Platform MIDI bindings.
//!
//! The driver consumes a platform through [`MidiBackend`]. Two bindings ship:
//! [`MidirBackend`] for hardware (requires the `midi-io` feature) and
//! [`VirtualBackend`], an in-memory platform for tests and hosts without MIDI.

#[cfg(feature = "midi-io")]
mod hardware;
mod virtual_ports;

#[cfg(feature = "midi-io")]
pub use hardware::{MidirBackend, MidirChannel, MidirPort};
pub use virtual_ports::{SentMessage, VirtualBackend, VirtualChannel, VirtualPortId};

use crate::error::Result;

/// Number of receivers a device exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverCount {
    Limited(usize),
    Unlimited,
}

impl ReceiverCount {
    /// Anything with a receiver can take output.
    pub fn is_output(self) -> bool {
        self != ReceiverCount::Limited(0)
    }
}

/// Capability set the driver needs from a platform MIDI API.
///
/// Handles are owned by the platform; the driver only clones and compares
/// them. A channel is only valid while its device stays open.
pub trait MidiBackend {
    type Handle: Clone + PartialEq;
    type Channel;

    /// List every known device, inputs included, in platform order.
    fn enumerate(&mut self) -> Result<Vec<Self::Handle>>;

    fn description(&self, handle: &Self::Handle) -> String;

    fn receiver_count(&self, handle: &Self::Handle) -> ReceiverCount;

    fn is_open(&self, handle: &Self::Handle) -> bool;

    fn open_device(&mut self, handle: &Self::Handle) -> Result<()>;

    fn close_device(&mut self, handle: &Self::Handle) -> Result<()>;

    /// Hand out the device's first receiver.
    fn acquire_channel(&mut self, handle: &Self::Handle) -> Result<Self::Channel>;

    /// Deliver `bytes`. A `timestamp` of `None` means send immediately.
    fn send(&mut self, channel: &mut Self::Channel, bytes: &[u8], timestamp: Option<u64>)
        -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receiver_count_output_check() {
        assert!(!ReceiverCount::Limited(0).is_output());
        assert!(ReceiverCount::Limited(1).is_output());
        assert!(ReceiverCount::Unlimited.is_output());
    }
}
