//! Output driver session.
//!
//! ## Quick Start
//!
//! ```ignore
//! use midiator_io::MidiDriver;
//!
//! let mut midi = MidiDriver::builder()
//!     .client_name("sequencer")
//!     .build()?;
//!
//! for (i, name) in midi.descriptions().enumerate() {
//!     println!("[{}] {}", i, name);
//! }
//!
//! midi.open("IAC")?;
//! midi.message(&[0x90, 0x3C, 0x64])?;
//! midi.close()?;
//! ```
//!
//! The driver holds at most one open output. Opening another output closes the
//! current one first; opening the output that is already open is a no-op.
//! Dropping the driver closes whatever is open.

mod builder;
mod config;

pub use builder::MidiDriverBuilder;
pub use config::DriverConfig;

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

#[cfg(feature = "midi-io")]
use crate::backend::MidirBackend;
use crate::backend::MidiBackend;
use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::registry::{Device, DeviceRegistry};

/// A driver behind a lock, for hosts that call in from more than one thread.
pub type SharedDriver<B> = Arc<Mutex<MidiDriver<B>>>;

/// The open output and the channel bound to it. Exists only while open.
struct ActiveOutput<B: MidiBackend> {
    device: Device<B::Handle>,
    channel: B::Channel,
}

pub struct MidiDriver<B: MidiBackend> {
    backend: B,
    registry: DeviceRegistry<B::Handle>,
    active: Option<ActiveOutput<B>>,
    config: DriverConfig,
}

#[cfg(feature = "midi-io")]
impl MidiDriver<MidirBackend> {
    /// Builder for a driver on midir.
    ///
    /// ```ignore
    /// let midi = MidiDriver::builder()
    ///     .default_output("0")
    ///     .build()?;
    /// ```
    pub fn builder() -> MidiDriverBuilder {
        MidiDriverBuilder::default()
    }
}

impl<B: MidiBackend> MidiDriver<B> {
    /// Create a driver with default settings. Enumerates outputs immediately.
    pub fn new(backend: B) -> Result<Self> {
        Self::with_config(backend, DriverConfig::default())
    }

    pub fn with_config(mut backend: B, config: DriverConfig) -> Result<Self> {
        let mut registry = DeviceRegistry::new().with_case_insensitive(config.case_insensitive);
        registry.refresh(&mut backend)?;

        Ok(Self {
            backend,
            registry,
            active: None,
            config,
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    // ==================== Registry ====================

    /// Re-enumerate outputs, e.g. after a device is plugged in.
    ///
    /// The open output, if any, stays open.
    pub fn refresh(&mut self) -> Result<()> {
        self.registry.refresh(&mut self.backend)
    }

    /// Output descriptions in registry order.
    pub fn descriptions(&self) -> impl ExactSizeIterator<Item = &str> + Clone + '_ {
        self.registry.descriptions()
    }

    pub fn resolve(&self, descriptor: impl Into<Descriptor>) -> Result<&Device<B::Handle>> {
        self.registry.resolve(&descriptor.into())
    }

    pub fn registry(&self) -> &DeviceRegistry<B::Handle> {
        &self.registry
    }

    // ==================== Session ====================

    /// Open the output named by `descriptor`, replacing the current one.
    ///
    /// Resolution failures leave the driver untouched. If the new output
    /// cannot be opened after the old one was closed, the old one is reopened.
    pub fn open(&mut self, descriptor: impl Into<Descriptor>) -> Result<&Device<B::Handle>> {
        let target = self.registry.resolve(&descriptor.into())?.clone();

        let previous = match self.active.take() {
            Some(active) if active.device.is_same_device(&target) => {
                if self.backend.is_open(target.handle()) {
                    debug!("MIDI output '{}' already open", target.description());
                    let active = self.active.insert(ActiveOutput {
                        device: target,
                        channel: active.channel,
                    });
                    return Ok(&active.device);
                }
                // Closed behind our back; reopen without a close
                None
            }
            Some(active) => {
                if let Err(e) = self.close_device(&active.device) {
                    self.active = Some(active);
                    return Err(e);
                }
                Some(active.device)
            }
            None => None,
        };

        match self.connect(&target) {
            Ok(channel) => {
                match &previous {
                    Some(prev) => info!(
                        "Switched MIDI output '{}' -> '{}'",
                        prev.description(),
                        target.description()
                    ),
                    None => info!("Opened MIDI output '{}'", target.description()),
                }
                let active = self.active.insert(ActiveOutput {
                    device: target,
                    channel,
                });
                Ok(&active.device)
            }
            Err(e) => {
                if let Some(prev) = previous {
                    self.restore(prev);
                }
                Err(e)
            }
        }
    }

    /// Open the first output.
    pub fn open_default(&mut self) -> Result<&Device<B::Handle>> {
        self.open(Descriptor::default())
    }

    /// Close the open output. No-op when nothing is open.
    ///
    /// If the platform refuses, the output stays current so a later `close()`
    /// (or drop) can try again.
    pub fn close(&mut self) -> Result<()> {
        let Some(active) = self.active.take() else {
            return Ok(());
        };
        if let Err(e) = self.close_device(&active.device) {
            self.active = Some(active);
            return Err(e);
        }
        info!("Closed MIDI output '{}'", active.device.description());
        Ok(())
    }

    /// Send raw bytes to the open output immediately.
    pub fn message(&mut self, bytes: &[u8]) -> Result<()> {
        let active = self.active.as_mut().ok_or(Error::NotReady)?;
        if bytes.is_empty() {
            return Err(Error::EmptyMessage);
        }
        trace!(
            "MIDI out '{}': {:02X?}",
            active.device.description(),
            bytes
        );
        self.backend.send(&mut active.channel, bytes, None)
    }

    /// The open output, for callers that need the platform handle.
    pub fn current_device(&self) -> Option<&Device<B::Handle>> {
        self.active.as_ref().map(|active| &active.device)
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Direct platform access. Closing the open device through this leaves
    /// the driver open until the next `open` or `close`.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_shared(self) -> SharedDriver<B> {
        Arc::new(Mutex::new(self))
    }

    // ==================== Platform ====================

    /// Open `device` if needed and take its first receiver.
    fn connect(&mut self, device: &Device<B::Handle>) -> Result<B::Channel> {
        let handle = device.handle();
        let opened_here = !self.backend.is_open(handle);
        if opened_here {
            self.backend.open_device(handle)?;
        }

        match self.backend.acquire_channel(handle) {
            Ok(channel) => {
                debug!("Acquired channel on MIDI output '{}'", device.description());
                Ok(channel)
            }
            Err(e) => {
                if opened_here {
                    if let Err(close_err) = self.backend.close_device(handle) {
                        warn!(
                            "Failed to close MIDI output '{}': {}",
                            device.description(),
                            close_err
                        );
                    }
                }
                Err(e)
            }
        }
    }

    fn close_device(&mut self, device: &Device<B::Handle>) -> Result<()> {
        if self.backend.is_open(device.handle()) {
            self.backend.close_device(device.handle())?;
        }
        Ok(())
    }

    fn restore(&mut self, device: Device<B::Handle>) {
        match self.connect(&device) {
            Ok(channel) => {
                debug!("Restored MIDI output '{}'", device.description());
                self.active = Some(ActiveOutput { device, channel });
            }
            Err(e) => warn!(
                "Failed to restore MIDI output '{}': {}",
                device.description(),
                e
            ),
        }
    }
}

impl<B: MidiBackend> fmt::Debug for MidiDriver<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidiDriver")
            .field("outputs", &self.registry.devices())
            .field("current", &self.current_device())
            .field("config", &self.config)
            .finish()
    }
}

impl<B: MidiBackend> Drop for MidiDriver<B> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Error closing MIDI output on shutdown: {}", e);
        }
    }
}
