//! In-memory MIDI platform.
//!
//! Devices are added and removed programmatically, every send is logged, and
//! open/close calls are counted per device. Clones share the same state, so a
//! test can keep one clone to inspect after handing another to the driver.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::Arc;

use super::{MidiBackend, ReceiverCount};
use crate::error::{Error, Result};

/// Stable identity of a virtual device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualPortId(usize);

#[derive(Debug)]
pub struct VirtualChannel {
    port: VirtualPortId,
}

impl VirtualChannel {
    pub fn port(&self) -> VirtualPortId {
        self.port
    }
}

/// One message delivered through a virtual channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub port: VirtualPortId,
    pub bytes: SmallVec<[u8; 3]>,
    pub timestamp: Option<u64>,
}

#[derive(Debug)]
struct VirtualDevice {
    id: VirtualPortId,
    description: String,
    receivers: ReceiverCount,
    open: bool,
    refuse_open: Option<String>,
    refuse_close: Option<String>,
    refuse_channel: Option<String>,
    open_calls: usize,
    close_calls: usize,
}

#[derive(Debug, Default)]
struct VirtualState {
    devices: Vec<VirtualDevice>,
    next_id: usize,
    enumeration_failure: Option<String>,
    enumerations: usize,
    sent: Vec<SentMessage>,
}

impl VirtualState {
    fn device(&self, id: VirtualPortId) -> Option<&VirtualDevice> {
        self.devices.iter().find(|d| d.id == id)
    }

    fn device_mut(&mut self, id: VirtualPortId) -> Option<&mut VirtualDevice> {
        self.devices.iter_mut().find(|d| d.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VirtualBackend {
    state: Arc<Mutex<VirtualState>>,
}

impl VirtualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device with one receiver.
    pub fn add_output(&self, description: impl Into<String>) -> VirtualPortId {
        self.add_device(description, ReceiverCount::Limited(1))
    }

    /// Add a device with no receivers. Never listed by the registry.
    pub fn add_input(&self, description: impl Into<String>) -> VirtualPortId {
        self.add_device(description, ReceiverCount::Limited(0))
    }

    pub fn add_device(
        &self,
        description: impl Into<String>,
        receivers: ReceiverCount,
    ) -> VirtualPortId {
        let mut state = self.state.lock();
        let id = VirtualPortId(state.next_id);
        state.next_id += 1;
        state.devices.push(VirtualDevice {
            id,
            description: description.into(),
            receivers,
            open: false,
            refuse_open: None,
            refuse_close: None,
            refuse_channel: None,
            open_calls: 0,
            close_calls: 0,
        });
        id
    }

    /// Unplug a device. Its open connection, if any, goes with it.
    pub fn remove(&self, id: VirtualPortId) {
        self.state.lock().devices.retain(|d| d.id != id);
    }

    /// Make every following enumeration fail with `reason`, or succeed again with `None`.
    pub fn fail_enumeration(&self, reason: Option<&str>) {
        self.state.lock().enumeration_failure = reason.map(str::to_string);
    }

    /// Make opening `id` fail with `reason`, or succeed again with `None`.
    pub fn refuse_open(&self, id: VirtualPortId, reason: Option<&str>) {
        if let Some(device) = self.state.lock().device_mut(id) {
            device.refuse_open = reason.map(str::to_string);
        }
    }

    /// Make closing `id` fail with `reason` (the device stays open), or succeed again with `None`.
    pub fn refuse_close(&self, id: VirtualPortId, reason: Option<&str>) {
        if let Some(device) = self.state.lock().device_mut(id) {
            device.refuse_close = reason.map(str::to_string);
        }
    }

    /// Make acquiring a channel on `id` fail with `reason` even while it is open,
    /// or succeed again with `None`.
    pub fn refuse_channel(&self, id: VirtualPortId, reason: Option<&str>) {
        if let Some(device) = self.state.lock().device_mut(id) {
            device.refuse_channel = reason.map(str::to_string);
        }
    }

    pub fn is_device_open(&self, id: VirtualPortId) -> bool {
        self.state.lock().device(id).is_some_and(|d| d.open)
    }

    /// Successful platform opens of `id`.
    pub fn open_count(&self, id: VirtualPortId) -> usize {
        self.state.lock().device(id).map_or(0, |d| d.open_calls)
    }

    /// Platform closes of `id` that actually closed an open device.
    pub fn close_count(&self, id: VirtualPortId) -> usize {
        self.state.lock().device(id).map_or(0, |d| d.close_calls)
    }

    pub fn enumeration_count(&self) -> usize {
        self.state.lock().enumerations
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.lock().sent.clone()
    }

    pub fn clear_sent(&self) {
        self.state.lock().sent.clear();
    }
}

impl MidiBackend for VirtualBackend {
    type Handle = VirtualPortId;
    type Channel = VirtualChannel;

    fn enumerate(&mut self) -> Result<Vec<VirtualPortId>> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.enumeration_failure {
            return Err(Error::EnumerationFailed(reason.clone()));
        }
        state.enumerations += 1;
        Ok(state.devices.iter().map(|d| d.id).collect())
    }

    fn description(&self, handle: &VirtualPortId) -> String {
        self.state
            .lock()
            .device(*handle)
            .map(|d| d.description.clone())
            .unwrap_or_default()
    }

    fn receiver_count(&self, handle: &VirtualPortId) -> ReceiverCount {
        self.state
            .lock()
            .device(*handle)
            .map_or(ReceiverCount::Limited(0), |d| d.receivers)
    }

    fn is_open(&self, handle: &VirtualPortId) -> bool {
        self.is_device_open(*handle)
    }

    fn open_device(&mut self, handle: &VirtualPortId) -> Result<()> {
        let mut state = self.state.lock();
        let device = state.device_mut(*handle).ok_or_else(|| Error::OpenFailed {
            device: format!("{:?}", handle),
            reason: "device was unplugged".to_string(),
        })?;
        if let Some(reason) = &device.refuse_open {
            return Err(Error::OpenFailed {
                device: device.description.clone(),
                reason: reason.clone(),
            });
        }
        if !device.open {
            device.open = true;
            device.open_calls += 1;
        }
        Ok(())
    }

    fn close_device(&mut self, handle: &VirtualPortId) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(device) = state.device_mut(*handle) {
            if let Some(reason) = &device.refuse_close {
                return Err(Error::CloseFailed(reason.clone()));
            }
            if device.open {
                device.open = false;
                device.close_calls += 1;
            }
        }
        Ok(())
    }

    fn acquire_channel(&mut self, handle: &VirtualPortId) -> Result<VirtualChannel> {
        let state = self.state.lock();
        match state.device(*handle) {
            Some(device) if !device.open => Err(Error::OpenFailed {
                device: device.description.clone(),
                reason: "device is not open".to_string(),
            }),
            Some(device) => match &device.refuse_channel {
                Some(reason) => Err(Error::OpenFailed {
                    device: device.description.clone(),
                    reason: reason.clone(),
                }),
                None => Ok(VirtualChannel { port: *handle }),
            },
            None => Err(Error::OpenFailed {
                device: format!("{:?}", handle),
                reason: "device was unplugged".to_string(),
            }),
        }
    }

    fn send(
        &mut self,
        channel: &mut VirtualChannel,
        bytes: &[u8],
        timestamp: Option<u64>,
    ) -> Result<()> {
        let mut state = self.state.lock();
        if !state.device(channel.port).is_some_and(|d| d.open) {
            return Err(Error::SendFailed(format!(
                "virtual port {:?} is closed",
                channel.port
            )));
        }
        state.sent.push(SentMessage {
            port: channel.port,
            bytes: SmallVec::from_slice(bytes),
            timestamp,
        });
        Ok(())
    }
}
