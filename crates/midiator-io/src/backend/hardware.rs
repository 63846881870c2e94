//! Hardware MIDI output via midir (ALSA, CoreMIDI, WinMM).

use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use tracing::debug;

use super::{MidiBackend, ReceiverCount};
use crate::error::{Error, Result};

/// A midir output port together with the name it reported at enumeration.
#[derive(Clone, PartialEq)]
pub struct MidirPort {
    port: MidiOutputPort,
    name: String,
}

impl MidirPort {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw midir port, for callers that need midir directly.
    pub fn port(&self) -> &MidiOutputPort {
        &self.port
    }
}

/// Send channel bound to an open midir connection.
pub struct MidirChannel {
    port: MidiOutputPort,
}

/// midir has no separate open step: a port is open while we hold a
/// connection to it.
pub struct MidirBackend {
    client_name: String,
    connections: Vec<(MidiOutputPort, MidiOutputConnection)>,
}

impl MidirBackend {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            connections: Vec::new(),
        }
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    fn connection_mut(&mut self, port: &MidiOutputPort) -> Option<&mut MidiOutputConnection> {
        self.connections
            .iter_mut()
            .find(|(p, _)| p == port)
            .map(|(_, conn)| conn)
    }
}

impl Default for MidirBackend {
    fn default() -> Self {
        Self::new("midiator")
    }
}

impl MidiBackend for MidirBackend {
    type Handle = MidirPort;
    type Channel = MidirChannel;

    fn enumerate(&mut self) -> Result<Vec<MidirPort>> {
        let midi_output = MidiOutput::new(&format!("{}-list", self.client_name))
            .map_err(|e| Error::EnumerationFailed(e.to_string()))?;

        let mut ports = Vec::new();
        for (index, port) in midi_output.ports().into_iter().enumerate() {
            match midi_output.port_name(&port) {
                Ok(name) => ports.push(MidirPort { port, name }),
                // Port vanished between listing and naming
                Err(e) => debug!("Skipping MIDI output port {}: {}", index, e),
            }
        }
        Ok(ports)
    }

    fn description(&self, handle: &MidirPort) -> String {
        handle.name.clone()
    }

    fn receiver_count(&self, _handle: &MidirPort) -> ReceiverCount {
        // midir only lists ports that accept output
        ReceiverCount::Limited(1)
    }

    fn is_open(&self, handle: &MidirPort) -> bool {
        self.connections.iter().any(|(p, _)| *p == handle.port)
    }

    fn open_device(&mut self, handle: &MidirPort) -> Result<()> {
        if self.is_open(handle) {
            return Ok(());
        }

        let midi_output = MidiOutput::new(&self.client_name)
            .map_err(|e| Error::open_failed(&handle.name, e))?;
        let connection = midi_output
            .connect(&handle.port, &self.client_name)
            .map_err(|e| Error::open_failed(&handle.name, e))?;

        debug!("Connected MIDI output port: {}", handle.name);
        self.connections.push((handle.port.clone(), connection));
        Ok(())
    }

    fn close_device(&mut self, handle: &MidirPort) -> Result<()> {
        if let Some(pos) = self.connections.iter().position(|(p, _)| *p == handle.port) {
            let (_, connection) = self.connections.remove(pos);
            connection.close();
            debug!("Disconnected MIDI output port: {}", handle.name);
        }
        Ok(())
    }

    fn acquire_channel(&mut self, handle: &MidirPort) -> Result<MidirChannel> {
        if !self.is_open(handle) {
            return Err(Error::OpenFailed {
                device: handle.name.clone(),
                reason: "port is not connected".to_string(),
            });
        }
        Ok(MidirChannel {
            port: handle.port.clone(),
        })
    }

    fn send(
        &mut self,
        channel: &mut MidirChannel,
        bytes: &[u8],
        timestamp: Option<u64>,
    ) -> Result<()> {
        if timestamp.is_some() {
            debug!("midir cannot schedule output; sending immediately");
        }
        let connection = self
            .connection_mut(&channel.port)
            .ok_or_else(|| Error::SendFailed("MIDI output connection is closed".to_string()))?;
        connection.send(bytes)?;
        Ok(())
    }
}

impl Drop for MidirBackend {
    fn drop(&mut self) {
        for (_, connection) in self.connections.drain(..) {
            connection.close();
        }
    }
}
