//! Output device registry.
//!
//! A snapshot of the platform's output-capable devices in enumeration order.
//! The snapshot is replaced wholesale by [`DeviceRegistry::refresh`]; devices
//! returned from an earlier snapshot may be stale afterwards.

use std::fmt;
use tracing::debug;

use crate::backend::MidiBackend;
use crate::descriptor::Descriptor;
use crate::error::{Error, Result};

/// An output device as seen at the last refresh.
#[derive(Clone)]
pub struct Device<H> {
    index: usize,
    handle: H,
    description: String,
}

impl<H> Device<H> {
    /// Position in the snapshot this device came from.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Platform handle, for reaching past the driver.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<H: PartialEq> Device<H> {
    /// Same platform device, regardless of which snapshot each came from.
    pub fn is_same_device(&self, other: &Device<H>) -> bool {
        self.handle == other.handle
    }
}

impl<H: PartialEq> PartialEq for Device<H> {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_device(other)
    }
}

impl<H> fmt::Debug for Device<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("index", &self.index)
            .field("description", &self.description)
            .finish()
    }
}

pub struct DeviceRegistry<H> {
    devices: Vec<Device<H>>,
    case_insensitive: bool,
}

impl<H: Clone + PartialEq> DeviceRegistry<H> {
    /// Empty until the first refresh.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            case_insensitive: false,
        }
    }

    /// Compile text patterns case-insensitively.
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Re-enumerate the platform and keep only devices that accept output.
    ///
    /// On enumeration failure the previous snapshot is kept and the error returned.
    pub fn refresh<B>(&mut self, backend: &mut B) -> Result<()>
    where
        B: MidiBackend<Handle = H>,
    {
        let handles = backend.enumerate()?;
        let total = handles.len();

        let devices: Vec<Device<H>> = handles
            .into_iter()
            .filter(|handle| backend.receiver_count(handle).is_output())
            .enumerate()
            .map(|(index, handle)| Device {
                index,
                description: backend.description(&handle),
                handle,
            })
            .collect();

        debug!(
            "MIDI registry refreshed: {} outputs of {} devices",
            devices.len(),
            total
        );
        self.devices = devices;
        Ok(())
    }

    /// Descriptions in registry order. The iterator can be cloned to restart it.
    pub fn descriptions(&self) -> impl ExactSizeIterator<Item = &str> + Clone + '_ {
        self.devices.iter().map(|device| device.description.as_str())
    }

    pub fn devices(&self) -> &[Device<H>] {
        &self.devices
    }

    pub fn get(&self, index: usize) -> Option<&Device<H>> {
        self.devices.get(index)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Find a device by index, or the first whose description matches a pattern.
    pub fn resolve(&self, descriptor: &Descriptor) -> Result<&Device<H>> {
        let found = match descriptor {
            Descriptor::Index(index) => self.devices.get(*index),
            _ => match descriptor.compile(self.case_insensitive)? {
                Some(pattern) => self
                    .devices
                    .iter()
                    .find(|device| pattern.is_match(&device.description)),
                None => None,
            },
        };

        match found {
            Some(device) => {
                debug!("Resolved MIDI output {} to '{}'", descriptor, device.description);
                Ok(device)
            }
            None => Err(Error::NotFound(descriptor.to_string())),
        }
    }
}

impl<H: Clone + PartialEq> Default for DeviceRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ReceiverCount, VirtualBackend};
    use regex::Regex;

    fn two_outputs() -> (VirtualBackend, DeviceRegistry<crate::VirtualPortId>) {
        let mut backend = VirtualBackend::new();
        backend.add_output("Device A");
        backend.add_output("Device B");
        let mut registry = DeviceRegistry::new();
        registry.refresh(&mut backend).unwrap();
        (backend, registry)
    }

    #[test]
    fn test_refresh_filters_inputs() {
        let mut backend = VirtualBackend::new();
        backend.add_input("Keyboard In");
        let synth = backend.add_output("Synth");
        backend.add_device("Thru", ReceiverCount::Unlimited);

        let mut registry = DeviceRegistry::new();
        registry.refresh(&mut backend).unwrap();

        assert_eq!(registry.descriptions().collect::<Vec<_>>(), ["Synth", "Thru"]);
        assert_eq!(registry.get(0).unwrap().handle(), &synth);
        assert_eq!(registry.get(1).unwrap().index(), 1);
    }

    #[test]
    fn test_failed_refresh_keeps_snapshot() {
        let (mut backend, mut registry) = two_outputs();
        backend.add_output("Device C");
        backend.fail_enumeration(Some("no MIDI server"));

        let err = registry.refresh(&mut backend).unwrap_err();
        assert!(matches!(err, Error::EnumerationFailed(_)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_platform_is_not_an_error() {
        let mut backend = VirtualBackend::new();
        backend.add_input("Only Input");
        let mut registry = DeviceRegistry::new();
        registry.refresh(&mut backend).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.descriptions().count(), 0);
    }

    #[test]
    fn test_descriptions_restartable() {
        let (_backend, registry) = two_outputs();
        let descriptions = registry.descriptions();
        assert_eq!(descriptions.len(), 2);
        let first: Vec<_> = descriptions.clone().collect();
        let second: Vec<_> = descriptions.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_index() {
        let (_backend, registry) = two_outputs();
        assert_eq!(registry.resolve(&Descriptor::Index(0)).unwrap().description(), "Device A");
        assert_eq!(registry.resolve(&Descriptor::Index(1)).unwrap().description(), "Device B");
        assert!(matches!(
            registry.resolve(&Descriptor::Index(5)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_pattern_first_match_wins() {
        let (_backend, registry) = two_outputs();
        assert_eq!(registry.resolve(&"B".into()).unwrap().description(), "Device B");
        assert_eq!(registry.resolve(&"Device".into()).unwrap().index(), 0);
        assert!(matches!(
            registry.resolve(&"Piano".into()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_compiled_pattern() {
        let (_backend, registry) = two_outputs();
        let descriptor = Descriptor::from(Regex::new(r"\bB$").unwrap());
        assert_eq!(registry.resolve(&descriptor).unwrap().index(), 1);
    }

    #[test]
    fn test_resolve_invalid_pattern() {
        let (_backend, registry) = two_outputs();
        assert!(matches!(
            registry.resolve(&"[".into()),
            Err(Error::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn test_case_insensitive_registry() {
        let mut backend = VirtualBackend::new();
        backend.add_output("Device A");
        let mut registry = DeviceRegistry::new().with_case_insensitive(true);
        registry.refresh(&mut backend).unwrap();
        assert!(registry.resolve(&"device a".into()).is_ok());
    }

    #[test]
    fn test_refresh_reflects_hotplug() {
        let (mut backend, mut registry) = two_outputs();
        let first = *registry.get(0).unwrap().handle();
        backend.remove(first);
        registry.refresh(&mut backend).unwrap();

        assert_eq!(registry.descriptions().collect::<Vec<_>>(), ["Device B"]);
        assert_eq!(registry.resolve(&Descriptor::Index(0)).unwrap().description(), "Device B");
    }
}
