//! Umbrella crate integration tests.
//!
//! Exercises the driver through the prelude on virtual ports.

use midiator::prelude::*;
use midiator::{DriverConfig, Error};

fn test_driver(config: DriverConfig) -> (VirtualBackend, MidiDriver<VirtualBackend>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let backend = VirtualBackend::new();
    backend.add_input("Controller In");
    backend.add_output("Loopback 1");
    backend.add_output("Hardware Synth");
    backend.add_output("Loopback 2");

    let driver = MidiDriverBuilder::new()
        .config(config)
        .build_with(backend.clone())
        .expect("Failed to create test driver");
    (backend, driver)
}

#[test]
fn test_descriptions_skip_inputs() {
    let (_backend, driver) = test_driver(DriverConfig::default());
    let names: Vec<_> = driver.descriptions().collect();
    assert_eq!(names, ["Loopback 1", "Hardware Synth", "Loopback 2"]);
}

#[test]
fn test_session_walkthrough() {
    let (backend, mut driver) = test_driver(DriverConfig::default());

    // Nothing open yet
    assert!(matches!(driver.message(&[0xF8]), Err(Error::NotReady)));

    // Pattern picks the first loopback
    let first = driver.open("Loopback").unwrap().clone();
    assert_eq!(first.index(), 0);

    // Same device again: no close
    driver.open(0usize).unwrap();
    assert_eq!(backend.close_count(*first.handle()), 0);

    // Switch closes the first
    driver.open("Synth$").unwrap();
    assert_eq!(backend.close_count(*first.handle()), 1);

    // Program change + note on
    driver.message(&[0xC0, 0x05]).unwrap();
    driver.message(&[0x90, 0x3C, 0x64]).unwrap();

    let sent = backend.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.timestamp.is_none()));
    assert_eq!(sent[0].bytes.as_slice(), &[0xC0, 0x05]);

    driver.close().unwrap();
    assert!(driver.current_device().is_none());
}

#[test]
fn test_default_output_from_config() {
    let config = DriverConfig {
        case_insensitive: true,
        default_output: Some("hardware".into()),
        ..Default::default()
    };
    let (backend, driver) = test_driver(config);

    let device = driver.current_device().expect("default output not opened");
    assert_eq!(device.description(), "Hardware Synth");
    assert!(backend.is_device_open(*device.handle()));
}

#[test]
fn test_hotplug_refresh() {
    let (backend, mut driver) = test_driver(DriverConfig::default());
    assert!(matches!(driver.open("USB"), Err(Error::NotFound(_))));

    backend.add_output("USB MIDI Interface");
    driver.refresh().unwrap();

    let device = driver.open("USB").unwrap();
    assert_eq!(device.index(), 3);
}
