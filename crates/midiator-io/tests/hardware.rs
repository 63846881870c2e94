//! Hardware tests against a real MIDI output (e.g. macOS IAC Driver, ALSA `snd-virmidi`).
//!
//! All tests are `#[ignore]` so CI doesn't fail without hardware.
//!
//! Run with:
//!   MIDIATOR_TEST_OUTPUT=IAC cargo test -p midiator-io --test hardware -- --ignored --test-threads=1

#![cfg(feature = "midi-io")]

use midiator_io::{Error, MidiBackend, MidiDriver, MidirBackend};

/// Pattern for the output under test.
fn output_pattern() -> String {
    std::env::var("MIDIATOR_TEST_OUTPUT").unwrap_or_else(|_| "IAC".to_string())
}

fn setup() -> MidiDriver<MidirBackend> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    MidiDriver::builder()
        .client_name("midiator-hardware-test")
        .case_insensitive(true)
        .build()
        .expect("MIDI platform unavailable")
}

#[test]
#[ignore]
fn test_list_outputs() {
    let midi = setup();
    let names: Vec<_> = midi.descriptions().collect();
    assert!(
        !names.is_empty(),
        "No MIDI outputs found. Enable a loopback device first"
    );
}

#[test]
#[ignore]
fn test_open_send_close() {
    let mut midi = setup();
    midi.open(output_pattern())
        .expect("Test output not found. Set MIDIATOR_TEST_OUTPUT");

    midi.message(&[0x90, 0x3C, 0x64]).unwrap();
    midi.message(&[0x80, 0x3C, 0x00]).unwrap();

    let handle = midi.current_device().unwrap().handle().clone();
    assert!(midi.backend().is_open(&handle));

    midi.close().unwrap();
    assert!(!midi.backend().is_open(&handle));
    assert!(matches!(midi.message(&[0xF8]), Err(Error::NotReady)));
}

#[test]
#[ignore]
fn test_reopen_keeps_connection() {
    let mut midi = setup();
    let first = midi.open(output_pattern()).unwrap().clone();
    let second = midi.open(first.index()).unwrap().clone();
    assert!(first.is_same_device(&second));
    midi.message(&[0xB0, 0x7B, 0x00]).unwrap();
}
