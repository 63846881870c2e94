//! List MIDI outputs, optionally sending a middle C to one of them.
//!
//!   cargo run -p midiator-io --example list_outputs
//!   cargo run -p midiator-io --example list_outputs -- "IAC"

use midiator_io::{Descriptor, MidiDriver};
use std::thread;
use std::time::Duration;

fn main() -> midiator_io::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut midi = MidiDriver::builder().client_name("list-outputs").build()?;

    println!("=== MIDI Output Devices ===");
    if midi.descriptions().len() == 0 {
        println!("  (none found)");
    }
    for (i, name) in midi.descriptions().enumerate() {
        println!("  [{}] {}", i, name);
    }

    let Some(arg) = std::env::args().nth(1) else {
        return Ok(());
    };
    let descriptor = match arg.parse::<Descriptor>() {
        Ok(descriptor) => descriptor,
        Err(never) => match never {},
    };

    let device = midi.open(descriptor)?;
    println!("\nSending middle C to '{}'", device.description());

    midi.message(&[0x90, 0x3C, 0x64])?;
    thread::sleep(Duration::from_millis(500));
    midi.message(&[0x80, 0x3C, 0x00])?;
    midi.close()
}
