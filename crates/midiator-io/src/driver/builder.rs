//! MidiDriver builder.

#[cfg(feature = "midi-io")]
use crate::backend::MidirBackend;
use crate::backend::MidiBackend;
use crate::descriptor::Descriptor;
use crate::error::Result;

use super::{DriverConfig, MidiDriver};

#[derive(Debug, Clone, Default)]
pub struct MidiDriverBuilder {
    pub(super) config: DriverConfig,
    pub(super) initial_output: Option<Descriptor>,
}

impl MidiDriverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all settings at once, e.g. with a loaded config.
    pub fn config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.config.client_name = name.into();
        self
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.config.case_insensitive = case_insensitive;
        self
    }

    /// Descriptor text to open on build. Stored in the config.
    pub fn default_output(mut self, descriptor: impl Into<String>) -> Self {
        self.config.default_output = Some(descriptor.into());
        self
    }

    /// Open this output on build. Takes precedence over `default_output`.
    pub fn open(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.initial_output = Some(descriptor.into());
        self
    }

    /// Build on midir.
    #[cfg(feature = "midi-io")]
    pub fn build(self) -> Result<MidiDriver<MidirBackend>> {
        let backend = MidirBackend::new(self.config.client_name.clone());
        self.build_with(backend)
    }

    pub fn build_with<B: MidiBackend>(self, backend: B) -> Result<MidiDriver<B>> {
        let initial = self
            .initial_output
            .or_else(|| self.config.default_descriptor());

        let mut driver = MidiDriver::with_config(backend, self.config)?;
        if let Some(descriptor) = initial {
            driver.open(descriptor)?;
        }
        Ok(driver)
    }
}
