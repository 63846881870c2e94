//! Driver settings a host application can persist.

use serde::{Deserialize, Serialize};

use crate::descriptor::Descriptor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Client name shown to the platform MIDI service.
    pub client_name: String,
    /// Compile text patterns case-insensitively.
    pub case_insensitive: bool,
    /// Descriptor text opened when the driver is built. Digits are an index.
    pub default_output: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            client_name: "midiator".to_string(),
            case_insensitive: false,
            default_output: None,
        }
    }
}

impl DriverConfig {
    pub fn default_descriptor(&self) -> Option<Descriptor> {
        self.default_output.as_deref().map(|text| match text.parse::<Descriptor>() {
            Ok(descriptor) => descriptor,
            Err(never) => match never {},
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.client_name, "midiator");
        assert!(!config.case_insensitive);
        assert_eq!(config.default_descriptor(), None);
    }

    #[test]
    fn test_default_descriptor_parsing() {
        let mut config = DriverConfig {
            default_output: Some("1".into()),
            ..Default::default()
        };
        assert_eq!(config.default_descriptor(), Some(Descriptor::Index(1)));

        config.default_output = Some("IAC".into());
        assert_eq!(
            config.default_descriptor(),
            Some(Descriptor::Pattern("IAC".into()))
        );
    }

    #[test]
    fn test_persisted_config() {
        let config = DriverConfig {
            client_name: "sequencer".into(),
            case_insensitive: true,
            default_output: Some("Device B".into()),
        };
        let bytes = bincode::serialize(&config).unwrap();
        let restored: DriverConfig = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, config);
    }
}
