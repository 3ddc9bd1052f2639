//! On-disk JSON session configuration (spec.md §6).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NtripError, Result};
use crate::ntrip::SessionConfig;

fn default_zero() -> f64 {
    0.0
}

/// Mirrors the JSON object fields verbatim, including their ALL-CAPS
/// names, so the file on disk matches spec.md §6's config-file contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "NTRIP_CASTER")]
    pub ntrip_caster: String,
    #[serde(rename = "NTRIP_PORT")]
    pub ntrip_port: u16,
    #[serde(rename = "MOUNTPOINT")]
    pub mountpoint: String,
    #[serde(rename = "USERNAME")]
    pub username: String,
    #[serde(rename = "PASSWORD")]
    pub password: String,
    #[serde(rename = "LATITUDE", default = "default_zero")]
    pub latitude: f64,
    #[serde(rename = "LONGITUDE", default = "default_zero")]
    pub longitude: f64,
}

impl ConfigFile {
    /// Loads and parses `path`, per spec.md §7 "Config missing or
    /// invalid" being fatal at start.
    pub fn load(path: &Path) -> Result<ConfigFile> {
        let text = fs::read_to_string(path)
            .map_err(|e| NtripError::ConfigInvalid(format!("{}: {}", path.display(), e)))?;
        let config: ConfigFile = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Writes a template config file with placeholder values, for the
    /// CLI's `-g` option.
    pub fn write_template(path: &Path) -> Result<()> {
        let template = ConfigFile {
            ntrip_caster: "caster.example.org".to_string(),
            ntrip_port: 2101,
            mountpoint: "MOUNTPOINT".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };
        let text = serde_json::to_string_pretty(&template)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            caster_host: self.ntrip_caster.clone(),
            caster_port: self.ntrip_port,
            mountpoint: self.mountpoint.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            rover_lat_deg: self.latitude,
            rover_lon_deg: self.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_expected_json_shape() {
        let json = r#"{
            "NTRIP_CASTER": "rtk2go.com",
            "NTRIP_PORT": 2101,
            "MOUNTPOINT": "TEST",
            "USERNAME": "u",
            "PASSWORD": "p",
            "LATITUDE": 52.1,
            "LONGITUDE": 5.0
        }"#;
        let config: ConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(config.ntrip_caster, "rtk2go.com");
        assert_eq!(config.ntrip_port, 2101);
        assert_eq!(config.latitude, 52.1);
    }

    #[test]
    fn latitude_longitude_default_to_zero() {
        let json = r#"{
            "NTRIP_CASTER": "rtk2go.com",
            "NTRIP_PORT": 2101,
            "MOUNTPOINT": "TEST",
            "USERNAME": "u",
            "PASSWORD": "p"
        }"#;
        let config: ConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(config.latitude, 0.0);
        assert_eq!(config.longitude, 0.0);
    }

    #[test]
    fn round_trips_through_session_config() {
        let config = ConfigFile {
            ntrip_caster: "host".into(),
            ntrip_port: 2101,
            mountpoint: "MNT".into(),
            username: "u".into(),
            password: "p".into(),
            latitude: 1.0,
            longitude: 2.0,
        };
        let session = config.to_session_config();
        assert_eq!(session.caster_host, "host");
        assert_eq!(session.mountpoint, "MNT");
    }

    #[test]
    fn missing_file_is_config_invalid() {
        let err = ConfigFile::load(Path::new("/nonexistent/path/config.json")).unwrap_err();
        assert!(matches!(err, NtripError::ConfigInvalid(_)));
    }
}
