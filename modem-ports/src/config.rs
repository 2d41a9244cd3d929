//! Configuration management for modem-ports.
//!
//! The defaults reproduce the fixed values the tool has always used: scan
//! `/dev` for `tty.usbmodem` entries and open them at 115200 baud with a
//! one-second read timeout. A JSON file named by `MODEM_PORTS_CONFIG` and
//! per-field environment variables can override them.

use crate::error::{Error, Result};
use crate::tracing::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DEVICE_DIR: &str = "/dev";
pub const DEFAULT_MARKER: &str = "tty.usbmodem";
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1_000;

const CONFIG_VAR: &str = "MODEM_PORTS_CONFIG";
const DIR_VAR: &str = "MODEM_PORTS_DIR";
const MARKERS_VAR: &str = "MODEM_PORTS_MARKERS";
const BAUD_VAR: &str = "MODEM_PORTS_BAUD";
const TIMEOUT_VAR: &str = "MODEM_PORTS_TIMEOUT_MS";

/// Where to look for devices and how to open them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PortConfig {
    /// Directory scanned for device entries
    pub device_dir: PathBuf,

    /// A name is a candidate if it contains any of these
    pub markers: Vec<String>,

    pub baud_rate: u32,

    /// Read timeout applied to opened handles, in milliseconds
    pub read_timeout_ms: u64,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            device_dir: PathBuf::from(DEFAULT_DEVICE_DIR),
            markers: vec![DEFAULT_MARKER.to_string()],
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl PortConfig {
    /// Load configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}.", path.display());
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the environment.
    ///
    /// Starts from the file named by `MODEM_PORTS_CONFIG`, or the defaults,
    /// then applies `MODEM_PORTS_DIR`, `MODEM_PORTS_MARKERS` (comma
    /// separated), `MODEM_PORTS_BAUD` and `MODEM_PORTS_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_VAR) {
            Some(path) => Self::load_from(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply per-field overrides looked up by variable name.
    ///
    /// Values that don't parse, empty values, and numeric values of zero are
    /// ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DIR_VAR).filter(|s| !s.is_empty()) {
            self.device_dir = PathBuf::from(dir);
        }

        if let Some(markers) = lookup(MARKERS_VAR) {
            let parsed: Vec<String> = markers
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
            if parsed.is_empty() {
                warn!("Ignoring empty {MARKERS_VAR}={markers:?}.");
            } else {
                self.markers = parsed;
            }
        }

        if let Some(baud) = lookup(BAUD_VAR) {
            match baud.parse::<u32>() {
                Ok(baud) if baud > 0 => self.baud_rate = baud,
                _ => warn!("Ignoring invalid {BAUD_VAR}={baud:?}."),
            }
        }

        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            match timeout.parse::<u64>() {
                Ok(ms) if ms > 0 => self.read_timeout_ms = ms,
                _ => warn!("Ignoring invalid {TIMEOUT_VAR}={timeout:?}."),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(Error::Config("baud_rate must be non-zero".to_string()));
        }
        if self.read_timeout_ms == 0 {
            return Err(Error::Config("read_timeout_ms must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Full path of a device entry in the device directory.
    pub fn device_path(&self, name: &str) -> PathBuf {
        self.device_dir.join(name)
    }

    /// Whether `name` contains any marker.
    pub fn is_candidate(&self, name: &str) -> bool {
        self.markers.iter().any(|marker| name.contains(marker.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use test_case::test_case;

    fn overridden(vars: &[(&str, &str)]) -> PortConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = PortConfig::default();
        config.apply_overrides(|key| vars.get(key).cloned());
        config
    }

    #[test]
    fn test_defaults() {
        let config = PortConfig::default();
        assert_eq!(config.device_dir, PathBuf::from("/dev"));
        assert_eq!(config.markers, vec!["tty.usbmodem".to_string()]);
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_device_path() {
        let config = PortConfig::default();
        assert_eq!(
            config.device_path("tty.usbmodem14101"),
            PathBuf::from("/dev/tty.usbmodem14101")
        );
    }

    #[test_case("tty.usbmodem14101", true; "usb modem")]
    #[test_case("cu.usbmodem14101", false; "callout device")]
    #[test_case("tty.Bluetooth-Incoming-Port", false; "bluetooth")]
    #[test_case("tty.usbmode", false; "truncated marker")]
    #[test_case("", false; "empty name")]
    fn test_is_candidate(name: &str, expected: bool) {
        assert_eq!(PortConfig::default().is_candidate(name), expected);
    }

    #[test]
    fn test_empty_markers_match_nothing() {
        let config = PortConfig {
            markers: Vec::new(),
            ..PortConfig::default()
        };
        assert!(!config.is_candidate("tty.usbmodem14101"));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "markers": ["ttyACM", "ttyUSB"] }}"#).unwrap();

        let config = PortConfig::load_from(file.path()).unwrap();
        assert_eq!(config.markers, vec!["ttyACM", "ttyUSB"]);
        assert_eq!(config.device_dir, PathBuf::from("/dev"));
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.read_timeout_ms, 1000);
    }

    #[test]
    fn test_load_rejects_zero_baud() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "baud_rate": 0 }}"#).unwrap();

        let err = PortConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "read_timeout_ms": 0 }}"#).unwrap();

        let err = PortConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "baud_rate = 9600").unwrap();

        let err = PortConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PortConfig::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_overrides() {
        let config = overridden(&[
            (DIR_VAR, "/tmp/devices"),
            (MARKERS_VAR, "ttyACM, ttyUSB,"),
            (BAUD_VAR, "9600"),
            (TIMEOUT_VAR, "250"),
        ]);
        assert_eq!(config.device_dir, PathBuf::from("/tmp/devices"));
        assert_eq!(config.markers, vec!["ttyACM", "ttyUSB"]);
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.read_timeout(), Duration::from_millis(250));
    }

    #[test_case(BAUD_VAR, "fast"; "unparseable baud")]
    #[test_case(BAUD_VAR, "0"; "zero baud")]
    #[test_case(TIMEOUT_VAR, "-1"; "negative timeout")]
    #[test_case(TIMEOUT_VAR, "0"; "zero timeout")]
    #[test_case(DIR_VAR, ""; "empty dir")]
    #[test_case(MARKERS_VAR, ""; "empty markers")]
    #[test_case(MARKERS_VAR, " , ,"; "only separators")]
    fn test_invalid_overrides_ignored(key: &str, value: &str) {
        assert_eq!(overridden(&[(key, value)]), PortConfig::default());
    }

    #[test]
    fn test_no_overrides() {
        assert_eq!(overridden(&[]), PortConfig::default());
    }
}
