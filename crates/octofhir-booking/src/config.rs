use octofhir_scheduling::{Identifier, ScanOptions};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "octofhir-book.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookingConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub appointment: AppointmentSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BookingConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validation
        let url = url::Url::parse(&self.server.base_url)
            .map_err(|e| format!("server.base_url is not a valid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err("server.base_url must use http or https".into());
        }
        // Appointment validation
        if self.appointment.identifier_system.trim().is_empty() {
            return Err("appointment.identifier_system must not be empty".into());
        }
        if self.appointment.identifier_value.trim().is_empty() {
            return Err("appointment.identifier_value must not be empty".into());
        }
        // Search validation
        if self.search.page_size == Some(0) {
            return Err("search.page_size must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    /// Identifier stamped on every appointment this run creates.
    pub fn identifier(&self) -> Identifier {
        Identifier::new(
            &self.appointment.identifier_system,
            &self.appointment.identifier_value,
        )
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            page_size: self.search.page_size,
        }
    }

    /// Applies command-line values on top of file and environment settings.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.base_url {
            self.server.base_url = url.clone();
        }
        if let Some(system) = &overrides.identifier_system {
            self.appointment.identifier_system = system.clone();
        }
        if let Some(value) = &overrides.identifier_value {
            self.appointment.identifier_value = value.clone();
        }
        if overrides.page_size.is_some() {
            self.search.page_size = overrides.page_size;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// FHIR base URL, e.g. `https://hapi.fhir.org/baseR4`
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://hapi.fhir.org/baseR4".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSettings {
    #[serde(default = "default_identifier_system")]
    pub identifier_system: String,
    #[serde(default = "default_identifier_value")]
    pub identifier_value: String,
}

fn default_identifier_system() -> String {
    "urn:system".to_string()
}

fn default_identifier_value() -> String {
    "12345".to_string()
}

impl Default for AppointmentSettings {
    fn default() -> Self {
        Self {
            identifier_system: default_identifier_system(),
            identifier_value: default_identifier_value(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchSettings {
    /// `_count` sent with every search; the server default applies when unset
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub identifier_system: Option<String>,
    pub identifier_value: Option<String>,
    pub page_size: Option<u32>,
    pub log_level: Option<String>,
}

pub mod loader {
    use super::{BookingConfig, ConfigOverrides, DEFAULT_CONFIG_FILE};
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Loads file settings, then `OCTOFHIR_BOOKING__*` environment overrides.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load_config(path: Option<&str>) -> Result<BookingConfig, String> {
        load_config_with_overrides(path, &ConfigOverrides::default())
    }

    pub fn load_config_with_overrides(
        path: Option<&str>,
        overrides: &ConfigOverrides,
    ) -> Result<BookingConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if !pathbuf.exists() {
                    return Err(format!("config file not found: {p}"));
                }
                builder = builder.add_source(File::from(pathbuf));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., OCTOFHIR_BOOKING__SEARCH__PAGE_SIZE=50
        builder = builder.add_source(
            Environment::with_prefix("OCTOFHIR_BOOKING")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let mut merged: BookingConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.apply(overrides);
        merged.validate()?;
        Ok(merged)
    }
}
