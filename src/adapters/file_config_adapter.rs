//! INI file configuration adapter.
//!
//! Values can be overridden from the environment as `{PREFIX}_{SECTION}_{KEY}`
//! (upper-cased), e.g. `TRADEVIEW_SESSION_SECRET`. Only keys present in the
//! file can be overridden, so `secret =` must appear under `[session]` for
//! `TRADEVIEW_SESSION_SECRET` to take effect.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::collections::HashMap;
use std::path::Path;

pub const ENV_PREFIX: &str = "TRADEVIEW";

pub struct FileConfigAdapter {
    config: Ini,
    overrides: HashMap<(String, String), String>,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self::with_ini(config))
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self::with_ini(config))
    }

    fn with_ini(config: Ini) -> Self {
        Self {
            config,
            overrides: HashMap::new(),
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self, prefix: &str) -> Self {
        self.with_overrides(prefix, std::env::vars())
    }

    /// Apply overrides from `vars` for every section and key already present in
    /// the file. Variables naming unknown keys are ignored.
    pub fn with_overrides<I>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        for (section, keys) in self.config.get_map_ref() {
            for key in keys.keys() {
                let name = format!("{prefix}_{section}_{key}").to_uppercase();
                if let Some(value) = vars.get(&name) {
                    tracing::debug!(variable = %name, "config value overridden from environment");
                    self.overrides
                        .insert((section.clone(), key.clone()), value.clone());
                }
            }
        }
        self
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        let lookup = (section.to_lowercase(), key.to_lowercase());
        match self.overrides.get(&lookup) {
            Some(value) => Some(value.clone()),
            None => self.config.get(section, key),
        }
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}
