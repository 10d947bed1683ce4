use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tuning parameters forwarded to the designer command as-is.
///
/// Defaults match what the designer assumes when a value is omitted, so a
/// fresh config behaves identically to no config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignerParams {
    #[serde(default = "default_primer_min_tm")]
    pub primer_min_tm: f64,
    #[serde(default = "default_primer_opt_tm")]
    pub primer_opt_tm: f64,
    #[serde(default = "default_primer_max_tm")]
    pub primer_max_tm: f64,
    #[serde(default = "default_probe_min_tm")]
    pub probe_min_tm: f64,
    #[serde(default = "default_probe_opt_tm")]
    pub probe_opt_tm: f64,
    #[serde(default = "default_probe_max_tm")]
    pub probe_max_tm: f64,
    /// Monovalent salt concentration (mM)
    #[serde(default = "default_salt_mono")]
    pub salt_mono: f64,
    /// Divalent salt concentration (mM)
    #[serde(default = "default_salt_div")]
    pub salt_div: f64,
    /// dNTP concentration (mM)
    #[serde(default = "default_dntp_conc")]
    pub dntp_conc: f64,
}

fn default_primer_min_tm() -> f64 { 52.0 }
fn default_primer_opt_tm() -> f64 { 55.0 }
fn default_primer_max_tm() -> f64 { 58.0 }
fn default_probe_min_tm() -> f64 { 57.0 }
fn default_probe_opt_tm() -> f64 { 60.0 }
fn default_probe_max_tm() -> f64 { 63.0 }
fn default_salt_mono() -> f64 { 50.0 }
fn default_salt_div() -> f64 { 3.0 }
fn default_dntp_conc() -> f64 { 0.8 }

impl Default for DesignerParams {
    fn default() -> Self {
        Self {
            primer_min_tm: default_primer_min_tm(),
            primer_opt_tm: default_primer_opt_tm(),
            primer_max_tm: default_primer_max_tm(),
            probe_min_tm: default_probe_min_tm(),
            probe_opt_tm: default_probe_opt_tm(),
            probe_max_tm: default_probe_max_tm(),
            salt_mono: default_salt_mono(),
            salt_div: default_salt_div(),
            dntp_conc: default_dntp_conc(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Dark palette on startup; written on every toggle, last write wins
    #[serde(default)]
    pub dark_mode: bool,

    /// External command that performs the actual primer design.
    /// Receives the sequence on stdin; range and params as arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designer_command: Option<String>,

    /// Desktop notification when a design run finishes
    #[serde(default)]
    pub notifications: bool,

    /// Pass-through designer tuning parameters
    #[serde(default)]
    pub params: DesignerParams,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("primerdeck");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Path of the optional palette override file next to the config
    pub fn theme_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("primerdeck").join("theme.conf"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Drop a designer command that is all whitespace
        let mut clean_config = self.clone();
        if clean_config
            .designer_command
            .as_ref()
            .map(|c| c.trim().is_empty())
            .unwrap_or(false)
        {
            clean_config.designer_command = None;
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            dark_mode: true,
            designer_command: Some("bisulfite-design --json".to_string()),
            notifications: true,
            params: DesignerParams {
                primer_opt_tm: 56.5,
                ..DesignerParams::default()
            },
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert!(deserialized.dark_mode);
        assert_eq!(config.designer_command, deserialized.designer_command);
        assert_eq!(config.params, deserialized.params);
    }

    #[test]
    fn test_dark_mode_round_trip_defaults_off() {
        // An empty file is a valid config with the light palette
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(!config.dark_mode);
        assert_eq!(config.params, DesignerParams::default());

        // Toggling and re-reading preserves the flag
        let toggled = AppConfig {
            dark_mode: !config.dark_mode,
            ..config
        };
        let round: AppConfig = toml::from_str(&toml::to_string_pretty(&toggled).unwrap()).unwrap();
        assert!(round.dark_mode);
    }
}
