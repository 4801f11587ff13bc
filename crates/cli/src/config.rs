//! Deployment configuration.
//!
//! The tool ships with the production constants compiled in. A JSON config
//! file can override them per deployment, and command-line flags override
//! both (flag > file > default).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw printer endpoint used in production.
pub(crate) const DEFAULT_PRINTER_ADDR: &str = "192.168.178.241:9100";
/// EZPL template file, resolved relative to the working directory.
pub(crate) const DEFAULT_TEMPLATE: &str = "package2.prn";
/// Password file for the provisioning service.
pub(crate) const DEFAULT_PASSWORD_FILE: &str = "staging-password.txt";

/// Optional JSON config file overriding the compiled-in deployment defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ToolConfig {
    /// Printer `host[:port]`.
    pub(crate) printer_addr: Option<String>,
    /// Provisioning endpoint URL.
    pub(crate) provision_url: Option<String>,
    /// Basic-auth username for the provisioning service.
    pub(crate) provision_user: Option<String>,
    /// Path to the provisioning password file.
    pub(crate) password_file: Option<PathBuf>,
    /// Path to the EZPL template.
    pub(crate) template: Option<PathBuf>,
}

/// Load and parse a config file.
pub(crate) fn load(path: &Path) -> Result<ToolConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))
}

/// Effective settings after merging flags, config file, and defaults.
#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) printer_addr: String,
    pub(crate) provision_url: String,
    pub(crate) provision_user: String,
    pub(crate) password_file: PathBuf,
    pub(crate) template: PathBuf,
}

impl Settings {
    pub(crate) fn resolve(
        printer_flag: Option<&str>,
        template_flag: Option<&Path>,
        config: ToolConfig,
    ) -> Self {
        Self {
            printer_addr: printer_flag
                .map(str::to_string)
                .or(config.printer_addr)
                .unwrap_or_else(|| DEFAULT_PRINTER_ADDR.to_string()),
            provision_url: config
                .provision_url
                .unwrap_or_else(|| warp_label_provision::DEFAULT_ENDPOINT.to_string()),
            provision_user: config
                .provision_user
                .unwrap_or_else(|| warp_label_provision::DEFAULT_USERNAME.to_string()),
            password_file: config
                .password_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PASSWORD_FILE)),
            template: template_flag
                .map(Path::to_path_buf)
                .or(config.template)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config() {
        let settings = Settings::resolve(None, None, ToolConfig::default());
        assert_eq!(settings.printer_addr, DEFAULT_PRINTER_ADDR);
        assert_eq!(settings.provision_url, warp_label_provision::DEFAULT_ENDPOINT);
        assert_eq!(settings.provision_user, "staging");
        assert_eq!(settings.password_file, PathBuf::from(DEFAULT_PASSWORD_FILE));
        assert_eq!(settings.template, PathBuf::from(DEFAULT_TEMPLATE));
    }

    #[test]
    fn flags_override_config_values() {
        let config = ToolConfig {
            printer_addr: Some("printer01.local:9100".to_string()),
            template: Some(PathBuf::from("from-config.prn")),
            ..ToolConfig::default()
        };
        let settings =
            Settings::resolve(Some("10.0.0.7"), Some(Path::new("from-flag.prn")), config);
        assert_eq!(settings.printer_addr, "10.0.0.7");
        assert_eq!(settings.template, PathBuf::from("from-flag.prn"));
    }

    #[test]
    fn config_overrides_defaults() {
        let config = ToolConfig {
            provision_url: Some("https://staging.example/warpsn".to_string()),
            provision_user: Some("ops".to_string()),
            password_file: Some(PathBuf::from("/etc/warp-label/password")),
            ..ToolConfig::default()
        };
        let settings = Settings::resolve(None, None, config);
        assert_eq!(settings.provision_url, "https://staging.example/warpsn");
        assert_eq!(settings.provision_user, "ops");
        assert_eq!(
            settings.password_file,
            PathBuf::from("/etc/warp-label/password")
        );
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "printer": "typo" }"#).unwrap();

        assert!(load(&path).is_err());
    }
}
