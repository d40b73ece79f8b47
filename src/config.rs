use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Service whose enablement gates the tempest configuration step
pub const DEFAULT_SERVICE: &str = "tempest";

/// Settings for a provisioning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base configuration to extend from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Service that must be enabled for tempest.conf to be written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Destination used when TEMPEST_CONFIG is not given
    #[serde(rename = "tempest-config", skip_serializing_if = "Option::is_none")]
    pub tempest_config: Option<PathBuf>,
    /// Values for variables absent from the environment
    pub defaults: HashMap<String, String>,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let config_file = match config_path.cloned().or_else(Self::default_config_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        if config_file.exists() {
            Self::load_file(&config_file, &mut Vec::new())
        } else if config_path.is_some() {
            Err(eyre::eyre!("Config file not found: {}", config_file.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Load one file and its `extends` chain; `chain` holds the files already visited
    fn load_file(config_file: &Path, chain: &mut Vec<PathBuf>) -> Result<Self> {
        if chain.iter().any(|seen| seen == config_file) {
            return Err(eyre::eyre!("Configuration '{}' extends itself", config_file.display()));
        }
        chain.push(config_file.to_path_buf());

        tracing::debug!(path = %config_file.display(), "loading configuration");

        let content = fs::read_to_string(config_file)
            .with_context(|| format!("Failed to read config file: {}", config_file.display()))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_file.display()))?;

        // Handle extends
        if let Some(base_name) = &config.extends {
            let base_config = Self::load_base_config(base_name, config_file, chain)?;
            config = config.merge_with_base(base_config);
        }

        Ok(config)
    }

    /// Load a base configuration by name
    fn load_base_config(base_name: &str, current_config_path: &Path, chain: &mut Vec<PathBuf>) -> Result<Self> {
        match base_name {
            "default" => Ok(Self::default()),
            "devstack" => Ok(Self::devstack()),
            _ => {
                // Try to load as a file path relative to current config
                let base_path = if Path::new(base_name).is_absolute() {
                    PathBuf::from(base_name)
                } else {
                    current_config_path
                        .parent()
                        .unwrap_or_else(|| Path::new("."))
                        .join(base_name)
                };

                if base_path.exists() {
                    Self::load_file(&base_path, chain)
                } else {
                    Err(eyre::eyre!("Base configuration '{}' not found", base_name))
                }
            }
        }
    }

    /// Merge this configuration with a base configuration
    fn merge_with_base(mut self, base: Self) -> Self {
        let mut merged_defaults = base.defaults;
        merged_defaults.extend(self.defaults);
        self.defaults = merged_defaults;

        if self.service.is_none() {
            self.service = base.service;
        }
        if self.tempest_config.is_none() {
            self.tempest_config = base.tempest_config;
        }

        self
    }

    /// Get the default configuration file path, if one can be determined
    fn default_config_path() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from(".whitebox-devstack.yaml"),
            PathBuf::from(".whitebox-devstack.yml"),
            PathBuf::from("whitebox-devstack.yaml"),
        ];

        if let Some(candidate) = candidates.into_iter().find(|c| c.exists()) {
            return Some(candidate);
        }

        let config_dir = dirs::config_local_dir().or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;

        Some(config_dir.join("whitebox-devstack").join("config.yaml"))
    }

    /// The service gating the run
    pub fn service(&self) -> &str {
        self.service.as_deref().unwrap_or(DEFAULT_SERVICE)
    }

    /// Preset carrying the whitebox devstack plugin settings
    pub fn devstack() -> Self {
        let privkey = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/opt/stack"))
            .join(".ssh")
            .join("id_rsa");

        let defaults = [
            ("WHITEBOX_PRIVKEY_PATH", privkey.display().to_string()),
            ("MAX_COMPUTE_NODES", "1".to_string()),
            ("WHITEBOX_AVAILABLE_CINDER_STORAGE", "24".to_string()),
            ("WHITEBOX_FILE_BACKED_MEMORY_SIZE", "8192".to_string()),
            ("WHITEBOX_CPU_MODEL", "Nehalem".to_string()),
            ("WHITEBOX_CPU_MODEL_EXTRA_FLAGS", "vme,+ssse3,-mmx".to_string()),
            ("WHITEBOX_RX_QUEUE_SIZE", "1024".to_string()),
            ("WHITEBOX_NOVA_COMPUTE_CONFIG_PATH", "/etc/nova/nova-cpu.conf".to_string()),
            ("WHITEBOX_NOVA_COMPUTE_STOP_COMMAND", "systemctl stop devstack@n-cpu".to_string()),
            ("WHITEBOX_NOVA_COMPUTE_START_COMMAND", "systemctl start devstack@n-cpu".to_string()),
            ("WHITEBOX_LIBVIRT_START_COMMAND", "systemctl start libvirtd".to_string()),
            ("WHITEBOX_LIBVIRT_STOP_COMMAND", "systemctl stop libvirtd".to_string()),
            ("WHITEBOX_LIBVIRT_MASK_COMMAND", "systemctl mask libvirtd".to_string()),
            ("WHITEBOX_LIBVIRT_UNMASK_COMMAND", "systemctl unmask libvirtd".to_string()),
            ("COMPUTE_FEATURE_VIRTIO_RNG", "True".to_string()),
            ("COMPUTE_FEATURE_RBD_DOWNLOAD", "False".to_string()),
        ];

        Self {
            extends: None,
            service: Some(DEFAULT_SERVICE.to_string()),
            tempest_config: None,
            defaults: defaults.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extends: None,
            service: None,
            tempest_config: None,
            defaults: HashMap::new(),
        }
    }
}
