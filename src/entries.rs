use serde::Serialize;
use std::fmt;

/// When an entry is written to the destination file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteRule {
    /// Written on every run, as the empty string if the variable is unset
    Always,
    /// Omitted from the file entirely when the value is empty
    WhenNonEmpty,
}

impl fmt::Display for WriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteRule::Always => write!(f, "always"),
            WriteRule::WhenNonEmpty => write!(f, "when non-empty"),
        }
    }
}

/// A single tempest.conf setting and the environment variable that feeds it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub section: &'static str,
    pub key: &'static str,
    pub variable: &'static str,
    pub rule: WriteRule,
}

impl ConfigEntry {
    const fn always(section: &'static str, key: &'static str, variable: &'static str) -> Self {
        Self {
            section,
            key,
            variable,
            rule: WriteRule::Always,
        }
    }

    const fn when_non_empty(section: &'static str, key: &'static str, variable: &'static str) -> Self {
        Self {
            section,
            key,
            variable,
            rule: WriteRule::WhenNonEmpty,
        }
    }

    /// Whether the value should be hidden when shown to a user
    pub fn is_secret(&self) -> bool {
        self.key == "password"
    }
}

/// Every setting written into tempest.conf, in write order
pub const ENTRIES: &[ConfigEntry] = &[
    ConfigEntry::always("whitebox", "ctlplane_ssh_username", "STACK_USER"),
    ConfigEntry::always("whitebox", "ctlplane_ssh_private_key_path", "WHITEBOX_PRIVKEY_PATH"),
    ConfigEntry::always("whitebox", "max_compute_nodes", "MAX_COMPUTE_NODES"),
    ConfigEntry::always("whitebox", "available_cinder_storage", "WHITEBOX_AVAILABLE_CINDER_STORAGE"),
    ConfigEntry::when_non_empty("whitebox-hardware", "smt_hosts", "SMT_HOSTS"),
    ConfigEntry::always("whitebox", "file_backed_memory_size", "WHITEBOX_FILE_BACKED_MEMORY_SIZE"),
    ConfigEntry::always("whitebox", "cpu_model", "WHITEBOX_CPU_MODEL"),
    ConfigEntry::always("whitebox", "cpu_model_extra_flags", "WHITEBOX_CPU_MODEL_EXTRA_FLAGS"),
    ConfigEntry::always("whitebox", "rx_queue_size", "WHITEBOX_RX_QUEUE_SIZE"),
    ConfigEntry::always("whitebox-nova-compute", "config_path", "WHITEBOX_NOVA_COMPUTE_CONFIG_PATH"),
    ConfigEntry::always("whitebox-nova-compute", "stop_command", "WHITEBOX_NOVA_COMPUTE_STOP_COMMAND"),
    ConfigEntry::always("whitebox-nova-compute", "start_command", "WHITEBOX_NOVA_COMPUTE_START_COMMAND"),
    ConfigEntry::always("whitebox-libvirt", "start_command", "WHITEBOX_LIBVIRT_START_COMMAND"),
    ConfigEntry::always("whitebox-libvirt", "stop_command", "WHITEBOX_LIBVIRT_STOP_COMMAND"),
    ConfigEntry::always("whitebox-libvirt", "mask_command", "WHITEBOX_LIBVIRT_MASK_COMMAND"),
    ConfigEntry::always("whitebox-libvirt", "unmask_command", "WHITEBOX_LIBVIRT_UNMASK_COMMAND"),
    ConfigEntry::always("whitebox-database", "user", "DATABASE_USER"),
    ConfigEntry::always("whitebox-database", "password", "DATABASE_PASSWORD"),
    ConfigEntry::always("whitebox-database", "host", "DATABASE_HOST"),
    ConfigEntry::always("whitebox-hardware", "cpu_topology", "WHITEBOX_CPU_TOPOLOGY"),
    ConfigEntry::always("compute-feature-enabled", "virtio_rng", "COMPUTE_FEATURE_VIRTIO_RNG"),
    ConfigEntry::always("compute-feature-enabled", "rbd_download", "COMPUTE_FEATURE_RBD_DOWNLOAD"),
];
