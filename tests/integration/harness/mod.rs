use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of one run of the hook binary
pub struct HookResult {
    pub output: Output,
}

impl HookResult {
    pub fn success(&self) -> bool {
        self.output.status.success()
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }
}

/// Runs the hook binary in a scratch directory with a controlled environment
pub struct DevstackRunner {
    dir: TempDir,
    env: HashMap<String, String>,
}

impl DevstackRunner {
    /// Create a runner with tempest enabled and TEMPEST_CONFIG pointing into the scratch dir
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut runner = Self {
            dir,
            env: HashMap::new(),
        };
        let conf = runner.tempest_conf();
        runner.set("TEMPEST_CONFIG", conf.display().to_string());
        runner.set("ENABLED_SERVICES", "key,mysql,n-api,n-cpu,tempest");
        runner
    }

    /// Scratch directory the binary runs in
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Default destination file
    pub fn tempest_conf(&self) -> PathBuf {
        self.dir.path().join("tempest.conf")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.env.insert(name.to_string(), value.into());
        self
    }

    pub fn unset(&mut self, name: &str) -> &mut Self {
        self.env.remove(name);
        self
    }

    /// Write a file into the scratch directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    /// Contents of the destination file, if it exists
    pub fn read_conf(&self) -> Option<String> {
        fs::read_to_string(self.tempest_conf()).ok()
    }

    /// Run the binary with the given arguments
    pub fn run(&self, args: &[&str]) -> HookResult {
        let output = Command::new(env!("CARGO_BIN_EXE_whitebox-devstack"))
            .args(args)
            .env_clear()
            .envs(&self.env)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run whitebox-devstack");

        HookResult { output }
    }
}

/// Minimal ini reader for checking results
pub fn ini_get(content: &str, section: &str, key: &str) -> Option<String> {
    let mut current = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            current = Some(trimmed[1..trimmed.len() - 1].trim().to_string());
            continue;
        }
        if current.as_deref() != Some(section) {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            if k.trim() == key {
                return Some(v.trim_start().to_string());
            }
        }
    }

    None
}

/// Environment setting every variable the hook reads
pub fn full_environment() -> Vec<(&'static str, &'static str)> {
    vec![
        ("STACK_USER", "stack"),
        ("WHITEBOX_PRIVKEY_PATH", "/opt/stack/.ssh/id_rsa"),
        ("MAX_COMPUTE_NODES", "2"),
        ("WHITEBOX_AVAILABLE_CINDER_STORAGE", "24"),
        ("SMT_HOSTS", "compute-0 compute-1"),
        ("WHITEBOX_FILE_BACKED_MEMORY_SIZE", "8192"),
        ("WHITEBOX_CPU_MODEL", "Haswell-noTSX"),
        ("WHITEBOX_CPU_MODEL_EXTRA_FLAGS", "vme,+ssse3,-mmx"),
        ("WHITEBOX_RX_QUEUE_SIZE", "1024"),
        ("WHITEBOX_NOVA_COMPUTE_CONFIG_PATH", "/etc/nova/nova-cpu.conf"),
        ("WHITEBOX_NOVA_COMPUTE_STOP_COMMAND", "systemctl stop devstack@n-cpu"),
        ("WHITEBOX_NOVA_COMPUTE_START_COMMAND", "systemctl start devstack@n-cpu"),
        ("WHITEBOX_LIBVIRT_START_COMMAND", "systemctl start libvirtd"),
        ("WHITEBOX_LIBVIRT_STOP_COMMAND", "systemctl stop libvirtd"),
        ("WHITEBOX_LIBVIRT_MASK_COMMAND", "systemctl mask libvirtd"),
        ("WHITEBOX_LIBVIRT_UNMASK_COMMAND", "systemctl unmask libvirtd"),
        ("DATABASE_USER", "root"),
        ("DATABASE_PASSWORD", "secretdatabase"),
        ("DATABASE_HOST", "10.0.0.10"),
        ("WHITEBOX_CPU_TOPOLOGY", "0: [0,1,2,3], 1: [4,5,6,7]"),
        ("COMPUTE_FEATURE_VIRTIO_RNG", "True"),
        ("COMPUTE_FEATURE_RBD_DOWNLOAD", "False"),
    ]
}
