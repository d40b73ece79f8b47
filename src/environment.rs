use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ffi::OsString;

/// Snapshot of the variables the provisioning framework exported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    /// Variables present in the process but not valid UTF-8
    invalid: BTreeSet<String>,
}

impl Environment {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Build an environment from raw OS strings
    ///
    /// A variable whose value is not valid UTF-8 is left out and remembered as invalid.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut env = Self::default();

        for (name, value) in vars {
            let name = match name.into_string() {
                Ok(name) => name,
                Err(name) => {
                    tracing::warn!(variable = %name.to_string_lossy(), "variable name is not valid UTF-8, ignoring it");
                    continue;
                }
            };

            match value.into_string() {
                Ok(value) => {
                    env.vars.insert(name, value);
                }
                Err(_) => {
                    tracing::warn!(variable = %name, "variable value is not valid UTF-8, ignoring it");
                    env.invalid.insert(name);
                }
            }
        }

        env
    }

    /// Build an environment from name/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            invalid: BTreeSet::new(),
        }
    }

    /// Layer defaults under the captured variables
    ///
    /// Mirrors shell `${VAR:-default}`: a default applies when the variable
    /// is unset or set to the empty string.
    pub fn with_defaults(mut self, defaults: &HashMap<String, String>) -> Self {
        for (name, value) in defaults {
            if self.invalid.contains(name) {
                continue;
            }
            let current = self.vars.entry(name.clone()).or_default();
            if current.is_empty() {
                *current = value.clone();
            }
        }
        self
    }

    /// Get a variable if it is set
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|s| s.as_str())
    }

    /// Get a variable, treating unset as empty
    pub fn resolve(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Whether the variable is present at all
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Whether the variable was set but could not be read as UTF-8
    pub fn is_invalid(&self, name: &str) -> bool {
        self.invalid.contains(name)
    }
}
