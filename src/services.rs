use std::collections::BTreeSet;

/// Answers whether a named service is part of the deployment
pub trait ServiceCatalog {
    /// Check whether `service` is enabled
    fn is_enabled(&self, service: &str) -> bool;
}

/// Service families that devstack enables through prefixed service names
const SERVICE_FAMILIES: &[(&str, &[&str])] = &[
    ("nova", &["n-"]),
    ("glance", &["g-"]),
    ("cinder", &["c-"]),
    ("swift", &["s-"]),
    ("neutron", &["q-", "neutron-"]),
];

/// The devstack `ENABLED_SERVICES` list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledServices {
    services: BTreeSet<String>,
}

impl EnabledServices {
    /// Parse a comma-separated service list
    pub fn parse(list: &str) -> Self {
        Self {
            services: split_services(list).map(str::to_string).collect(),
        }
    }

    /// Get the enabled service names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.as_str()).collect()
    }

    fn is_single_enabled(&self, service: &str) -> bool {
        if self.services.contains(service) {
            return true;
        }

        SERVICE_FAMILIES
            .iter()
            .filter(|(family, _)| *family == service)
            .flat_map(|(_, prefixes)| prefixes.iter())
            .any(|prefix| self.services.iter().any(|s| s.starts_with(*prefix)))
    }
}

impl ServiceCatalog for EnabledServices {
    /// Several comma-separated names are enabled if any one of them is
    fn is_enabled(&self, service: &str) -> bool {
        split_services(service).any(|s| self.is_single_enabled(s))
    }
}

fn split_services(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}
