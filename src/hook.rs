use crate::config::Config;
use crate::environment::Environment;
use crate::materializer::{Materializer, Report};
use crate::phase::{Action, Invocation, SkipReason};
use crate::services::ServiceCatalog;
use eyre::{ContextCompat, Result};
use std::path::PathBuf;

/// Result of one plugin invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Configured { destination: PathBuf, report: Report },
    Skipped(SkipReason),
}

/// Inputs of one plugin invocation
pub struct Hook<'a> {
    pub invocation: Invocation,
    pub services: &'a dyn ServiceCatalog,
    pub config: &'a Config,
    /// Destination from the command line or TEMPEST_CONFIG
    pub destination: Option<PathBuf>,
    pub dry_run: bool,
}

impl Hook<'_> {
    /// Decide what the invocation means and carry it out
    pub fn run(&self, env: Environment) -> Result<Outcome> {
        let service = self.config.service();

        match self.invocation.action(self.services, service) {
            Action::Skip(reason) => {
                tracing::info!(%reason, "skipping tempest configuration");
                Ok(Outcome::Skipped(reason))
            }
            Action::ConfigureTempest => {
                let destination = self
                    .destination
                    .clone()
                    .or_else(|| self.config.tempest_config.clone())
                    .context("No tempest config path: set TEMPEST_CONFIG or pass --tempest-config")?;

                tracing::info!(path = %destination.display(), service, "configuring tempest");

                let env = env.with_defaults(&self.config.defaults);
                let report = Materializer::new().materialize(&destination, &env, self.dry_run)?;

                Ok(Outcome::Configured { destination, report })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::IniFile;
    use crate::services::EnabledServices;
    use tempfile::TempDir;

    fn hook<'a>(
        args: (Option<&str>, Option<&str>),
        services: &'a EnabledServices,
        config: &'a Config,
        destination: Option<PathBuf>,
    ) -> Hook<'a> {
        Hook {
            invocation: Invocation::from_args(args.0, args.1),
            services,
            config,
            destination,
            dry_run: false,
        }
    }

    #[test]
    fn test_skipped_invocations_do_not_touch_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempest.conf");
        let config = Config::default();
        let enabled = EnabledServices::parse("tempest");
        let disabled = EnabledServices::parse("horizon");

        let cases = [
            ((Some("unstack"), Some("test-config")), &enabled),
            ((Some("stack"), Some("post-config")), &enabled),
            ((Some("stack"), Some("install")), &disabled),
            ((Some("stack"), Some("test-config")), &disabled),
            ((None, None), &enabled),
        ];

        for (args, services) in cases {
            let outcome = hook(args, services, &config, Some(path.clone()))
                .run(Environment::from_vars([("MAX_COMPUTE_NODES", "3")]))
                .unwrap();
            assert!(matches!(outcome, Outcome::Skipped(_)), "{:?} should skip", args);
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_configures_and_applies_config_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempest.conf");
        let services = EnabledServices::parse("mysql,tempest");
        let config = Config {
            tempest_config: Some(path.clone()),
            ..Config::devstack()
        };

        let outcome = hook((Some("stack"), Some("test-config")), &services, &config, None)
            .run(Environment::from_vars([("MAX_COMPUTE_NODES", "2"), ("STACK_USER", "stack")]))
            .unwrap();

        let Outcome::Configured { destination, report } = outcome else {
            panic!("expected tempest to be configured");
        };
        assert_eq!(destination, path);
        assert!(report.changed);

        let ini = IniFile::open(&path).unwrap();
        assert_eq!(ini.get("whitebox", "max_compute_nodes"), Some("2"));
        assert_eq!(ini.get("whitebox", "ctlplane_ssh_username"), Some("stack"));
        assert_eq!(ini.get("whitebox", "cpu_model"), Some("Nehalem"));
        assert_eq!(ini.get("whitebox-libvirt", "mask_command"), Some("systemctl mask libvirtd"));
    }

    #[test]
    fn test_explicit_destination_wins_over_config() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("explicit.conf");
        let configured = dir.path().join("configured.conf");
        let services = EnabledServices::parse("tempest");
        let config = Config {
            tempest_config: Some(configured.clone()),
            ..Config::default()
        };

        hook((Some("stack"), Some("test-config")), &services, &config, Some(explicit.clone()))
            .run(Environment::default())
            .unwrap();

        assert!(explicit.exists());
        assert!(!configured.exists());
    }

    #[test]
    fn test_missing_destination_is_an_error() {
        let services = EnabledServices::parse("tempest");
        let config = Config::default();

        let err = hook((Some("stack"), Some("test-config")), &services, &config, None)
            .run(Environment::default())
            .unwrap_err();

        assert!(err.to_string().contains("TEMPEST_CONFIG"));
    }

    #[test]
    fn test_config_service_overrides_gate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempest.conf");
        let services = EnabledServices::parse("tempest");
        let config = Config {
            service: Some("whitebox".to_string()),
            ..Config::default()
        };

        let outcome = hook((Some("stack"), Some("test-config")), &services, &config, Some(path))
            .run(Environment::default())
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::ServiceDisabled("whitebox".to_string()))
        );
    }
}
