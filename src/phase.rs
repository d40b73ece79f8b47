use crate::services::ServiceCatalog;
use std::fmt;

/// Devstack lifecycle phase, the first plugin argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Source,
    Stack,
    Unstack,
    Clean,
    Other(String),
}

impl Phase {
    /// Parse a phase name; matching is exact and case-sensitive
    pub fn parse(value: &str) -> Self {
        match value {
            "source" => Phase::Source,
            "stack" => Phase::Stack,
            "unstack" => Phase::Unstack,
            "clean" => Phase::Clean,
            other => Phase::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Source => write!(f, "source"),
            Phase::Stack => write!(f, "stack"),
            Phase::Unstack => write!(f, "unstack"),
            Phase::Clean => write!(f, "clean"),
            Phase::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Step within the `stack` phase, the second plugin argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubPhase {
    PreInstall,
    Install,
    PostConfig,
    Extra,
    TestConfig,
    Other(String),
}

impl SubPhase {
    /// Parse a sub-phase name; matching is exact and case-sensitive
    pub fn parse(value: &str) -> Self {
        match value {
            "pre-install" => SubPhase::PreInstall,
            "install" => SubPhase::Install,
            "post-config" => SubPhase::PostConfig,
            "extra" => SubPhase::Extra,
            "test-config" => SubPhase::TestConfig,
            other => SubPhase::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SubPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubPhase::PreInstall => write!(f, "pre-install"),
            SubPhase::Install => write!(f, "install"),
            SubPhase::PostConfig => write!(f, "post-config"),
            SubPhase::Extra => write!(f, "extra"),
            SubPhase::TestConfig => write!(f, "test-config"),
            SubPhase::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Why an invocation did nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// First argument missing or not `stack`
    Phase(Option<String>),
    /// Second argument missing or not `test-config`
    SubPhase(Option<String>),
    /// The gating service is not enabled
    ServiceDisabled(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Phase(Some(phase)) => write!(f, "nothing to do for phase '{}'", phase),
            SkipReason::Phase(None) => write!(f, "no phase given"),
            SkipReason::SubPhase(Some(sub)) => write!(f, "nothing to do for stack sub-phase '{}'", sub),
            SkipReason::SubPhase(None) => write!(f, "no stack sub-phase given"),
            SkipReason::ServiceDisabled(service) => write!(f, "service '{}' is not enabled", service),
        }
    }
}

/// What an invocation should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ConfigureTempest,
    Skip(SkipReason),
}

/// The two positional arguments devstack passes to a plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub phase: Option<Phase>,
    pub sub_phase: Option<SubPhase>,
}

impl Invocation {
    /// Build an invocation from raw positional arguments
    pub fn from_args(phase: Option<&str>, sub_phase: Option<&str>) -> Self {
        Self {
            phase: phase.map(Phase::parse),
            sub_phase: sub_phase.map(SubPhase::parse),
        }
    }

    /// Check the positional arguments alone; `None` means `stack test-config`
    pub fn argument_skip(&self) -> Option<SkipReason> {
        match &self.phase {
            Some(Phase::Stack) => {}
            Some(phase @ (Phase::Source | Phase::Unstack | Phase::Clean | Phase::Other(_))) => {
                return Some(SkipReason::Phase(Some(phase.to_string())));
            }
            None => return Some(SkipReason::Phase(None)),
        }

        match &self.sub_phase {
            Some(SubPhase::TestConfig) => None,
            Some(
                sub @ (SubPhase::PreInstall
                | SubPhase::Install
                | SubPhase::PostConfig
                | SubPhase::Extra
                | SubPhase::Other(_)),
            ) => Some(SkipReason::SubPhase(Some(sub.to_string()))),
            None => Some(SkipReason::SubPhase(None)),
        }
    }

    /// Decide the action; only `stack test-config` with `service` enabled configures
    pub fn action(&self, services: &dyn ServiceCatalog, service: &str) -> Action {
        if let Some(reason) = self.argument_skip() {
            return Action::Skip(reason);
        }

        if services.is_enabled(service) {
            Action::ConfigureTempest
        } else {
            Action::Skip(SkipReason::ServiceDisabled(service.to_string()))
        }
    }
}
