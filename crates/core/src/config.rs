//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The core never reads environment variables itself; the binary
//! reads them and hands the raw values to the `*_from_env_value` helpers below.

use crate::constants::DEFAULT_CONCEPT_SYSTEMS;
use crate::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::str::FromStr;

/// When the "now" used for status derivation is captured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClockPolicy {
    /// Each order captures its own instant.
    #[default]
    PerOrder,
    /// One instant is shared by every order in a batch, so statuses are consistent at a
    /// single point in time.
    PerBatch,
}

impl FromStr for ClockPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-order" => Ok(Self::PerOrder),
            "per-batch" => Ok(Self::PerBatch),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown clock policy '{other}' (expected per-order or per-batch)"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    /// Lowercased mapping source name to coding system URL.
    concept_systems: BTreeMap<String, String>,
    clock_policy: ClockPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            concept_systems: default_concept_systems(),
            clock_policy: ClockPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// Source names are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if any source name or system URL is blank.
    pub fn new(
        concept_systems: BTreeMap<String, String>,
        clock_policy: ClockPolicy,
    ) -> CoreResult<Self> {
        let mut normalised = BTreeMap::new();
        for (source, system) in concept_systems {
            let source = source.trim();
            let system = system.trim();
            if source.is_empty() || system.is_empty() {
                return Err(CoreError::InvalidConfig(
                    "concept source and system must be non-empty".into(),
                ));
            }
            normalised.insert(source.to_lowercase(), system.to_owned());
        }

        Ok(Self {
            concept_systems: normalised,
            clock_policy,
        })
    }

    /// Coding system URL for a concept mapping source, if configured.
    pub fn system_for_source(&self, source: &str) -> Option<&str> {
        self.concept_systems
            .get(&source.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn clock_policy(&self) -> ClockPolicy {
        self.clock_policy
    }
}

fn default_concept_systems() -> BTreeMap<String, String> {
    DEFAULT_CONCEPT_SYSTEMS
        .iter()
        .map(|(source, system)| (source.to_lowercase(), (*system).to_owned()))
        .collect()
}

/// Parse concept systems from an optional `SOURCE=URL,SOURCE=URL` value.
///
/// If `value` is `None` or empty/whitespace, returns the built-in defaults. Otherwise the
/// parsed pairs are layered over the defaults, so a deployment only lists what it adds or
/// overrides.
pub fn concept_systems_from_env_value(
    value: Option<String>,
) -> CoreResult<BTreeMap<String, String>> {
    let mut systems: BTreeMap<String, String> = DEFAULT_CONCEPT_SYSTEMS
        .iter()
        .map(|(source, system)| ((*source).to_owned(), (*system).to_owned()))
        .collect();

    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(systems);
    };

    for pair in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (source, system) = pair.split_once('=').ok_or_else(|| {
            CoreError::InvalidConfig(format!("expected SOURCE=URL, got '{pair}'"))
        })?;
        systems.insert(source.trim().to_owned(), system.trim().to_owned());
    }

    Ok(systems)
}

/// Parse the clock policy from an optional value; `None` or blank gives the default.
pub fn clock_policy_from_env_value(value: Option<String>) -> CoreResult<ClockPolicy> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.parse::<ClockPolicy>())
        .transpose()
        .map(Option::unwrap_or_default)
}
