use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jmsit_core::{
    CommandSpec, DEFAULT_SHIM_TIMEOUT, Role, ShimHandle, SkipRule, SkipRules,
    SubprocessShim,
};
use jmsit_model::MessageKind;
use serde::Deserialize;

use crate::validation::{
    ConfigGuardRailError, ConfigWarnings, apply_guard_rails,
};

/// Where the shim registry was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShimRegistrySource {
    Cli(PathBuf),
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
    TestHome(PathBuf),
}

/// On-disk shim registry.
///
/// ```toml
/// timeout = "10s"
/// broker_probe = ["qpid-broker-props"]
///
/// [[shim]]
/// name = "ProtonPython"
/// sender = ["python", "shims/qpid-proton-python/src/JmsSenderShim.py"]
/// receiver = ["python", "shims/qpid-proton-python/src/JmsReceiverShim.py"]
///
/// [[skip]]
/// kind = "JMS_STREAMMESSAGE_TYPE"
/// broker = "qpid-cpp"
/// reason = "QPID-1234"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShimRegistryConfig {
    /// Per-process deadline for one case, in humantime notation.
    #[serde(default = "default_timeout", with = "humantime_duration")]
    pub timeout: Duration,
    /// Command printing broker connection properties as JSON; the broker
    /// address is appended.
    #[serde(default)]
    pub broker_probe: Option<Vec<String>>,
    #[serde(default, rename = "shim")]
    pub shims: Vec<ShimConfig>,
    #[serde(default, rename = "skip")]
    pub skips: Vec<SkipConfig>,
}

impl Default for ShimRegistryConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SHIM_TIMEOUT,
            broker_probe: None,
            shims: Vec::new(),
            skips: Vec::new(),
        }
    }
}

fn default_timeout() -> Duration {
    DEFAULT_SHIM_TIMEOUT
}

/// Argv prefixes for one client library; shim arguments are appended.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShimConfig {
    pub name: String,
    pub sender: Vec<String>,
    pub receiver: Vec<String>,
}

impl ShimConfig {
    pub fn new(
        name: impl Into<String>,
        sender: Vec<String>,
        receiver: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sender,
            receiver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkipConfig {
    /// Wire name, e.g. `JMS_MAPMESSAGE_TYPE`.
    pub kind: String,
    /// Broker product as reported by the probe.
    pub broker: String,
    pub reason: String,
}

/// Validated registry, ready to hand to the suite driver.
#[derive(Debug, Clone)]
pub struct ShimRegistry {
    pub shims: Vec<SubprocessShim>,
    pub skips: SkipRules,
    pub broker_probe: Option<CommandSpec>,
    pub timeout: Duration,
    pub warnings: ConfigWarnings,
}

impl ShimRegistry {
    pub fn handles(&self) -> Vec<Arc<dyn ShimHandle>> {
        self.shims
            .iter()
            .cloned()
            .map(|shim| Arc::new(shim) as Arc<dyn ShimHandle>)
            .collect()
    }
}

impl ShimRegistryConfig {
    pub fn into_registry(self) -> Result<ShimRegistry, ConfigGuardRailError> {
        let warnings = apply_guard_rails(&self)?;

        let shims = self
            .shims
            .into_iter()
            .map(|shim| {
                let sender = command(&shim.name, Role::Sender, shim.sender)?;
                let receiver =
                    command(&shim.name, Role::Receiver, shim.receiver)?;
                Ok(SubprocessShim::new(shim.name, sender, receiver))
            })
            .collect::<Result<Vec<_>, ConfigGuardRailError>>()?;

        let skips = self
            .skips
            .into_iter()
            .map(|skip| {
                let kind = skip.kind.parse::<MessageKind>().map_err(|source| {
                    ConfigGuardRailError::UnknownSkipKind {
                        kind: skip.kind.clone(),
                        source,
                    }
                })?;
                Ok(SkipRule::new(kind, skip.broker, skip.reason))
            })
            .collect::<Result<Vec<_>, ConfigGuardRailError>>()?;

        let broker_probe = match self.broker_probe {
            Some(argv) => Some(
                CommandSpec::from_argv(argv)
                    .ok_or(ConfigGuardRailError::EmptyProbeCommand)?,
            ),
            None => None,
        };

        Ok(ShimRegistry {
            shims,
            skips: SkipRules::new(skips),
            broker_probe,
            timeout: self.timeout,
            warnings,
        })
    }
}

fn command(
    shim: &str,
    role: Role,
    argv: Vec<String>,
) -> Result<CommandSpec, ConfigGuardRailError> {
    CommandSpec::from_argv(argv).ok_or_else(|| {
        ConfigGuardRailError::EmptyCommand {
            shim: shim.to_string(),
            role,
        }
    })
}

mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn toml_registry_parses_with_defaults() {
        let config: ShimRegistryConfig = toml::from_str(
            r#"
            [[shim]]
            name = "ProtonCpp"
            sender = ["/opt/shims/JmsSender"]
            receiver = ["/opt/shims/JmsReceiver"]
            "#,
        )
        .expect("parse");

        assert_eq!(config.timeout, DEFAULT_SHIM_TIMEOUT);
        assert_eq!(config.broker_probe, None);
        assert_eq!(config.shims.len(), 1);
    }

    #[test]
    fn humantime_timeout_and_skips_convert() {
        let config: ShimRegistryConfig = toml::from_str(
            r#"
            timeout = "1m 30s"
            broker_probe = ["broker-props", "--json"]

            [[shim]]
            name = "QpidJms"
            sender = ["java", "-cp", "cp", "Sender"]
            receiver = ["java", "-cp", "cp", "Receiver"]

            [[skip]]
            kind = "JMS_MAPMESSAGE_TYPE"
            broker = "qpid-cpp"
            reason = "QPID-1"
            "#,
        )
        .expect("parse");

        let registry = config.into_registry().expect("valid");
        assert_eq!(registry.timeout, Duration::from_secs(90));
        assert_eq!(
            registry.skips.reason_for(MessageKind::Map, "qpid-cpp"),
            Some("QPID-1")
        );
        let probe = registry.broker_probe.expect("probe");
        assert_eq!(probe.program(), "broker-props");
        assert_eq!(registry.shims[0].sender().args(), ["-cp", "cp", "Sender"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = toml::from_str::<ShimRegistryConfig>("timout = \"5s\"");
        assert!(err.is_err());
    }

    #[test]
    fn empty_argv_is_a_guard_rail_error() {
        let config = ShimRegistryConfig {
            shims: vec![ShimConfig::new("A", Vec::new(), argv(&["recv"]))],
            ..ShimRegistryConfig::default()
        };

        assert!(matches!(
            config.into_registry(),
            Err(ConfigGuardRailError::EmptyCommand { role: Role::Sender, .. })
        ));
    }

    #[test]
    fn registry_hands_out_shared_handles() {
        let config = ShimRegistryConfig {
            shims: vec![
                ShimConfig::new("A", argv(&["send"]), argv(&["recv"])),
                ShimConfig::new("B", argv(&["send"]), argv(&["recv"])),
            ],
            ..ShimRegistryConfig::default()
        };

        let handles = config.into_registry().expect("valid").handles();
        let names: Vec<_> = handles.iter().map(|h| h.name()).collect();
        assert_eq!(names, ["A", "B"]);
    }
}
