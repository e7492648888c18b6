use std::collections::HashSet;

use jmsit_core::Role;
use jmsit_model::{MessageKind, ModelError};
use thiserror::Error;

use crate::models::ShimRegistryConfig;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("shim registry defines no shims")]
    NoShims,
    #[error("shim names must not be empty")]
    EmptyShimName,
    #[error("shim '{0}' is defined more than once")]
    DuplicateShimName(String),
    #[error("shim '{shim}' has an empty {role} command")]
    EmptyCommand { shim: String, role: Role },
    #[error("shim timeout must be greater than zero")]
    ZeroTimeout,
    #[error("broker_probe must name a program")]
    EmptyProbeCommand,
    #[error("skip rule names unknown message kind '{kind}'")]
    UnknownSkipKind {
        kind: String,
        #[source]
        source: ModelError,
    },
    #[error("skip rule for {kind} has an empty broker name")]
    EmptySkipBroker { kind: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn apply_guard_rails(
    config: &ShimRegistryConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.shims.is_empty() {
        return Err(ConfigGuardRailError::NoShims);
    }
    if config.timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroTimeout);
    }

    let mut names = HashSet::new();
    for shim in &config.shims {
        let name = shim.name.trim();
        if name.is_empty() {
            return Err(ConfigGuardRailError::EmptyShimName);
        }
        if !names.insert(name) {
            return Err(ConfigGuardRailError::DuplicateShimName(
                name.to_string(),
            ));
        }
        for (role, argv) in
            [(Role::Sender, &shim.sender), (Role::Receiver, &shim.receiver)]
        {
            if argv.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(ConfigGuardRailError::EmptyCommand {
                    shim: shim.name.clone(),
                    role,
                });
            }
        }
        // Case identifiers and queue names embed the shim name verbatim.
        if name.contains(|c: char| c.is_whitespace() || c == '.') {
            warnings.push_with_hint(
                format!("shim name '{name}' contains whitespace or '.'"),
                "case identifiers and queue names will be hard to select",
            );
        }
    }

    if config
        .broker_probe
        .as_ref()
        .is_some_and(|argv| argv.first().is_none_or(|p| p.trim().is_empty()))
    {
        return Err(ConfigGuardRailError::EmptyProbeCommand);
    }

    for skip in &config.skips {
        let kind = skip.kind.parse::<MessageKind>().map_err(|source| {
            ConfigGuardRailError::UnknownSkipKind {
                kind: skip.kind.clone(),
                source,
            }
        })?;
        if skip.broker.trim().is_empty() {
            return Err(ConfigGuardRailError::EmptySkipBroker {
                kind: skip.kind.clone(),
            });
        }
        if !kind.is_active() {
            warnings.push(format!(
                "skip rule for {kind} has no effect; the kind is never scheduled"
            ));
        }
        if skip.reason.trim().is_empty() {
            warnings.push_with_hint(
                format!("skip rule for {kind} on {} has no reason", skip.broker),
                "reference the upstream issue so the rule can be retired",
            );
        }
    }

    if config.broker_probe.is_none() && !config.skips.is_empty() {
        warnings.push_with_hint(
            "skip rules configured without broker_probe; they only match an 'unknown' broker",
            "set broker_probe to a command that prints the broker product",
        );
    }

    Ok(warnings)
}
