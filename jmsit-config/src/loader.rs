//! Shim registry resolution.
//!
//! Evaluation order:
//! 1) `--shims PATH`,
//! 2) `$JMSIT_SHIMS_PATH` (TOML or JSON file),
//! 3) `$JMSIT_SHIMS_JSON` (inline JSON),
//! 4) `jmsit.toml`, `jmsit.json`, `config/jmsit.toml`, `config/jmsit.json`,
//! 5) the built-in shims of `$QPID_INTEROP_TEST_HOME`.
//!
//! Running out of sources is a startup error.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{debug, warn};

use crate::error::ConfigLoadError;
use crate::models::test_home::TEST_HOME_ENV;
use crate::models::{ShimRegistry, ShimRegistryConfig, ShimRegistrySource};

pub const SHIMS_PATH_ENV: &str = "JMSIT_SHIMS_PATH";
pub const SHIMS_JSON_ENV: &str = "JMSIT_SHIMS_JSON";

const DEFAULT_FILES: &[&str] = &[
    "jmsit.toml",
    "jmsit.json",
    "config/jmsit.toml",
    "config/jmsit.json",
];

/// Inputs to resolution, captured once so loading is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadContext {
    pub cli_path: Option<PathBuf>,
    pub shims_path: Option<String>,
    pub shims_json: Option<String>,
    pub test_home: Option<String>,
    /// Directory the default file names are resolved against.
    pub base_dir: PathBuf,
}

impl LoadContext {
    pub fn from_env(cli_path: Option<PathBuf>) -> Self {
        Self {
            cli_path,
            shims_path: non_blank_var(SHIMS_PATH_ENV),
            shims_json: non_blank_var(SHIMS_JSON_ENV),
            test_home: non_blank_var(TEST_HOME_ENV),
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub registry: ShimRegistry,
    pub source: ShimRegistrySource,
}

/// Resolve, parse and validate the shim registry.
pub fn load(ctx: &LoadContext) -> Result<ConfigLoad, ConfigLoadError> {
    let (config, source) = resolve(ctx)?;
    debug!(?source, shims = config.shims.len(), "resolved shim registry");

    let registry = config.into_registry()?;
    for warning in &registry.warnings.items {
        match &warning.hint {
            Some(hint) => warn!(%hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }
    Ok(ConfigLoad { registry, source })
}

pub fn resolve(
    ctx: &LoadContext,
) -> Result<(ShimRegistryConfig, ShimRegistrySource), ConfigLoadError> {
    if let Some(path) = &ctx.cli_path {
        let config = load_file(path)?;
        return Ok((config, ShimRegistrySource::Cli(path.clone())));
    }

    if let Some(raw) = &ctx.shims_path {
        let path = PathBuf::from(raw);
        let config = load_file(&path)?;
        return Ok((config, ShimRegistrySource::EnvPath(path)));
    }

    if let Some(raw) = &ctx.shims_json {
        let config = parse_json(raw).map_err(|source| {
            ConfigLoadError::Registry {
                origin: SHIMS_JSON_ENV.to_string(),
                source,
            }
        })?;
        return Ok((config, ShimRegistrySource::EnvInline));
    }

    if let Some(path) = find_default_file(&ctx.base_dir) {
        let config = load_file(&path)?;
        return Ok((config, ShimRegistrySource::File(path)));
    }

    if let Some(raw) = &ctx.test_home {
        let home = PathBuf::from(raw);
        let config = ShimRegistryConfig::from_test_home(&home).map_err(
            |source| ConfigLoadError::TestHome {
                home: home.clone(),
                source,
            },
        )?;
        return Ok((config, ShimRegistrySource::TestHome(home)));
    }

    Err(ConfigLoadError::NotFound)
}

fn load_file(path: &Path) -> Result<ShimRegistryConfig, ConfigLoadError> {
    read_file(path).map_err(|source| ConfigLoadError::Registry {
        origin: path.display().to_string(),
        source,
    })
}

fn read_file(path: &Path) -> anyhow::Result<ShimRegistryConfig> {
    let contents = fs::read_to_string(path).with_context(|| {
        format!("failed to read shim registry from {}", path.display())
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents),
        Some("toml") => toml::from_str(&contents)
            .map_err(|err| anyhow!("invalid shim registry toml: {err}")),
        _ => parse_from_str(&contents, &path.display().to_string()),
    }
}

pub fn parse_from_str(
    contents: &str,
    origin: &str,
) -> anyhow::Result<ShimRegistryConfig> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            anyhow!(
                "failed to parse shim registry {origin}: toml error: {toml_err}; json error: {json_err}"
            )
        })
    })
}

pub fn parse_json(raw: &str) -> anyhow::Result<ShimRegistryConfig> {
    serde_json::from_str(raw)
        .map_err(|err| anyhow!("invalid shim registry json: {err}"))
}

fn find_default_file(base: &Path) -> Option<PathBuf> {
    DEFAULT_FILES
        .iter()
        .map(|name| base.join(name))
        .find(|path| path.is_file())
}
