//! Configuration loader: defaults, then the YAML file, then the environment.

use super::address::{AddressSource, Service, effective_subnet_prefix};
use super::env::{EnvSource, ProcessEnv, apply_env_overrides};
use super::merge::{deep_merge, lowercase_keys};
use super::settings::Settings;
use super::types::Config;
use crate::error::{ConfigError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// File names tried in every search directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["config.yml", "config.yaml"];

/// Where to look for the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Directories searched in order; the first existing file wins.
    pub search_dirs: Vec<PathBuf>,
    /// When set, only this file is read and it must exist.
    pub explicit_file: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// The current working directory, then its `config` subdirectory.
    pub fn discover() -> Self {
        Self::with_root(".")
    }

    /// `root`, then `root/config`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            search_dirs: vec![root.clone(), root.join("config")],
            explicit_file: None,
        }
    }

    /// Read exactly `path`; a missing file is an error.
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            search_dirs: Vec::new(),
            explicit_file: Some(path.into()),
        }
    }

    /// Candidate files in search order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(ref file) = self.explicit_file {
            return vec![file.clone()];
        }
        self.search_dirs
            .iter()
            .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
            .collect()
    }
}

/// Locate and parse the configuration file.
///
/// Returns `Ok(None)` when no candidate exists. The parsed tree has lower-cased keys
/// and is always an object.
pub fn read_config_file(paths: &ConfigPaths) -> Result<Option<(PathBuf, Value)>> {
    for path in paths.candidates() {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let value = parse_document(&path, &content)?;
                return Ok(Some((path, value)));
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                if paths.explicit_file.is_some() {
                    return Err(ConfigError::FileNotFound { path });
                }
                debug!(path = %path.display(), "no configuration file here");
            }
            Err(err) => return Err(ConfigError::read(path, err)),
        }
    }
    Ok(None)
}

fn parse_document(path: &Path, content: &str) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let value: Value =
        serde_yaml::from_str(content).map_err(|err| ConfigError::parse(path, err))?;
    match lowercase_keys(value) {
        Value::Null => Ok(Value::Object(Map::new())),
        value @ Value::Object(_) => Ok(value),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Resolved configuration together with how it was resolved.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths that were searched
    pub paths: ConfigPaths,
    config: Config,
    settings: Arc<Settings>,
    config_path: Option<PathBuf>,
    subnet_prefix: String,
    sources: BTreeMap<Service, AddressSource>,
    applied_env: Vec<&'static str>,
}

impl ConfigLoader {
    /// Resolve from the current directory and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Resolve from explicit paths and the process environment.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        Self::load_with(paths, &ProcessEnv)
    }

    /// Resolve from explicit paths and an explicit environment.
    pub fn load_with(paths: ConfigPaths, env: &dyn EnvSource) -> Result<Self> {
        let (config_path, file) = match read_config_file(&paths)? {
            Some((path, value)) => {
                info!(path = %path.display(), "loaded configuration file");
                (Some(path), value)
            }
            None => {
                debug!("no configuration file found, using defaults");
                (None, Value::Object(Map::new()))
            }
        };

        // One prefix for the whole pass; every derived address below uses it.
        let subnet_prefix = effective_subnet_prefix(&file, env);
        debug!(prefix = %subnet_prefix, "resolved subnet prefix");

        let defaults = Config::defaults(env, &subnet_prefix);
        let defaults = serde_json::to_value(&defaults).map_err(ConfigError::Merge)?;
        let merged = deep_merge(defaults, file.clone());
        let mut config: Config =
            serde_json::from_value(merged.clone()).map_err(ConfigError::Merge)?;
        config.subnet_prefix = subnet_prefix.clone();

        let sources = Service::ALL
            .into_iter()
            .map(|service| {
                let source = AddressSource::resolve(service, &file, env, &subnet_prefix);
                (service, source)
            })
            .collect();

        let applied_env = apply_env_overrides(&mut config, env);
        if !applied_env.is_empty() {
            debug!(vars = ?applied_env, "applied environment overrides");
        }

        Ok(Self {
            paths,
            config,
            settings: Arc::new(Settings::new(merged)),
            config_path,
            subnet_prefix,
            sources,
            applied_env,
        })
    }

    /// Get the resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Consume the loader and return the configuration plus the key accessor.
    pub fn into_parts(self) -> (Config, Arc<Settings>) {
        (self.config, self.settings)
    }

    /// Shared handle to the merged default+file values.
    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// The prefix every derived address was built from.
    pub fn subnet_prefix(&self) -> &str {
        &self.subnet_prefix
    }

    /// Where `service`'s address came from.
    pub fn address_source(&self, service: Service) -> &AddressSource {
        &self.sources[&service]
    }

    pub fn address_sources(&self) -> &BTreeMap<Service, AddressSource> {
        &self.sources
    }

    /// Environment variables that changed the configuration, in application order.
    pub fn applied_overrides(&self) -> &[&'static str] {
        &self.applied_env
    }
}
