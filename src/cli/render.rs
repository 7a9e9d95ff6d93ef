//! Text output for each subcommand.

use super::{GetArgs, OutputFormat, ShowArgs, ValueKind};
use crate::config::{AddressSource, ConfigLoader, Settings};
use anyhow::{Result, bail};

/// The resolved configuration, masked unless `--show-secrets`.
pub fn show(loader: &ConfigLoader, args: &ShowArgs) -> Result<String> {
    let config = if args.show_secrets {
        loader.config().clone()
    } else {
        loader.config().redacted()
    };
    let out = match args.format {
        OutputFormat::Yaml => serde_yaml::to_string(&config)?,
        OutputFormat::Json => serde_json::to_string_pretty(&config)?,
    };
    Ok(out.trim_end().to_string())
}

/// One accessor lookup, coerced to the requested type.
///
/// Unlike the accessor itself, an unset key is reported instead of printing a
/// zero value.
pub fn get(settings: &Settings, args: &GetArgs) -> Result<String> {
    let key = args.key.as_str();
    if !settings.is_set(key) {
        bail!("key `{key}` is not set");
    }
    Ok(match args.kind {
        ValueKind::String => settings.get_string(key),
        ValueKind::Int => settings.get_int(key).to_string(),
        ValueKind::Uint => settings.get_uint64(key).to_string(),
        ValueKind::Bool => settings.get_bool(key).to_string(),
        ValueKind::List => settings.get_string_slice(key).join("\n"),
        ValueKind::Float => settings.get_float64(key).to_string(),
    })
}

/// File used, prefix, log level, applied overrides and per-service address origins.
pub fn sources(loader: &ConfigLoader) -> String {
    let file = loader
        .config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let overrides = if loader.applied_overrides().is_empty() {
        "(none)".to_string()
    } else {
        loader.applied_overrides().join(", ")
    };

    let mut lines = vec![
        format!("config file:   {file}"),
        format!("subnet prefix: {}", loader.subnet_prefix()),
        format!("log level:     {}", loader.config().log.tracing_level()),
        format!("env overrides: {overrides}"),
        String::new(),
    ];
    for (service, source) in loader.address_sources() {
        let detail = match source {
            AddressSource::Operator(_) => service.override_var().to_string(),
            AddressSource::File(_) => service.key().to_string(),
            AddressSource::Host(host) => format!("{}={host}", service.host_var()),
            AddressSource::Subnet(prefix) => {
                format!("{prefix}.{}", service.host_octet())
            }
        };
        lines.push(format!("{:<13} {:<9} {detail}", service.to_string(), source.kind()));
    }
    lines.join("\n")
}
