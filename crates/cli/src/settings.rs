//! Relay configuration assembled from file, environment and flags.

use config_loader::{ConfigLoader, RelayConfig};
use tracing::info;

use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};

/// Read the config file (if any), apply overrides, then validate
pub fn resolve_config(args: &ConfigArgs) -> Result<RelayConfig> {
    let config = load_config(args)?;
    ConfigLoader::validate(&config)?;
    Ok(config)
}

/// Read the config file (if any) and apply overrides, without validating
pub fn load_config(args: &ConfigArgs) -> Result<RelayConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()));
            }
            ConfigLoader::read_from_path(path)?
        }
        None => RelayConfig::default(),
    };

    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut RelayConfig, args: &ConfigArgs) {
    if let Some(ref endpoint) = args.endpoint {
        info!(endpoint = %endpoint, "Overriding sink endpoint");
        config.sink.endpoint = Some(endpoint.clone());
    }
    if let Some(timeout) = args.timeout {
        info!(timeout_secs = timeout, "Overriding sink timeout");
        config.sink.timeout_secs = Some(timeout);
    }
    if let Some(limit) = args.max_in_flight {
        info!(max_in_flight = limit, "Overriding dispatch limit");
        config.dispatch.max_in_flight = Some(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_alone_are_enough() {
        let args = ConfigArgs {
            endpoint: Some("https://api.example.com/hook".to_string()),
            ..ConfigArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(
            config.sink.endpoint.as_deref(),
            Some("https://api.example.com/hook")
        );
        assert!(config.sink.timeout_secs.is_none());
    }

    #[test]
    fn test_missing_endpoint_is_rejected() {
        let err = resolve_config(&ConfigArgs::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let args = ConfigArgs {
            config: Some("/definitely/not/here.toml".into()),
            ..ConfigArgs::default()
        };
        assert!(matches!(
            resolve_config(&args),
            Err(CliError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[sink]\nendpoint = \"https://old.example.com\"\n\n[dispatch]\nmax_in_flight = 8"
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some(file.path().to_path_buf()),
            endpoint: Some("https://new.example.com".to_string()),
            timeout: Some(5),
            max_in_flight: None,
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(
            config.sink.endpoint.as_deref(),
            Some("https://new.example.com")
        );
        assert_eq!(config.sink.timeout_secs, Some(5));
        assert_eq!(config.dispatch.max_in_flight, Some(8));
    }
}
