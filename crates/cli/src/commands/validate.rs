//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{RelayConfig, SinkKind};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    sink_name: String,
    sink_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_in_flight: Option<usize>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    sink_name: config.sink.name.clone(),
                    sink_kind: format!("{:?}", config.sink.kind),
                    endpoint: config.sink.endpoint.clone(),
                    timeout_secs: config.sink.timeout_secs,
                    max_in_flight: config.dispatch.max_in_flight,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &RelayConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.sink.kind == SinkKind::Log {
        warnings.push("Sink kind is 'log' - records will not leave the process".to_string());
    }

    if config.sink.kind == SinkKind::Http && config.sink.timeout_secs.is_none() {
        warnings.push(
            "No sink.timeout_secs - a stalled endpoint blocks the batch indefinitely".to_string(),
        );
    }

    if config.dispatch.max_in_flight.is_none() {
        warnings.push(
            "No dispatch.max_in_flight - one concurrent request per message".to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Sink: {} ({})", summary.sink_name, summary.sink_kind);
            if let Some(ref endpoint) = summary.endpoint {
                println!("  Endpoint: {}", endpoint);
            }
            match summary.timeout_secs {
                Some(t) => println!("  Timeout: {}s", t),
                None => println!("  Timeout: none"),
            }
            match summary.max_in_flight {
                Some(n) => println!("  Max in flight: {}", n),
                None => println!("  Max in flight: unbounded"),
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args_for(content: &str) -> (tempfile::NamedTempFile, ValidateArgs) {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };
        (file, args)
    }

    #[test]
    fn test_validate_valid_config() {
        let (_file, args) = args_for(
            "[sink]\nendpoint = \"https://api.example.com\"\ntimeout_secs = 5\n\n[dispatch]\nmax_in_flight = 10\n",
        );
        let result = validate_config(&args);
        assert!(result.valid);
        assert!(result.warnings.is_none());
        assert!(run_validate(&args).is_ok());
    }

    #[test]
    fn test_validate_collects_warnings() {
        let (_file, args) = args_for("[sink]\nendpoint = \"https://api.example.com\"\n");
        let result = validate_config(&args);
        assert!(result.valid);
        assert_eq!(result.warnings.map(|w| w.len()), Some(2));
    }

    #[test]
    fn test_validate_invalid_config() {
        let (_file, args) = args_for("[sink]\nkind = \"http\"\n");
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("endpoint"));
        assert!(run_validate(&args).is_err());
    }

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {
            config: "/no/such/relay.toml".into(),
            json: false,
        };
        assert!(!validate_config(&args).valid);
    }
}
