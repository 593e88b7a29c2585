//! Configuration validation
//!
//! Rules:
//! - sink name is non-empty
//! - `http` sinks have an http(s) endpoint
//! - timeout_secs > 0 when set
//! - 0 < max_in_flight <= MAX_IN_FLIGHT_LIMIT when set

use contracts::{
    ContractError, DispatchSettings, RelayConfig, SinkKind, SinkSettings, MAX_IN_FLIGHT_LIMIT,
};
use url::Url;

/// Validate a RelayConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &RelayConfig) -> Result<(), ContractError> {
    validate_sink(&config.sink)?;
    validate_dispatch(&config.dispatch)?;
    Ok(())
}

fn validate_sink(sink: &SinkSettings) -> Result<(), ContractError> {
    if sink.name.is_empty() {
        return Err(ContractError::config_validation(
            "sink.name",
            "sink name cannot be empty",
        ));
    }

    if sink.kind == SinkKind::Http {
        validate_endpoint(sink.endpoint.as_deref())?;
    }

    if sink.timeout_secs == Some(0) {
        return Err(ContractError::config_validation(
            "sink.timeout_secs",
            "timeout_secs must be > 0 (omit it to disable the timeout)",
        ));
    }

    Ok(())
}

fn validate_endpoint(endpoint: Option<&str>) -> Result<(), ContractError> {
    let endpoint = match endpoint {
        Some(e) if !e.trim().is_empty() => e,
        _ => {
            return Err(ContractError::config_validation(
                "sink.endpoint",
                "endpoint is required for http sinks",
            ))
        }
    };

    let url = Url::parse(endpoint).map_err(|e| {
        ContractError::config_validation(
            "sink.endpoint",
            format!("invalid endpoint '{endpoint}': {e}"),
        )
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ContractError::config_validation(
            "sink.endpoint",
            format!("unsupported scheme '{other}', expected http or https"),
        )),
    }
}

fn validate_dispatch(dispatch: &DispatchSettings) -> Result<(), ContractError> {
    match dispatch.max_in_flight {
        Some(0) => Err(ContractError::config_validation(
            "dispatch.max_in_flight",
            "max_in_flight must be > 0 (omit it for unbounded fan-out)",
        )),
        Some(limit) if limit > MAX_IN_FLIGHT_LIMIT => Err(ContractError::config_validation(
            "dispatch.max_in_flight",
            format!("max_in_flight must be <= {MAX_IN_FLIGHT_LIMIT}, got {limit}"),
        )),
        _ => Ok(()),
    }
}
