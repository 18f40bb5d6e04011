use super::{types::Config, ConfigError, NotifyBackend};

/// Validate configuration
/// Currently validates:
/// - At least one worker and one attempt
/// - Output suffix is a distinct `.nc` name
/// - Timeout, when set, is positive
/// - Verification tolerances are finite and non-negative
/// - Pushover credentials exist when that backend is selected
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let processor = &config.processor;

    if processor.workers == 0 {
        return Err(invalid("processor.workers must be at least 1"));
    }
    if processor.retry.max_attempts == 0 {
        return Err(invalid("processor.retry.max_attempts must be at least 1"));
    }
    if processor.compression_level > 9 {
        return Err(invalid("processor.compression_level must be between 0 and 9"));
    }
    if processor.output_suffix == ".nc" || !processor.output_suffix.ends_with(".nc") {
        return Err(invalid(
            "processor.output_suffix must end in .nc and differ from the input name",
        ));
    }
    if !processor.retry.backoff_multiplier.is_finite() || processor.retry.backoff_multiplier < 1.0 {
        return Err(invalid("processor.retry.backoff_multiplier must be at least 1.0"));
    }

    if config.converter.timeout_secs == Some(0) {
        return Err(invalid("converter.timeout_secs cannot be 0"));
    }

    for (name, value) in [
        ("verifier.rtol", config.verifier.rtol),
        ("verifier.atol", config.verifier.atol),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a finite non-negative number",
                name
            )));
        }
    }

    if config.notify.backend == NotifyBackend::Pushover {
        match &config.notify.pushover {
            Some(p) if !p.token.is_empty() && !p.user.is_empty() => {}
            _ => {
                return Err(invalid(
                    "notify.pushover.token and notify.pushover.user are required for the pushover backend",
                ))
            }
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
