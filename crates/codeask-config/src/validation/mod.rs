//! Configuration validation.
//!
//! Every range check pushes onto a shared error list so a single
//! `ConfigError` reports all problems at once.

mod helpers;


use crate::schema::CodeaskConfig;
use codeask_common::ConfigError;

use helpers::{validate_range, validate_range_f64, validate_range_u64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CodeaskConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_ai(&mut errors, config);
    validate_tracking(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_ai(errors: &mut Vec<String>, config: &CodeaskConfig) {
    let ai = &config.ai;
    validate_range(errors, "ai.max_tokens", ai.max_tokens, 1, 200_000);
    validate_range_f64(errors, "ai.temperature", ai.temperature, 0.0, 2.0);
    if let Some(secs) = ai.request_timeout_secs {
        validate_range_u64(errors, "ai.request_timeout_secs", secs, 1, 3600);
    }
    if let Some(ref url) = ai.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("ai.base_url = {url} must start with http:// or https://"));
        }
    }
}

fn validate_tracking(errors: &mut Vec<String>, config: &CodeaskConfig) {
    validate_range_u64(
        errors,
        "tracking.max_file_bytes",
        config.tracking.max_file_bytes,
        1,
        64 * 1024 * 1024,
    );
}
