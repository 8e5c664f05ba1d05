// src/config/validate.rs

use crate::config::model::{PipelineSpec, RawPipelineSpec};
use crate::errors::{PipelineError, Result};

impl TryFrom<RawPipelineSpec> for PipelineSpec {
    type Error = PipelineError;

    fn try_from(raw: RawPipelineSpec) -> std::result::Result<Self, Self::Error> {
        validate_raw_spec(&raw)?;
        Ok(PipelineSpec::new_unchecked(raw))
    }
}

fn validate_raw_spec(raw: &RawPipelineSpec) -> Result<()> {
    ensure_non_empty("symbols", &raw.symbols)?;
    ensure_non_empty("source_types", &raw.source_types)?;
    ensure_non_empty("intervals", &raw.intervals)?;

    if raw.days_back == 0 {
        return Err(PipelineError::ConfigError(
            "days_back must be >= 1 (got 0)".to_string(),
        ));
    }

    if raw.max_concurrency == 0 {
        return Err(PipelineError::ConfigError(
            "max_concurrency must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn ensure_non_empty(field: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(PipelineError::ConfigError(format!(
            "{field} must contain at least one entry"
        )));
    }
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(PipelineError::ConfigError(format!(
            "{field} contains an empty entry"
        )));
    }
    Ok(())
}
