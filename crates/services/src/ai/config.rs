use std::env;

use quiz_core::model::{AiSettings, AiSettingsDraft, AiSettingsError};

pub const API_KEY_VARS: [&str; 2] = ["AWS_BEARER_TOKEN_BEDROCK", "CERT_QUIZ_AI_API_KEY"];
pub const REGION_VAR: &str = "AWS_REGION";
pub const ENDPOINT_VAR: &str = "CERT_QUIZ_AI_ENDPOINT";
pub const MODEL_VAR: &str = "CERT_QUIZ_AI_MODEL";

/// Collect AI settings from the environment without validating them, so callers
/// can layer CLI overrides on top.
#[must_use]
pub fn draft_from_env() -> AiSettingsDraft {
    AiSettingsDraft {
        api_key: API_KEY_VARS.iter().find_map(|name| non_blank_var(name)),
        region: non_blank_var(REGION_VAR),
        endpoint: non_blank_var(ENDPOINT_VAR),
        default_model: non_blank_var(MODEL_VAR),
    }
}

/// # Errors
///
/// Returns `AiSettingsError` if the region or endpoint variables are malformed.
pub fn settings_from_env() -> Result<AiSettings, AiSettingsError> {
    draft_from_env().validate()
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
