use thiserror::Error;
use url::Url;

//
// ─── QUIZ SETTINGS ─────────────────────────────────────────────────────────────
//

pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const DEFAULT_PASS_MARK_PERCENT: u8 = 70;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("number of questions must be > 0")]
    InvalidQuestionCount,

    #[error("pass mark must be between 0 and 100, got {0}")]
    InvalidPassMark(u8),
}

/// Per-session options chosen before a quiz starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    question_count: usize,
    auto_advance: bool,
    seed: Option<u64>,
    pass_mark_percent: u8,
}

#[derive(Debug, Clone, Default)]
pub struct QuizSettingsDraft {
    pub question_count: Option<usize>,
    pub auto_advance: bool,
    pub seed: Option<u64>,
    pub pass_mark_percent: Option<u8>,
}

impl QuizSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft, filling defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError` for a zero question count or a pass mark above 100.
    pub fn validate(self) -> Result<QuizSettings, QuizSettingsError> {
        let question_count = self.question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
        if question_count == 0 {
            return Err(QuizSettingsError::InvalidQuestionCount);
        }
        let pass_mark_percent = self.pass_mark_percent.unwrap_or(DEFAULT_PASS_MARK_PERCENT);
        if pass_mark_percent > 100 {
            return Err(QuizSettingsError::InvalidPassMark(pass_mark_percent));
        }
        Ok(QuizSettings {
            question_count,
            auto_advance: self.auto_advance,
            seed: self.seed,
            pass_mark_percent,
        })
    }
}

impl QuizSettings {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[must_use]
    pub fn pass_mark_percent(&self) -> u8 {
        self.pass_mark_percent
    }

    /// Same settings with a different question count.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError::InvalidQuestionCount` for zero.
    pub fn with_question_count(&self, question_count: usize) -> Result<Self, QuizSettingsError> {
        if question_count == 0 {
            return Err(QuizSettingsError::InvalidQuestionCount);
        }
        Ok(Self {
            question_count,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            auto_advance: false,
            seed: None,
            pass_mark_percent: DEFAULT_PASS_MARK_PERCENT,
        }
    }
}

//
// ─── AI SETTINGS ───────────────────────────────────────────────────────────────
//

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AiSettingsError {
    #[error("invalid endpoint URL")]
    InvalidEndpoint,

    #[error("invalid region {0:?}")]
    InvalidRegion(String),
}

/// Connection settings for the model-inference collaborator.
#[derive(Clone, PartialEq, Eq)]
pub struct AiSettings {
    api_key: Option<String>,
    region: String,
    endpoint: Url,
    default_model: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AiSettingsDraft {
    pub api_key: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub default_model: Option<String>,
}

impl AiSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// Blank values count as missing. Without an explicit endpoint the regional
    /// Bedrock runtime endpoint is used.
    ///
    /// # Errors
    ///
    /// Returns `AiSettingsError` for a malformed region or endpoint.
    pub fn validate(self) -> Result<AiSettings, AiSettingsError> {
        let api_key = normalize_optional(self.api_key);
        let default_model = normalize_optional(self.default_model);
        let region = normalize_optional(self.region).unwrap_or_else(|| DEFAULT_REGION.into());
        if !region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(AiSettingsError::InvalidRegion(region));
        }

        let raw_endpoint = normalize_optional(self.endpoint)
            .unwrap_or_else(|| format!("https://bedrock-runtime.{region}.amazonaws.com"));
        let endpoint = Url::parse(&raw_endpoint).map_err(|_| AiSettingsError::InvalidEndpoint)?;

        Ok(AiSettings {
            api_key,
            region,
            endpoint,
            default_model,
        })
    }
}

impl AiSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// True when a key is configured and requests can be sent.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for AiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .field("endpoint", &self.endpoint.as_str())
            .field("default_model", &self.default_model)
            .finish()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_defaults() {
        let settings = QuizSettingsDraft::new().validate().unwrap();
        assert_eq!(settings, QuizSettings::default());
        assert_eq!(settings.question_count(), 10);
        assert_eq!(settings.pass_mark_percent(), 70);
    }

    #[test]
    fn quiz_settings_reject_bad_values() {
        let zero = QuizSettingsDraft {
            question_count: Some(0),
            ..QuizSettingsDraft::default()
        };
        assert_eq!(zero.validate(), Err(QuizSettingsError::InvalidQuestionCount));

        let pass = QuizSettingsDraft {
            pass_mark_percent: Some(101),
            ..QuizSettingsDraft::default()
        };
        assert_eq!(pass.validate(), Err(QuizSettingsError::InvalidPassMark(101)));
    }

    #[test]
    fn resizing_keeps_other_settings() {
        let settings = QuizSettingsDraft {
            question_count: Some(5),
            auto_advance: true,
            seed: Some(9),
            pass_mark_percent: Some(80),
        }
        .validate()
        .unwrap();
        let resized = settings.with_question_count(20).unwrap();
        assert_eq!(resized.question_count(), 20);
        assert_eq!(resized.seed(), Some(9));
        assert!(resized.auto_advance());
        assert!(settings.with_question_count(0).is_err());
    }

    #[test]
    fn ai_endpoint_derives_from_region() {
        let settings = AiSettingsDraft {
            api_key: Some("  secret ".into()),
            region: Some("eu-west-1".into()),
            ..AiSettingsDraft::default()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.api_key(), Some("secret"));
        assert_eq!(
            settings.endpoint().as_str(),
            "https://bedrock-runtime.eu-west-1.amazonaws.com/"
        );
        assert!(settings.is_enabled());
    }

    #[test]
    fn ai_blank_values_are_missing() {
        let settings = AiSettingsDraft {
            api_key: Some("   ".into()),
            default_model: Some(String::new()),
            ..AiSettingsDraft::default()
        }
        .validate()
        .unwrap();
        assert!(!settings.is_enabled());
        assert_eq!(settings.default_model(), None);
        assert_eq!(settings.region(), DEFAULT_REGION);
    }

    #[test]
    fn ai_rejects_bad_endpoint_and_region() {
        let endpoint = AiSettingsDraft {
            endpoint: Some("not a url".into()),
            ..AiSettingsDraft::default()
        };
        assert_eq!(endpoint.validate(), Err(AiSettingsError::InvalidEndpoint));

        let region = AiSettingsDraft {
            region: Some("us east".into()),
            ..AiSettingsDraft::default()
        };
        assert!(matches!(
            region.validate(),
            Err(AiSettingsError::InvalidRegion(_))
        ));
    }

    #[test]
    fn debug_redacts_api_key() {
        let settings = AiSettingsDraft {
            api_key: Some("top-secret".into()),
            ..AiSettingsDraft::default()
        }
        .validate()
        .unwrap();
        assert!(!format!("{settings:?}").contains("top-secret"));
    }
}
