use crate::error::InvokeError;

pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Sampling settings shared by every provider; each provider maps them onto
/// its own field names.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop_sequences: Vec<String>,
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            stop_sequences: Vec::new(),
        }
    }
}

impl InferenceParams {
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    #[must_use]
    pub fn with_stop_sequence(mut self, stop: impl Into<String>) -> Self {
        self.stop_sequences.push(stop.into());
        self
    }

    /// Check ranges before a request is built.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::InvalidParams` for zero `max_tokens`, or a
    /// `temperature`/`top_p` outside `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), InvokeError> {
        if self.max_tokens == 0 {
            return Err(InvokeError::InvalidParams("max_tokens must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(InvokeError::InvalidParams(format!(
                "temperature must be within 0..=1, got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(InvokeError::InvalidParams(format!(
                "top_p must be within 0..=1, got {}",
                self.top_p
            )));
        }
        if self.stop_sequences.iter().any(|stop| stop.is_empty()) {
            return Err(InvokeError::InvalidParams(
                "stop sequences must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = InferenceParams::default();
        assert_eq!(params.max_tokens, 512);
        assert!(params.stop_sequences.is_empty());
        params.validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_values() {
        for params in [
            InferenceParams::default().with_max_tokens(0),
            InferenceParams::default().with_temperature(1.5),
            InferenceParams::default().with_top_p(-0.1),
            InferenceParams::default().with_temperature(f32::NAN),
            InferenceParams::default().with_stop_sequence(""),
        ] {
            assert!(matches!(
                params.validate(),
                Err(InvokeError::InvalidParams(_))
            ));
        }
    }
}
