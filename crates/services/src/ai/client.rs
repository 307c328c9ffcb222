use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use quiz_core::model::{AiSettings, Answer, Question};

use super::params::InferenceParams;
use super::prompt::explain_prompt;
use super::provider::Provider;
use crate::error::InvokeError;

/// Model used when neither the caller nor the settings name one.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Sends a provider-specific body to a model and returns the raw JSON reply.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns `InvokeError` when the request cannot be delivered or is rejected.
    async fn invoke(&self, model_id: &str, body: &Value) -> Result<Value, InvokeError>;
}

/// HTTP transport for the hosted model runtime, authenticated with a bearer key.
#[derive(Clone, Debug)]
pub struct BedrockTransport {
    client: Client,
    settings: AiSettings,
}

impl BedrockTransport {
    #[must_use]
    pub fn new(settings: AiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn invoke_url(&self, model_id: &str) -> String {
        format!(
            "{}/model/{model_id}/invoke",
            self.settings.endpoint().as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ModelTransport for BedrockTransport {
    async fn invoke(&self, model_id: &str, body: &Value) -> Result<Value, InvokeError> {
        let api_key = self.settings.api_key().ok_or(InvokeError::Disabled)?;

        let response = self
            .client
            .post(self.invoke_url(model_id))
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InvokeError::HttpStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}

/// The single boundary through which the app talks to a model.
///
/// Stateless apart from configuration: no retries, no caching. Errors are
/// returned to the caller as-is.
#[derive(Clone)]
pub struct ModelInvoker {
    transport: Option<Arc<dyn ModelTransport>>,
    default_model: String,
}

impl ModelInvoker {
    #[must_use]
    pub fn new(transport: Arc<dyn ModelTransport>) -> Self {
        Self {
            transport: Some(transport),
            default_model: DEFAULT_MODEL_ID.to_string(),
        }
    }

    /// An invoker that refuses every call with `InvokeError::Disabled`.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            transport: None,
            default_model: DEFAULT_MODEL_ID.to_string(),
        }
    }

    /// Build an invoker over [`BedrockTransport`]; disabled without an API key.
    #[must_use]
    pub fn from_settings(settings: &AiSettings) -> Self {
        let base = if settings.is_enabled() {
            Self::new(Arc::new(BedrockTransport::new(settings.clone())))
        } else {
            Self::disabled()
        };
        match settings.default_model() {
            Some(model) => base.with_default_model(model),
            None => base,
        }
    }

    #[must_use]
    pub fn with_default_model(mut self, model_id: impl Into<String>) -> Self {
        self.default_model = model_id.into();
        self
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.transport.is_some()
    }

    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Generate text from `prompt` with an explicit provider.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError` when the invoker is disabled, the parameters are
    /// invalid, the request fails, or the response has no text.
    pub async fn invoke(
        &self,
        provider: Provider,
        model_id: &str,
        prompt: &str,
        params: &InferenceParams,
    ) -> Result<String, InvokeError> {
        let transport = self.transport.as_ref().ok_or(InvokeError::Disabled)?;
        params.validate()?;

        let body = provider.build_request(prompt, params);
        let started = Instant::now();
        tracing::debug!(%provider, model = model_id, "invoking model");

        let response = transport.invoke(model_id, &body).await.inspect_err(|err| {
            tracing::warn!(%provider, model = model_id, error = %err, "model invocation failed");
        })?;
        let text = provider.extract_text(&response)?;

        tracing::info!(
            %provider,
            model = model_id,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            chars = text.len(),
            "model invocation finished"
        );
        Ok(text)
    }

    /// Like [`ModelInvoker::invoke`], inferring the provider from `model_id`.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::UnsupportedProvider` for an unknown vendor prefix,
    /// otherwise see [`ModelInvoker::invoke`].
    pub async fn invoke_model(
        &self,
        model_id: &str,
        prompt: &str,
        params: &InferenceParams,
    ) -> Result<String, InvokeError> {
        let provider = Provider::from_model_id(model_id)?;
        self.invoke(provider, model_id, prompt, params).await
    }

    /// Ask the default model to explain `question`, mentioning the learner's pick.
    ///
    /// # Errors
    ///
    /// See [`ModelInvoker::invoke_model`].
    pub async fn explain(
        &self,
        question: &Question,
        selection: Option<&Answer>,
        params: &InferenceParams,
    ) -> Result<String, InvokeError> {
        let prompt = explain_prompt(question, selection)?;
        self.invoke_model(&self.default_model, &prompt, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::AiSettingsDraft;

    #[test]
    fn invoke_url_joins_endpoint_and_model() {
        let settings = AiSettingsDraft {
            api_key: Some("key".into()),
            region: Some("us-west-2".into()),
            ..AiSettingsDraft::default()
        }
        .validate()
        .unwrap();
        let transport = BedrockTransport::new(settings);
        assert_eq!(
            transport.invoke_url("amazon.nova-lite-v1:0"),
            "https://bedrock-runtime.us-west-2.amazonaws.com/model/amazon.nova-lite-v1:0/invoke"
        );
    }

    #[test]
    fn settings_without_key_disable_the_invoker() {
        let settings = AiSettingsDraft {
            default_model: Some("meta.llama3-8b-instruct-v1:0".into()),
            ..AiSettingsDraft::default()
        }
        .validate()
        .unwrap();
        let invoker = ModelInvoker::from_settings(&settings);
        assert!(!invoker.enabled());
        assert_eq!(invoker.default_model(), "meta.llama3-8b-instruct-v1:0");
    }

    #[tokio::test]
    async fn disabled_invoker_refuses_calls() {
        let err = ModelInvoker::disabled()
            .invoke_model(DEFAULT_MODEL_ID, "hi", &InferenceParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::Disabled));
    }
}
