//! Per-provider request and response shapes for hosted foundation models.
//!
//! Each vendor on the inference endpoint speaks its own JSON dialect; this module
//! is the dispatch table between the shared [`InferenceParams`] and those bodies.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use super::params::InferenceParams;
use crate::error::InvokeError;

/// Cross-region inference profiles prefix the vendor, e.g. `us.anthropic.…`.
const REGION_PREFIXES: [&str; 4] = ["us.", "eu.", "apac.", "us-gov."];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Anthropic,
    AmazonTitan,
    AmazonNova,
    Meta,
    Mistral,
    Cohere,
    Ai21,
}

impl Provider {
    pub const ALL: [Provider; 7] = [
        Provider::Anthropic,
        Provider::AmazonTitan,
        Provider::AmazonNova,
        Provider::Meta,
        Provider::Mistral,
        Provider::Cohere,
        Provider::Ai21,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::AmazonTitan => "amazon-titan",
            Provider::AmazonNova => "amazon-nova",
            Provider::Meta => "meta",
            Provider::Mistral => "mistral",
            Provider::Cohere => "cohere",
            Provider::Ai21 => "ai21",
        }
    }

    /// Infer the provider from a model id such as
    /// `anthropic.claude-3-haiku-20240307-v1:0` or `us.amazon.nova-lite-v1:0`.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::UnsupportedProvider` for an unknown vendor.
    pub fn from_model_id(model_id: &str) -> Result<Self, InvokeError> {
        let trimmed = model_id.trim();
        let unprefixed = REGION_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed);
        let (vendor, model) = unprefixed.split_once('.').unwrap_or((unprefixed, ""));

        match vendor.to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Provider::Anthropic),
            "amazon" if model.starts_with("titan") => Ok(Provider::AmazonTitan),
            "amazon" if model.starts_with("nova") => Ok(Provider::AmazonNova),
            "meta" => Ok(Provider::Meta),
            "mistral" => Ok(Provider::Mistral),
            "cohere" => Ok(Provider::Cohere),
            "ai21" => Ok(Provider::Ai21),
            _ => Err(InvokeError::UnsupportedProvider(model_id.to_string())),
        }
    }

    /// Build the JSON request body for `prompt`.
    #[must_use]
    pub fn build_request(self, prompt: &str, params: &InferenceParams) -> Value {
        let stops = &params.stop_sequences;
        let mut body = match self {
            Provider::Anthropic => json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
                "messages": [{
                    "role": "user",
                    "content": [{ "type": "text", "text": prompt }],
                }],
            }),
            Provider::AmazonTitan => json!({
                "inputText": prompt,
                "textGenerationConfig": {
                    "maxTokenCount": params.max_tokens,
                    "temperature": params.temperature,
                    "topP": params.top_p,
                    "stopSequences": stops,
                },
            }),
            Provider::AmazonNova => json!({
                "messages": [{ "role": "user", "content": [{ "text": prompt }] }],
                "inferenceConfig": {
                    "maxTokens": params.max_tokens,
                    "temperature": params.temperature,
                    "topP": params.top_p,
                    "stopSequences": stops,
                },
            }),
            // Llama has no stop sequences on this endpoint.
            Provider::Meta => json!({
                "prompt": prompt,
                "max_gen_len": params.max_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
            Provider::Mistral => json!({
                "prompt": format!("<s>[INST] {prompt} [/INST]"),
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
            Provider::Cohere => json!({
                "prompt": prompt,
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
                "p": params.top_p,
            }),
            Provider::Ai21 => json!({
                "prompt": prompt,
                "maxTokens": params.max_tokens,
                "temperature": params.temperature,
                "topP": params.top_p,
                "stopSequences": stops,
            }),
        };

        if !stops.is_empty() {
            let key = match self {
                Provider::Anthropic | Provider::Cohere => Some("stop_sequences"),
                Provider::Mistral => Some("stop"),
                _ => None,
            };
            if let (Some(key), Some(map)) = (key, body.as_object_mut()) {
                map.insert(key.to_string(), json!(stops));
            }
        }
        body
    }

    /// Pull the generated text out of a response body.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::MalformedResponse` when the expected fields are missing
    /// and `InvokeError::EmptyResponse` when the text is blank.
    pub fn extract_text(self, response: &Value) -> Result<String, InvokeError> {
        let text = match self {
            Provider::Anthropic => response["content"].as_array().map(|blocks| {
                blocks
                    .iter()
                    .filter(|block| block["type"] == "text")
                    .filter_map(|block| block["text"].as_str())
                    .collect::<String>()
            }),
            Provider::AmazonTitan => response["results"][0]["outputText"]
                .as_str()
                .map(str::to_string),
            Provider::AmazonNova => response["output"]["message"]["content"][0]["text"]
                .as_str()
                .map(str::to_string),
            Provider::Meta => response["generation"].as_str().map(str::to_string),
            Provider::Mistral => response["outputs"][0]["text"].as_str().map(str::to_string),
            // Command R answers in `text`, older Command models in `generations`.
            Provider::Cohere => response["generations"][0]["text"]
                .as_str()
                .or_else(|| response["text"].as_str())
                .map(str::to_string),
            Provider::Ai21 => response["completions"][0]["data"]["text"]
                .as_str()
                .map(str::to_string),
        };

        let text = text.ok_or_else(|| {
            InvokeError::MalformedResponse(format!("no generated text in {self} response"))
        })?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(InvokeError::EmptyResponse);
        }
        Ok(trimmed.to_string())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = InvokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "amazon-titan" | "amazon_titan" | "titan" => Ok(Provider::AmazonTitan),
            "amazon-nova" | "amazon_nova" | "nova" => Ok(Provider::AmazonNova),
            "meta" | "llama" => Ok(Provider::Meta),
            "mistral" => Ok(Provider::Mistral),
            "cohere" => Ok(Provider::Cohere),
            "ai21" | "jurassic" => Ok(Provider::Ai21),
            _ => Err(InvokeError::UnsupportedProvider(s.to_string())),
        }
    }
}
