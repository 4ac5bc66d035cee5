//! Base HTTP client with shared logic

use crate::config::{Credential, ProviderConfig, resolve_secret};
use crate::infrastructure::model::types::{CompletionOptions, ModelError};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const MAX_ERROR_BODY_CHARS: usize = 300;

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    api_key: Option<Credential>,
    pub http: Client,
}

impl HttpClientBase {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ModelError::network(&config.id, e))?;

        Ok(Self {
            id: config.id.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            api_key: resolve_secret(&config.id, config.api_key.as_deref()),
            http,
        })
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    pub fn max_tokens(&self, options: &CompletionOptions) -> Option<u32> {
        options.max_tokens.or(self.max_tokens)
    }

    pub fn temperature(&self, options: &CompletionOptions) -> f32 {
        options.temperature.unwrap_or(self.temperature)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(Credential::expose)
            .filter(|k| !k.trim().is_empty())
    }

    pub fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key()
            .ok_or_else(|| ModelError::missing_api_key(&self.id))
    }

    /// Post JSON with bearer auth
    pub async fn post_with_bearer<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ModelError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        let request = self.http.post(url).bearer_auth(api_key).json(body);
        self.send_json(request).await
    }

    /// Post JSON with the credential in a named header (Gemini, Claude)
    pub async fn post_with_key_header<Req, Res>(
        &self,
        url: &str,
        header: &str,
        extra_headers: &[(&str, &str)],
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        let mut request = self.http.post(url).header(header, api_key);
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }
        self.send_json(request.json(body)).await
    }

    /// Post JSON, attaching bearer auth only when a key is configured
    pub async fn post_optional_bearer<Req, Res>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let mut request = self.http.post(url).json(body);
        if let Some(api_key) = self.api_key() {
            request = request.bearer_auth(api_key);
        }
        self.send_json(request).await
    }

    /// GET that only checks for a success status
    pub async fn get_ok(&self, url: &str) -> Result<(), ModelError> {
        let mut request = self.http.get(url);
        if let Some(api_key) = self.api_key() {
            request = request.bearer_auth(api_key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?;
        self.check_status(response).await.map(|_| ())
    }

    async fn send_json<Res: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Res, ModelError> {
        let response = request
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?;
        let body = self.check_status(response).await?;

        serde_json::from_str(&body)
            .map_err(|e| ModelError::invalid_response(&self.id, e.to_string()))
    }

    /// Returns the body of a successful response, or the classified error.
    async fn check_status(&self, response: Response) -> Result<String, ModelError> {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ModelError::from_status(
                &self.id,
                status,
                retry_after,
                extract_error_message(&body),
            ))
        }
    }
}

/// Pull a readable message out of a backend error body.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.get("error"))
            .or_else(|| value.get("message"))
            .or_else(|| value.get("detail"));
        match message {
            Some(Value::String(text)) => return text.clone(),
            Some(other) if !other.is_null() => return other.to_string(),
            _ => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
