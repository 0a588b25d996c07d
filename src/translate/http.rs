//! Translation API over HTTP

use super::Translator;
use crate::config::{Secret, TranslatorSettings};
use crate::network::{accept_json, HttpClient, OutboundRequest, OutboundResponse};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request body sent to the translation API
#[derive(Debug, Serialize)]
struct TranslationRequest<'a> {
    text: &'a str,
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<serde_json::Value>,
}

/// Translator backed by a bearer-token protected HTTP endpoint
pub struct HttpTranslator {
    client: HttpClient,
    url: String,
    token: Secret,
}

impl HttpTranslator {
    pub fn new(client: HttpClient, settings: &TranslatorSettings) -> Self {
        Self {
            client,
            url: settings.url.clone(),
            token: settings.token.clone(),
        }
    }

    /// Build the HTTP request for one translation
    fn request(&self, text: &str, target_lang: &str) -> Result<OutboundRequest> {
        let body = serde_json::to_value(TranslationRequest {
            text,
            lang: target_lang,
        })?;

        Ok(OutboundRequest::post(&self.url)
            .header("Authorization", format!("Bearer {}", self.token.expose()))
            .header("Accept", accept_json())
            .json(body))
    }

    /// Extract the translated text; a malformed body counts as no translation
    fn response(&self, response: OutboundResponse) -> Result<Option<String>> {
        let response = response.error_for_status("Translation API")?;

        let parsed: TranslationResponse = match response.json() {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Unreadable translation response: {}", e);
                return Ok(None);
            }
        };

        Ok(parsed
            .translated_text
            .and_then(|t| t.as_str().map(str::to_string)))
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<Option<String>> {
        debug!("Translating {} chars to {}", text.chars().count(), target_lang);
        let request = self.request(text, target_lang)?;
        let response = self.client.execute(request).await?;
        self.response(response)
    }
}
