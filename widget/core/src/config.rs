use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Corner of the viewport the launcher anchors to before the user drags it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::BottomRight
    }
}

/// Caller-supplied widget configuration, passed to `init`.
///
/// Field names mirror the JSON object the embedding snippet hands over.
/// `tenant_id` and `api_key` are required; everything else is optional and
/// defaulted by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Theme name applied to the widget chrome ("light" / "dark").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Anchor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Greeting shown as the first bot message of a fresh conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<String>,
}

impl WidgetConfig {
    pub fn new(tenant_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Shallow-merge another config over this one.
    ///
    /// Repeated `init` calls apply in call order; a later call only
    /// overrides the fields it actually carries.
    pub fn merge(&mut self, other: WidgetConfig) {
        if !other.tenant_id.is_empty() {
            self.tenant_id = other.tenant_id;
        }
        if !other.api_key.is_empty() {
            self.api_key = other.api_key;
        }
        if other.api_base_url.is_some() {
            self.api_base_url = other.api_base_url;
        }
        if other.theme.is_some() {
            self.theme = other.theme;
        }
        if other.position.is_some() {
            self.position = other.position;
        }
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.max_tokens.is_some() {
            self.max_tokens = other.max_tokens;
        }
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        if other.initial_message.is_some() {
            self.initial_message = other.initial_message;
        }
    }

    /// Fail fast before any outbound request when the required credentials
    /// are missing.
    pub fn validate(&self) -> Result<(), WidgetError> {
        let mut missing = Vec::new();
        if self.tenant_id.trim().is_empty() {
            missing.push("tenantId");
        }
        if self.api_key.trim().is_empty() {
            missing.push("apiKey");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WidgetError::Configuration(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}
