use serde_json::Value;

use crate::AssistantError;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// JSON output constrained by the given schema.
    Json(Value),
}

/// One call to a language model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub turns: Vec<Turn>,
    pub format: ResponseFormat,
}

impl GenerationRequest {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::user(text)],
            ..Self::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_json_schema(mut self, schema: Value) -> Self {
        self.format = ResponseFormat::Json(schema);
        self
    }
}

/// A text generator the assistant can delegate to.
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the generated text. Empty output is reported as an error.
    fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError>;
}
