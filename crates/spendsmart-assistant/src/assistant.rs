//! Prompt construction and fallback handling around a [`LanguageModel`].

use chrono::NaiveDate;
use serde::Serialize;
use spendsmart_config::AssistantSettings;
use spendsmart_domain::{Budget, Category, Displayable, Expense};

use crate::{
    chat::ChatSession,
    draft::ExpenseDraft,
    gemini::GeminiClient,
    model::{GenerationRequest, LanguageModel, Turn},
    AssistantError,
};

pub const INSIGHTS_FAILED: &str = "Could not generate insights right now.";
pub const INSIGHTS_EMPTY: &str = "No insights available at the moment.";
pub const CHAT_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// How much finance data is sent along with a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantLimits {
    pub insight_window: usize,
    pub chat_context_limit: usize,
}

impl Default for AssistantLimits {
    fn default() -> Self {
        Self {
            insight_window: 50,
            chat_context_limit: 100,
        }
    }
}

impl From<&AssistantSettings> for AssistantLimits {
    fn from(settings: &AssistantSettings) -> Self {
        Self {
            insight_window: settings.insight_window,
            chat_context_limit: settings.chat_context_limit,
        }
    }
}

#[derive(Serialize)]
struct FinanceContext<'a> {
    expenses: &'a [Expense],
    budgets: &'a [Budget],
}

pub struct Assistant {
    model: Option<Box<dyn LanguageModel>>,
    limits: AssistantLimits,
    unavailable_reason: Option<String>,
}

impl Assistant {
    pub fn new(model: Box<dyn LanguageModel>, limits: AssistantLimits) -> Self {
        Self {
            model: Some(model),
            limits,
            unavailable_reason: None,
        }
    }

    /// An assistant whose every call returns its fallback.
    pub fn unavailable(reason: impl Into<String>, limits: AssistantLimits) -> Self {
        Self {
            model: None,
            limits,
            unavailable_reason: Some(reason.into()),
        }
    }

    /// Builds a Gemini-backed assistant, or an unavailable one when no key is configured.
    pub fn from_settings(settings: &AssistantSettings) -> Self {
        let limits = AssistantLimits::from(settings);
        match GeminiClient::from_settings(settings) {
            Ok(client) => Self::new(Box::new(client), limits),
            Err(err) => {
                tracing::warn!(error = %err, "assistant unavailable");
                Self::unavailable(err.to_string(), limits)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable_reason.as_deref()
    }

    fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
        match &self.model {
            Some(model) => model.generate(request),
            None => Err(AssistantError::Unavailable(
                self.unavailable_reason.clone().unwrap_or_default(),
            )),
        }
    }

    /// Extracts expense fields from free text. `None` when nothing usable came back.
    pub fn parse_expense(&self, text: &str, today: NaiveDate) -> Option<ExpenseDraft> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let request = GenerationRequest::prompt(parse_prompt(text, today))
            .with_json_schema(ExpenseDraft::schema());
        match self.generate(&request).and_then(|raw| ExpenseDraft::from_json(&raw)) {
            Ok(draft) => Some(draft),
            Err(err) => {
                tracing::warn!(error = %err, "expense parsing failed");
                None
            }
        }
    }

    /// Short saving tips based on the most recent expenses.
    pub fn insights(&self, expenses: &[Expense]) -> String {
        let recent: Vec<String> = expenses
            .iter()
            .take(self.limits.insight_window)
            .map(|expense| expense.display_label())
            .collect();
        let request = GenerationRequest::prompt(insights_prompt(&recent.join("\n")));
        match self.generate(&request) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) | Err(AssistantError::EmptyResponse) => INSIGHTS_EMPTY.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "insight generation failed");
                INSIGHTS_FAILED.to_string()
            }
        }
    }

    /// Answers `message` with the finance data as context and records both turns.
    pub fn chat(
        &self,
        session: &mut ChatSession,
        message: &str,
        expenses: &[Expense],
        budgets: &[Budget],
    ) -> String {
        let context = FinanceContext {
            expenses: &expenses[..expenses.len().min(self.limits.chat_context_limit)],
            budgets,
        };
        let reply = serde_json::to_string(&context)
            .map_err(|err| AssistantError::InvalidResponse(err.to_string()))
            .and_then(|context_json| {
                let mut turns = session.history().to_vec();
                turns.push(Turn::user(message));
                let request = GenerationRequest {
                    system: Some(chat_instruction(&context_json)),
                    turns,
                    ..GenerationRequest::default()
                };
                self.generate(&request)
            })
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "chat request failed");
                CHAT_ERROR_REPLY.to_string()
            });
        session.push(Turn::user(message));
        session.push(Turn::model(reply.clone()));
        reply
    }
}

fn parse_prompt(text: &str, today: NaiveDate) -> String {
    format!(
        "Extract expense details from this text: \"{text}\". \
         Return JSON with 'amount' (number), 'category' (one of: {}), 'description' (string), \
         and 'date' (ISO string YYYY-MM-DD, assume the year {} if not specified; today is {today}).",
        Category::names(),
        today.format("%Y"),
    )
}

fn insights_prompt(recent: &str) -> String {
    format!(
        "Analyze these recent expenses and provide 3 short, actionable bullet points for saving \
         money or improving budget adherence. Be friendly but direct.\n\nExpenses:\n{recent}"
    )
}

fn chat_instruction(context_json: &str) -> String {
    format!(
        "You are SpendSmart, a personal finance assistant. Answer questions about the user's \
         spending and budgets using only the data below. Amounts are in dollars. Keep answers \
         concise.\n\nData:\n{context_json}"
    )
}
