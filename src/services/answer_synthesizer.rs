use crate::api::middleware::AppError;
use crate::models::{ResultSet, Row};
use crate::services::llm_service::CompletionProvider;
use crate::services::prompts::render_answer_prompt;
use std::sync::Arc;

pub const NO_RESULTS_ANSWER: &str = "No results found";
pub const FALLBACK_ANSWER: &str = "Couldn't generate an outcome.";

/// Explains a result set in prose via the language model.
pub struct AnswerSynthesizer {
    llm: Arc<dyn CompletionProvider>,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self { llm }
    }

    pub async fn synthesize(
        &self,
        sql_query: &str,
        sql_result: &ResultSet,
        question: &str,
    ) -> Result<String, AppError> {
        if sql_result.is_empty() {
            return Ok(NO_RESULTS_ANSWER.to_string());
        }

        let rendered = render_rows(sql_result);
        let prompt = render_answer_prompt(question, sql_query, &rendered);
        let completion = self.llm.complete(&[prompt.as_str()]).await?;

        let answer = completion.trim();
        if answer.is_empty() {
            tracing::warn!("Model returned an empty answer");
            return Ok(FALLBACK_ANSWER.to_string());
        }
        Ok(answer.to_string())
    }
}

/// One line of compact JSON per row.
pub fn render_rows(rows: &[Row]) -> String {
    rows.iter()
        .map(|row| serde_json::Value::from(row.clone()).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
