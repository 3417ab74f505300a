use crate::api::middleware::AppError;
use crate::services::llm_service::CompletionProvider;
use crate::services::prompts::SQL_GENERATION_PROMPT;
use crate::validation::{strip_sql_fences, SqlValidator};
use std::sync::Arc;

/// Turns a question into an executable SQL statement via the language model.
pub struct SqlSynthesizer {
    llm: Arc<dyn CompletionProvider>,
    strict_validation: bool,
}

impl SqlSynthesizer {
    pub fn new(llm: Arc<dyn CompletionProvider>, strict_validation: bool) -> Self {
        Self {
            llm,
            strict_validation,
        }
    }

    /// One model call, no retry. The returned statement is the completion
    /// minus surrounding fences and whitespace, otherwise untouched.
    pub async fn synthesize(&self, question: &str) -> Result<String, AppError> {
        let completion = self.llm.complete(&[SQL_GENERATION_PROMPT, question]).await?;
        let sql = strip_sql_fences(&completion);

        if !SqlValidator::contains_select(sql) {
            tracing::warn!("Model completion is not a query: {:?}", completion);
            return Err(AppError::invalid_sql("completion does not contain SELECT"));
        }

        if self.strict_validation {
            SqlValidator::validate_select_only(sql).map_err(AppError::invalid_sql)?;
        }

        Ok(sql.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::ScriptedProvider;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_sends_instructions_then_question() {
        let llm = ScriptedProvider::new(["select count(distinct brand_id) from daily_ads_data;"]);
        let synthesizer = SqlSynthesizer::new(llm.clone(), false);

        let sql = assert_ok!(synthesizer.synthesize("How many unique entries of brand are there?").await);
        assert_eq!(sql, "select count(distinct brand_id) from daily_ads_data;");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![
            SQL_GENERATION_PROMPT.to_string(),
            "How many unique entries of brand are there?".to_string(),
        ]);
    }

    #[tokio::test]
    async fn test_strips_fences() {
        let llm = ScriptedProvider::new(["```sql\nSELECT brand_name FROM daily_ads_data\nWHERE lower(channel) = 'google';\n```\n"]);
        let synthesizer = SqlSynthesizer::new(llm, false);

        let sql = synthesizer.synthesize("google brands").await.unwrap();
        assert_eq!(sql, "SELECT brand_name FROM daily_ads_data\nWHERE lower(channel) = 'google';");
    }

    #[tokio::test]
    async fn test_rejects_prose() {
        let llm = ScriptedProvider::new(["Sorry, I can only help with advertising data."]);
        let synthesizer = SqlSynthesizer::new(llm, false);

        let err = assert_err!(synthesizer.synthesize("tell me a joke").await);
        assert!(matches!(err, AppError::InvalidSql { .. }));
        assert_eq!(err.detail(), "Illegal SQL query.");
    }

    #[tokio::test]
    async fn test_keyword_guard_is_shallow_by_default() {
        let llm = ScriptedProvider::new(["delete from daily_ads_data where brand_name = 'selected'"]);
        let synthesizer = SqlSynthesizer::new(llm, false);

        let sql = synthesizer.synthesize("clean up").await.unwrap();
        assert_eq!(sql, "delete from daily_ads_data where brand_name = 'selected'");
    }

    #[tokio::test]
    async fn test_strict_validation_rejects_non_queries() {
        let llm = ScriptedProvider::new(["delete from daily_ads_data where brand_name = 'selected'"]);
        let synthesizer = SqlSynthesizer::new(llm, true);

        let err = synthesizer.synthesize("clean up").await.unwrap_err();
        match err {
            AppError::InvalidSql { reason } => assert!(reason.starts_with("DELETE")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_failure_propagates_raw_message() {
        let llm = ScriptedProvider::failing("quota exhausted");
        let synthesizer = SqlSynthesizer::new(llm, false);

        let err = synthesizer.synthesize("How many brands?").await.unwrap_err();
        assert!(matches!(err, AppError::Other(_)));
        assert!(err.detail().contains("quota exhausted"));
    }
}
