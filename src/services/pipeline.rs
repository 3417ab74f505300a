use crate::api::middleware::AppError;
use crate::models::{PipelineStage, QuestionResponse};
use crate::services::answer_synthesizer::AnswerSynthesizer;
use crate::services::database::Database;
use crate::services::llm_service::CompletionProvider;
use crate::services::query_executor::QueryExecutor;
use crate::services::sql_synthesizer::SqlSynthesizer;
use std::sync::Arc;

/// Question in, explained answer out: synthesize SQL, execute it, explain
/// the rows. Stages run strictly in order and the first failure ends the run.
pub struct QuestionPipeline {
    sql_synthesizer: SqlSynthesizer,
    executor: QueryExecutor,
    answer_synthesizer: AnswerSynthesizer,
}

impl QuestionPipeline {
    pub fn new(
        llm: Arc<dyn CompletionProvider>,
        database: Arc<dyn Database>,
        strict_sql_validation: bool,
    ) -> Self {
        Self {
            sql_synthesizer: SqlSynthesizer::new(llm.clone(), strict_sql_validation),
            executor: QueryExecutor::new(database),
            answer_synthesizer: AnswerSynthesizer::new(llm),
        }
    }

    pub async fn run(&self, question: &str) -> Result<QuestionResponse, AppError> {
        let mut stage = PipelineStage::Received;
        let result = self.run_stages(question, &mut stage).await;

        if let Err(e) = &result {
            tracing::error!(completed_stage = stage.as_str(), "Question failed: {}", e);
            if let Some(source) = std::error::Error::source(e) {
                tracing::error!("Caused by: {}", source);
            }
        }
        result
    }

    async fn run_stages(
        &self,
        question: &str,
        stage: &mut PipelineStage,
    ) -> Result<QuestionResponse, AppError> {
        tracing::info!("Generating SQL for question: {}", question);
        let sql_query = self.sql_synthesizer.synthesize(question).await?;
        *stage = PipelineStage::SqlSynthesized;
        tracing::info!("Generated SQL: {}", sql_query);

        let sql_result = self.executor.execute(&sql_query).await?;
        *stage = PipelineStage::Executed;

        let answer = self
            .answer_synthesizer
            .synthesize(&sql_query, &sql_result, question)
            .await?;
        *stage = PipelineStage::Answered;

        Ok(QuestionResponse {
            question: question.to_string(),
            sql_query,
            sql_result,
            answer,
        })
    }
}
