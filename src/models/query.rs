use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One result row: column values in select-list order.
pub type Row = Vec<Value>;

/// All rows returned by a statement, in driver order.
pub type ResultSet = Vec<Row>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionResponse {
    pub question: String,
    pub sql_query: String,
    pub sql_result: ResultSet,
    pub answer: String,
}

/// Progress of one question through the pipeline. Only used for logging;
/// clients never learn which stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    SqlSynthesized,
    Executed,
    Answered,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::SqlSynthesized => "sql_synthesized",
            PipelineStage::Executed => "executed",
            PipelineStage::Answered => "answered",
        }
    }
}
