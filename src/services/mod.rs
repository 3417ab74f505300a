pub mod answer_synthesizer;
pub mod database; // Single-shot PostgreSQL access behind a trait seam
pub mod llm_service;
pub mod pipeline;
pub mod prompts;
pub mod query_executor;
pub mod sql_synthesizer;

#[cfg(test)]
pub(crate) mod test_support;

pub use answer_synthesizer::*;
pub use llm_service::*;
pub use pipeline::*;
pub use query_executor::*;
pub use sql_synthesizer::*;
