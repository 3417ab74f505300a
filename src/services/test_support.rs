// In-memory stand-ins for the model and the database
use crate::models::ResultSet;
use crate::services::database::{Database, DbError, Session};
use crate::services::llm_service::{CompletionProvider, ProviderError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns canned completions in order and records every prompt it saw.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Mix of completions (`Ok`) and provider failures (`Err`).
    pub fn scripted(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::scripted(vec![Err(message)])
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, segments: &[&str]) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(segments.iter().map(|s| s.to_string()).collect());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ProviderError::Malformed(message)),
            None => panic!("ScriptedProvider ran out of replies"),
        }
    }
}

pub enum FakeOutcome {
    Rows(ResultSet),
    QueryFails,
    ConnectFails,
}

/// Counts connection attempts and closed sessions, and records executed SQL.
pub struct FakeDatabase {
    outcome: FakeOutcome,
    connects: AtomicUsize,
    closes: Arc<AtomicUsize>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FakeDatabase {
    pub fn new(outcome: FakeOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            connects: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
            executed: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn with_rows(rows: ResultSet) -> Arc<Self> {
        Self::new(FakeOutcome::Rows(rows))
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Database for FakeDatabase {
    async fn connect(&self) -> Result<Box<dyn Session>, DbError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if matches!(self.outcome, FakeOutcome::ConnectFails) {
            return Err(DbError::Connect("connection refused".to_string()));
        }
        let result = match &self.outcome {
            FakeOutcome::Rows(rows) => Ok(rows.clone()),
            _ => Err(()),
        };
        Ok(Box::new(FakeSession {
            result,
            closes: self.closes.clone(),
            executed: self.executed.clone(),
        }))
    }
}

struct FakeSession {
    result: Result<ResultSet, ()>,
    closes: Arc<AtomicUsize>,
    executed: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl Session for FakeSession {
    async fn fetch_all(&mut self, sql: &str) -> Result<ResultSet, DbError> {
        self.executed.lock().unwrap().push(sql.to_string());
        self.result
            .clone()
            .map_err(|_| DbError::Query("syntax error at or near \"selec\"".to_string()))
    }

    async fn close(self: Box<Self>) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
