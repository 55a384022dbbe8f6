use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::database::{DatabaseError, DbRow, Executor};

/// Executor that answers queries from a script and records every call.
///
/// Each `query` pops the next scripted response; once the script runs out
/// every query returns no rows.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<Result<Vec<DbRow>, String>>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue rows for the next query. Non-object values are ignored.
    pub fn respond(&self, rows: Vec<Value>) -> &Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        lock(&self.responses).push_back(Ok(rows));
        self
    }

    /// Queue a failure for the next query.
    pub fn fail(&self, message: &str) -> &Self {
        lock(&self.responses).push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        lock(&self.calls).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<DbRow>, DatabaseError> {
        lock(&self.calls).push((sql.to_string(), params.to_vec()));
        match lock(&self.responses).pop_front() {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(DatabaseError::QueryError(message)),
            None => Ok(Vec::new()),
        }
    }
}
