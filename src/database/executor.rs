use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Column, PgPool, Row, TypeInfo};

use crate::config;
use crate::database::manager::DatabaseError;

/// One result row: projected column name to value.
pub type DbRow = Map<String, Value>;

/// Runs a parameterized statement and returns its rows in order.
///
/// Repositories only ever talk to this trait; statements that modify data use
/// `RETURNING` so "zero rows" is observable the same way for every operation.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<DbRow>, DatabaseError>;
}

pub struct PgExecutor {
    pool: PgPool,
    query_logging: bool,
    slow_query_ms: Option<u64>,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        let db = &config::config().database;
        Self {
            pool,
            query_logging: db.enable_query_logging,
            slow_query_ms: db.enable_slow_query_warning.then_some(db.slow_query_threshold_ms),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Executor for PgExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<DbRow>, DatabaseError> {
        if self.query_logging {
            tracing::debug!(sql, ?params, "executing query");
        }

        let started = Instant::now();
        let mut q = sqlx::query(sql);
        for p in params {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if let Some(threshold) = self.slow_query_ms {
            if elapsed_ms > threshold {
                tracing::warn!(sql, elapsed_ms, threshold, "slow query");
            }
        }

        rows.iter().map(row_to_json).collect()
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            // int8 NULL assigns to every column type the schema uses (text via I/O cast)
            let none: Option<i64> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; cast down if safe
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.clone()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

fn row_to_json(row: &PgRow) -> Result<DbRow, DatabaseError> {
    let mut map = Map::new();
    for column in row.columns() {
        let i = column.ordinal();
        let value = match column.type_info().name() {
            "BOOL" => row.try_get::<Option<bool>, _>(i)?.map(Value::Bool),
            "INT2" => row.try_get::<Option<i16>, _>(i)?.map(Value::from),
            "INT4" => row.try_get::<Option<i32>, _>(i)?.map(Value::from),
            "INT8" => row.try_get::<Option<i64>, _>(i)?.map(Value::from),
            "FLOAT4" | "FLOAT8" => row
                .try_get::<Option<f64>, _>(i)?
                .and_then(Number::from_f64)
                .map(Value::Number),
            "NUMERIC" => row
                .try_get::<Option<Decimal>, _>(i)?
                .and_then(|d| d.to_f64())
                .and_then(Number::from_f64)
                .map(Value::Number),
            "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(i)?,
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(i)?
                .map(|t| Value::String(t.to_rfc3339())),
            _ => row.try_get::<Option<String>, _>(i)?.map(Value::String),
        };
        map.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    Ok(map)
}
