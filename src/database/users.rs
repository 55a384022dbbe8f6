use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::database::executor::Executor;
use crate::database::manager::DatabaseError;
use crate::database::models::{Application, NewUser, User, UserUpdate};
use crate::database::rows::{found, from_rows, returned, to_fields};
use crate::filter::{ColumnMap, FilterSet};

const COLUMNS: ColumnMap = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
];

const PROJECTION: &str =
    r#"username, first_name AS "firstName", last_name AS "lastName", email, is_admin AS "isAdmin""#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplyCheck {
    user_exists: bool,
    posting_exists: bool,
    applied: bool,
}

pub struct UserRepository {
    db: Arc<dyn Executor>,
}

impl UserRepository {
    pub fn new(db: Arc<dyn Executor>) -> Self {
        Self { db }
    }

    pub async fn create(&self, data: NewUser) -> Result<User, DatabaseError> {
        let existing = self
            .db
            .query("SELECT username FROM users WHERE username = $1", &[json!(data.username)])
            .await?;
        if !existing.is_empty() {
            return Err(DatabaseError::Conflict(format!("Duplicate username: {}", data.username)));
        }

        let sql = format!(
            "INSERT INTO users (username, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PROJECTION
        );
        let rows = self
            .db
            .query(
                &sql,
                &[
                    json!(data.username),
                    json!(data.first_name),
                    json!(data.last_name),
                    json!(data.email),
                    json!(data.is_admin),
                ],
            )
            .await?;

        let user: User = returned(rows)?;
        info!(username = %user.username, is_admin = user.is_admin, "user created");
        Ok(user)
    }

    pub async fn find_all(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", PROJECTION);
        let rows = self.db.query(&sql, &[]).await?;
        from_rows(rows)
    }

    pub async fn get(&self, username: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", PROJECTION);
        let rows = self.db.query(&sql, &[json!(username)]).await?;
        found(rows, || format!("No user: {}", username))
    }

    pub async fn update(&self, username: &str, data: &UserUpdate) -> Result<User, DatabaseError> {
        let set = FilterSet::generate(&to_fields(data)?, COLUMNS)?;
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            set.query,
            set.next_param_index(),
            PROJECTION
        );
        let mut params = set.params;
        params.push(json!(username));

        let rows = self.db.query(&sql, &params).await?;
        found(rows, || format!("No user: {}", username))
    }

    pub async fn remove(&self, username: &str) -> Result<(), DatabaseError> {
        let rows = self
            .db
            .query("DELETE FROM users WHERE username = $1 RETURNING username", &[json!(username)])
            .await?;
        if rows.is_empty() {
            return Err(DatabaseError::NotFound(format!("No user: {}", username)));
        }
        info!(username, "user removed");
        Ok(())
    }

    /// Records that `username` applied to `posting_id`.
    ///
    /// Both must exist; applying twice is a conflict.
    pub async fn apply(&self, username: &str, posting_id: i32) -> Result<Application, DatabaseError> {
        let rows = self
            .db
            .query(
                r#"SELECT
                    EXISTS (SELECT 1 FROM users WHERE username = $1) AS "userExists",
                    EXISTS (SELECT 1 FROM postings WHERE id = $2) AS "postingExists",
                    EXISTS (SELECT 1 FROM applications WHERE username = $1 AND posting_id = $2) AS "applied""#,
                &[json!(username), json!(posting_id)],
            )
            .await?;
        let check: ApplyCheck = returned(rows)?;

        if !check.user_exists {
            return Err(DatabaseError::NotFound(format!("No user: {}", username)));
        }
        if !check.posting_exists {
            return Err(DatabaseError::NotFound(format!("No posting: {}", posting_id)));
        }
        if check.applied {
            return Err(DatabaseError::Conflict(format!(
                "Already applied: {} to {}",
                username, posting_id
            )));
        }

        let rows = self
            .db
            .query(
                r#"INSERT INTO applications (username, posting_id) VALUES ($1, $2)
                   RETURNING username, posting_id AS "postingId""#,
                &[json!(username), json!(posting_id)],
            )
            .await?;
        let application: Application = returned(rows)?;
        info!(username, posting_id, "application recorded");
        Ok(application)
    }

    /// Posting ids the user applied to, oldest id first.
    pub async fn applications(&self, username: &str) -> Result<Vec<i32>, DatabaseError> {
        // confirm the user so an unknown name is NotFound rather than an empty list
        self.get(username).await?;

        let rows = self
            .db
            .query(
                r#"SELECT posting_id AS "postingId" FROM applications WHERE username = $1 ORDER BY posting_id"#,
                &[json!(username)],
            )
            .await?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Row {
            posting_id: i32,
        }
        let ids = from_rows::<Row>(rows)?.into_iter().map(|r| r.posting_id).collect();
        Ok(ids)
    }
}
