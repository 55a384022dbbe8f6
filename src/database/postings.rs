use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::database::executor::Executor;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewPosting, Posting, PostingFilter, PostingUpdate};
use crate::database::rows::{found, from_rows, returned, select_sql, to_fields};
use crate::filter::{ColumnMap, FilterSet};

// title, salary and equity are stored under their own names
const COLUMNS: ColumnMap = &[];

const PROJECTION: &str = r#"id, title, salary, equity, organization_handle AS "organizationHandle""#;

pub struct PostingRepository {
    db: Arc<dyn Executor>,
}

impl PostingRepository {
    pub fn new(db: Arc<dyn Executor>) -> Self {
        Self { db }
    }

    /// Conflict if the organization already has a posting with this title.
    pub async fn create(&self, data: NewPosting) -> Result<Posting, DatabaseError> {
        let existing = self
            .db
            .query(
                "SELECT id FROM postings WHERE title = $1 AND organization_handle = $2",
                &[json!(data.title), json!(data.organization_handle)],
            )
            .await?;
        if !existing.is_empty() {
            return Err(DatabaseError::Conflict(format!(
                "Duplicate posting: {} at {}",
                data.title, data.organization_handle
            )));
        }

        // serialized form carries equity as a number
        let fields = to_fields(&data)?;
        let sql = format!(
            "INSERT INTO postings (title, salary, equity, organization_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PROJECTION
        );
        let params = ["title", "salary", "equity", "organizationHandle"]
            .iter()
            .map(|field| fields.get(*field).cloned().unwrap_or_default())
            .collect::<Vec<_>>();
        let rows = self.db.query(&sql, &params).await?;

        let posting: Posting = returned(rows)?;
        info!(id = posting.id, organization = %posting.organization_handle, "posting created");
        Ok(posting)
    }

    /// Matching postings ordered by title.
    pub async fn find_all(&self, filter: &PostingFilter) -> Result<Vec<Posting>, DatabaseError> {
        let where_sql = filter.to_where();
        let sql = select_sql(
            &format!("SELECT {} FROM postings", PROJECTION),
            &where_sql.query,
            "ORDER BY title",
        );
        let rows = self.db.query(&sql, &where_sql.params).await?;
        from_rows(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Posting, DatabaseError> {
        let sql = format!("SELECT {} FROM postings WHERE id = $1", PROJECTION);
        let rows = self.db.query(&sql, &[json!(id)]).await?;
        found(rows, || format!("No posting: {}", id))
    }

    pub async fn update(&self, id: i32, data: &PostingUpdate) -> Result<Posting, DatabaseError> {
        let set = FilterSet::generate(&to_fields(data)?, COLUMNS)?;
        let sql = format!(
            "UPDATE postings SET {} WHERE id = ${} RETURNING {}",
            set.query,
            set.next_param_index(),
            PROJECTION
        );
        let mut params = set.params;
        params.push(json!(id));

        let rows = self.db.query(&sql, &params).await?;
        found(rows, || format!("No posting: {}", id))
    }

    pub async fn remove(&self, id: i32) -> Result<(), DatabaseError> {
        let rows = self
            .db
            .query("DELETE FROM postings WHERE id = $1 RETURNING id", &[json!(id)])
            .await?;
        if rows.is_empty() {
            return Err(DatabaseError::NotFound(format!("No posting: {}", id)));
        }
        info!(id, "posting removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedExecutor;
    use serde_json::Value;

    fn welder() -> Value {
        json!({
            "id": 3,
            "title": "Welder",
            "salary": 50000,
            "equity": 0.05,
            "organizationHandle": "acme"
        })
    }

    #[tokio::test]
    async fn create_binds_equity_as_number() {
        let db = ScriptedExecutor::new();
        db.respond(vec![]).respond(vec![welder()]);
        let repo = PostingRepository::new(db.clone());
        let data: NewPosting = serde_json::from_value(json!({
            "title": "Welder",
            "salary": 50000,
            "equity": 0.05,
            "organizationHandle": "acme"
        }))
        .unwrap();

        let posting = repo.create(data).await.unwrap();

        assert_eq!(posting.id, 3);
        let (_, params) = &db.calls()[1];
        assert_eq!(params, &vec![json!("Welder"), json!(50000), json!(0.05), json!("acme")]);
    }

    #[tokio::test]
    async fn create_without_equity_binds_null() {
        let db = ScriptedExecutor::new();
        db.respond(vec![]).respond(vec![welder()]);
        let repo = PostingRepository::new(db.clone());
        let data: NewPosting = serde_json::from_value(json!({
            "title": "Welder",
            "organizationHandle": "acme"
        }))
        .unwrap();

        repo.create(data).await.unwrap();

        let (_, params) = &db.calls()[1];
        assert_eq!(params[1], Value::Null);
        assert_eq!(params[2], Value::Null);
    }

    #[tokio::test]
    async fn duplicate_title_in_organization_is_conflict() {
        let db = ScriptedExecutor::new();
        db.respond(vec![json!({"id": 3})]);
        let repo = PostingRepository::new(db.clone());
        let data: NewPosting = serde_json::from_value(json!({
            "title": "Welder",
            "organizationHandle": "acme"
        }))
        .unwrap();

        let err = repo.create(data).await.unwrap_err();

        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert_eq!(db.calls().len(), 1);
    }

    #[tokio::test]
    async fn find_all_with_equity_flag_and_salary() {
        let db = ScriptedExecutor::new();
        let repo = PostingRepository::new(db.clone());
        let filter = PostingFilter {
            title: Some("Eng".into()),
            min_salary: Some(1000),
            has_equity: true,
        };

        repo.find_all(&filter).await.unwrap();

        let (sql, params) = &db.calls()[0];
        assert!(
            sql.ends_with("WHERE lower(\"title\") LIKE $1 AND \"salary\" >= $2 AND \"equity\" > 0 ORDER BY title"),
            "{}",
            sql
        );
        assert_eq!(params, &vec![json!("%eng%"), json!(1000)]);
    }

    #[tokio::test]
    async fn update_title_keeps_other_fields() {
        let db = ScriptedExecutor::new();
        let mut updated = welder();
        updated["title"] = json!("Updated Job");
        db.respond(vec![updated]);
        let repo = PostingRepository::new(db.clone());
        let update = PostingUpdate {
            title: Some("Updated Job".into()),
            ..Default::default()
        };

        let posting = repo.update(3, &update).await.unwrap();

        assert_eq!(posting.title, "Updated Job");
        assert_eq!(posting.salary, Some(50000));
        assert_eq!(posting.organization_handle, "acme");
        let (sql, params) = &db.calls()[0];
        assert!(sql.starts_with("UPDATE postings SET \"title\"=$1 WHERE id = $2"));
        assert_eq!(params, &vec![json!("Updated Job"), json!(3)]);
    }

    #[tokio::test]
    async fn explicit_null_clears_salary() {
        let db = ScriptedExecutor::new();
        let mut cleared = welder();
        cleared["salary"] = Value::Null;
        db.respond(vec![cleared]);
        let repo = PostingRepository::new(db.clone());
        let update: PostingUpdate = serde_json::from_value(json!({"salary": null})).unwrap();

        let posting = repo.update(3, &update).await.unwrap();

        assert_eq!(posting.salary, None);
        let (sql, params) = &db.calls()[0];
        assert!(sql.starts_with("UPDATE postings SET \"salary\"=$1 WHERE id = $2"), "{}", sql);
        assert_eq!(params[0], Value::Null);
        assert_eq!(params[1], json!(3));
    }

    #[tokio::test]
    async fn missing_posting_is_not_found() {
        let db = ScriptedExecutor::new();
        let repo = PostingRepository::new(db.clone());

        assert!(matches!(repo.get(99).await, Err(DatabaseError::NotFound(ref m)) if m == "No posting: 99"));
        assert!(matches!(repo.remove(99).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(
            repo.update(99, &PostingUpdate::default()).await,
            Err(DatabaseError::BadInput(_))
        ));
    }
}
