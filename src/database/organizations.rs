use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::database::executor::Executor;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewOrganization, Organization, OrganizationDetail, OrganizationFilter, OrganizationUpdate, PostingSummary,
};
use crate::database::rows::{found, from_rows, returned, select_sql, to_fields};
use crate::filter::{ColumnMap, FilterSet};

const COLUMNS: ColumnMap = &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

const PROJECTION: &str = r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

pub struct OrganizationRepository {
    db: Arc<dyn Executor>,
}

impl OrganizationRepository {
    pub fn new(db: Arc<dyn Executor>) -> Self {
        Self { db }
    }

    /// Conflict if the handle is taken.
    pub async fn create(&self, data: NewOrganization) -> Result<Organization, DatabaseError> {
        let existing = self
            .db
            .query("SELECT handle FROM organizations WHERE handle = $1", &[json!(data.handle)])
            .await?;
        if !existing.is_empty() {
            return Err(DatabaseError::Conflict(format!("Duplicate organization: {}", data.handle)));
        }

        let sql = format!(
            "INSERT INTO organizations (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PROJECTION
        );
        let rows = self
            .db
            .query(
                &sql,
                &[
                    json!(data.handle),
                    json!(data.name),
                    json!(data.description),
                    json!(data.num_employees),
                    json!(data.logo_url),
                ],
            )
            .await?;

        let organization: Organization = returned(rows)?;
        info!(handle = %organization.handle, "organization created");
        Ok(organization)
    }

    /// Matching organizations ordered by name.
    pub async fn find_all(&self, filter: &OrganizationFilter) -> Result<Vec<Organization>, DatabaseError> {
        let where_sql = filter.to_where();
        let sql = select_sql(
            &format!("SELECT {} FROM organizations", PROJECTION),
            &where_sql.query,
            "ORDER BY name",
        );
        let rows = self.db.query(&sql, &where_sql.params).await?;
        from_rows(rows)
    }

    /// The organization plus its postings.
    pub async fn get(&self, handle: &str) -> Result<OrganizationDetail, DatabaseError> {
        let sql = format!("SELECT {} FROM organizations WHERE handle = $1", PROJECTION);
        let rows = self.db.query(&sql, &[json!(handle)]).await?;
        let organization: Organization = found(rows, || format!("No organization: {}", handle))?;

        let rows = self
            .db
            .query(
                "SELECT id, title, salary, equity FROM postings WHERE organization_handle = $1 ORDER BY id",
                &[json!(handle)],
            )
            .await?;
        let postings: Vec<PostingSummary> = from_rows(rows)?;

        Ok(OrganizationDetail { organization, postings })
    }

    pub async fn update(&self, handle: &str, data: &OrganizationUpdate) -> Result<Organization, DatabaseError> {
        let set = FilterSet::generate(&to_fields(data)?, COLUMNS)?;
        let sql = format!(
            "UPDATE organizations SET {} WHERE handle = ${} RETURNING {}",
            set.query,
            set.next_param_index(),
            PROJECTION
        );
        let mut params = set.params;
        params.push(json!(handle));

        let rows = self.db.query(&sql, &params).await?;
        found(rows, || format!("No organization: {}", handle))
    }

    pub async fn remove(&self, handle: &str) -> Result<(), DatabaseError> {
        let rows = self
            .db
            .query("DELETE FROM organizations WHERE handle = $1 RETURNING handle", &[json!(handle)])
            .await?;
        if rows.is_empty() {
            return Err(DatabaseError::NotFound(format!("No organization: {}", handle)));
        }
        info!(handle, "organization removed");
        Ok(())
    }
}
