use serde::{Deserialize, Serialize};
use validator::Validate;

use super::nullable;
use super::posting::PostingSummary;
use crate::filter::{FilterWhere, SqlResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// An organization with the postings that reference it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: Organization,
    pub postings: Vec<PostingSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewOrganization {
    #[validate(length(min = 1, max = 25, message = "must be 1-25 characters"))]
    pub handle: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub num_employees: Option<i32>,
    #[validate(url(message = "must be a URL"))]
    pub logo_url: Option<String>,
}

/// Fields an administrator may change; the handle is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrganizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub num_employees: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    #[validate(url(message = "must be a URL"))]
    pub logo_url: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrganizationFilter {
    pub name: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub min_employees: Option<i64>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub max_employees: Option<i64>,
}

impl OrganizationFilter {
    /// An inverted range (min > max) is not an error; it simply matches nothing.
    pub fn to_where(&self) -> SqlResult {
        FilterWhere::new()
            .contains("name", self.name.as_deref())
            .at_least("num_employees", self.min_employees)
            .at_most("num_employees", self.max_employees)
            .build()
    }
}
