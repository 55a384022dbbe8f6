use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::nullable;
use crate::filter::{FilterWhere, SqlResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub equity: Option<Decimal>,
    pub organization_handle: String,
}

/// Posting as listed under its organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub equity: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPosting {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub salary: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Decimal>,
    #[validate(length(min = 1, max = 25, message = "must be 1-25 characters"))]
    pub organization_handle: String,
}

/// Fields an administrator may change; id and organization are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub salary: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::database::models::nullable::float"
    )]
    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Option<Decimal>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostingFilter {
    pub title: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub min_salary: Option<i64>,
    #[serde(default)]
    pub has_equity: bool,
}

impl PostingFilter {
    pub fn to_where(&self) -> SqlResult {
        FilterWhere::new()
            .contains("title", self.title.as_deref())
            .at_least("salary", self.min_salary)
            .positive("equity", self.has_equity)
            .build()
    }
}

fn validate_equity(equity: &Decimal) -> Result<(), ValidationError> {
    if *equity < Decimal::ZERO || *equity > Decimal::ONE {
        let mut err = ValidationError::new("equity_range");
        err.message = Some("must be between 0 and 1".into());
        return Err(err);
    }
    Ok(())
}
