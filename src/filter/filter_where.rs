use serde_json::Value;

use super::types::SqlResult;

/// Accumulates WHERE predicates for optional search criteria.
///
/// Every append consumes the accumulator and hands it back, so a chain of
/// optional criteria reads top to bottom and absent criteria are no-ops. The
/// conjunction keyword comes from the number of predicates already added and
/// each placeholder index comes from the live length of the bind list, so a
/// skipped criterion never shifts the placeholders of the ones after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterWhere {
    query: String,
    params: Vec<Value>,
    predicates: usize,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match: `lower("column") LIKE '%needle%'`.
    pub fn contains(self, column: &str, needle: Option<&str>) -> Self {
        match needle {
            Some(needle) => {
                let pattern = Value::String(format!("%{}%", needle.to_lowercase()));
                self.bound(pattern, |p| format!("lower(\"{}\") LIKE {}", column, p))
            }
            None => self,
        }
    }

    /// Inclusive lower bound.
    pub fn at_least(self, column: &str, min: Option<i64>) -> Self {
        match min {
            Some(min) => self.bound(Value::from(min), |p| format!("\"{}\" >= {}", column, p)),
            None => self,
        }
    }

    /// Inclusive upper bound.
    pub fn at_most(self, column: &str, max: Option<i64>) -> Self {
        match max {
            Some(max) => self.bound(Value::from(max), |p| format!("\"{}\" <= {}", column, p)),
            None => self,
        }
    }

    /// `"column" > 0` when `flag` is set. The threshold is a literal, so this
    /// counts as a predicate without consuming a placeholder.
    pub fn positive(self, column: &str, flag: bool) -> Self {
        if flag {
            self.push(format!("\"{}\" > 0", column))
        } else {
            self
        }
    }

    pub fn build(self) -> SqlResult {
        SqlResult {
            query: self.query,
            params: self.params,
        }
    }

    fn bound(mut self, value: Value, predicate: impl FnOnce(&str) -> String) -> Self {
        let placeholder = format!("${}", self.params.len() + 1);
        self.params.push(value);
        self.push(predicate(&placeholder))
    }

    fn push(mut self, predicate: String) -> Self {
        let keyword = if self.predicates == 0 { "WHERE" } else { "AND" };
        if !self.query.is_empty() {
            self.query.push(' ');
        }
        self.query.push_str(keyword);
        self.query.push(' ');
        self.query.push_str(&predicate);
        self.predicates += 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_criteria_yields_empty_fragment() {
        let sql = FilterWhere::new()
            .contains("name", None)
            .at_least("num_employees", None)
            .positive("equity", false)
            .build();
        assert_eq!(sql, SqlResult::default());
    }

    #[test]
    fn substring_is_lowercased_and_wrapped() {
        let sql = FilterWhere::new().contains("name", Some("NeT")).build();
        assert_eq!(sql.query, "WHERE lower(\"name\") LIKE $1");
        assert_eq!(sql.params, vec![json!("%net%")]);
    }

    #[test]
    fn skipped_leading_criterion_does_not_shift_placeholders() {
        let sql = FilterWhere::new()
            .contains("name", None)
            .at_least("num_employees", Some(10))
            .at_most("num_employees", Some(500))
            .build();
        assert_eq!(
            sql.query,
            "WHERE \"num_employees\" >= $1 AND \"num_employees\" <= $2"
        );
        assert_eq!(sql.params, vec![json!(10), json!(500)]);
    }

    #[test]
    fn flag_counts_as_predicate_without_placeholder() {
        let sql = FilterWhere::new()
            .positive("equity", true)
            .at_least("salary", Some(50_000))
            .contains("title", Some("eng"))
            .build();
        assert_eq!(
            sql.query,
            "WHERE \"equity\" > 0 AND \"salary\" >= $1 AND lower(\"title\") LIKE $2"
        );
        assert_eq!(sql.params, vec![json!(50_000), json!("%eng%")]);
    }

    #[test]
    fn every_subset_has_exactly_one_where() {
        for mask in 1u8..8 {
            let filter = FilterWhere::new()
                .contains("name", (mask & 1 != 0).then_some("a"))
                .at_least("num_employees", (mask & 2 != 0).then_some(1))
                .at_most("num_employees", (mask & 4 != 0).then_some(9));
            let count = mask.count_ones() as usize;
            let sql = filter.build();

            assert!(sql.query.starts_with("WHERE "), "mask {}: {}", mask, sql.query);
            assert_eq!(sql.query.matches("WHERE").count(), 1, "mask {}", mask);
            assert_eq!(sql.query.matches(" AND ").count(), count - 1, "mask {}", mask);
            assert_eq!(sql.params.len(), count, "mask {}", mask);
            for index in 1..=count {
                assert!(sql.query.contains(&format!("${}", index)), "mask {}: missing ${}", mask, index);
            }
            assert!(!sql.query.contains(&format!("${}", count + 1)));
        }
    }
}
