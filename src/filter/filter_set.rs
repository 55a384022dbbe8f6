use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::{column_for, ColumnMap, SqlResult};

/// Builds the assignment list of a partial UPDATE.
///
/// Keys become SQL identifiers, so callers must only pass maps whose keys come
/// from a fixed allow-list (typed update payloads with `deny_unknown_fields`).
pub struct FilterSet;

impl FilterSet {
    /// `"col1"=$1, "col2"=$2, …` in the map's iteration order, with the values
    /// in the same order. The key placeholder for the WHERE clause is
    /// `SqlResult::next_param_index()`.
    pub fn generate(data: &Map<String, Value>, columns: ColumnMap) -> Result<SqlResult, FilterError> {
        if data.is_empty() {
            return Err(FilterError::NoData);
        }

        let mut assignments = Vec::with_capacity(data.len());
        let mut params = Vec::with_capacity(data.len());
        for (index, (field, value)) in data.iter().enumerate() {
            assignments.push(format!("\"{}\"=${}", column_for(field, columns), index + 1));
            params.push(value.clone());
        }

        Ok(SqlResult {
            query: assignments.join(", "),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: ColumnMap = &[("firstName", "first_name"), ("age", "age")];

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(FilterSet::generate(&Map::new(), COLUMNS), Err(FilterError::NoData));
    }

    #[test]
    fn translates_known_fields_and_passes_others_through() {
        let sql = FilterSet::generate(&map(json!({"age": 32, "firstName": "Aliya"})), COLUMNS).unwrap();
        assert_eq!(sql.query, "\"age\"=$1, \"first_name\"=$2");
        assert_eq!(sql.params, vec![json!(32), json!("Aliya")]);

        let sql = FilterSet::generate(&map(json!({"email": "a@b.co"})), COLUMNS).unwrap();
        assert_eq!(sql.query, "\"email\"=$1");
    }

    #[test]
    fn placeholders_run_one_to_k_and_key_is_k_plus_one() {
        let data = map(json!({"a": 1, "b": 2, "c": 3, "d": null}));
        let sql = FilterSet::generate(&data, &[]).unwrap();

        let expected: Vec<String> = data
            .keys()
            .enumerate()
            .map(|(i, key)| format!("\"{}\"=${}", key, i + 1))
            .collect();
        assert_eq!(sql.query, expected.join(", "));
        assert_eq!(sql.params, data.values().cloned().collect::<Vec<_>>());
        assert_eq!(sql.next_param_index(), 5);
    }
}
