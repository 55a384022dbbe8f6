use serde_json::Value;

/// A parameterized SQL fragment together with its bind values, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

impl SqlResult {
    /// Index of the next positional placeholder a caller may append after this fragment.
    pub fn next_param_index(&self) -> usize {
        self.params.len() + 1
    }
}

/// Maps an external field name to its persisted column name.
pub type ColumnMap = &'static [(&'static str, &'static str)];

pub fn column_for<'a>(field: &'a str, columns: ColumnMap) -> &'a str {
    columns
        .iter()
        .find(|(external, _)| *external == field)
        .map(|(_, column)| *column)
        .unwrap_or(field)
}
