use serde::{Deserialize, Serialize};

/// Metadata of one remote lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable {
    /// Stable key of the table
    pub id: String,
    pub name: String,
    /// Library path used to query the table contents
    pub content_path: String,
}

/// One column name/value pair of a row mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub column_name: String,
    pub column_value: String,
}

impl Column {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { column_name: name.into(), column_value: value.into() }
    }
}
