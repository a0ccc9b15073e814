//! Columnar result-set contract shared by the stats endpoints.
//!
//! Every tabular endpoint responds with `resultSets: [{headers, rowSet}]`
//! where `rowSet[i][j]` corresponds to `headers[j]`.

use serde_json::Value;

use crate::normalize::NormalizeError;

/// A parsed columnar result set.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Extract the first result set from an endpoint response body.
    pub fn from_response(body: &Value) -> Result<Self, NormalizeError> {
        let set = body
            .get("resultSets")
            .and_then(|v| v.get(0))
            .ok_or_else(|| NormalizeError::MalformedResponse("missing resultSets".into()))?;

        let headers = set
            .get("headers")
            .and_then(Value::as_array)
            .ok_or_else(|| NormalizeError::MalformedResponse("missing headers".into()))?
            .iter()
            .map(|h| h.as_str().unwrap_or_default().to_string())
            .collect();

        let rows = set
            .get("rowSet")
            .and_then(Value::as_array)
            .ok_or_else(|| NormalizeError::MalformedResponse("missing rowSet".into()))?
            .iter()
            .map(|row| row.as_array().cloned().unwrap_or_default())
            .collect();

        Ok(ResultSet { headers, rows })
    }

    /// Build a result set from already-stringly CSV data, re-typing numeric
    /// cells. Used when reading the intermediate files back for loading.
    pub fn from_csv(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        if cell.is_empty() {
                            Value::Null
                        } else if let Ok(n) = cell.parse::<i64>() {
                            Value::from(n)
                        } else if let Ok(f) = cell.parse::<f64>() {
                            Value::from(f)
                        } else {
                            Value::from(cell)
                        }
                    })
                    .collect()
            })
            .collect();
        ResultSet { headers, rows }
    }

    /// Index of a header, case-insensitive.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Require a header, mapping absence to a per-unit-skippable error.
    pub fn require(&self, name: &str) -> Result<usize, NormalizeError> {
        self.column(name)
            .ok_or_else(|| NormalizeError::MissingColumn(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
