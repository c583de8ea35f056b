use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Body returned by the optimization service.
///
/// Every field is itself a JSON document serialized into a string, so the
/// payload has to be decoded twice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawOptimizationResponse {
    pub efficient_frontier: String,
    pub portfolio: String,
    pub all_portfolios: String,
}

/// Plotly figure as produced by the service.
///
/// Only `data` is required. Every other top-level key, `layout` included, is
/// kept exactly as received (an explicit `null` stays `null`, an absent key
/// stays absent) so re-encoding gives back the same document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSpec {
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChartSpec {
    /// The figure's layout, if the service sent a non-null one
    pub fn layout(&self) -> Option<&Value> {
        self.extra.get("layout").filter(|v| !v.is_null())
    }
}

/// One table row: column name to cell value, in document order
pub type Row = Map<String, Value>;

/// Rows enumerated from the service's `{ "<id>": { ... } }` mapping
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct RowCollection(Vec<Row>);

impl RowCollection {
    pub fn new(rows: Vec<Row>) -> Self {
        Self(rows)
    }

    /// Accepts either an object keyed by portfolio id or a plain array of rows.
    pub fn from_value(field: &'static str, value: Value) -> Result<Self, DecodeError> {
        let entries: Vec<Value> = match value {
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            Value::Array(items) => items,
            other => {
                return Err(DecodeError::UnexpectedShape {
                    field,
                    found: kind_of(&other),
                })
            }
        };

        let rows = entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| match entry {
                Value::Object(row) => Ok(row),
                other => Err(DecodeError::BadRow {
                    field,
                    index: idx,
                    found: kind_of(&other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(rows))
    }

    pub fn rows(&self) -> &[Row] {
        &self.0
    }

    pub fn first(&self) -> Option<&Row> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("field `{field}` is not valid JSON: {message}")]
    InvalidJson { field: &'static str, message: String },

    #[error("field `{field}` decoded to {found}, expected an object or array of rows")]
    UnexpectedShape { field: &'static str, found: &'static str },

    #[error("field `{field}` row {index} is {found}, expected an object")]
    BadRow {
        field: &'static str,
        index: usize,
        found: &'static str,
    },
}

/// Fully decoded optimizer answer
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub efficient_frontier: ChartSpec,
    pub portfolio: RowCollection,
    pub all_portfolios: RowCollection,
}

impl OptimizationResult {
    /// Second decoding pass over the string-encoded fields.
    pub fn decode(raw: &RawOptimizationResponse) -> Result<Self, DecodeError> {
        let efficient_frontier: ChartSpec = serde_json::from_str(&raw.efficient_frontier)
            .map_err(|e| DecodeError::InvalidJson {
                field: "efficientFrontier",
                message: e.to_string(),
            })?;

        let portfolio = RowCollection::from_value("portfolio", parse_field("portfolio", &raw.portfolio)?)?;
        let all_portfolios = RowCollection::from_value(
            "allPortfolios",
            parse_field("allPortfolios", &raw.all_portfolios)?,
        )?;

        Ok(Self {
            efficient_frontier,
            portfolio,
            all_portfolios,
        })
    }
}

fn parse_field(field: &'static str, encoded: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(encoded).map_err(|e| DecodeError::InvalidJson {
        field,
        message: e.to_string(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
