use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rows shown on one page of the secondary table
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub order: SortOrder,
}

/// Table whose columns follow the shape of the data
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TableView {
    /// Nothing to derive columns from
    Empty,
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
}

impl TableView {
    pub fn row_count(&self) -> usize {
        match self {
            TableView::Empty => 0,
            TableView::Rows { rows, .. } => rows.len(),
        }
    }

    pub fn columns(&self) -> &[String] {
        match self {
            TableView::Empty => &[],
            TableView::Rows { columns, .. } => columns,
        }
    }
}

/// One page of a sortable, paginated table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TablePage {
    pub table: TableView,
    /// 1-based
    pub page: usize,
    pub page_count: usize,
    pub total_rows: usize,
    pub sort: Option<SortSpec>,
}
