use std::cmp::Ordering;

use serde_json::Value;

use crate::models::optimization::{Row, RowCollection};
use crate::models::table::{SortOrder, SortSpec, TablePage, TableView, PAGE_SIZE};

/// Columns are taken from the first row's keys; later rows are read by those keys
/// and missing cells become null.
pub fn derive_table(collection: &RowCollection) -> TableView {
    let Some(first) = collection.first() else {
        return TableView::Empty;
    };

    let columns: Vec<String> = first.keys().cloned().collect();
    let rows = collection
        .rows()
        .iter()
        .map(|row| project(row, &columns))
        .collect();

    TableView::Rows { columns, rows }
}

/// Number of pages needed for `total` rows, never less than one
pub fn page_count(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size)
}

/// Sorts (when asked) and slices one page. Out-of-range pages are clamped.
/// Sorting on a column the table does not have is ignored.
pub fn paginate(collection: &RowCollection, page: usize, sort: Option<SortSpec>) -> TablePage {
    let total_rows = collection.len();
    let page_count = page_count(total_rows, PAGE_SIZE);
    let page = page.clamp(1, page_count);

    let (columns, mut rows) = match derive_table(collection) {
        TableView::Empty => {
            return TablePage {
                table: TableView::Empty,
                page,
                page_count,
                total_rows,
                sort: None,
            }
        }
        TableView::Rows { columns, rows } => (columns, rows),
    };

    let sort = sort.filter(|s| columns.iter().any(|c| c == &s.column));
    if let Some(spec) = &sort {
        if let Some(idx) = columns.iter().position(|c| c == &spec.column) {
            rows.sort_by(|a, b| match (&a[idx], &b[idx]) {
                (Value::Null, Value::Null) => Ordering::Equal,
                (Value::Null, _) => Ordering::Greater,
                (_, Value::Null) => Ordering::Less,
                (x, y) => match spec.order {
                    SortOrder::Asc => compare_cells(x, y),
                    SortOrder::Desc => compare_cells(x, y).reverse(),
                },
            });
        }
    }

    let start = (page - 1) * PAGE_SIZE;
    let rows: Vec<Vec<Value>> = rows.into_iter().skip(start).take(PAGE_SIZE).collect();

    TablePage {
        table: TableView::Rows { columns, rows },
        page,
        page_count,
        total_rows,
        sort,
    }
}

fn project(row: &Row, columns: &[String]) -> Vec<Value> {
    columns
        .iter()
        .map(|c| row.get(c).cloned().unwrap_or(Value::Null))
        .collect()
}

// Numbers before strings before everything else. Nulls are handled by the caller.
fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::String(_), _) => Ordering::Less,
        (_, Value::String(_)) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Display text for a cell. Floats are trimmed to four decimals.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => format!("{:.4}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
