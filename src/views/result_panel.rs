use serde_json::Value;

use crate::models::optimization::OptimizationResult;
use crate::models::table::{SortOrder, SortSpec, TablePage, TableView};
use crate::services::table_service::{derive_table, format_cell, paginate};
use crate::views::{escape_html, script_json, view_link, SelectorView};

const EMPTY_TABLE: &str = r#"<p class="empty">No portfolios returned.</p>"#;

pub(super) fn render(view: &SelectorView<'_>, result: &OptimizationResult) -> String {
    let chart = &result.efficient_frontier;
    let primary = render_table(&derive_table(&result.portfolio), None);

    let page = paginate(&result.all_portfolios, view.page, view.sort.clone());
    let secondary = render_table(&page.table, Some((view, &page)));
    let pager = render_pager(view, &page);

    // Keep the accordion open while the user pages or sorts
    let open = if view.page > 1 || view.sort.is_some() { " open" } else { "" };

    format!(
        r#"<section class="panel">
<header>Optimized Portfolio:</header>
<div class="content">
<p>The portfolio is calculated using the selected assets and the historical data from the last {days} days.</p>
<div id="frontier" style="width:100%"></div>
<script>Plotly.newPlot("frontier", {data}, {layout});</script>
<div>{primary}</div>
<details style="margin-top:30px"{open}>
<summary>Show all optimized Portfolios</summary>
{secondary}
{pager}
</details>
</div>
</section>"#,
        days = view.input.range.get(),
        data = script_json(&chart.data),
        layout = script_json(&layout_or_empty(chart.layout())),
        primary = primary,
        open = open,
        secondary = secondary,
        pager = pager,
    )
}

fn layout_or_empty(layout: Option<&Value>) -> Value {
    layout.cloned().unwrap_or_else(|| Value::Object(Default::default()))
}

/// Headers become sort links when the table is the paginated one
fn render_table(table: &TableView, sortable: Option<(&SelectorView<'_>, &TablePage)>) -> String {
    let (columns, rows) = match table {
        TableView::Empty => return EMPTY_TABLE.to_string(),
        TableView::Rows { columns, rows } => (columns, rows),
    };

    let head: String = columns
        .iter()
        .map(|c| match sortable {
            None => format!("<th>{}</th>", escape_html(c)),
            Some((view, page)) => {
                let current = page.sort.as_ref().filter(|s| &s.column == c);
                let order = current.map(|s| s.order.flipped()).unwrap_or(SortOrder::Asc);
                let marker = match current.map(|s| s.order) {
                    Some(SortOrder::Asc) => " ▲",
                    Some(SortOrder::Desc) => " ▼",
                    None => "",
                };
                let link = view_link(
                    view.session,
                    1,
                    Some(&SortSpec { column: c.clone(), order }),
                );
                format!(
                    "<th><a href=\"{}\">{}</a>{}</th>",
                    escape_html(&link),
                    escape_html(c),
                    marker
                )
            }
        })
        .collect();

    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|v| format!("<td>{}</td>", escape_html(&format_cell(v))))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();

    format!("<table><thead><tr>{}</tr></thead><tbody>{}</tbody></table>", head, body)
}

fn render_pager(view: &SelectorView<'_>, page: &TablePage) -> String {
    if page.page_count <= 1 {
        return String::new();
    }

    let links: String = (1..=page.page_count)
        .map(|n| {
            if n == page.page {
                format!("<span>{}</span>", n)
            } else {
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape_html(&view_link(view.session, n, page.sort.as_ref())),
                    n
                )
            }
        })
        .collect();

    format!(
        "<div class=\"pager\">{}<span>Page {} of {} ({} portfolios)</span></div>",
        links, page.page, page.page_count, page.total_rows
    )
}
