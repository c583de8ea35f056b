//! Server-rendered HTML for the selector: an input panel, toasts and, once the
//! optimizer has answered, the result panel.

mod input_panel;
mod layout;
mod result_panel;

use serde_json::Value;
use uuid::Uuid;

use crate::models::asset::AssetCatalog;
use crate::models::notification::Toast;
use crate::models::optimization::OptimizationResult;
use crate::models::selection::SelectorInput;
use crate::models::table::SortSpec;

pub use layout::render_page;

/// Soft cap on chips shown in the closed multi-select
pub const MAX_SELECTED_LABELS: usize = 10;

/// Everything one render of the selector page needs
pub struct SelectorView<'a> {
    /// Absent until the first calculation stores the view
    pub session: Option<Uuid>,
    pub catalog: &'a AssetCatalog,
    pub min_selection: usize,
    pub input: &'a SelectorInput,
    pub filter: &'a str,
    pub loading: bool,
    pub notifications: &'a [Toast],
    pub result: Option<&'a OptimizationResult>,
    pub last_error: Option<&'a str>,
    pub page: usize,
    pub sort: Option<SortSpec>,
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON safe to inline in a `<script>` element
pub(crate) fn script_json(value: &Value) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
}

/// `/?session=..` link carrying the table state
pub(crate) fn view_link(session: Option<Uuid>, page: usize, sort: Option<&SortSpec>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(session) = session {
        query.append_pair("session", &session.to_string());
    }
    query.append_pair("page", &page.to_string());
    if let Some(sort) = sort {
        query.append_pair("sort", &sort.column);
        query.append_pair("order", sort.order.as_str());
    }
    format!("/?{}", query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::table::SortOrder;
    use serde_json::json;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"AT&T\"</b>"), "&lt;b&gt;&quot;AT&amp;T&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_script_json_cannot_close_the_script() {
        let encoded = script_json(&json!({"title": "</script><script>alert(1)"}));
        assert!(!encoded.contains("</script>"));
        let back: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back["title"], "</script><script>alert(1)");
    }

    #[test]
    fn test_view_link_encodes_column() {
        let link = view_link(
            Some(Uuid::nil()),
            2,
            Some(&SortSpec { column: "Sharpe Ratio".into(), order: SortOrder::Desc }),
        );
        assert_eq!(
            link,
            "/?session=00000000-0000-0000-0000-000000000000&page=2&sort=Sharpe+Ratio&order=desc"
        );
    }
}
