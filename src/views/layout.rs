use crate::models::notification::{Toast, ToastSeverity};
use crate::views::{escape_html, input_panel, result_panel, SelectorView};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; background: #fff; color: #000; margin: 0; padding-bottom: 2.5rem; }
h1 { margin: 0.75rem 0 0 10%; font-size: 1.875rem; }
.panel { width: 80%; margin: 10vh auto 0; border: 1px solid #dee2e6; border-radius: 6px; }
.panel > header { background: #f8f9fa; padding: 1rem; font-weight: 600; border-bottom: 1px solid #dee2e6; }
.panel > .content { padding: 1rem 2.5rem; }
.chip { display: inline-block; background: #e9ecef; border-radius: 1rem; padding: 0.2rem 0.7rem; margin: 0 0.3rem 0.3rem 0; }
.toasts { position: fixed; top: 1rem; right: 1rem; width: 22rem; z-index: 10; }
.toast { padding: 0.75rem 1rem; margin-bottom: 0.5rem; border-radius: 6px; border-left: 6px solid; }
.toast.info { background: #e9f2fd; border-color: #3b82f6; }
.toast.success { background: #e4f8f0; border-color: #1ea97c; }
.toast.error { background: #ffe7e6; border-color: #ff5757; }
table { border-collapse: collapse; min-width: 50rem; margin-top: 1rem; }
th, td { border-bottom: 1px solid #dee2e6; padding: 0.5rem 0.75rem; text-align: left; }
.empty { color: #6c757d; font-style: italic; }
.pager a, .pager span { margin-right: 0.5rem; }
"#;

const TOAST_SCRIPT: &str = r#"
document.querySelectorAll('.toast[data-life]').forEach(function (el) {
  setTimeout(function () { el.remove(); }, parseInt(el.dataset.life, 10));
});
"#;

/// Complete HTML document for the selector view
pub fn render_page(view: &SelectorView<'_>) -> String {
    let results = match view.result {
        Some(result) => result_panel::render(view, result),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Efficient Frontier</title>
<script src="{plotly}"></script>
<style>{styles}</style>
</head>
<body>
<div class="toasts">{toasts}</div>
<h1>Efficient Frontier</h1>
{input}
{results}
<script>{toast_script}</script>
</body>
</html>"#,
        plotly = PLOTLY_CDN,
        styles = STYLES,
        toasts = render_toasts(view.notifications),
        input = input_panel::render(view),
        results = results,
        toast_script = TOAST_SCRIPT,
    )
}

fn render_toasts(toasts: &[Toast]) -> String {
    toasts
        .iter()
        .map(|t| {
            let class = match t.severity {
                ToastSeverity::Info => "info",
                ToastSeverity::Success => "success",
                ToastSeverity::Error => "error",
            };
            format!(
                r#"<div class="toast {}" role="status" data-life="{}"><strong>{}</strong><div>{}</div></div>"#,
                class,
                t.life_ms,
                escape_html(&t.summary),
                escape_html(&t.detail)
            )
        })
        .collect()
}
