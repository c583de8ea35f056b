use crate::models::asset::CatalogKind;
use crate::models::selection::{selection_label, SelectionLabel, MAX_RANGE_DAYS, MIN_RANGE_DAYS};
use crate::views::{escape_html, SelectorView, MAX_SELECTED_LABELS};

const FILTER_SCRIPT: &str = r#"
function filterAssets(input) {
  var needle = input.value.trim().toLowerCase();
  document.querySelectorAll('#assets option').forEach(function (opt) {
    var hay = (opt.textContent + ' ' + opt.value).toLowerCase();
    opt.hidden = needle.length > 0 && hay.indexOf(needle) === -1 && !opt.selected;
  });
}
"#;

pub(super) fn render(view: &SelectorView<'_>) -> String {
    let input = view.input;
    let days = input.range.get();

    let (header, heading) = match view.catalog.kind {
        CatalogKind::Crypto => ("Select the historical time period and crypto assets:", "Crypto Assets:"),
        CatalogKind::Extended => ("Select the historical time period and assets:", "Assets:"),
    };

    let chips = match selection_label(&input.selection, MAX_SELECTED_LABELS) {
        SelectionLabel::Placeholder => r#"<span class="empty">Select Assets</span>"#.to_string(),
        SelectionLabel::Summary(n) => format!("<span class=\"chip\">{} items selected</span>", n),
        SelectionLabel::Chips(names) => names
            .iter()
            .map(|n| format!("<span class=\"chip\">{}</span>", escape_html(n)))
            .collect(),
    };

    // Options outside the filter stay hidden but selected ones always show
    let visible: Vec<&str> = view
        .catalog
        .filter(view.filter)
        .into_iter()
        .map(|a| a.code.as_str())
        .collect();
    let options: String = view
        .catalog
        .assets
        .iter()
        .map(|a| {
            let selected = input.selection.contains(&a.code);
            let hidden = !selected && !visible.contains(&a.code.as_str());
            format!(
                "<option value=\"{}\"{}{}>{}</option>",
                escape_html(&a.code),
                if selected { " selected" } else { "" },
                if hidden { " hidden" } else { "" },
                escape_html(&a.name)
            )
        })
        .collect();

    let button = if view.loading {
        r#"<button type="submit" disabled>Calculating…</button>"#
    } else {
        r#"<button type="submit">Calculate Portfolio</button>"#
    };

    let failure = match view.last_error {
        Some(e) => format!("<p class=\"empty\">Last calculation failed: {}</p>", escape_html(e)),
        None => String::new(),
    };

    format!(
        r#"<section class="panel">
<header>{header}</header>
<form class="content" method="get" action="/calculate">
{session}
<h2>Time Period:</h2>
<label for="days">Last <span id="days-label">{days}</span> days</label><br>
<input type="range" id="days" name="days" min="{min_days}" max="{max_days}" value="{days}"
  oninput="document.getElementById('days-label').textContent = this.value">
<p>
<input type="checkbox" id="includeAllAssets" name="includeAllAssets" value="true"{include}>
<label for="includeAllAssets">Include all assets</label>
</p>
<h2>{heading}</h2>
<div class="chips">{chips}</div>
<input type="search" name="filter" placeholder="Filter" value="{filter}" oninput="filterAssets(this)">
<br>
<select id="assets" name="assets" multiple size="10">{options}</select>
<p class="empty">Select at least {min_selection} assets.</p>
{button}
{failure}
</form>
<script>{filter_script}</script>
</section>"#,
        header = header,
        session = view
            .session
            .map(|id| format!("<input type=\"hidden\" name=\"session\" value=\"{}\">", id))
            .unwrap_or_default(),
        days = days,
        min_days = MIN_RANGE_DAYS,
        max_days = MAX_RANGE_DAYS,
        include = if input.include_all_assets { " checked" } else { "" },
        heading = heading,
        chips = chips,
        filter = escape_html(view.filter),
        options = options,
        min_selection = view.min_selection,
        button = button,
        failure = failure,
        filter_script = FILTER_SCRIPT,
    )
}
