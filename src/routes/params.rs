use uuid::Uuid;

use crate::errors::AppError;
use crate::models::asset::AssetCatalog;
use crate::models::selection::{RangeDays, Selection};
use crate::models::table::{SortOrder, SortSpec};

/// Query string of the selector routes.
///
/// `assets` may be repeated (multi-select form) or comma-joined (the optimizer's
/// own format), so the raw query is parsed by hand instead of through `Query<T>`.
#[derive(Debug, Default)]
pub struct SelectorParams {
    pub session: Option<Uuid>,
    pub assets: Vec<String>,
    pub days: Option<i64>,
    pub include_all_assets: Option<bool>,
    pub filter: String,
    pub page: usize,
    pub sort: Option<SortSpec>,
}

impl SelectorParams {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        let mut params = SelectorParams {
            page: 1,
            ..Default::default()
        };
        let mut sort_column: Option<String> = None;
        let mut order = SortOrder::Asc;

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                // A stale or mangled id just means a new session
                "session" => params.session = Uuid::parse_str(value.trim()).ok(),
                "assets" => params.assets.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string),
                ),
                "days" => {
                    let days = value.trim().parse::<i64>().map_err(|_| {
                        AppError::Validation(format!("days must be a whole number, got `{}`", value))
                    })?;
                    params.days = Some(days);
                }
                "includeAllAssets" => params.include_all_assets = Some(parse_flag(&value)?),
                "filter" => params.filter = value.into_owned(),
                "page" => {
                    params.page = value.trim().parse::<usize>().map_err(|_| {
                        AppError::Validation(format!("page must be a positive number, got `{}`", value))
                    })?;
                }
                "sort" if !value.trim().is_empty() => sort_column = Some(value.into_owned()),
                "order" => {
                    order = SortOrder::parse(&value).ok_or_else(|| {
                        AppError::Validation(format!("order must be asc or desc, got `{}`", value))
                    })?;
                }
                _ => {}
            }
        }

        params.sort = sort_column.map(|column| SortSpec { column, order });
        Ok(params)
    }

    pub fn range(&self) -> RangeDays {
        self.days.map(RangeDays::new).unwrap_or_default()
    }

    /// Selection resolved against the catalog; unknown codes are rejected.
    pub fn selection(&self, catalog: &AssetCatalog) -> Result<Selection, AppError> {
        let (selection, unknown) =
            Selection::from_codes(catalog, self.assets.iter().map(String::as_str));
        if !unknown.is_empty() {
            return Err(AppError::Validation(format!(
                "Unknown asset code(s): {}",
                unknown.join(", ")
            )));
        }
        Ok(selection)
    }
}

fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" | "" => Ok(false),
        other => Err(AppError::Validation(format!(
            "includeAllAssets must be true or false, got `{}`",
            other
        ))),
    }
}
