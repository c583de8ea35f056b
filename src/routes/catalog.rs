use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::asset::{Asset, CatalogKind};
use crate::models::selection::{DEFAULT_RANGE_DAYS, MAX_RANGE_DAYS, MIN_RANGE_DAYS};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_catalog))
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub filter: String,
}

#[derive(Debug, Serialize)]
pub struct RangeBounds {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub kind: CatalogKind,
    pub min_selection: usize,
    pub range_days: RangeBounds,
    pub assets: Vec<Asset>,
}

/// GET /api/catalog
///
/// Selectable assets plus the limits the dispatcher enforces.
///
/// Example: GET /api/catalog?filter=coin
pub async fn get_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogResponse> {
    info!("GET /api/catalog - filter={:?}", query.filter);

    Json(CatalogResponse {
        kind: state.catalog.kind,
        min_selection: state.selector.min_selection(),
        range_days: RangeBounds {
            min: MIN_RANGE_DAYS,
            max: MAX_RANGE_DAYS,
            default: DEFAULT_RANGE_DAYS,
        },
        assets: state
            .catalog
            .filter(&query.filter)
            .into_iter()
            .cloned()
            .collect(),
    })
}
