use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notification::Toast;
use crate::models::optimization::ChartSpec;
use crate::models::selection::SelectorInput;
use crate::models::table::{TablePage, TableView};
use crate::routes::params::SelectorParams;
use crate::services::table_service::{derive_table, paginate};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(optimize_portfolio))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub efficient_frontier: ChartSpec,
    pub portfolio: TableView,
    pub all_portfolios: TablePage,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchReport {
    Success {
        dispatch_id: Option<Uuid>,
        notifications: Vec<Toast>,
        result: PortfolioReport,
    },
    Failure {
        dispatch_id: Option<Uuid>,
        notifications: Vec<Toast>,
        error: String,
    },
}

/// GET /api/portfolio
///
/// Stateless dispatch with the optimizer's own query format.
/// Validation failures answer 400 and optimizer failures 502; both bodies
/// carry the notifications a view would have shown.
///
/// Example: GET /api/portfolio?assets=BTC-USD,ETH-USD&days=365&includeAllAssets=false&page=1
#[axum::debug_handler]
pub async fn optimize_portfolio(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let params = SelectorParams::parse(query.as_deref())?;
    let input = SelectorInput {
        selection: params.selection(&state.catalog)?,
        range: params.range(),
        include_all_assets: params.include_all_assets.unwrap_or(false),
    };
    info!(
        "GET /api/portfolio - assets={:?}, days={}, include_all_assets={}",
        input.selection.codes(),
        input.range.get(),
        input.include_all_assets
    );

    let dispatch = state.selector.dispatch(&input).await;

    let response = match dispatch.outcome {
        Ok(result) => {
            let report = PortfolioReport {
                portfolio: derive_table(&result.portfolio),
                all_portfolios: paginate(&result.all_portfolios, params.page, params.sort.clone()),
                efficient_frontier: result.efficient_frontier,
            };
            (
                StatusCode::OK,
                Json(DispatchReport::Success {
                    dispatch_id: dispatch.dispatch_id,
                    notifications: dispatch.notifications,
                    result: report,
                }),
            )
                .into_response()
        }
        Err(e) => {
            let status = if e.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            (
                status,
                Json(DispatchReport::Failure {
                    dispatch_id: dispatch.dispatch_id,
                    notifications: dispatch.notifications,
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    Ok(response)
}
