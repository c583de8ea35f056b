use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::params::SelectorParams;
use crate::services::selector_service::{SelectorState, SharedSelector};
use crate::state::AppState;
use crate::views::{render_page, SelectorView};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_selector))
        .route("/calculate", get(calculate))
}

/// GET /
///
/// Renders the selector view of a live session. Without one a blank view is
/// rendered and nothing is stored until the first calculation.
pub async fn show_selector(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let params = SelectorParams::parse(query.as_deref())?;
    let stored = params
        .session
        .and_then(|id| state.sessions.get(&id).map(|view_state| (id, view_state)));

    let html = match stored {
        Some((session, view_state)) => {
            info!("GET / - Rendering selector session {}", session);
            render(&state, Some(session), &view_state, &params)
        }
        None => {
            info!("GET / - Rendering blank selector");
            let blank: SharedSelector = Arc::new(Mutex::new(SelectorState::default()));
            render(&state, None, &blank, &params)
        }
    };
    Ok(Html(html))
}

/// GET /calculate
///
/// Submit action of the input panel: stores the form values in the session,
/// runs the dispatcher and renders the outcome. Validation failures are shown
/// as toasts on the page rather than as HTTP errors.
pub async fn calculate(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let params = SelectorParams::parse(query.as_deref())?;
    let selection = params.selection(&state.catalog)?;
    let (session, view_state) = state.sessions.get_or_create(params.session);
    info!(
        "GET /calculate - session {} submitted {} assets",
        session,
        selection.len()
    );

    {
        let mut guard = view_state.lock();
        guard.input.selection = selection;
        guard.input.range = params.range();
        // An unchecked checkbox is simply absent from the form
        guard.input.include_all_assets = params.include_all_assets.unwrap_or(false);
    }

    // The outcome is already recorded in the session as toasts and state
    let _ = state.selector.load(&view_state).await;

    let params = SelectorParams {
        page: 1,
        sort: None,
        ..params
    };
    Ok(Html(render(&state, Some(session), &view_state, &params)))
}

fn render(
    state: &AppState,
    session: Option<Uuid>,
    view_state: &SharedSelector,
    params: &SelectorParams,
) -> String {
    let mut guard = view_state.lock();
    let notifications = guard.take_notifications();

    let view = SelectorView {
        session,
        catalog: &state.catalog,
        min_selection: state.selector.min_selection(),
        input: &guard.input,
        filter: &params.filter,
        loading: guard.loading,
        notifications: &notifications,
        result: guard.result.as_ref(),
        last_error: guard.last_error.as_deref(),
        page: params.page,
        sort: params.sort.clone(),
    };
    render_page(&view)
}
