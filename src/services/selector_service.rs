use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::external::optimizer_provider::{OptimizationProvider, OptimizationQuery, OptimizerError};
use crate::models::notification::{Toast, CALCULATING_MESSAGE, OPTIMISED_MESSAGE};
use crate::models::optimization::{DecodeError, OptimizationResult};
use crate::models::selection::{Selection, SelectorInput};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Please select at least {min} assets.")]
    NotEnoughAssets { min: usize, selected: usize },

    #[error("optimizer request failed: {0}")]
    Optimizer(#[from] OptimizerError),

    #[error("optimizer result could not be decoded: {0}")]
    Decode(#[from] DecodeError),
}

impl DispatchError {
    /// True when the request never left the view
    pub fn is_validation(&self) -> bool {
        matches!(self, DispatchError::NotEnoughAssets { .. })
    }
}

/// In-memory state of one selector view
#[derive(Debug, Clone)]
pub struct SelectorState {
    pub input: SelectorInput,
    pub loading: bool,
    pub result: Option<OptimizationResult>,
    pub last_error: Option<String>,
    /// Toasts not yet shown to the user
    pub notifications: Vec<Toast>,
    pub last_dispatch: Option<Uuid>,
    pub touched_at: DateTime<Utc>,
}

impl Default for SelectorState {
    fn default() -> Self {
        Self {
            input: SelectorInput::default(),
            loading: false,
            result: None,
            last_error: None,
            notifications: Vec::new(),
            last_dispatch: None,
            touched_at: Utc::now(),
        }
    }
}

impl SelectorState {
    pub fn take_notifications(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.notifications)
    }
}

pub type SharedSelector = Arc<Mutex<SelectorState>>;

/// Outcome of a dispatch that is not bound to a view
#[derive(Debug)]
pub struct Dispatch {
    pub dispatch_id: Option<Uuid>,
    pub notifications: Vec<Toast>,
    pub outcome: Result<OptimizationResult, DispatchError>,
}

#[derive(Debug, Clone)]
pub struct DispatchSummary {
    pub dispatch_id: Uuid,
    pub assets: usize,
    pub days: u32,
}

/// Validates selections, calls the optimizer and decodes its answer
#[derive(Clone)]
pub struct PortfolioSelector {
    provider: Arc<dyn OptimizationProvider>,
    min_selection: usize,
}

impl PortfolioSelector {
    pub fn new(provider: Arc<dyn OptimizationProvider>, min_selection: usize) -> Self {
        Self {
            provider,
            min_selection,
        }
    }

    pub fn min_selection(&self) -> usize {
        self.min_selection
    }

    pub fn validate(&self, selection: &Selection) -> Result<(), DispatchError> {
        if selection.len() < self.min_selection {
            return Err(DispatchError::NotEnoughAssets {
                min: self.min_selection,
                selected: selection.len(),
            });
        }
        Ok(())
    }

    pub fn build_query(input: &SelectorInput) -> OptimizationQuery {
        OptimizationQuery {
            assets: input
                .selection
                .codes()
                .into_iter()
                .map(str::to_string)
                .collect(),
            days: input.range.get(),
            include_all_assets: input.include_all_assets,
        }
    }

    /// One optimizer round trip plus the second decoding pass.
    pub async fn fetch_graph(
        &self,
        query: &OptimizationQuery,
    ) -> Result<OptimizationResult, DispatchError> {
        let raw = self.provider.fetch_portfolio(query).await?;
        let result = OptimizationResult::decode(&raw)?;
        Ok(result)
    }

    /// Submit action of a view.
    ///
    /// The lock is released while the optimizer works, so a second submit can
    /// overlap; whichever finishes last owns the stored result.
    pub async fn load(&self, state: &SharedSelector) -> Result<(), DispatchError> {
        let (summary, query) = {
            let mut guard = state.lock();
            guard.touched_at = Utc::now();

            if let Err(e) = self.validate(&guard.input.selection) {
                warn!("Rejected selection: {}", e);
                guard.notifications.push(Toast::error(e.to_string()));
                return Err(e);
            }

            let summary = self.start(&guard.input);
            guard.notifications.push(Toast::info(CALCULATING_MESSAGE));
            guard.loading = true;
            guard.result = None;
            guard.last_error = None;
            guard.last_dispatch = Some(summary.dispatch_id);
            (summary, Self::build_query(&guard.input))
        };

        let outcome = self.fetch_graph(&query).await;

        let mut guard = state.lock();
        guard.loading = false;
        guard.touched_at = Utc::now();
        if guard.last_dispatch != Some(summary.dispatch_id) {
            warn!(
                "Dispatch {} finished after a newer submit; its result replaces the current one",
                summary.dispatch_id
            );
        }

        match outcome {
            Ok(result) => {
                log_success(&summary, &result);
                guard.result = Some(result);
                guard.last_error = None;
                guard.notifications.push(Toast::success(OPTIMISED_MESSAGE));
                Ok(())
            }
            Err(e) => {
                error!("❌ Dispatch {} failed: {}", summary.dispatch_id, e);
                guard.last_error = Some(e.to_string());
                guard.notifications.push(Toast::error(failure_message(&e)));
                Err(e)
            }
        }
    }

    /// Same flow as [`load`](Self::load) without a view behind it.
    pub async fn dispatch(&self, input: &SelectorInput) -> Dispatch {
        let mut notifications = Vec::new();

        if let Err(e) = self.validate(&input.selection) {
            warn!("Rejected selection: {}", e);
            notifications.push(Toast::error(e.to_string()));
            return Dispatch {
                dispatch_id: None,
                notifications,
                outcome: Err(e),
            };
        }

        let summary = self.start(input);
        notifications.push(Toast::info(CALCULATING_MESSAGE));

        let outcome = self.fetch_graph(&Self::build_query(input)).await;
        match &outcome {
            Ok(result) => {
                log_success(&summary, result);
                notifications.push(Toast::success(OPTIMISED_MESSAGE));
            }
            Err(e) => {
                error!("❌ Dispatch {} failed: {}", summary.dispatch_id, e);
                notifications.push(Toast::error(failure_message(e)));
            }
        }

        Dispatch {
            dispatch_id: Some(summary.dispatch_id),
            notifications,
            outcome,
        }
    }

    fn start(&self, input: &SelectorInput) -> DispatchSummary {
        let summary = DispatchSummary {
            dispatch_id: Uuid::new_v4(),
            assets: input.selection.len(),
            days: input.range.get(),
        };
        info!(
            "🚀 Dispatch {} - {} assets over {} days (include_all_assets={})",
            summary.dispatch_id, summary.assets, summary.days, input.include_all_assets
        );
        summary
    }
}

fn log_success(summary: &DispatchSummary, result: &OptimizationResult) {
    info!(
        "✅ Dispatch {} done - {} portfolio rows, {} frontier rows",
        summary.dispatch_id,
        result.portfolio.len(),
        result.all_portfolios.len()
    );
}

fn failure_message(e: &DispatchError) -> String {
    format!("Portfolio optimisation failed: {}", e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::{AssetCatalog, CatalogKind};
    use crate::models::notification::ToastSeverity;
    use crate::models::optimization::RawOptimizationResponse;
    use crate::models::selection::RangeDays;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    /// Records every query and replies with a canned answer
    struct StubOptimizer {
        calls: Mutex<Vec<OptimizationQuery>>,
        reply: Result<RawOptimizationResponse, String>,
    }

    impl StubOptimizer {
        fn ok(reply: RawOptimizationResponse) -> Arc<Self> {
            Arc::new(Self { calls: Mutex::new(Vec::new()), reply: Ok(reply) })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self { calls: Mutex::new(Vec::new()), reply: Err(message.to_string()) })
        }

        fn calls(&self) -> Vec<OptimizationQuery> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl OptimizationProvider for StubOptimizer {
        async fn fetch_portfolio(
            &self,
            query: &OptimizationQuery,
        ) -> Result<RawOptimizationResponse, OptimizerError> {
            self.calls.lock().push(query.clone());
            self.reply.clone().map_err(OptimizerError::Network)
        }
    }

    /// Parks every request until the test hands it a reply
    struct GatedOptimizer {
        gates: Mutex<VecDeque<oneshot::Receiver<RawOptimizationResponse>>>,
    }

    impl GatedOptimizer {
        fn waiting(&self) -> usize {
            self.gates.lock().len()
        }
    }

    #[async_trait]
    impl OptimizationProvider for GatedOptimizer {
        async fn fetch_portfolio(
            &self,
            _query: &OptimizationQuery,
        ) -> Result<RawOptimizationResponse, OptimizerError> {
            let gate = self.gates.lock().pop_front();
            match gate {
                Some(rx) => rx.await.map_err(|e| OptimizerError::Network(e.to_string())),
                None => Err(OptimizerError::Network("no reply queued".into())),
            }
        }
    }

    fn figure() -> Value {
        json!({
            "data": [{"x": [0.21, 0.35], "y": [0.11, 0.19], "type": "scatter", "mode": "lines"}],
            "layout": {"title": "Efficient Frontier", "xaxis": {"title": "Volatility"}}
        })
    }

    fn response(portfolio: Value, all: Value) -> RawOptimizationResponse {
        RawOptimizationResponse {
            efficient_frontier: figure().to_string(),
            portfolio: portfolio.to_string(),
            all_portfolios: all.to_string(),
        }
    }

    fn input(codes: &[&str], days: i64, include_all_assets: bool) -> SelectorInput {
        let catalog = AssetCatalog::for_kind(CatalogKind::Crypto);
        let (selection, unknown) = Selection::from_codes(&catalog, codes.iter().copied());
        assert!(unknown.is_empty());
        SelectorInput { selection, range: RangeDays::new(days), include_all_assets }
    }

    fn shared(input: SelectorInput) -> SharedSelector {
        Arc::new(Mutex::new(SelectorState { input, ..SelectorState::default() }))
    }

    #[tokio::test]
    async fn test_below_minimum_never_calls_optimizer() {
        let stub = StubOptimizer::ok(response(json!({}), json!({})));
        let selector = PortfolioSelector::new(stub.clone(), 2);
        let state = shared(input(&["BTC-USD"], 365, false));

        let err = selector.load(&state).await.unwrap_err();

        assert!(err.is_validation());
        assert!(stub.calls().is_empty());
        let guard = state.lock();
        assert!(!guard.loading);
        assert_eq!(guard.notifications.len(), 1);
        assert_eq!(guard.notifications[0].severity, ToastSeverity::Error);
        assert_eq!(guard.notifications[0].detail, "Please select at least 2 assets.");
    }

    #[tokio::test]
    async fn test_threshold_is_configurable() {
        let stub = StubOptimizer::ok(response(json!({}), json!({})));
        let selector = PortfolioSelector::new(stub.clone(), 4);

        let dispatch = selector
            .dispatch(&input(&["BTC-USD", "ETH-USD", "SOL-USD"], 365, false))
            .await;

        assert!(matches!(
            dispatch.outcome,
            Err(DispatchError::NotEnoughAssets { min: 4, selected: 3 })
        ));
        assert_eq!(dispatch.notifications[0].detail, "Please select at least 4 assets.");
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_valid_selection_sends_one_request_in_selection_order() {
        let stub = StubOptimizer::ok(response(json!({}), json!({})));
        let selector = PortfolioSelector::new(stub.clone(), 2);
        let state = shared(input(&["SOL-USD", "BTC-USD", "ETH-USD"], 500, true));

        selector.load(&state).await.unwrap();

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].assets, vec!["SOL-USD", "BTC-USD", "ETH-USD"]);
        assert_eq!(calls[0].days, 500);
        assert!(calls[0].include_all_assets);
    }

    #[tokio::test]
    async fn test_bitcoin_ethereum_scenario_query() {
        let stub = StubOptimizer::ok(response(json!({}), json!({})));
        let selector = PortfolioSelector::new(stub.clone(), 2);

        selector.dispatch(&input(&["BTC-USD", "ETH-USD"], 365, false)).await;

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].to_query_string(),
            "assets=BTC-USD,ETH-USD&days=365&includeAllAssets=false"
        );
    }

    #[tokio::test]
    async fn test_successful_load_stores_decoded_result() {
        let portfolio = json!({"0": {"Return": 0.31, "Volatility": 0.52, "BTC-USD": 0.6, "ETH-USD": 0.4}});
        let all = json!({
            "0": {"Return": 0.31, "Volatility": 0.52},
            "1": {"Return": 0.28, "Volatility": 0.47}
        });
        let stub = StubOptimizer::ok(response(portfolio, all));
        let selector = PortfolioSelector::new(stub, 2);
        let state = shared(input(&["BTC-USD", "ETH-USD"], 365, false));

        selector.load(&state).await.unwrap();

        let mut guard = state.lock();
        assert!(!guard.loading);
        let result = guard.result.clone().unwrap();
        assert_eq!(serde_json::to_value(&result.efficient_frontier).unwrap(), figure());
        assert_eq!(result.portfolio.len(), 1);
        assert_eq!(result.all_portfolios.len(), 2);

        let severities: Vec<_> = guard.take_notifications().iter().map(|t| t.severity).collect();
        assert_eq!(severities, vec![ToastSeverity::Info, ToastSeverity::Success]);
        assert!(guard.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_failure_clears_busy_flag_and_reports_error() {
        let stub = StubOptimizer::failing("connection refused");
        let selector = PortfolioSelector::new(stub.clone(), 2);
        let state = shared(input(&["BTC-USD", "ETH-USD"], 365, false));
        state.lock().result = Some(OptimizationResult::decode(&response(json!({}), json!({}))).unwrap());

        let err = selector.load(&state).await.unwrap_err();

        assert!(matches!(err, DispatchError::Optimizer(OptimizerError::Network(_))));
        assert_eq!(stub.calls().len(), 1);
        let guard = state.lock();
        assert!(!guard.loading);
        assert!(guard.result.is_none(), "prior result is cleared when a new dispatch starts");
        assert!(guard.last_error.as_deref().unwrap_or_default().contains("connection refused"));
        let last = guard.notifications.last().unwrap();
        assert_eq!(last.severity, ToastSeverity::Error);
        assert!(!guard.notifications.iter().any(|t| t.severity == ToastSeverity::Success));
    }

    #[tokio::test]
    async fn test_malformed_nested_json_is_a_decode_error() {
        let mut reply = response(json!({}), json!({}));
        reply.efficient_frontier = "<html>".to_string();
        let selector = PortfolioSelector::new(StubOptimizer::ok(reply), 2);

        let dispatch = selector.dispatch(&input(&["BTC-USD", "ETH-USD"], 365, false)).await;

        assert!(matches!(dispatch.outcome, Err(DispatchError::Decode(_))));
        assert!(dispatch.dispatch_id.is_some());
        assert_eq!(dispatch.notifications.last().unwrap().severity, ToastSeverity::Error);
    }

    #[tokio::test]
    async fn test_empty_portfolio_decodes_to_empty_collection() {
        let selector = PortfolioSelector::new(StubOptimizer::ok(response(json!({}), json!({}))), 2);

        let dispatch = selector.dispatch(&input(&["BTC-USD", "ETH-USD"], 365, false)).await;

        let result = dispatch.outcome.unwrap();
        assert!(result.portfolio.is_empty());
        assert!(result.all_portfolios.is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_loads_keep_the_last_completion() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let stub = Arc::new(GatedOptimizer {
            gates: Mutex::new(VecDeque::from([first_rx, second_rx])),
        });
        let selector = PortfolioSelector::new(stub.clone(), 2);
        let state = shared(input(&["BTC-USD", "ETH-USD"], 365, false));

        let first = tokio::spawn({
            let (selector, state) = (selector.clone(), state.clone());
            async move { selector.load(&state).await }
        });
        while stub.waiting() > 1 {
            tokio::task::yield_now().await;
        }

        // The view stays readable while the optimizer works
        {
            let guard = state.try_lock().expect("lock held across the optimizer call");
            assert!(guard.loading);
            assert!(guard.result.is_none());
        }

        let second = tokio::spawn({
            let (selector, state) = (selector.clone(), state.clone());
            async move { selector.load(&state).await }
        });
        while stub.waiting() > 0 {
            tokio::task::yield_now().await;
        }

        let newer = json!({"0": {"Return": 0.2, "Volatility": 0.4}});
        let older = json!({"0": {"Return": 0.1, "Volatility": 0.3}});
        second_tx.send(response(newer, json!({}))).unwrap();
        second.await.unwrap().unwrap();
        first_tx.send(response(older, json!({}))).unwrap();
        first.await.unwrap().unwrap();

        let guard = state.lock();
        assert!(!guard.loading);
        let stored = guard.result.as_ref().unwrap().portfolio.first().unwrap();
        assert_eq!(stored["Return"], json!(0.1), "the reply that finished last wins");
        let successes = guard
            .notifications
            .iter()
            .filter(|t| t.severity == ToastSeverity::Success)
            .count();
        assert_eq!(successes, 2);
    }
}
