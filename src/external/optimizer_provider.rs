use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::optimization::RawOptimizationResponse;

/// Parameters of one `GET /portfolio` call
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptimizationQuery {
    /// Asset codes in selection order
    pub assets: Vec<String>,
    pub days: u32,
    pub include_all_assets: bool,
}

impl OptimizationQuery {
    /// Query string in the exact form the service expects; commas between codes stay literal.
    pub fn to_query_string(&self) -> String {
        let assets = self
            .assets
            .iter()
            .map(|code| url::form_urlencoded::byte_serialize(code.as_bytes()).collect::<String>())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "assets={}&days={}&includeAllAssets={}",
            assets, self.days, self.include_all_assets
        )
    }
}

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("optimizer returned HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait OptimizationProvider: Send + Sync {
    /// Runs the optimizer. The fields of the answer are still JSON strings.
    async fn fetch_portfolio(
        &self,
        query: &OptimizationQuery,
    ) -> Result<RawOptimizationResponse, OptimizerError>;
}
