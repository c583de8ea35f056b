use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::SelectorConfig;
use crate::external::optimizer_provider::{OptimizationProvider, OptimizationQuery, OptimizerError};
use crate::models::optimization::RawOptimizationResponse;

// Longest slice of an error body carried into the error message
const MAX_ERROR_BODY: usize = 200;

/// Optimizer reached over plain HTTP (the Flask service on port 5000 by default)
pub struct HttpOptimizer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOptimizer {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, OptimizerError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| OptimizerError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &SelectorConfig) -> Result<Self, OptimizerError> {
        Self::new(config.optimizer_url.as_str(), config.optimizer_timeout)
    }

    /// Full request URL for a query
    pub fn endpoint_url(&self, query: &OptimizationQuery) -> String {
        format!("{}/portfolio?{}", self.base_url, query.to_query_string())
    }
}

#[async_trait]
impl OptimizationProvider for HttpOptimizer {
    async fn fetch_portfolio(
        &self,
        query: &OptimizationQuery,
    ) -> Result<RawOptimizationResponse, OptimizerError> {
        let url = self.endpoint_url(query);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OptimizerError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            warn!("Optimizer answered {} for {}", status, url);
            return Err(OptimizerError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<RawOptimizationResponse>()
            .await
            .map_err(|e| OptimizerError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_matches_service_contract() {
        let optimizer = HttpOptimizer::new("http://127.0.0.1:5000/", None).unwrap();
        let query = OptimizationQuery {
            assets: vec!["BTC-USD".into(), "ETH-USD".into()],
            days: 365,
            include_all_assets: false,
        };

        assert_eq!(
            optimizer.endpoint_url(&query),
            "http://127.0.0.1:5000/portfolio?assets=BTC-USD,ETH-USD&days=365&includeAllAssets=false"
        );
    }
}
