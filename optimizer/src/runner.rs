//! Per-site evaluation: fan out to all five providers and settle

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::warn;

use shared::{CandidateSite, Dimension, OptimizationRequest};

use crate::traits::ScoringProvider;
use crate::types::{DimensionOutcome, SiteEvaluation};

/// Runs every scoring provider for one candidate site, tolerating partial
/// failure. All provider calls are dispatched concurrently and the runner
/// waits for every one to settle; it never short-circuits on first failure.
pub struct EvaluationRunner {
    providers: Vec<Arc<dyn ScoringProvider>>,
    provider_timeout: Duration,
}

impl EvaluationRunner {
    pub fn new(providers: Vec<Arc<dyn ScoringProvider>>, provider_timeout: Duration) -> Self {
        Self {
            providers,
            provider_timeout,
        }
    }

    /// Evaluate one site on every registered dimension.
    ///
    /// A provider error or an elapsed per-call timeout yields a `Failed`
    /// outcome for that dimension only. Dimensions with no registered
    /// provider settle as `Skipped`.
    pub async fn evaluate_site(
        &self,
        site: &CandidateSite,
        request: &OptimizationRequest,
    ) -> SiteEvaluation {
        let calls = self.providers.iter().map(|provider| {
            let dimension = provider.dimension();
            async move {
                match timeout(self.provider_timeout, provider.evaluate(site, request)).await {
                    Ok(Ok(score)) => DimensionOutcome::success(dimension, score),
                    Ok(Err(err)) => {
                        warn!(site = %site.id, %dimension, error = %err, "provider failed");
                        DimensionOutcome::failed(dimension, err.to_string())
                    }
                    Err(_) => {
                        warn!(site = %site.id, %dimension, "provider timed out");
                        DimensionOutcome::failed(dimension, "provider call timed out")
                    }
                }
            }
        });

        let mut outcomes = join_all(calls).await;

        for dimension in Dimension::ALL {
            if !outcomes.iter().any(|o| o.dimension == dimension) {
                outcomes.push(DimensionOutcome::skipped(dimension));
            }
        }
        outcomes.sort_by_key(|o| o.dimension);

        SiteEvaluation::new(site.clone(), outcomes)
    }
}
