//! Builders and stubs shared by the optimizer test suites

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use optimizer::config::OptimizerConfig;
use optimizer::traits::{
    MockCandidateSource, MockScoringProvider, Narrator, ScoringProvider,
};
use optimizer::types::ScoredSite;
use shared::{CandidateSite, DataSourceError, Dimension, DimensionScore, OptimizationRequest};

use super::fixtures::TestFixtures;

/// Configuration with short timeouts so degraded-path tests settle quickly
pub fn test_config() -> OptimizerConfig {
    OptimizerConfig {
        provider_timeout: Duration::from_millis(250),
        narrator_timeout: Duration::from_millis(100),
        run_deadline: Duration::from_secs(5),
        ..OptimizerConfig::default()
    }
}

/// Provider that always succeeds with a fixed score
pub fn stub_provider(dimension: Dimension, score: f64) -> Arc<dyn ScoringProvider> {
    let mut mock = MockScoringProvider::new();
    mock.expect_dimension().return_const(dimension);
    mock.expect_evaluate()
        .returning(move |_, _| Ok(DimensionScore::with_value(score)));
    Arc::new(mock)
}

/// Provider that always fails with a network error
pub fn failing_provider(dimension: Dimension, message: &str) -> Arc<dyn ScoringProvider> {
    let message = message.to_string();
    let mut mock = MockScoringProvider::new();
    mock.expect_dimension().return_const(dimension);
    mock.expect_evaluate()
        .returning(move |_, _| Err(DataSourceError::Network(message.clone())));
    Arc::new(mock)
}

/// All five dimensions succeeding with the same score
pub fn uniform_providers(score: f64) -> Vec<Arc<dyn ScoringProvider>> {
    Dimension::ALL
        .iter()
        .map(|dimension| stub_provider(*dimension, score))
        .collect()
}

/// All five dimensions, with `broken` failing everywhere
pub fn providers_with_failure(score: f64, broken: Dimension) -> Vec<Arc<dyn ScoringProvider>> {
    Dimension::ALL
        .iter()
        .map(|dimension| {
            if *dimension == broken {
                failing_provider(*dimension, "connection refused")
            } else {
                stub_provider(*dimension, score)
            }
        })
        .collect()
}

/// Candidate source returning the standard fixture sites
pub fn fixed_candidate_source(sites: Vec<CandidateSite>) -> MockCandidateSource {
    let mut mock = MockCandidateSource::new();
    mock.expect_generate_candidates()
        .returning(move |_, _| Ok(sites.clone()));
    mock
}

pub fn standard_candidate_source() -> MockCandidateSource {
    fixed_candidate_source(TestFixtures::candidate_sites(TestFixtures::CANDIDATE_COUNT))
}

/// Candidate source that never yields a site
pub fn empty_candidate_source() -> MockCandidateSource {
    fixed_candidate_source(Vec::new())
}

/// Provider that answers immediately for low-index sites and stalls on the
/// rest, for exercising the run deadline. Hand-written for the same reason
/// as [`SlowNarrator`].
pub struct SiteGatedProvider {
    pub dimension: Dimension,
    pub stall_from: usize,
}

#[async_trait]
impl ScoringProvider for SiteGatedProvider {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    async fn evaluate(
        &self,
        site: &CandidateSite,
        _request: &OptimizationRequest,
    ) -> Result<DimensionScore, DataSourceError> {
        let index: usize = site
            .id
            .as_str()
            .trim_start_matches("site-")
            .parse()
            .unwrap_or(0);
        if index >= self.stall_from {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        Ok(DimensionScore::with_value(7.0))
    }
}

/// All five dimensions stalling for sites at or beyond `stall_from`
pub fn site_gated_providers(stall_from: usize) -> Vec<Arc<dyn ScoringProvider>> {
    Dimension::ALL
        .iter()
        .map(|dimension| {
            Arc::new(SiteGatedProvider {
                dimension: *dimension,
                stall_from,
            }) as Arc<dyn ScoringProvider>
        })
        .collect()
}

/// Narrator answering immediately with a fixed text
pub struct InstantNarrator(pub String);

#[async_trait]
impl Narrator for InstantNarrator {
    async fn explain(&self, _scored: &ScoredSite) -> Result<String, DataSourceError> {
        Ok(self.0.clone())
    }
}

/// Narrator that sleeps past any reasonable narration timeout.
/// Mock narrators cannot hold an await across the timeout, hence a
/// hand-written stub.
pub struct SlowNarrator {
    pub delay: Duration,
}

#[async_trait]
impl Narrator for SlowNarrator {
    async fn explain(&self, _scored: &ScoredSite) -> Result<String, DataSourceError> {
        tokio::time::sleep(self.delay).await;
        Ok("late narrative".to_string())
    }
}
