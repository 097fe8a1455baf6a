//! End-to-end runs through the orchestrator with mocked collaborators
//!
//! Each test drives a full optimization and asserts on the externally
//! visible result: recommendations, ordering, metadata and the fatal error
//! paths.

use std::time::Duration;

use optimizer::{OptimizerError, OptimizerOrchestrator};
use shared::{Dimension, LocationQuery, RunStage};

mod common;
use common::helpers::{
    empty_candidate_source, failing_provider, providers_with_failure, site_gated_providers,
    standard_candidate_source, test_config, uniform_providers, InstantNarrator, SlowNarrator,
};
use common::TestFixtures;

/// Happy path: every provider succeeds on every site
#[tokio::test]
async fn test_full_run_produces_capped_ranked_recommendations() {
    // Arrange
    let orchestrator = OptimizerOrchestrator::new(
        standard_candidate_source(),
        InstantNarrator("A strong location for fast charging.".to_string()),
        uniform_providers(8.0),
        test_config(),
    )
    .unwrap();

    // Act
    let result = orchestrator.optimize(TestFixtures::chennai_request()).await.unwrap();

    // Assert
    assert_eq!(result.recommendations.len(), TestFixtures::DEFAULT_MAX_RECOMMENDATIONS);
    for (index, recommendation) in result.recommendations.iter().enumerate() {
        assert_eq!(recommendation.rank, (index + 1) as u32);
        assert!((recommendation.scores.overall_score - 8.0).abs() < 1e-9);
        assert_eq!(
            recommendation.narrative,
            "A strong location for fast charging."
        );
        assert!((recommendation.confidence - 0.9).abs() < 1e-9);
    }
    assert!(result.metadata.errors.is_empty());
    assert_eq!(result.metadata.candidates_generated, TestFixtures::CANDIDATE_COUNT);
    assert_eq!(result.metadata.sites_evaluated, TestFixtures::CANDIDATE_COUNT);
}

/// One dimension failing everywhere degrades the score but not the run
#[tokio::test]
async fn test_dimension_failure_renormalizes_and_surfaces_errors() {
    // Arrange
    let orchestrator = OptimizerOrchestrator::new(
        standard_candidate_source(),
        InstantNarrator("narrative".to_string()),
        providers_with_failure(8.0, Dimension::Grid),
        test_config(),
    )
    .unwrap();

    // Act
    let result = orchestrator.optimize(TestFixtures::chennai_request()).await.unwrap();

    // Assert: four of five dimensions at 8.0 renormalize to 8.0, then the
    // confidence discount scales the overall down to 6.4
    assert_eq!(result.recommendations.len(), TestFixtures::DEFAULT_MAX_RECOMMENDATIONS);
    for recommendation in &result.recommendations {
        assert!(recommendation.scores.grid_capacity.is_none());
        assert!((recommendation.scores.overall_score - 6.4).abs() < 1e-9);
        assert_eq!(recommendation.scores.traffic_score, Some(8.0));
    }

    let grid_errors: Vec<_> = result
        .metadata
        .errors
        .iter()
        .filter(|e| e.stage == RunStage::Evaluation && e.dimension == Some(Dimension::Grid))
        .collect();
    assert_eq!(grid_errors.len(), TestFixtures::CANDIDATE_COUNT);
    assert!(grid_errors.iter().all(|e| e.message.contains("connection refused")));
}

/// Invalid request parameters fail before any collaborator is touched
#[tokio::test]
async fn test_invalid_radius_rejected_before_generation() {
    // Arrange
    let mut candidates = optimizer::traits::MockCandidateSource::new();
    candidates.expect_generate_candidates().times(0);
    let orchestrator = OptimizerOrchestrator::new(
        candidates,
        InstantNarrator("unused".to_string()),
        uniform_providers(8.0),
        test_config(),
    )
    .unwrap();

    let mut request = TestFixtures::chennai_request();
    request.radius_km = 500.0;

    // Act
    let error = orchestrator.optimize(request).await.unwrap_err();

    // Assert
    match error {
        OptimizerError::Validation(validation) => assert_eq!(validation.field, "radius_km"),
        other => panic!("expected validation error, got {other}"),
    }
}

/// An empty candidate set is a fatal run error
#[tokio::test]
async fn test_empty_candidate_set_is_fatal() {
    // Arrange
    let orchestrator = OptimizerOrchestrator::new(
        empty_candidate_source(),
        InstantNarrator("unused".to_string()),
        uniform_providers(8.0),
        test_config(),
    )
    .unwrap();

    // Act
    let error = orchestrator
        .optimize(TestFixtures::chennai_request())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(error, OptimizerError::NoCandidatesFound { .. }));
}

/// Every dimension failing on every site is a fatal run error
#[tokio::test]
async fn test_total_evaluation_loss_is_fatal() {
    // Arrange
    let providers = Dimension::ALL
        .iter()
        .map(|dimension| failing_provider(*dimension, "service unavailable"))
        .collect();
    let orchestrator = OptimizerOrchestrator::new(
        standard_candidate_source(),
        InstantNarrator("unused".to_string()),
        providers,
        test_config(),
    )
    .unwrap();

    // Act
    let error = orchestrator
        .optimize(TestFixtures::chennai_request())
        .await
        .unwrap_err();

    // Assert
    match error {
        OptimizerError::AllEvaluationsFailed { sites } => {
            assert_eq!(sites, TestFixtures::CANDIDATE_COUNT)
        }
        other => panic!("expected all-evaluations-failed, got {other}"),
    }
}

/// Narration overruns its timeout: the run completes with fallback text
#[tokio::test]
async fn test_narration_timeout_falls_back_to_template() {
    // Arrange
    let orchestrator = OptimizerOrchestrator::new(
        standard_candidate_source(),
        SlowNarrator {
            delay: Duration::from_secs(2),
        },
        uniform_providers(8.5),
        test_config(),
    )
    .unwrap();

    // Act
    let result = orchestrator.optimize(TestFixtures::chennai_request()).await.unwrap();

    // Assert: recommendations carry the deterministic template text
    assert_eq!(result.recommendations.len(), TestFixtures::DEFAULT_MAX_RECOMMENDATIONS);
    for recommendation in &result.recommendations {
        assert_ne!(recommendation.narrative, "late narrative");
        assert!(
            recommendation.narrative.starts_with("Excellent location"),
            "unexpected narrative: {}",
            recommendation.narrative
        );
    }
    let narration_errors = result
        .metadata
        .errors
        .iter()
        .filter(|e| e.stage == RunStage::Narration)
        .count();
    assert_eq!(narration_errors, TestFixtures::CANDIDATE_COUNT);
}

/// The run deadline fires while sites are still evaluating: settled sites
/// are ranked, pending ones are aborted and surfaced in run metadata
#[tokio::test]
async fn test_run_deadline_keeps_settled_sites_and_flags_pending() {
    // Arrange: four sites answer immediately, four stall far past the
    // deadline while the per-call timeout is even further out
    let mut config = test_config();
    config.run_deadline = Duration::from_millis(300);
    config.provider_timeout = Duration::from_secs(30);
    config.max_concurrent_sites = TestFixtures::CANDIDATE_COUNT;
    let orchestrator = OptimizerOrchestrator::new(
        standard_candidate_source(),
        InstantNarrator("narrative".to_string()),
        site_gated_providers(4),
        config,
    )
    .unwrap();

    // Act
    let result = orchestrator.optimize(TestFixtures::chennai_request()).await.unwrap();

    // Assert: only the settled sites are ranked
    assert_eq!(result.metadata.sites_evaluated, 4);
    assert_eq!(result.recommendations.len(), 4);
    let names: Vec<_> = result
        .recommendations
        .iter()
        .map(|r| r.location.name.as_str())
        .collect();
    assert_eq!(names, vec!["Area 1", "Area 2", "Area 3", "Area 4"]);

    let deadline_errors: Vec<_> = result
        .metadata
        .errors
        .iter()
        .filter(|e| e.stage == RunStage::Evaluation && e.dimension.is_none())
        .collect();
    assert_eq!(deadline_errors.len(), TestFixtures::CANDIDATE_COUNT - 4);
    for error in &deadline_errors {
        assert!(error.message.contains("run deadline exceeded"));
        let index: usize = error
            .site_id
            .as_str()
            .trim_start_matches("site-")
            .parse()
            .unwrap();
        assert!(index >= 4, "settled site flagged as pending: {}", error.site_id);
    }
}

/// A place-name request flows through location description into the fatal
/// candidate error
#[tokio::test]
async fn test_no_candidates_error_names_the_location() {
    // Arrange
    let orchestrator = OptimizerOrchestrator::new(
        empty_candidate_source(),
        InstantNarrator("unused".to_string()),
        uniform_providers(7.0),
        test_config(),
    )
    .unwrap();

    let mut request = TestFixtures::chennai_request();
    request.location = LocationQuery::Name("Coimbatore".to_string());

    // Act
    let error = orchestrator.optimize(request).await.unwrap_err();

    // Assert
    match error {
        OptimizerError::NoCandidatesFound { location, .. } => assert_eq!(location, "Coimbatore"),
        other => panic!("expected no-candidates error, got {other}"),
    }
}

/// Fewer surviving sites than the cap returns them all
#[tokio::test]
async fn test_result_shorter_than_cap_when_candidates_are_scarce() {
    // Arrange
    let orchestrator = OptimizerOrchestrator::new(
        common::helpers::fixed_candidate_source(TestFixtures::candidate_sites(3)),
        InstantNarrator("narrative".to_string()),
        uniform_providers(6.0),
        test_config(),
    )
    .unwrap();

    // Act
    let result = orchestrator.optimize(TestFixtures::chennai_request()).await.unwrap();

    // Assert
    assert_eq!(result.recommendations.len(), 3);
    assert_eq!(result.metadata.candidates_generated, 3);
}
