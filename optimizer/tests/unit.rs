//! Property-style checks over the pure scoring and ranking logic

use rand::Rng;

use optimizer::config::{DimensionWeights, OptimizerConfig, RevenueModel};
use optimizer::core::{aggregator, ranking};
use optimizer::types::{DimensionOutcome, SiteEvaluation};
use shared::{CandidateSite, Dimension, DimensionScore, SiteId, StationType};

mod common;
use common::TestFixtures;

fn evaluation(id: &str, scores: &[(Dimension, f64)]) -> SiteEvaluation {
    let site = CandidateSite::new(SiteId::new(id), TestFixtures::chennai_center());
    let outcomes = Dimension::ALL
        .iter()
        .map(|dimension| {
            match scores.iter().find(|(d, _)| d == dimension) {
                Some((_, value)) => {
                    DimensionOutcome::success(*dimension, DimensionScore::with_value(*value))
                }
                None => DimensionOutcome::failed(*dimension, "unavailable"),
            }
        })
        .collect();
    SiteEvaluation::new(site, outcomes)
}

fn scored(id: &str, scores: &[(Dimension, f64)]) -> optimizer::types::ScoredSite {
    aggregator::finalize(
        evaluation(id, scores),
        StationType::Fast,
        TestFixtures::DEFAULT_BUDGET,
        &DimensionWeights::default(),
        &RevenueModel::default(),
    )
    .expect("at least one dimension succeeded")
}

#[test]
fn test_dimension_scores_always_clamped() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let raw: f64 = rng.gen_range(-50.0..50.0);
        let score = DimensionScore::with_value(raw);
        assert!((0.0..=10.0).contains(&score.value), "raw {raw} gave {}", score.value);
    }
}

#[test]
fn test_renormalized_weights_sum_to_one_for_any_subset() {
    let weights = DimensionWeights::default();
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let subset: Vec<Dimension> = Dimension::ALL
            .iter()
            .copied()
            .filter(|_| rng.gen_bool(0.5))
            .collect();
        if subset.is_empty() {
            assert!(aggregator::renormalized_weights(&weights, &subset).is_empty());
            continue;
        }
        let renormalized = aggregator::renormalized_weights(&weights, &subset);
        let sum: f64 = renormalized.values().sum();
        assert!((sum - 1.0).abs() < 1e-9, "subset {subset:?} summed to {sum}");
    }
}

#[test]
fn test_uniform_scores_collapse_to_discounted_value() {
    let weights = DimensionWeights::default();
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let value: f64 = rng.gen_range(0.0..10.0);
        let keep = usize::max(1, rng.gen_range(1..=5));
        let scores: Vec<(Dimension, f64)> = Dimension::ALL
            .iter()
            .take(keep)
            .map(|d| (*d, value))
            .collect();
        let (overall, discount) =
            aggregator::overall_score(&evaluation("site-00", &scores), &weights)
                .expect("successful dimensions present");
        assert!((discount - keep as f64 / 5.0).abs() < 1e-9);
        assert!(
            (overall - discount * value).abs() < 1e-9,
            "value {value} keep {keep} gave {overall}"
        );
    }
}

#[test]
fn test_zero_success_site_cannot_be_scored() {
    let weights = DimensionWeights::default();
    let all_failed = evaluation("site-00", &[]);
    assert!(aggregator::overall_score(&all_failed, &weights).is_none());
    assert!(aggregator::finalize(
        all_failed,
        StationType::Fast,
        TestFixtures::DEFAULT_BUDGET,
        &weights,
        &RevenueModel::default(),
    )
    .is_none());
}

#[test]
fn test_ranking_orders_by_score_then_coverage_then_id() {
    let full = |id: &str, value: f64| scored(id, &Dimension::ALL.map(|d| (d, value)));
    // Two sites tie at 4.0 with identical coverage, so their ids decide
    let sites = vec![
        full("site-02", 4.0),
        full("site-01", 4.0),
        full("site-03", 9.0),
        full("site-04", 1.0),
    ];

    let ranked = ranking::rank_sites(sites, 10);
    let ids: Vec<&str> = ranked.iter().map(|s| s.site().id.as_str()).collect();
    assert_eq!(ids, vec!["site-03", "site-01", "site-02", "site-04"]);
}

#[test]
fn test_partial_coverage_breaks_ties_below_full_coverage() {
    // 5 dimensions at 5.0 gives overall 5.0 with discount 1.0;
    // construct a partial site whose renormalized mean lands at the same
    // overall but with a lower discount
    let full = scored("site-01", &Dimension::ALL.map(|d| (d, 5.0)));
    let partial = scored(
        "site-00",
        &[
            (Dimension::Traffic, 6.25),
            (Dimension::Grid, 6.25),
            (Dimension::Competition, 6.25),
            (Dimension::Demographics, 6.25),
        ],
    );
    assert!((full.overall_score() - partial.overall_score()).abs() < 1e-9);

    let ranked = ranking::rank_sites(vec![partial, full], 10);
    // Full coverage wins the tie despite the lexically later id
    assert_eq!(ranked[0].site().id.as_str(), "site-01");
    assert_eq!(ranked[1].site().id.as_str(), "site-00");
}

#[test]
fn test_ranking_truncates_to_cap() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let count = rng.gen_range(0..20);
        let cap = rng.gen_range(1..=10);
        let sites: Vec<_> = (0..count)
            .map(|index| {
                let value = rng.gen_range(0.0..10.0);
                scored(&format!("site-{index:02}"), &Dimension::ALL.map(|d| (d, value)))
            })
            .collect();
        let ranked = ranking::rank_sites(sites, cap);
        assert!(ranked.len() <= cap);
        assert!(ranked.len() <= count);
        // Descending by overall score
        for window in ranked.windows(2) {
            assert!(window[0].overall_score() >= window[1].overall_score());
        }
    }
}

#[test]
fn test_confidence_bounded() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let value: f64 = rng.gen_range(0.0..10.0);
        let keep = rng.gen_range(1..=5);
        let scores: Vec<(Dimension, f64)> = Dimension::ALL
            .iter()
            .take(keep)
            .map(|d| (*d, value))
            .collect();
        let site = scored("site-00", &scores);
        assert!((0.0..=0.95).contains(&site.confidence), "got {}", site.confidence);
    }
}

#[test]
fn test_config_defaults_are_valid() {
    assert!(OptimizerConfig::default().validate().is_ok());
    let weights = DimensionWeights::default();
    assert!((weights.sum() - 1.0).abs() < 1e-9);
}
