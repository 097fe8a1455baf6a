//! Final deterministic ordering of scored sites

use crate::types::ScoredSite;

/// Sort scored sites into the final total order and truncate to the cap.
///
/// Order: overall score descending; ties broken by higher confidence
/// discount (fewer missing dimensions), then by lexicographically smaller
/// site id so equal sites rank deterministically.
pub fn rank_sites(mut sites: Vec<ScoredSite>, max_recommendations: usize) -> Vec<ScoredSite> {
    sites.sort_by(|a, b| {
        b.overall_score()
            .total_cmp(&a.overall_score())
            .then(b.confidence_discount.total_cmp(&a.confidence_discount))
            .then(a.site().id.cmp(&b.site().id))
    });
    sites.truncate(max_recommendations);
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DimensionWeights, RevenueModel};
    use crate::core::aggregator;
    use crate::types::{DimensionOutcome, SiteEvaluation};
    use shared::{CandidateSite, Coordinates, Dimension, DimensionScore, SiteId, StationType};

    fn scored(id: &str, value: f64, failed_dimensions: usize) -> ScoredSite {
        let outcomes = Dimension::ALL
            .iter()
            .enumerate()
            .map(|(i, dimension)| {
                if i < failed_dimensions {
                    DimensionOutcome::failed(*dimension, "outage")
                } else {
                    DimensionOutcome::success(*dimension, DimensionScore::with_value(value))
                }
            })
            .collect();
        let evaluation = SiteEvaluation::new(
            CandidateSite::new(SiteId::new(id), Coordinates::new(13.0, 80.2)),
            outcomes,
        );
        let mut scored = aggregator::finalize(
            evaluation,
            StationType::Fast,
            5_000_000,
            &DimensionWeights::default(),
            &RevenueModel::default(),
        )
        .unwrap();
        // Pin the overall so ties can be constructed independently of the
        // discount applied during finalization.
        scored.breakdown.overall_score = value;
        scored
    }

    #[test]
    fn test_sorted_by_overall_descending() {
        let ranked = rank_sites(
            vec![scored("site-01", 5.0, 0), scored("site-02", 9.0, 0), scored("site-03", 7.0, 0)],
            10,
        );
        let scores: Vec<f64> = ranked.iter().map(|s| s.overall_score()).collect();
        assert_eq!(scores, vec![9.0, 7.0, 5.0]);
    }

    #[test]
    fn test_tie_broken_by_confidence_then_id() {
        let ranked = rank_sites(
            vec![
                scored("site-03", 7.0, 1),
                scored("site-02", 7.0, 0),
                scored("site-01", 7.0, 1),
            ],
            10,
        );
        let ids: Vec<&str> = ranked.iter().map(|s| s.site().id.as_str()).collect();
        // Full coverage first, then equal-discount sites by id
        assert_eq!(ids, vec!["site-02", "site-01", "site-03"]);
    }

    #[test]
    fn test_truncated_to_cap() {
        let sites: Vec<ScoredSite> = (1..=8)
            .map(|i| scored(&format!("site-{i:02}"), i as f64, 0))
            .collect();
        let ranked = rank_sites(sites, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].overall_score(), 8.0);
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert!(rank_sites(vec![], 5).is_empty());
    }
}
