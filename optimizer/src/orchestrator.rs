//! Top-level run coordinator
//!
//! Drives one optimization run through its phases: validate the request,
//! obtain candidate sites, fan evaluations out across sites with bounded
//! concurrency, aggregate partial results, attach narratives best-effort,
//! and assemble the ranked, capped result.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{info, warn};

use shared::{
    CandidateSite, OptimizationRequest, OptimizationResult, Recommendation, RequestId, RunError,
    RunMetadata, RunStage, SiteId,
};

use crate::config::OptimizerConfig;
use crate::core::aggregator;
use crate::core::ranking;
use crate::core::{RunLog, RunPhase};
use crate::error::{OptimizerError, OptimizerResult};
use crate::runner::EvaluationRunner;
use crate::traits::{CandidateSource, Narrator, ScoringProvider};
use crate::types::{ScoredSite, SiteEvaluation};

/// Coordinates one optimization run end to end.
///
/// Collaborators are injected at construction; the configuration is an
/// explicit value, so concurrent runs with different configurations are
/// safe and independently testable.
pub struct OptimizerOrchestrator<C, N>
where
    C: CandidateSource + 'static,
    N: Narrator + 'static,
{
    candidates: C,
    narrator: N,
    runner: Arc<EvaluationRunner>,
    config: OptimizerConfig,
}

impl<C, N> OptimizerOrchestrator<C, N>
where
    C: CandidateSource + 'static,
    N: Narrator + 'static,
{
    /// Create a new orchestrator with injected collaborators.
    /// Fails fast on invalid configuration; nothing is spawned here.
    pub fn new(
        candidates: C,
        narrator: N,
        providers: Vec<Arc<dyn ScoringProvider>>,
        config: OptimizerConfig,
    ) -> OptimizerResult<Self> {
        config.validate()?;
        let runner = Arc::new(EvaluationRunner::new(providers, config.provider_timeout));
        Ok(Self {
            candidates,
            narrator,
            runner,
            config,
        })
    }

    /// Execute one optimization run.
    ///
    /// Returns an error only for the three fatal conditions (validation,
    /// no candidates, total evaluation loss); every other failure is
    /// contained and surfaced in the result metadata.
    pub async fn optimize(&self, request: OptimizationRequest) -> OptimizerResult<OptimizationResult> {
        let mut log = RunLog::new();
        let request_id = RequestId::new();
        info!(%request_id, location = %request.location.describe(), "optimization run received");

        request.validate()?;
        let deadline = Instant::now() + self.config.run_deadline;

        log.transition(RunPhase::GeneratingCandidates);
        let candidates = self.generate_candidates(&request, deadline).await?;
        info!(count = candidates.len(), "candidate sites generated");

        log.transition(RunPhase::Evaluating);
        let evaluations = self.evaluate_candidates(&request, &candidates, deadline, &mut log).await;

        let surviving: Vec<SiteEvaluation> = evaluations
            .into_iter()
            .filter(|e| e.successful_dimensions() > 0)
            .collect();
        let sites_evaluated = surviving.len();
        if surviving.is_empty() {
            return Err(OptimizerError::AllEvaluationsFailed {
                sites: candidates.len(),
            });
        }

        log.transition(RunPhase::Aggregating);
        let scored: Vec<ScoredSite> = surviving
            .into_iter()
            .filter_map(|evaluation| {
                aggregator::finalize(
                    evaluation,
                    request.station_type,
                    request.budget,
                    &self.config.weights,
                    &self.config.revenue,
                )
            })
            .collect();

        log.transition(RunPhase::Narrating);
        let narratives = self.narrate(&scored, deadline, &mut log).await;

        log.transition(RunPhase::Ranking);
        let ranked = ranking::rank_sites(scored, request.max_recommendations);

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .enumerate()
            .map(|(index, scored_site)| {
                let narrative = narratives
                    .get(&scored_site.site().id)
                    .cloned()
                    .unwrap_or_else(|| {
                        aggregator::fallback_narrative(
                            scored_site.site().display_name(),
                            &scored_site.breakdown,
                        )
                    });
                Recommendation {
                    location: shared::LocationInfo::from_site(scored_site.site()),
                    scores: scored_site.breakdown,
                    insights: scored_site.insights,
                    narrative,
                    confidence: scored_site.confidence,
                    rank: (index + 1) as u32,
                }
            })
            .collect();

        log.transition(RunPhase::Complete);
        info!(
            %request_id,
            recommendations = recommendations.len(),
            contained_failures = log.error_count(),
            "optimization run complete"
        );

        Ok(OptimizationResult {
            request_id,
            recommendations,
            metadata: RunMetadata {
                processing_time_seconds: log.elapsed_seconds(),
                errors: log.into_errors(),
                generated_at: chrono::Utc::now(),
                candidates_generated: candidates.len(),
                sites_evaluated,
            },
        })
    }

    async fn generate_candidates(
        &self,
        request: &OptimizationRequest,
        deadline: Instant,
    ) -> OptimizerResult<Vec<CandidateSite>> {
        let location = request.location.describe();
        let generated = timeout_at(
            deadline,
            self.candidates.generate_candidates(&request.location, request.radius_km),
        )
        .await;

        let sites = match generated {
            Ok(Ok(sites)) => sites,
            Ok(Err(err)) => {
                return Err(OptimizerError::NoCandidatesFound {
                    location,
                    cause: err.to_string(),
                })
            }
            Err(_) => {
                return Err(OptimizerError::NoCandidatesFound {
                    location,
                    cause: "run deadline exceeded during candidate generation".to_string(),
                })
            }
        };

        if sites.is_empty() {
            return Err(OptimizerError::NoCandidatesFound {
                location,
                cause: "candidate generator returned no sites".to_string(),
            });
        }
        Ok(sites)
    }

    /// Fan out per-site evaluation tasks, admission-gated by the
    /// concurrency limiter, and settle everything that completes before
    /// the run deadline. Sites still pending at the deadline count as
    /// failed; the run proceeds over whatever completed.
    async fn evaluate_candidates(
        &self,
        request: &OptimizationRequest,
        candidates: &[CandidateSite],
        deadline: Instant,
        log: &mut RunLog,
    ) -> Vec<SiteEvaluation> {
        let limiter = Arc::new(Semaphore::new(self.config.max_concurrent_sites));
        let mut tasks: JoinSet<SiteEvaluation> = JoinSet::new();

        for site in candidates {
            let runner = self.runner.clone();
            let request = request.clone();
            let site = site.clone();
            let limiter = limiter.clone();
            tasks.spawn(async move {
                let _permit = limiter.acquire_owned().await.ok();
                runner.evaluate_site(&site, &request).await
            });
        }

        let mut evaluations = Vec::with_capacity(candidates.len());
        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok(evaluation)) => evaluations.push(evaluation),
                    Some(Err(join_err)) => {
                        warn!(error = %join_err, "evaluation task lost");
                    }
                    None => break,
                },
                _ = sleep_until(deadline) => {
                    warn!(
                        pending = candidates.len() - evaluations.len(),
                        "run deadline reached, aborting pending site evaluations"
                    );
                    tasks.abort_all();
                    // Keep anything that settled before the abort landed
                    while let Some(joined) = tasks.join_next().await {
                        if let Ok(evaluation) = joined {
                            evaluations.push(evaluation);
                        }
                    }
                    break;
                }
            }
        }

        // Surface every contained dimension failure in run metadata
        for evaluation in &evaluations {
            for outcome in evaluation.failed_outcomes() {
                log.record(RunError::evaluation(
                    evaluation.site.id.clone(),
                    outcome.dimension,
                    outcome.failure.clone().unwrap_or_default(),
                ));
            }
        }
        let settled: Vec<&SiteId> = evaluations.iter().map(|e| &e.site.id).collect();
        for site in candidates {
            if !settled.contains(&&site.id) {
                log.record(RunError {
                    stage: RunStage::Evaluation,
                    site_id: site.id.clone(),
                    dimension: None,
                    message: "run deadline exceeded before evaluation settled".to_string(),
                });
            }
        }

        evaluations
    }

    /// Best-effort narration for every scored site. Failures and timeouts
    /// fall back to the deterministic template and are recorded; narration
    /// never fails the run.
    async fn narrate(
        &self,
        scored: &[ScoredSite],
        deadline: Instant,
        log: &mut RunLog,
    ) -> HashMap<SiteId, String> {
        let narration_deadline =
            deadline.min(Instant::now() + self.config.narrator_timeout);

        let settled = join_all(scored.iter().map(|scored_site| async move {
            let outcome = timeout_at(narration_deadline, self.narrator.explain(scored_site)).await;
            (scored_site, outcome)
        }))
        .await;

        let mut narratives = HashMap::with_capacity(scored.len());
        for (scored_site, outcome) in settled {
            let site_id = scored_site.site().id.clone();
            let text = match outcome {
                Ok(Ok(text)) if !text.trim().is_empty() => text,
                Ok(Ok(_)) => {
                    log.record(RunError::narration(site_id.clone(), "narrator returned empty text"));
                    self.fallback_for(scored_site)
                }
                Ok(Err(err)) => {
                    warn!(site = %site_id, error = %err, "narration failed, using fallback");
                    log.record(RunError::narration(site_id.clone(), err.to_string()));
                    self.fallback_for(scored_site)
                }
                Err(_) => {
                    warn!(site = %site_id, "narration timed out, using fallback");
                    log.record(RunError::narration(site_id.clone(), "narration timed out"));
                    self.fallback_for(scored_site)
                }
            };
            narratives.insert(site_id, text);
        }
        narratives
    }

    fn fallback_for(&self, scored_site: &ScoredSite) -> String {
        aggregator::fallback_narrative(scored_site.site().display_name(), &scored_site.breakdown)
    }
}
