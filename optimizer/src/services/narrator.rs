//! Narrative generation
//!
//! `GeminiNarrator` asks an LLM for a short, human-readable rationale per
//! recommended site. `TemplateNarrator` produces the same deterministic text
//! the orchestrator falls back to, and is the narrator of choice when no
//! API key is configured.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use shared::DataSourceError;

use crate::core::aggregator;
use crate::traits::Narrator;
use crate::types::ScoredSite;

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GeminiNarrator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiNarrator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Point the client at an alternate endpoint, used by tests
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn prompt_for(scored: &ScoredSite) -> String {
        let breakdown = &scored.breakdown;
        let mut facts = vec![format!(
            "Site: {} (overall score {:.1}/10)",
            scored.site().display_name(),
            breakdown.overall_score
        )];
        let dimensions = [
            ("traffic", breakdown.traffic_score),
            ("grid", breakdown.grid_capacity),
            ("competition", breakdown.competition_gap),
            ("demographics", breakdown.demographics),
            ("ROI", breakdown.roi_potential),
        ];
        for (label, value) in dimensions {
            match value {
                Some(score) => facts.push(format!("{label}: {score:.1}/10")),
                None => facts.push(format!("{label}: no data")),
            }
        }
        if let Some(traffic) = scored.insights.daily_traffic {
            facts.push(format!("estimated daily traffic: {traffic} vehicles"));
        }
        if let Some(payback) = scored.insights.payback_period_months {
            facts.push(format!("estimated payback: {payback} months"));
        }
        format!(
            "You are advising an EV charging network planner. In two or three \
             sentences, explain why the following site is or is not a strong \
             candidate for a new charging station. Be concrete and mention the \
             strongest and weakest factors.\n\n{}",
            facts.join("\n")
        )
    }
}

#[async_trait]
impl Narrator for GeminiNarrator {
    async fn explain(&self, scored: &ScoredSite) -> Result<String, DataSourceError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.api_url, self.model, self.api_key
        );
        let body = json!({
            "contents": [{
                "parts": [{ "text": Self::prompt_for(scored) }]
            }],
            "generationConfig": {
                "temperature": 0.4,
                "maxOutputTokens": 200
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    DataSourceError::Timeout
                } else {
                    DataSourceError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::from_status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| DataSourceError::InvalidResponse(err.to_string()))?;
        let text = payload
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.pointer("/content/parts/0/text"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DataSourceError::InvalidResponse("response has no candidate text".to_string())
            })?;

        debug!(site = %scored.site().id, "narrative generated");
        Ok(text.trim().to_string())
    }
}

/// Deterministic narrator producing the fallback template text directly.
#[derive(Clone, Debug, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Narrator for TemplateNarrator {
    async fn explain(&self, scored: &ScoredSite) -> Result<String, DataSourceError> {
        Ok(aggregator::fallback_narrative(
            scored.site().display_name(),
            &scored.breakdown,
        ))
    }
}
