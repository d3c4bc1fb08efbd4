//! Analysis service: remote provider first, heuristic scorer as fallback

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::ProviderConfig;
use crate::core::provider::{AnalysisProvider, GeminiProvider};
use crate::core::scorer::HeuristicScorer;
use crate::types::AnalysisResult;
use crate::{BiasLensError, Result};

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Remote,
    Heuristic,
}

/// Runs one analysis per request
pub struct Analyzer {
    provider: Option<Box<dyn AnalysisProvider>>,
    scorer: HeuristicScorer,
    seed: Option<u64>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("seed", &self.seed)
            .finish()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::heuristic_only()
    }
}

impl Analyzer {
    /// Heuristic scorer only
    pub fn heuristic_only() -> Self {
        Self {
            provider: None,
            scorer: HeuristicScorer::new(),
            seed: None,
        }
    }

    /// Use `provider` first
    pub fn with_provider(provider: Box<dyn AnalysisProvider>) -> Self {
        Self {
            provider: Some(provider),
            ..Self::heuristic_only()
        }
    }

    /// Gemini when the config carries a usable key, heuristic otherwise
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match GeminiProvider::new(config) {
            Ok(provider) => {
                info!(model = %config.model, "remote analysis provider enabled");
                Ok(Self::with_provider(Box::new(provider)))
            }
            Err(BiasLensError::ProviderDisabled) => {
                warn!("no API key configured, using heuristic analysis");
                Ok(Self::heuristic_only())
            }
            Err(e) => Err(e),
        }
    }

    /// Fix the heuristic random source so every call scores identically
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn provider_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Analyze `text`; never fails
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        self.analyze_traced(text).await.0
    }

    /// Analyze and report which path produced the result
    pub async fn analyze_traced(&self, text: &str) -> (AnalysisResult, AnalysisSource) {
        if let Some(provider) = &self.provider {
            match provider.analyze(text).await {
                Ok(result) => return (result, AnalysisSource::Remote),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "remote analysis failed, falling back to heuristic");
                }
            }
        }
        (self.heuristic(text), AnalysisSource::Heuristic)
    }

    fn heuristic(&self, text: &str) -> AnalysisResult {
        match self.seed {
            Some(seed) => {
                let mut result = self
                    .scorer
                    .analyze_with_rng(text, &mut StdRng::seed_from_u64(seed));
                // ids stay unique so repeated runs can share one history
                result.id = uuid::Uuid::new_v4().to_string();
                result
            }
            None => self.scorer.analyze(text),
        }
    }
}
