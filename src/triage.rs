//! Analysis facade: model provider first, heuristics as the guaranteed path.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::analysis::heuristics::analyze_with_heuristics;
use crate::analysis::normalize::normalize;
use crate::analysis::{AnalysisResult, RawAnalysis};
use crate::config::ProviderConfig;
use crate::credentials::Credentials;
use crate::providers::extraction::ModelAnalyzer;
use crate::providers::router::{select_provider, ProviderChoice};
use crate::providers::{EmailAnalyzer, ProviderError};

/// Where a raw analysis came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisSource {
    /// A model provider, identified by its model spec.
    Provider(String),
    /// The local keyword heuristics.
    Heuristics,
}

/// Email triage facade.
///
/// Holds an optional analyzer. Every call either uses it successfully or
/// falls back to the heuristics, so [`TriageService::analyze`] cannot fail.
#[derive(Clone, Default)]
pub struct TriageService {
    analyzer: Option<Arc<dyn EmailAnalyzer>>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for TriageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageService")
            .field("analyzer", &self.analyzer.as_ref().map(|a| a.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TriageService {
    /// A service that only ever uses the heuristics.
    pub fn heuristic_only() -> Self {
        Self::default()
    }

    /// A service backed by the given analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn EmailAnalyzer>) -> Self {
        Self {
            analyzer: Some(analyzer),
            timeout: None,
        }
    }

    /// Bound each analyzer call; an expired call falls back to heuristics.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the service from provider configuration and credentials.
    ///
    /// Misconfiguration never fails construction: an unknown provider name
    /// is treated as auto-detect and a missing API key disables the model,
    /// both with a warning.
    pub fn from_config(config: &ProviderConfig, credentials: &Credentials) -> Self {
        let choice = config.name.parse::<ProviderChoice>().unwrap_or_else(|err| {
            warn!(error = %err, "falling back to provider auto-detection");
            ProviderChoice::Auto
        });

        let provider = match select_provider(choice, &config.models, credentials) {
            Ok(provider) => provider,
            Err(err) => {
                warn!(error = %err, "model provider unavailable, using heuristics");
                None
            }
        };

        let mut service = match provider {
            Some(provider) => Self::with_analyzer(Arc::new(ModelAnalyzer::new(provider))),
            None => {
                info!("no model provider configured, using heuristics");
                Self::heuristic_only()
            }
        };
        if config.request_timeout_secs > 0 {
            service = service.with_timeout(Duration::from_secs(config.request_timeout_secs));
        }
        service
    }

    /// Whether a model analyzer is configured.
    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Analyze an email into the canonical record.
    pub async fn analyze(&self, email_text: &str) -> AnalysisResult {
        let (raw, source) = self.raw_analysis(email_text).await;
        info!(source = ?source, "email analyzed");
        normalize(&raw)
    }

    /// Produce the raw analysis and report which path produced it.
    pub async fn raw_analysis(&self, email_text: &str) -> (RawAnalysis, AnalysisSource) {
        let Some(analyzer) = &self.analyzer else {
            return (analyze_with_heuristics(email_text), AnalysisSource::Heuristics);
        };

        match self.call_analyzer(analyzer.as_ref(), email_text).await {
            Ok(raw) => (raw, AnalysisSource::Provider(analyzer.name().to_owned())),
            Err(err) => {
                warn!(
                    analyzer = analyzer.name(),
                    error = %err,
                    "model analysis failed, falling back to heuristics"
                );
                (analyze_with_heuristics(email_text), AnalysisSource::Heuristics)
            }
        }
    }

    async fn call_analyzer(
        &self,
        analyzer: &dyn EmailAnalyzer,
        email_text: &str,
    ) -> Result<RawAnalysis, ProviderError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, analyzer.analyze(email_text))
                .await
                .map_err(|_| ProviderError::Timeout(limit.as_secs()))?,
            None => analyzer.analyze(email_text).await,
        }
    }
}
