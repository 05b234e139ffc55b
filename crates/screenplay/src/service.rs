use std::sync::Arc;

use crate::providers::AnalyzerError;
use crate::{AnalysisReport, ScriptUpload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerKind {
    Mock,
    Custom(String),
}

impl AnalyzerKind {
    pub fn as_str(&self) -> &str {
        match self {
            AnalyzerKind::Mock => "mock",
            AnalyzerKind::Custom(name) => name.as_str(),
        }
    }
}

/// Seam for the script-analysis backend. The shipped provider is the mock;
/// a real parser/LLM slots in behind the same trait without touching call
/// sites.
pub trait ScriptAnalyzer: Send + Sync {
    fn analyzer_kind(&self) -> AnalyzerKind;
    fn analyze(&self, upload: &ScriptUpload) -> Result<AnalysisReport, AnalyzerError>;
}

#[derive(Clone)]
pub struct AnalyzerService {
    provider: Arc<dyn ScriptAnalyzer>,
}

impl AnalyzerService {
    pub fn new(provider: Arc<dyn ScriptAnalyzer>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> Arc<dyn ScriptAnalyzer> {
        Arc::clone(&self.provider)
    }

    pub fn set_provider(&mut self, provider: Arc<dyn ScriptAnalyzer>) {
        self.provider = provider;
    }

    pub fn analyze(&self, upload: &ScriptUpload) -> Result<AnalysisReport, AnalyzerError> {
        self.provider.analyze(upload)
    }
}
