use super::AnalyzerError;
use crate::{
    AnalysisReport, AnalyzerKind, ElementCategory, ExtractedElement, ScriptAnalyzer, ScriptUpload,
};

/// Catalog entry: category, name, description, selected by default.
type CatalogEntry = (ElementCategory, &'static str, &'static str, bool);

const DEFAULT_CATALOG: &[CatalogEntry] = &[
    (
        ElementCategory::Character,
        "Juno",
        "A salvage pilot with a prosthetic arm and a long memory for debts",
        true,
    ),
    (
        ElementCategory::Character,
        "Castor",
        "A retired harbor detective pulled back for one last case",
        true,
    ),
    (
        ElementCategory::Character,
        "Wren",
        "A dock kid who can hear which machines are about to fail",
        false,
    ),
    (
        ElementCategory::Location,
        "Harbor Stacks",
        "Container towers strung with rope bridges and dead neon",
        true,
    ),
    (
        ElementCategory::Location,
        "The Dry Archive",
        "A decommissioned ferry packed floor to ceiling with paper records",
        true,
    ),
    (
        ElementCategory::Location,
        "Transit Spine",
        "An elevated railway cutting through the fog above the water",
        false,
    ),
    (
        ElementCategory::Style,
        "Rain-slick Noir",
        "Hard shadows, wet streets, sodium vapor light",
        true,
    ),
    (
        ElementCategory::Style,
        "Painted Light",
        "Loose brushwork, warm haze, soft edges",
        true,
    ),
];

/// Stand-in for the real analysis backend: returns a fixed element catalog
/// under the uploaded script's title, so repeated runs are stable and tests
/// can assert on names.
#[derive(Debug, Clone, Default)]
pub struct MockAnalyzer;

impl MockAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptAnalyzer for MockAnalyzer {
    fn analyzer_kind(&self) -> AnalyzerKind {
        AnalyzerKind::Mock
    }

    fn analyze(&self, upload: &ScriptUpload) -> Result<AnalysisReport, AnalyzerError> {
        let elements = DEFAULT_CATALOG
            .iter()
            .map(|(category, name, description, selected)| {
                ExtractedElement::new(*category, *name, *description, *selected)
            })
            .collect();
        Ok(AnalysisReport {
            script_title: title_case(upload.stem()),
            elements,
        })
    }
}

/// "harbor_stacks" -> "Harbor Stacks".
fn title_case(stem: &str) -> String {
    stem.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
