use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ElementId(pub Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    Character,
    Location,
    Style,
}

impl ElementCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementCategory::Character => "character",
            ElementCategory::Location => "location",
            ElementCategory::Style => "style",
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character, location, or visual style pulled out of an uploaded script.
/// `selected` marks it for the subsequent training pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedElement {
    pub id: ElementId,
    pub category: ElementCategory,
    pub name: String,
    pub description: String,
    pub selected: bool,
}

impl ExtractedElement {
    pub fn new(
        category: ElementCategory,
        name: impl Into<String>,
        description: impl Into<String>,
        selected: bool,
    ) -> Self {
        Self {
            id: ElementId::new(),
            category,
            name: name.into(),
            description: description.into(),
            selected,
        }
    }
}

/// Everything the analyzer extracted from one script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub script_title: String,
    pub elements: Vec<ExtractedElement>,
}

impl AnalysisReport {
    pub fn by_category(
        &self,
        category: ElementCategory,
    ) -> impl Iterator<Item = &ExtractedElement> {
        self.elements.iter().filter(move |e| e.category == category)
    }

    pub fn selected(&self) -> Vec<ExtractedElement> {
        self.elements.iter().filter(|e| e.selected).cloned().collect()
    }

    /// Flip an element's selection. Returns false (and changes nothing) when
    /// the id is gone.
    pub fn toggle(&mut self, id: ElementId) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                element.selected = !element.selected;
                true
            }
            None => false,
        }
    }
}

/// Lightweight project record shown on the landing screen. In-memory only;
/// state resets on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ProjectMeta {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            thumbnail: None,
        }
    }
}
