use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use screenplay::{ElementCategory, ExtractedElement};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ResultId(pub Uuid);

impl ResultId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResultId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generated sample awaiting review. Mutated only by explicit
/// approve/reject actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: ResultId,
    pub category: ElementCategory,
    pub name: String,
    pub image: String,
    pub approved: bool,
    pub confidence: f32,
}

/// The review queue a completed run produces: one record per selected
/// element. Approve/reject on a stale id is a silent no-op.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize records for the selected elements. Confidence is a
    /// deterministic pseudo-score in [0.75, 0.98) derived from the element
    /// name, so repeated runs review identically.
    pub fn from_elements(elements: &[ExtractedElement]) -> Self {
        let records = elements
            .iter()
            .filter(|e| e.selected)
            .map(|element| {
                let id = ResultId::new();
                ResultRecord {
                    id,
                    category: element.category,
                    name: element.name.clone(),
                    image: format!(
                        "https://picsum.photos/seed/{}-{}/200/200",
                        element.category,
                        slug(&element.name)
                    ),
                    approved: false,
                    confidence: pseudo_confidence(&element.name),
                }
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn get(&self, id: ResultId) -> Option<&ResultRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn approve(&mut self, id: ResultId) {
        self.set_approved(id, true);
    }

    pub fn reject(&mut self, id: ResultId) {
        self.set_approved(id, false);
    }

    pub fn approve_many(&mut self, ids: &[ResultId]) {
        for id in ids {
            self.set_approved(*id, true);
        }
    }

    fn set_approved(&mut self, id: ResultId, approved: bool) {
        if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
            record.approved = approved;
        }
    }

    pub fn approved_count(&self) -> usize {
        self.records.iter().filter(|r| r.approved).count()
    }

    pub fn all_approved(&self) -> bool {
        !self.records.is_empty() && self.approved_count() == self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn pseudo_confidence(name: &str) -> f32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in name.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    0.75 + (hash % 23) as f32 / 100.0
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements() -> Vec<ExtractedElement> {
        vec![
            ExtractedElement::new(ElementCategory::Character, "Juno", "pilot", true),
            ExtractedElement::new(ElementCategory::Location, "Harbor Stacks", "towers", true),
            ExtractedElement::new(ElementCategory::Style, "Painted Light", "haze", false),
        ]
    }

    #[test]
    fn materializes_only_selected_elements() {
        let set = ResultSet::from_elements(&elements());
        assert_eq!(set.len(), 2);
        assert!(set.records().iter().all(|r| !r.approved));
        assert!(set
            .records()
            .iter()
            .all(|r| (0.75..0.98).contains(&r.confidence)));
    }

    #[test]
    fn confidence_is_deterministic_per_name() {
        let a = ResultSet::from_elements(&elements());
        let b = ResultSet::from_elements(&elements());
        let scores = |s: &ResultSet| -> Vec<f32> {
            s.records().iter().map(|r| r.confidence).collect()
        };
        assert_eq!(scores(&a), scores(&b));
    }

    #[test]
    fn approve_and_reject_flip_the_flag() {
        let mut set = ResultSet::from_elements(&elements());
        let id = set.records()[0].id;
        set.approve(id);
        assert!(set.get(id).unwrap().approved);
        assert_eq!(set.approved_count(), 1);
        set.reject(id);
        assert!(!set.get(id).unwrap().approved);

        // Stale id: silently ignored.
        set.approve(ResultId::new());
        assert_eq!(set.approved_count(), 0);
    }

    #[test]
    fn all_approved_requires_a_nonempty_set() {
        let mut set = ResultSet::from_elements(&elements());
        assert!(!set.all_approved());
        let ids: Vec<ResultId> = set.records().iter().map(|r| r.id).collect();
        set.approve_many(&ids);
        assert!(set.all_approved());
        assert!(!ResultSet::new().all_approved());
    }
}
