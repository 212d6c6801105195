//! Record types written and read during a stage

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// Synthetic document inserted by the seeder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticRecord {
    /// 32-character alphanumeric identifier, unique within a collection
    pub id: String,
    /// Label derived from the generation index
    pub name: String,
    /// Random filler of the configured document size
    pub payload: String,
}

impl SyntheticRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// Approximate stored size in bytes
    pub fn size_bytes(&self) -> usize {
        self.id.len() + self.name.len() + self.payload.len()
    }
}

/// Identifiers produced by seeding, in generation order
///
/// Cheap to clone and never mutated after construction, so workers can share
/// it without synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidIdentifiers(Arc<[String]>);

impl ValidIdentifiers {
    pub fn new(identifiers: Vec<String>) -> Self {
        Self(identifiers.into())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }
}

impl Deref for ValidIdentifiers {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for ValidIdentifiers {
    fn from(identifiers: Vec<String>) -> Self {
        Self::new(identifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_keep_generation_order() {
        let ids = ValidIdentifiers::new(vec!["b".into(), "a".into(), "c".into()]);
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.as_slice(), ["b", "a", "c"]);

        let shared = ids.clone();
        assert_eq!(shared, ids);
    }

    #[test]
    fn record_serializes_with_plain_field_names() {
        let record = SyntheticRecord::new("abc", "name: 0", "xyz");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["name"], "name: 0");
        assert_eq!(record.size_bytes(), 13);
    }
}
