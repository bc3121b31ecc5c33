//! Wikidata entity metadata and MediaWiki API response shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const NO_LABEL: &str = "No label found";
pub const NO_DESCRIPTION: &str = "No description found";

/// Label and description of an entity in the configured language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub id: String,
    pub label: String,
    pub description: String,
}

impl EntityMetadata {
    pub(crate) fn from_record(id: &str, record: EntityRecord, language: &str) -> Self {
        let pick = |mut values: HashMap<String, LangValue>, fallback: &str| {
            values
                .remove(language)
                .map(|v| v.value)
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            id: id.to_string(),
            label: pick(record.labels, NO_LABEL),
            description: pick(record.descriptions, NO_DESCRIPTION),
        }
    }
}

// wbsearchentities

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    pub id: String,
}

// wbgetentities

#[derive(Debug, Deserialize)]
pub(crate) struct EntitiesResponse {
    #[serde(default)]
    pub entities: HashMap<String, EntityRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntityRecord {
    /// Present (as an empty string) when the id does not exist.
    #[serde(default)]
    pub missing: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, LangValue>,
    #[serde(default)]
    pub descriptions: HashMap<String, LangValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LangValue {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_from_full_record() {
        let json = r#"{
            "entities": {
                "Q937": {
                    "type": "item",
                    "id": "Q937",
                    "labels": {"en": {"language": "en", "value": "Albert Einstein"}},
                    "descriptions": {"en": {"language": "en", "value": "German-born theoretical physicist (1879-1955)"}}
                }
            }
        }"#;
        let mut response: EntitiesResponse = serde_json::from_str(json).unwrap();
        let record = response.entities.remove("Q937").unwrap();
        let metadata = EntityMetadata::from_record("Q937", record, "en");

        assert_eq!(metadata.label, "Albert Einstein");
        assert!(metadata.description.starts_with("German-born"));
    }

    #[test]
    fn test_missing_language_falls_back() {
        let json = r#"{"labels": {"de": {"value": "Erde"}}}"#;
        let record: EntityRecord = serde_json::from_str(json).unwrap();
        let metadata = EntityMetadata::from_record("Q2", record, "en");

        assert_eq!(metadata.label, NO_LABEL);
        assert_eq!(metadata.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_missing_entity_marker() {
        let json = r#"{"entities": {"Q999999999999": {"id": "Q999999999999", "missing": ""}}}"#;
        let response: EntitiesResponse = serde_json::from_str(json).unwrap();
        assert!(response.entities["Q999999999999"].missing.is_some());
    }
}
