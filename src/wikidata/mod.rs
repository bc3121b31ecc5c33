//! Wikidata entity search and metadata lookup.

mod client;
mod models;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;

pub use client::HttpWikidataApi;
pub use models::{EntityMetadata, NO_DESCRIPTION, NO_LABEL};

static ENTITY_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Q[0-9]+$").expect("valid regex"));
static PROPERTY_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^P[0-9]+$").expect("valid regex"));

/// Read access to the Wikidata MediaWiki API.
#[async_trait]
pub trait WikidataApi: Send + Sync {
    /// Id of the best-matching item for `query`, if any.
    async fn search_entity(&self, query: &str) -> Result<Option<String>, AppError>;

    /// Id of the best-matching property for `query`, if any.
    async fn search_property(&self, query: &str) -> Result<Option<String>, AppError>;

    /// Label and description of `id`. Unknown ids are [`AppError::EntityNotFound`].
    async fn get_entity_metadata(&self, id: &str) -> Result<EntityMetadata, AppError>;
}

/// Checks that `id` is an item id (`Q42`) before it is spliced into SPARQL.
pub fn entity_id(id: &str) -> Result<&str, AppError> {
    let id = id.trim();
    if ENTITY_ID_RE.is_match(id) {
        Ok(id)
    } else {
        Err(AppError::InvalidId {
            kind: "entity",
            id: id.to_string(),
            expected: "Q followed by digits, e.g. Q42",
        })
    }
}

/// Checks that `id` is a property id (`P31`).
pub fn property_id(id: &str) -> Result<&str, AppError> {
    let id = id.trim();
    if PROPERTY_ID_RE.is_match(id) {
        Ok(id)
    } else {
        Err(AppError::InvalidId {
            kind: "property",
            id: id.to_string(),
            expected: "P followed by digits, e.g. P31",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids() {
        assert_eq!(entity_id("Q937").unwrap(), "Q937");
        assert_eq!(entity_id(" Q5 ").unwrap(), "Q5");
        assert!(entity_id("P31").is_err());
        assert!(entity_id("Q").is_err());
        assert!(entity_id("Q1 } ?s ?p ?o").is_err());
    }

    #[test]
    fn test_property_ids() {
        assert_eq!(property_id("P569").unwrap(), "P569");
        assert!(property_id("Q5").is_err());

        let err = property_id("instance of").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid property ID 'instance of': expected P followed by digits, e.g. P31"
        );
    }
}
