//! `reqwest` implementation of [`WikidataApi`].

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::WikidataConfig;
use crate::error::AppError;
use crate::wikidata::models::{EntitiesResponse, EntityMetadata, SearchResponse};
use crate::wikidata::WikidataApi;

/// MediaWiki action API client for `wbsearchentities` and `wbgetentities`.
#[derive(Debug, Clone)]
pub struct HttpWikidataApi {
    client: Client,
    api_url: String,
    user_agent: String,
    language: String,
}

impl HttpWikidataApi {
    pub fn new(client: Client, config: &WikidataConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            user_agent: config.user_agent.clone(),
            language: config.language.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, AppError> {
        let response = self
            .client
            .get(&self.api_url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("format", "json")])
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn search(&self, query: &str, kind: &str) -> Result<Option<String>, AppError> {
        tracing::debug!(query = %query, kind = %kind, "wbsearchentities");

        let response: SearchResponse = self
            .get(&[
                ("action", "wbsearchentities"),
                ("language", self.language.as_str()),
                ("search", query),
                ("type", kind),
            ])
            .await?;

        Ok(response.search.into_iter().next().map(|hit| hit.id))
    }
}

#[async_trait]
impl WikidataApi for HttpWikidataApi {
    async fn search_entity(&self, query: &str) -> Result<Option<String>, AppError> {
        self.search(query, "item").await
    }

    async fn search_property(&self, query: &str) -> Result<Option<String>, AppError> {
        self.search(query, "property").await
    }

    async fn get_entity_metadata(&self, id: &str) -> Result<EntityMetadata, AppError> {
        tracing::debug!(id = %id, "wbgetentities");

        let mut response: EntitiesResponse = self
            .get(&[
                ("action", "wbgetentities"),
                ("ids", id),
                ("languages", self.language.as_str()),
                ("props", "labels|descriptions"),
            ])
            .await?;

        match response.entities.remove(id) {
            Some(record) if record.missing.is_none() => {
                Ok(EntityMetadata::from_record(id, record, &self.language))
            }
            _ => Err(AppError::EntityNotFound(id.to_string())),
        }
    }
}
