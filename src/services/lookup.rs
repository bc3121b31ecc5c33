//! Entity lookups and the composite tools built on them.

use serde::Serialize;
use serde_json::Value;

use crate::context::{AppApi, Context};
use crate::di::FromContext;
use crate::services::queries;
use crate::services::sparql::SparqlService;
use crate::services::tool_error::{PipelineStep, ToolError};
use crate::wikidata::{self, EntityMetadata};

/// Property resolved by name inside [`LookupService::find_entity_facts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRef {
    pub id: String,
    pub name: String,
}

/// Result of [`LookupService::find_entity_facts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityFacts {
    pub entity: EntityMetadata,
    pub property: Option<PropertyRef>,
    pub facts: Value,
}

/// Service for search, metadata, and the chained fact lookups.
#[derive(FromContext, Clone)]
pub struct LookupService {
    api: AppApi,
    sparql: SparqlService,
}

impl LookupService {
    /// Best-matching item id for `query`.
    pub async fn search_entity(&self, query: &str) -> Result<String, ToolError> {
        match self.api.search_entity(query).await {
            Ok(Some(id)) => Ok(id),
            Ok(None) => Err(ToolError::no_entity(query)),
            Err(err) => {
                tracing::warn!(error = %err, query = %query, "Entity search failed");
                Err(ToolError::entity_search_failed(err.to_string()))
            }
        }
    }

    /// Best-matching property id for `query`.
    pub async fn search_property(&self, query: &str) -> Result<String, ToolError> {
        match self.api.search_property(query).await {
            Ok(Some(id)) => Ok(id),
            Ok(None) => Err(ToolError::no_property(query)),
            Err(err) => {
                tracing::warn!(error = %err, query = %query, "Property search failed");
                Err(ToolError::property_search_failed(err.to_string()))
            }
        }
    }

    pub async fn metadata(&self, entity_id: &str) -> Result<EntityMetadata, ToolError> {
        let id = wikidata::entity_id(entity_id)
            .map_err(|err| ToolError::metadata_failed(entity_id, err.to_string()))?;

        self.api
            .get_entity_metadata(id)
            .await
            .map_err(|err| ToolError::metadata_failed(id, err.to_string()))
    }

    /// Entity search, then metadata, then optional property search, then SPARQL.
    ///
    /// Stops at the first failing step. The returned error names that step
    /// and carries the entity metadata when it was already resolved.
    pub async fn find_entity_facts(
        &self,
        entity_name: &str,
        property_name: Option<&str>,
    ) -> Result<EntityFacts, ToolError> {
        let entity_id = self
            .search_entity(entity_name)
            .await
            .map_err(|e| e.at(PipelineStep::EntitySearch))?;

        let entity = self.metadata(&entity_id).await.map_err(|e| {
            e.at(PipelineStep::Metadata).with_context(format!(
                "Error fetching metadata for entity '{entity_name}' (ID: {entity_id})."
            ))
        })?;

        let property = match property_name.map(str::trim).filter(|p| !p.is_empty()) {
            Some(name) => {
                let id = self.search_property(name).await.map_err(|cause| {
                    ToolError::new(
                        format!("Property '{name}' could not be resolved."),
                        format!(
                            "Could not find property '{name}' while looking up facts for '{entity_name}'."
                        ),
                    )
                    .at(PipelineStep::PropertySearch)
                    .with_entity(entity.clone())
                    .with_cause(cause)
                })?;
                Some(PropertyRef {
                    id,
                    name: name.to_string(),
                })
            }
            None => None,
        };

        let query = match &property {
            Some(p) => queries::property_values(&entity.id, &p.id, self.sparql.language()),
            None => queries::entity_properties(&entity.id, self.sparql.language(), 10),
        };

        let facts = self.sparql.execute(&query).await.map_err(|e| {
            e.at(PipelineStep::Sparql)
                .with_entity(entity.clone())
                .with_context(format!("Error fetching facts for entity '{entity_name}'."))
        })?;

        Ok(EntityFacts {
            entity,
            property,
            facts,
        })
    }

    /// Entities linked from `entity_id`, optionally over one relation.
    pub async fn related_entities(
        &self,
        entity_id: &str,
        relation_property: Option<&str>,
        limit: u32,
    ) -> Result<Value, ToolError> {
        let id = wikidata::entity_id(entity_id).map_err(ToolError::invalid_id)?;
        let relation = relation_property
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(wikidata::property_id)
            .transpose()
            .map_err(ToolError::invalid_id)?;

        let query = queries::related_entities(id, relation, limit.max(1), self.sparql.language());
        self.sparql
            .execute(&query)
            .await
            .map_err(|e| e.at(PipelineStep::Sparql))
    }
}
