//! Prompt templates that steer clients toward Wikidata-backed answers.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::{PromptMessage, PromptMessageRole},
    prompt, prompt_router,
    schemars::{self, JsonSchema},
};
use serde::{Deserialize, Serialize};

use crate::mcp::server::McpServer;

const DEFAULT_HOLDERS: u32 = 3;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PositionHoldersArgs {
    /// Position to look up (e.g., "Pope", "President of France").
    pub position_name: String,
    /// How many recent holders to list (default: 3).
    #[serde(default)]
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EntityArgs {
    /// Entity to research.
    pub entity_name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PropertyArgs {
    /// Property to research.
    pub property_name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EntityRelationArgs {
    /// First entity.
    pub entity1_name: String,
    /// Second entity.
    pub entity2_name: String,
}

fn user(text: String) -> Vec<PromptMessage> {
    vec![PromptMessage::new_text(PromptMessageRole::User, text)]
}

#[prompt_router(vis = "pub(crate)")]
impl McpServer {
    /// Most recent holders of a position, ordered by start date.
    #[prompt(name = "position_holders_template")]
    pub async fn position_holders_template(
        &self,
        Parameters(args): Parameters<PositionHoldersArgs>,
    ) -> Vec<PromptMessage> {
        let limit = args
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_HOLDERS);
        user(position_holders(&args.position_name, limit))
    }

    /// Research an entity using Wikidata only.
    #[prompt(name = "entity_search_template")]
    pub async fn entity_search_template(
        &self,
        Parameters(args): Parameters<EntityArgs>,
    ) -> Vec<PromptMessage> {
        user(entity_search(&args.entity_name))
    }

    /// Research a property using Wikidata only.
    #[prompt(name = "property_search_template")]
    pub async fn property_search_template(
        &self,
        Parameters(args): Parameters<PropertyArgs>,
    ) -> Vec<PromptMessage> {
        user(property_search(&args.property_name))
    }

    /// Find documented relationships between two entities.
    #[prompt(name = "entity_relation_template")]
    pub async fn entity_relation_template(
        &self,
        Parameters(args): Parameters<EntityRelationArgs>,
    ) -> Vec<PromptMessage> {
        user(entity_relation(&args.entity1_name, &args.entity2_name))
    }

    /// General guidance for answering from Wikidata.
    #[prompt(name = "general_wikidata_guidance")]
    pub async fn general_wikidata_guidance(&self) -> Vec<PromptMessage> {
        user(GENERAL_GUIDANCE.to_string())
    }
}

fn position_holders(position: &str, limit: u32) -> String {
    format!(
        r#"You need to find the {limit} most recent holders of the position "{position}" in Wikidata.

Follow these steps:
1. First, search for the position ID using search_wikidata_entity.
2. Then, craft a SPARQL query to find people who held this position, ordered by start date (most recent first).
3. Use the following SPARQL pattern as a guide:

```
SELECT ?person ?personLabel ?startDate WHERE {{
  ?person p:P39 [
    ps:P39 wd:Q<position_id>;  # position held: <position>
    pq:P580 ?startDate  # start time
  ].
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
}} ORDER BY DESC(?startDate) LIMIT {limit}
```

4. Execute this query using execute_wikidata_sparql.
5. Format the results in a clear, readable way.
"#
    )
}

fn entity_search(entity: &str) -> String {
    format!(
        r#"You need to find accurate and up-to-date information about {entity} using Wikidata as your primary source of truth.

IMPORTANT: Do NOT rely on your pre-trained knowledge about {entity}, which may be outdated or incorrect. Use ONLY the data returned from Wikidata tools.

Follow these steps precisely:

1. Search for the entity ID using search_wikidata_entity with the query "{entity}".
   - If no entity is found, try alternative spellings or more specific terms.

2. Once you have the entity ID (e.g., Q12345), get the metadata using get_wikidata_metadata.
   - This gives you the official label and description.

3. Get the properties of this entity using get_wikidata_properties.

4. For more specific information, run a SPARQL query with execute_wikidata_sparql.
   - Use the wikidata://common-properties resource for property IDs.
   - Use the wikidata://sparql-examples resource for query patterns.

5. When presenting information, cite Wikidata as your source and include the entity ID.

If the information isn't in Wikidata, say so clearly instead of falling back to potentially outdated knowledge.
"#
    )
}

fn property_search(property: &str) -> String {
    format!(
        r#"You need to find accurate information about the Wikidata property "{property}" using only Wikidata's data.

IMPORTANT: Do NOT rely on your pre-trained knowledge about properties; Wikidata's property system is specific and may differ from your training data.

Follow these steps precisely:

1. Search for the property ID using search_wikidata_property with the query "{property}".
   - Property IDs always start with 'P' followed by digits (e.g., P31 for 'instance of').
   - If no property is found, try alternative terms or check the wikidata://common-properties resource.

2. Use the property ID in a SPARQL query with execute_wikidata_sparql to find entities that use it:
   ```
   SELECT ?entity ?entityLabel WHERE {{
     ?entity wdt:P31 wd:Q5.  # Example: humans (Q5) via 'instance of' (P31)
     SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
   }}
   LIMIT 10
   ```
   Replace P31 with the property ID you found.

3. Analyze the results to understand how the property is used.

4. Explain what the property represents and give examples of entities that use it.

If you cannot find the property in Wikidata, say so rather than guessing.
"#
    )
}

fn entity_relation(first: &str, second: &str) -> String {
    format!(
        r#"You need to discover the factual relationships between {first} and {second} using Wikidata as your authoritative source.

IMPORTANT: Do NOT rely on your pre-trained knowledge about these entities or their relationships. Use ONLY the data returned from Wikidata tools.

Follow these steps precisely:

1. Search for both entity IDs using search_wikidata_entity:
   - search_wikidata_entity("{first}")
   - search_wikidata_entity("{second}")

2. Confirm both entities with get_wikidata_metadata.

3. Look for direct relationships:
   ```
   SELECT ?relation ?relationLabel WHERE {{
     wd:[ENTITY1_ID] ?p wd:[ENTITY2_ID].
     ?property wikibase:directClaim ?p.
     BIND(?property AS ?relation)
     SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
   }}
   ```
   Also try the reverse direction by swapping the IDs.

4. If there is no direct relationship, look for one intermediate entity:
   ```
   SELECT ?intermediate ?intermediateLabel ?relation1 ?relation1Label ?relation2 ?relation2Label WHERE {{
     wd:[ENTITY1_ID] ?p1 ?intermediate.
     ?intermediate ?p2 wd:[ENTITY2_ID].
     ?property1 wikibase:directClaim ?p1.
     ?property2 wikibase:directClaim ?p2.
     BIND(?property1 AS ?relation1)
     BIND(?property2 AS ?relation2)
     SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
   }}
   LIMIT 5
   ```

5. Present the relationships, citing Wikidata and including entity and property IDs.

If no relationship is found, say so. A missing relationship may simply be undocumented in Wikidata.
"#
    )
}

const GENERAL_GUIDANCE: &str = r#"When using Wikidata as a knowledge source, follow these guidelines:

1. PREFER WIKIDATA OVER PRE-TRAINED KNOWLEDGE
   - Query Wikidata first for questions about entities, properties, or relationships.
   - Fall back to pre-trained knowledge only when explicitly asked, or when Wikidata has no information.

2. CITE WIKIDATA
   - Include entity IDs (e.g., Q42) and property IDs (e.g., P31).
   - Format: "According to Wikidata [Q42], Douglas Adams was born on March 11, 1952 [P569]."

3. HANDLE MISSING INFORMATION
   - If information isn't in Wikidata, state: "This information is not available in Wikidata."

4. TOOLS
   - search_wikidata_entity: find entity IDs by name
   - search_wikidata_property: find property IDs by name
   - get_wikidata_metadata: label and description of an entity
   - get_wikidata_properties: property/value pairs of an entity
   - execute_wikidata_sparql: run a custom SPARQL query
   - find_entity_facts: entity lookup plus facts in one call
   - get_related_entities: entities linked from a given entity

5. RESOURCES
   - wikidata://common-properties: commonly used property IDs
   - wikidata://sparql-examples: example queries

6. WRITING SPARQL
   - Use the standard prefixes (wd:, wdt:, p:, ps:, wikibase:, bd:); they are added automatically when a query declares none.
   - Include the label service for human-readable results.
   - Always LIMIT results.

7. COMMON PATTERNS
   - People holding a position: ?person wdt:P39 wd:Q<position_id>
   - Current holders: filter out statements with an end time (pq:P582)
   - Last N holders: ORDER BY DESC(?startDate) LIMIT N
   - Succession: P1365 (replaces) and P1366 (replaced by)
   - Statistics: COUNT, AVG, MAX with GROUP BY

8. EXAMPLE: last 3 popes
   ```
   SELECT ?pope ?popeLabel ?startDate WHERE {
     ?pope p:P39 [
       ps:P39 wd:Q19546;  # position held: pope
       pq:P580 ?startDate  # start time
     ].
     SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
   } ORDER BY DESC(?startDate) LIMIT 3
   ```
"#;
