//! Static reference resources.

use rmcp::model::{AnnotateAble, RawResource, Resource};
use serde_json::{json, Value};

pub const COMMON_PROPERTIES_URI: &str = "wikidata://common-properties";
pub const SPARQL_EXAMPLES_URI: &str = "wikidata://sparql-examples";

const COMMON_PROPERTIES: &[(&str, &str)] = &[
    ("P31", "instance of"),
    ("P279", "subclass of"),
    ("P569", "date of birth"),
    ("P570", "date of death"),
    ("P21", "sex or gender"),
    ("P27", "country of citizenship"),
    ("P106", "occupation"),
    ("P17", "country"),
    ("P131", "located in administrative entity"),
    ("P50", "author"),
    ("P57", "director"),
    ("P136", "genre"),
    ("P577", "publication date"),
    ("P580", "start time"),
    ("P582", "end time"),
    ("P361", "part of"),
    ("P527", "has part"),
    ("P39", "position held"),
    ("P800", "notable work"),
    ("P1412", "languages spoken, written or signed"),
];

const SPARQL_EXAMPLES: &[(&str, &str)] = &[
    (
        "Basic entity information",
        r#"SELECT ?property ?propertyLabel ?value ?valueLabel
WHERE {
  {
    SELECT ?property ?value
    WHERE {
      wd:Q937 ?p ?statement.  # Q937 = Albert Einstein
      ?statement ?ps ?value.

      ?property wikibase:claim ?p.
      ?property wikibase:statementProperty ?ps.
    }
    LIMIT 10
  }
  SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
}"#,
    ),
    (
        "Find all scientists",
        r#"SELECT ?scientist ?scientistLabel
WHERE {
  ?scientist wdt:P106 wd:Q901.  # P106 = occupation, Q901 = scientist
  SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
}
LIMIT 20"#,
    ),
    (
        "Find books by an author",
        r#"SELECT ?book ?bookLabel
WHERE {
  ?book wdt:P50 wd:Q535.  # P50 = author, Q535 = Isaac Asimov
  ?book wdt:P31/wdt:P279* wd:Q571.
  SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
}"#,
    ),
    (
        "Find capitals of countries",
        r#"SELECT ?country ?countryLabel ?capital ?capitalLabel
WHERE {
  ?country wdt:P31 wd:Q6256.  # P31 = instance of, Q6256 = country
  ?country wdt:P36 ?capital.  # P36 = capital
  SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
}"#,
    ),
    (
        "Find mountains higher than 8000m",
        r#"SELECT ?mountain ?mountainLabel ?height
WHERE {
  ?mountain wdt:P2044 ?height.  # P2044 = elevation above sea level
  FILTER(?height > 8000)
  ?mountain wdt:P31/wdt:P279* wd:Q8502.
  SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
}
ORDER BY DESC(?height)"#,
    ),
];

/// Resources advertised by `resources/list`.
pub fn list() -> Vec<Resource> {
    vec![
        resource(
            COMMON_PROPERTIES_URI,
            "common_properties",
            "Commonly used Wikidata property IDs and their labels.",
        ),
        resource(
            SPARQL_EXAMPLES_URI,
            "sparql_examples",
            "Example SPARQL queries for common Wikidata tasks.",
        ),
    ]
}

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some("application/json".to_string());
    raw.no_annotation()
}

/// Body of the resource at `uri`, if it exists.
pub fn read(uri: &str) -> Option<Value> {
    match uri {
        COMMON_PROPERTIES_URI => Some(common_properties()),
        SPARQL_EXAMPLES_URI => Some(sparql_examples()),
        _ => None,
    }
}

fn common_properties() -> Value {
    let properties: serde_json::Map<String, Value> = COMMON_PROPERTIES
        .iter()
        .map(|(id, label)| (id.to_string(), Value::from(*label)))
        .collect();

    json!({
        "properties": properties,
        "description": "Common Wikidata properties that can be used to query for specific information about entities."
    })
}

fn sparql_examples() -> Value {
    let examples: Vec<Value> = SPARQL_EXAMPLES
        .iter()
        .map(|(name, query)| json!({"name": name, "query": query}))
        .collect();

    json!({
        "examples": examples,
        "description": "Example SPARQL queries for common Wikidata tasks. These can be used as templates for more specific queries."
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::validate;

    #[test]
    fn test_common_properties() {
        let body = read(COMMON_PROPERTIES_URI).unwrap();
        let properties = body["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 20);
        assert_eq!(properties["P31"], "instance of");
        assert_eq!(properties["P1412"], "languages spoken, written or signed");
    }

    #[test]
    fn test_examples_are_valid_queries() {
        let body = read(SPARQL_EXAMPLES_URI).unwrap();
        let examples = body["examples"].as_array().unwrap();
        assert_eq!(examples.len(), 5);

        for example in examples {
            let query = example["query"].as_str().unwrap();
            let verdict = validate(query);
            assert!(verdict.valid, "{}: {verdict:?}", example["name"]);
        }
    }

    #[test]
    fn test_unknown_uri() {
        assert!(read("wikidata://nope").is_none());
        assert_eq!(list().len(), 2);
    }
}
