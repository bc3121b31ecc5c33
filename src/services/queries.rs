//! SPARQL text for the built-in lookups.
//!
//! Callers pass identifiers that already passed [`crate::wikidata::entity_id`]
//! or [`crate::wikidata::property_id`].

/// Property/value pairs of an entity, labelled after the inner LIMIT.
pub fn entity_properties(entity_id: &str, language: &str, limit: u32) -> String {
    format!(
        r#"# Property/value pairs, labelled after the subquery limits them.
SELECT ?property ?propertyLabel ?value ?valueLabel
WHERE {{
  {{
    SELECT ?property ?value
    WHERE {{
      wd:{entity_id} ?p ?statement.
      ?statement ?ps ?value.

      ?property wikibase:claim ?p.
      ?property wikibase:statementProperty ?ps.
    }}
    LIMIT {limit}
  }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language}". }}
}}"#
    )
}

/// Values of one direct property.
pub fn property_values(entity_id: &str, property_id: &str, language: &str) -> String {
    format!(
        r#"SELECT ?value ?valueLabel
WHERE {{
  wd:{entity_id} wdt:{property_id} ?value.
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language}". }}
}}"#
    )
}

/// Entities reachable from `entity_id`, over one relation or any direct claim.
pub fn related_entities(
    entity_id: &str,
    relation: Option<&str>,
    limit: u32,
    language: &str,
) -> String {
    match relation {
        Some(property_id) => format!(
            r#"SELECT ?related ?relatedLabel
WHERE {{
  wd:{entity_id} wdt:{property_id} ?related.
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language}". }}
}}
LIMIT {limit}"#
        ),
        None => format!(
            r#"# Related entities over any direct claim, labelled after the subquery limits them.
SELECT ?relation ?relationLabel ?related ?relatedLabel
WHERE {{
  {{
    SELECT ?relation ?related
    WHERE {{
      wd:{entity_id} ?p ?related.
      ?property wikibase:directClaim ?p.
      BIND(?property AS ?relation)
      FILTER(STRSTARTS(STR(?related), "http://www.wikidata.org/entity/"))
    }}
    LIMIT {limit}
  }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language}". }}
}}"#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::{sanitize, validate};

    #[test]
    fn test_builtin_queries_pass_validation() {
        for query in [
            entity_properties("Q937", "en", 50),
            property_values("Q937", "P569", "en"),
            related_entities("Q937", Some("P31"), 10, "en"),
            related_entities("Q937", None, 10, "en"),
        ] {
            let verdict = validate(&query);
            assert!(verdict.valid, "{query}\n{verdict:?}");
        }
    }

    #[test]
    fn test_builtin_queries_survive_sanitizing() {
        for query in [
            entity_properties("Q1", "en", 10),
            related_entities("Q1", None, 5, "de"),
        ] {
            let sanitized = sanitize(&query);
            assert!(sanitized.dropped.is_empty(), "{:?}", sanitized.dropped);
        }
    }
}
