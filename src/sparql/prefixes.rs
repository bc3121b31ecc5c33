//! Standard Wikidata namespace prefixes.

/// `(name, iri)` pairs declared in front of queries that declare none.
pub const STANDARD_PREFIXES: &[(&str, &str)] = &[
    ("wd", "http://www.wikidata.org/entity/"),
    ("wdt", "http://www.wikidata.org/prop/direct/"),
    ("p", "http://www.wikidata.org/prop/"),
    ("ps", "http://www.wikidata.org/prop/statement/"),
    ("wikibase", "http://wikiba.se/ontology#"),
    ("bd", "http://www.bigdata.com/rdf#"),
];

/// Renders [`STANDARD_PREFIXES`] as `PREFIX` lines.
pub fn prefix_block() -> String {
    STANDARD_PREFIXES
        .iter()
        .map(|(name, iri)| format!("PREFIX {name}: <{iri}>"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_prefix_line(line: &str) -> bool {
    let line = line.trim_start();
    line.get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("PREFIX"))
}

/// Prepends the standard prefix block to a sanitized query.
///
/// The query is returned unchanged when it is empty, consists only of
/// `PREFIX` lines, or already declares any prefix. The last condition is a
/// presence check on `PREFIX` lines, not a per-name merge: a caller that
/// declares `wd:` but uses `wdt:` is on their own.
pub fn inject_prefixes(sanitized: &str) -> String {
    let mut has_body = false;
    let mut has_prefix = false;

    for line in sanitized.lines().filter(|l| !l.trim().is_empty()) {
        if is_prefix_line(line) {
            has_prefix = true;
        } else {
            has_body = true;
        }
    }

    if has_body && !has_prefix {
        format!("{}\n{}", prefix_block(), sanitized)
    } else {
        sanitized.to_string()
    }
}
