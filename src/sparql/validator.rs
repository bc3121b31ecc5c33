//! Pre-flight structural checks for SPARQL queries.
//!
//! This is not a grammar. It catches the mistakes agents make most often
//! (unbalanced delimiters, dangling keywords, broken `PREFIX` IRIs, unclosed
//! literals) cheaply and before anything reaches the network, and lets
//! everything it does not recognise through for the endpoint to judge.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. `()`, `[]`, `{}` balance
//! 2. `SELECT` projection
//! 3. `WHERE` group pattern
//! 4. `PREFIX` IRIs
//! 5. `LIMIT` / `OFFSET` integers
//! 6. `ORDER BY` conditions
//! 7. `GROUP BY` variables
//! 8. quote balance
//!
//! Delimiter balance is checked on the raw text, comments and literals
//! included. The keyword checks (2 to 7) read a "code view" of the query in
//! which `#` comments are removed, string literals are collapsed to their
//! delimiters and complete IRIs are collapsed to `<>`, so prose inside
//! comments, labels or IRIs cannot trip them. Quote parity is counted with
//! comments removed and literals left intact.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SELECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSELECT\b").expect("valid regex"));
static PROJECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:DISTINCT|REDUCED)\s+)?(?:[?$*(]|\w+\s*\()").expect("valid regex")
});
static WHERE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWHERE\b").expect("valid regex"));
static WHERE_DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^DATA\s*\{").expect("valid regex"));
static PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bPREFIX\s+(?:[A-Za-z][\w.-]*)?:").expect("valid regex")
});
static SLICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:LIMIT|OFFSET)\b").expect("valid regex"));
static SLICE_VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\b").expect("valid regex"));
static ORDER_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").expect("valid regex"));
static ORDER_CONDITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:ASC|DESC)\s*\(|[?$]\w|IRI|STR|LANG|DATATYPE)").expect("valid regex")
});
static GROUP_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bGROUP\s+BY\b").expect("valid regex"));
static VARIABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[?$]\w").expect("valid regex"));

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Verdict {
    fn valid() -> Self {
        Self {
            valid: true,
            error: None,
            suggestion: None,
        }
    }
}

/// A failed check: what is wrong and how to fix it.
struct Invalid {
    error: String,
    suggestion: &'static str,
}

impl Invalid {
    fn new(error: impl Into<String>, suggestion: &'static str) -> Self {
        Self {
            error: error.into(),
            suggestion,
        }
    }
}

impl From<Invalid> for Verdict {
    fn from(invalid: Invalid) -> Self {
        Self {
            valid: false,
            error: Some(invalid.error),
            suggestion: Some(invalid.suggestion.to_string()),
        }
    }
}

/// Validates `query` as supplied by the caller, before any sanitizing.
pub fn validate(query: &str) -> Verdict {
    match run_checks(query) {
        Ok(()) => Verdict::valid(),
        Err(invalid) => invalid.into(),
    }
}

fn run_checks(query: &str) -> Result<(), Invalid> {
    check_delimiters(query)?;

    let code = code_view(query);
    check_select(&code)?;
    check_where(&code)?;
    check_prefixes(&code)?;
    check_slices(&code)?;
    check_order_by(&code)?;
    check_group_by(&code)?;

    check_quotes(&strip_comments(query))
}

fn check_delimiters(code: &str) -> Result<(), Invalid> {
    let mut open = Vec::new();
    for c in code.chars() {
        match c {
            '(' | '[' | '{' => open.push(c),
            ')' | ']' | '}' => {
                let expected = match open.pop() {
                    Some('(') => ')',
                    Some('[') => ']',
                    Some('{') => '}',
                    _ => '\0',
                };
                if expected != c {
                    return Err(Invalid::new(
                        format!("Unbalanced closing bracket/parenthesis/brace: '{c}'"),
                        "Ensure all opening brackets, parentheses, and braces have a matching closing one in the correct order.",
                    ));
                }
            }
            _ => {}
        }
    }

    match open.last() {
        Some(c) => Err(Invalid::new(
            format!("Unclosed opening bracket/parenthesis/brace: '{c}'"),
            "Ensure all opening brackets, parentheses, and braces are closed.",
        )),
        None => Ok(()),
    }
}

fn check_select(code: &str) -> Result<(), Invalid> {
    if keyword_tails(code, &SELECT_RE).all(|tail| PROJECTION_RE.is_match(tail)) {
        Ok(())
    } else {
        Err(Invalid::new(
            "Invalid SELECT clause.",
            "SELECT keyword should be followed by variables (e.g., ?var), '*', or aggregate functions (e.g., COUNT(?var)).",
        ))
    }
}

fn check_where(code: &str) -> Result<(), Invalid> {
    let opens_group = |tail: &str| tail.starts_with('{') || WHERE_DATA_RE.is_match(tail);

    if keyword_tails(code, &WHERE_RE).all(opens_group) {
        Ok(())
    } else {
        Err(Invalid::new(
            "Invalid WHERE clause.",
            "WHERE keyword should be followed by a graph pattern enclosed in curly braces {} (e.g., WHERE { ?s ?p ?o . }).",
        ))
    }
}

fn check_prefixes(code: &str) -> Result<(), Invalid> {
    for tail in keyword_tails(code, &PREFIX_RE) {
        let Some(iri) = tail.strip_prefix('<') else {
            return Err(Invalid::new(
                "Invalid PREFIX declaration.",
                "PREFIX declarations should use URIs enclosed in < > (e.g., PREFIX foaf: <http://xmlns.com/foaf/0.1/>).",
            ));
        };
        let line = iri.lines().next().unwrap_or_default();
        if !line.contains('>') {
            return Err(Invalid::new(
                "Incomplete URI in PREFIX declaration.",
                "Ensure URIs in PREFIX declarations are properly closed with '>'.",
            ));
        }
    }
    Ok(())
}

fn check_slices(code: &str) -> Result<(), Invalid> {
    if keyword_tails(code, &SLICE_RE).all(|tail| SLICE_VALUE_RE.is_match(tail)) {
        Ok(())
    } else {
        Err(Invalid::new(
            "Invalid LIMIT or OFFSET clause.",
            "LIMIT and OFFSET keywords must be followed by a non-negative integer.",
        ))
    }
}

fn check_order_by(code: &str) -> Result<(), Invalid> {
    if keyword_tails(code, &ORDER_BY_RE).all(|tail| ORDER_CONDITION_RE.is_match(tail)) {
        Ok(())
    } else {
        Err(Invalid::new(
            "Invalid ORDER BY clause.",
            "ORDER BY should be followed by a variable (e.g., ?name), or a function call like ASC(?date) or DESC(?value).",
        ))
    }
}

fn check_group_by(code: &str) -> Result<(), Invalid> {
    if keyword_tails(code, &GROUP_BY_RE).all(|tail| VARIABLE_RE.is_match(tail)) {
        Ok(())
    } else {
        Err(Invalid::new(
            "Invalid GROUP BY clause.",
            "GROUP BY should be followed by one or more variables (e.g., GROUP BY ?type).",
        ))
    }
}

/// Counts every quote outside comments, including apostrophes inside
/// literals. Quotes around `"..."@en` or `"..."^^xsd:date` literals pair up
/// like any other.
fn check_quotes(text: &str) -> Result<(), Invalid> {
    if text.matches('"').count() % 2 != 0 {
        return Err(Invalid::new(
            "Unbalanced double quotes.",
            "Ensure all string literals using double quotes are properly opened and closed. Escape internal quotes if necessary (e.g., \\\").",
        ));
    }
    if text.matches('\'').count() % 2 != 0 {
        return Err(Invalid::new(
            "Unbalanced single quotes.",
            "Ensure all string literals using single quotes are properly opened and closed. Escape internal quotes if necessary (e.g., \\').",
        ));
    }
    Ok(())
}

/// Text following each keyword match, leading whitespace removed.
///
/// Matches that are part of a variable (`?where`) or a prefixed name
/// (`ex:select`) are skipped.
fn keyword_tails<'a>(code: &'a str, keyword: &'a Regex) -> impl Iterator<Item = &'a str> + 'a {
    keyword
        .find_iter(code)
        .filter(move |m| !matches!(code[..m.start()].chars().next_back(), Some('?' | '$' | ':')))
        .map(move |m| code[m.end()..].trim_start())
}

/// Strips comments and collapses literals and IRIs (see module docs).
fn code_view(query: &str) -> String {
    scan(query, true)
}

/// Strips `#` comments, leaving literals and IRIs untouched. A `#` inside
/// `<...#>` or a literal is not a comment.
fn strip_comments(query: &str) -> String {
    scan(query, false)
}

/// An opening quote without a closing partner on the same line (or, for
/// `"""` literals, anywhere after it) is kept as a lone quote. A `<` that
/// does not start a whitespace-free `<...>` run is kept as an operator.
fn scan(query: &str, collapse: bool) -> String {
    let chars: Vec<char> = query.chars().collect();
    let mut out = String::with_capacity(query.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let span = match c {
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '"' | '\'' => literal_end(&chars, i).map(|end| (end, [c, c])),
            '<' => iri_end(&chars, i).map(|end| (end, ['<', '>'])),
            _ => None,
        };

        match span {
            Some((end, collapsed)) => {
                if collapse {
                    out.extend(collapsed);
                } else {
                    out.extend(&chars[i..end]);
                }
                i = end;
            }
            None => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Index just past the literal opening at `start`, if it closes.
fn literal_end(chars: &[char], start: usize) -> Option<usize> {
    let quote = chars[start];
    let long = chars.get(start + 1) == Some(&quote) && chars.get(start + 2) == Some(&quote);

    let mut i = if long { start + 3 } else { start + 1 };
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '\n' if !long => return None,
            c if c == quote => {
                if !long {
                    return Some(i + 1);
                }
                if chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                    return Some(i + 3);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Index just past the IRI opening at `start`, if it closes before any
/// character IRIs cannot contain.
fn iri_end(chars: &[char], start: usize) -> Option<usize> {
    for (offset, &c) in chars[start + 1..].iter().enumerate() {
        match c {
            '>' => return Some(start + offset + 2),
            '<' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => return None,
            c if c.is_whitespace() => return None,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_of(query: &str) -> String {
        let verdict = validate(query);
        assert!(!verdict.valid, "expected invalid: {query}");
        assert!(verdict.suggestion.is_some());
        verdict.error.unwrap()
    }

    #[test]
    fn test_accepts_well_formed_queries() {
        let queries = [
            "SELECT ?item ?itemLabel WHERE {\n  ?item wdt:P31 wd:Q146 .\n  SERVICE wikibase:label { bd:serviceParam wikibase:language \"en\". }\n}\nLIMIT 10",
            "ASK { wd:Q1 ?p ?o . FILTER(BOUND(?o)) }",
            "SELECT (COUNT(?o) AS ?count) WHERE { wd:Q1 ?p ?o . } GROUP BY ?p",
            "SELECT ?o WHERE { wd:Q1 ?p ?o . } ORDER BY DESC(?o) LIMIT 1 OFFSET 0",
            "SELECT DISTINCT ?s WHERE { ?s rdfs:label \"Douglas Adams\"@en . }",
            "SELECT * WHERE { ?s wdt:P569 \"1952-03-11\"^^xsd:dateTime . }",
            "PREFIX wikibase: <http://wikiba.se/ontology#>\nSELECT ?p WHERE { ?p wikibase:directClaim ?d . }",
            "INSERT DATA { <http://example.org/a> <http://example.org/b> \"c\" . }",
        ];

        for query in queries {
            assert_eq!(validate(query), Verdict::valid(), "{query}");
        }
    }

    #[test]
    fn test_unbalanced_delimiters_name_the_character() {
        assert!(error_of("SELECT ?s WHERE { ?s ?p ?o ").contains("'{'"));
        assert!(error_of("SELECT ?s WHERE { ?s ?p ?o . }}").contains("'}'"));
        assert!(error_of("ASK { FILTER(?x > 1 }").contains("'}'"));
        assert!(error_of("ASK { ?s ?p [ ?a ?b . }").contains("'}'"));
        assert!(error_of("ASK { ?s ?p ?o . } )").contains("')'"));
        assert!(error_of("SELECT (COUNT(?o AS ?c) WHERE { ?s ?p ?o }").contains("'('"));
    }

    #[test]
    fn test_delimiters_inside_literals_and_comments_count() {
        let in_literal = "SELECT ?s WHERE { ?s rdfs:label \"a (b\" . }";
        assert!(error_of(in_literal).contains("'}'"));

        let in_comment = "SELECT ?s WHERE {\n  # stray )\n  ?s ?p ?o .\n}";
        assert!(error_of(in_comment).contains("')'"));
    }

    #[test]
    fn test_select_requires_projection() {
        assert_eq!(error_of("SELECT WHERE { ?s ?p ?o }"), "Invalid SELECT clause.");
        assert_eq!(error_of("SELECT"), "Invalid SELECT clause.");
        assert!(validate("SELECT COUNT(?s) WHERE { ?s ?p ?o }").valid);
        assert!(validate("SELECT ?selected WHERE { ?selected ?p ?o }").valid);
    }

    #[test]
    fn test_where_requires_group() {
        assert_eq!(error_of("SELECT ?s WHERE ?s ?p ?o"), "Invalid WHERE clause.");
        assert!(validate("DELETE WHERE DATA { ?s ?p ?o }").valid);
        assert!(validate("SELECT ?s WHERE\n{\n?s ?p ?o .\n}").valid);
    }

    #[test]
    fn test_keywords_in_comments_are_ignored() {
        let query = "# Find related entities: apply LIMIT before fetching labels, WHERE possible.\n\
                     SELECT ?o WHERE { wd:Q1 ?p ?o . } LIMIT 5";
        assert!(validate(query).valid);
    }

    #[test]
    fn test_prefix_requires_enclosed_iri() {
        assert_eq!(
            error_of("PREFIX wd: http://www.wikidata.org/entity/\nASK { wd:Q1 ?p ?o }"),
            "Invalid PREFIX declaration."
        );
        assert_eq!(
            error_of("PREFIX wd: <http://www.wikidata.org/entity/\nASK { wd:Q1 ?p ?o }"),
            "Incomplete URI in PREFIX declaration."
        );
        assert!(validate("PREFIX : <http://example.org/>\nASK { :a :b :c }").valid);
    }

    #[test]
    fn test_limit_and_offset_require_integers() {
        assert_eq!(
            error_of("SELECT ?s WHERE { ?s ?p ?o } LIMIT ten"),
            "Invalid LIMIT or OFFSET clause."
        );
        assert_eq!(
            error_of("SELECT ?s WHERE { ?s ?p ?o } LIMIT 5 OFFSET -1"),
            "Invalid LIMIT or OFFSET clause."
        );
        assert!(validate("SELECT ?s WHERE { ?s ?p ?o } LIMIT   10").valid);
    }

    #[test]
    fn test_order_by_conditions() {
        assert_eq!(
            error_of("SELECT ?s WHERE { ?s ?p ?o } ORDER BY 3"),
            "Invalid ORDER BY clause."
        );
        assert!(validate("SELECT ?s WHERE { ?s ?p ?o } ORDER BY ASC (?s)").valid);
        assert!(validate("SELECT ?s WHERE { ?s ?p ?o } ORDER BY STR(?s)").valid);
        assert!(validate("SELECT ?s WHERE { ?s ?p ?o } ORDER BY ?s").valid);
    }

    #[test]
    fn test_group_by_requires_variable() {
        assert_eq!(
            error_of("SELECT (COUNT(?o) AS ?c) WHERE { ?s ?p ?o } GROUP BY p"),
            "Invalid GROUP BY clause."
        );
    }

    #[test]
    fn test_unbalanced_quotes() {
        assert_eq!(
            error_of("SELECT ?s WHERE { ?s rdfs:label \"Douglas Adams . }"),
            "Unbalanced double quotes."
        );
        assert_eq!(
            error_of("SELECT ?s WHERE { ?s rdfs:label 'Douglas . }"),
            "Unbalanced single quotes."
        );
    }

    #[test]
    fn test_quotes_in_comments_are_ignored() {
        let query = "SELECT ?s WHERE {\n  # the author's \"favourite\n  ?s rdfs:label \"Dublin\"@en .\n}";
        assert!(validate(query).valid);

        let iri_hash = "PREFIX wikibase: <http://wikiba.se/ontology#>\nSELECT ?s WHERE { ?s rdfs:label 'x' . }";
        assert!(validate(iri_hash).valid);
    }

    #[test]
    fn test_apostrophe_inside_literal_is_counted() {
        assert_eq!(
            error_of("SELECT ?s WHERE { ?s rdfs:label \"Ireland's\"@en . }"),
            "Unbalanced single quotes."
        );
    }

    #[test]
    fn test_first_failing_check_wins() {
        // Both the brace and the LIMIT are wrong; delimiters are checked first.
        let error = error_of("SELECT ?s WHERE { ?s ?p ?o LIMIT x");
        assert!(error.starts_with("Unclosed"));
    }

    #[test]
    fn test_code_view_collapses_iris_and_literals() {
        let view = code_view("PREFIX wd: <http://www.wikidata.org/entity/> # where\nFILTER(?a < 3 && ?l = \"x{y\")");
        assert_eq!(view, "PREFIX wd: <> \nFILTER(?a < 3 && ?l = \"\")");
    }
}
