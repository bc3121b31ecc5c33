//! Line-level noise filter for agent-written SPARQL.
//!
//! Queries produced by language models often arrive interleaved with prose
//! ("Here is the query:", "This finds all humans."). The sanitizer keeps only
//! lines that look like SPARQL and drops the rest. It is a heuristic, not a
//! parser: a triple pattern that is missing its trailing period and contains
//! no structural character is dropped as well, and prose containing `{ } ; ,`
//! is kept.
//!
//! Besides an exact first-token match, a clause keyword glued to its opening
//! parenthesis (`FILTER(`, `BIND(`) also marks a line as SPARQL.

/// Keywords that may start a retained line, compared case-insensitively
/// against the first whitespace-delimited token. `BY` is covered through
/// `GROUP` and `ORDER`.
pub const CLAUSE_KEYWORDS: &[&str] = &[
    "PREFIX", "SELECT", "ASK", "CONSTRUCT", "DESCRIBE", "INSERT", "FILTER", "BIND", "VALUES",
    "OPTIONAL", "UNION", "GRAPH", "SERVICE", "MINUS", "WHERE", "GROUP", "HAVING", "ORDER",
    "LIMIT", "OFFSET", "DATA",
];

const STRUCTURAL_CHARS: &[char] = &['{', '}', ';', ','];

/// Result of sanitizing a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    /// Retained lines, unmodified, joined with `\n`.
    pub text: String,
    /// Non-blank, non-comment lines that were dropped as noise.
    pub dropped: Vec<String>,
}

impl Sanitized {
    /// Retained lines, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Filters `query` down to lines recognised as SPARQL.
///
/// Blank lines and full-line `#` comments are removed without being reported
/// in [`Sanitized::dropped`].
pub fn sanitize(query: &str) -> Sanitized {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for line in query.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if is_sparql_line(trimmed) {
            kept.push(line);
        } else {
            dropped.push(trimmed.to_string());
        }
    }

    Sanitized {
        text: kept.join("\n"),
        dropped,
    }
}

/// Decides whether a trimmed, non-empty line is kept.
fn is_sparql_line(line: &str) -> bool {
    starts_with_clause_keyword(line)
        || line.contains(STRUCTURAL_CHARS)
        || looks_like_triple_pattern(line)
}

/// The first token equals a keyword, or is a keyword glued to its opening
/// parenthesis (`FILTER(?x > 1)`, `BIND(... AS ?y)`, `HAVING(?n > 0)`).
fn starts_with_clause_keyword(line: &str) -> bool {
    let Some(token) = line.split_whitespace().next() else {
        return false;
    };
    let word = token.split('(').next().unwrap_or(token);
    CLAUSE_KEYWORDS.iter().any(|kw| word.eq_ignore_ascii_case(kw))
}

/// A namespace marker or variable plus a terminating period.
///
/// `wd:`, `wdt:` and `rdf:` all contain `:`, so any colon qualifies.
fn looks_like_triple_pattern(line: &str) -> bool {
    (line.contains(':') || line.contains('?')) && line.ends_with('.')
}
