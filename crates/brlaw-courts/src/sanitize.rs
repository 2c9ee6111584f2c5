//! Query sanitization for WAF-filtered search endpoints
//!
//! The TJES search API sits behind a web-application firewall that rejects
//! queries combining three or more quoted terms with a logical AND. Rather
//! than predicting the block, the sanitizer keeps the original query as the
//! primary and prepares an unquoted fallback for the fetch layer to try
//! when the primary comes back blocked.

/// Quoted-term count at or below which a query passes through untouched.
const MAX_QUOTED_TERMS: usize = 2;

/// A query prepared for a WAF-filtered endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedQuery {
    /// The query to try first, always the caller's original text
    pub primary: String,
    /// Unquoted rewrite, present only when the primary risks a block
    pub fallback: Option<String>,
}

/// Prepare a free-text query for submission.
///
/// Pure function: counts complete `"…"` pairs and, above the threshold,
/// produces a fallback with every quote character removed and all other
/// characters preserved in order.
pub fn sanitize(query: &str) -> SanitizedQuery {
    if quoted_term_count(query) <= MAX_QUOTED_TERMS {
        return SanitizedQuery {
            primary: query.to_string(),
            fallback: None,
        };
    }

    SanitizedQuery {
        primary: query.to_string(),
        fallback: Some(query.chars().filter(|c| *c != '"').collect()),
    }
}

/// Number of complete quoted substrings in the query. An unmatched opening
/// quote does not count as a term.
fn quoted_term_count(query: &str) -> usize {
    let mut count = 0;
    let mut in_quote = false;
    for c in query.chars() {
        if c == '"' {
            if in_quote {
                count += 1;
            }
            in_quote = !in_quote;
        }
    }
    count
}
