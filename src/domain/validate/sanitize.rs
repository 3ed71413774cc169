//! Markup stripping for free-text memo content.
//!
//! Output is plain text: no tags, no attributes, no comments. Elements whose body is not
//! meant to be displayed as text (`script`, `style`, ...) are removed together with their
//! contents. A tag still open at the end of the input is dropped too. Text without markup
//! comes back unchanged, so applying `sanitize_content` to its own output is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

/// Elements discarded along with everything inside them.
const NON_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "option", "noscript"];

static NON_TEXT_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    NON_TEXT_TAGS
        .iter()
        .map(|tag| {
            // An unclosed element swallows the rest of the input.
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*(?:>(?:.*?</{tag}\s*>|.*$)|$)"))
                .expect("valid non-text element regex")
        })
        .collect()
});
static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").expect("valid comment regex"));
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<(?:/?[A-Za-z]|[!?])[^>]*(?:>|$)").expect("valid tag regex"));

fn strip_once(input: &str) -> String {
    let mut out = input.to_string();
    for re in NON_TEXT_RE.iter() {
        out = re.replace_all(&out, "").into_owned();
    }
    out = COMMENT_RE.replace_all(&out, "").into_owned();
    TAG_RE.replace_all(&out, "").into_owned()
}

/// Strips all markup from `input`.
///
/// Whitespace left around the removed markup is trimmed; input without markup is returned
/// as is.
pub fn sanitize_content(input: &str) -> String {
    let mut current = input.to_string();
    let mut stripped = false;
    // Removing one tag can splice the neighbours into a new one (`<<b>b>`), so run to a
    // fixed point.
    loop {
        let next = strip_once(&current);
        if next == current {
            break;
        }
        stripped = true;
        current = next;
    }
    if stripped {
        current.trim().to_string()
    } else {
        current
    }
}
