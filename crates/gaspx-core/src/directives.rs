//! Directive extraction from placeholder-bearing text.
//!
//! Directives are matched with regular expressions over the flat text, after
//! code blocks have been neutralized into placeholders so `<`/`>` inside code
//! cannot confuse the scan. Matched spans are deleted outright; only their
//! attribute metadata and body expression survive, as [`Directive`] values.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

/// Binding name used when a `foreach` directive has no `key` attribute.
const DEFAULT_BINDING: &str = "item";

/// A `<gasp:condition>` block, qualified or not. Group 1 is the open tag's
/// attribute text, group 2 the body.
static CONDITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:gasp:)?condition\b([^>]*)>(.*?)</(?:gasp:)?condition\s*>")
        .expect("valid regex")
});

/// A `<gasp:foreach>` block, same shape as [`CONDITION_RE`].
static FOREACH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:gasp:)?foreach\b([^>]*)>(.*?)</(?:gasp:)?foreach\s*>")
        .expect("valid regex")
});

/// One `name=value` pair. Tolerates double-quoted, single-quoted and bare
/// values; stops at the next attribute or tag end.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=>"'/]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).expect("valid regex")
});

/// A condition or foreach instruction captured from the document text.
///
/// `target` is the value of the `for` attribute and names the element(s) the
/// directive applies to. `expression` is the directive's body text, carried
/// into the generated control-flow code verbatim (whitespace-trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Wrap the target element in a conditional block.
    Condition {
        target: String,
        expression: String,
    },
    /// Wrap the target element (or its children) in a loop block.
    Foreach {
        target: String,
        expression: String,
        binding: String,
    },
}

impl Directive {
    /// The element identifier this directive applies to.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Condition { target, .. } | Self::Foreach { target, .. } => target,
        }
    }
}

/// Value of the named attribute within an open tag's attribute text.
fn attr_value(attrs: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(attrs).find_map(|caps| {
        if &caps[1] != name {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_owned())
    })
}

/// A matched directive span and its parsed form. `None` marks a malformed
/// directive that is deleted from the text but applies nothing.
struct Found {
    span: Range<usize>,
    directive: Option<Directive>,
}

fn found_conditions(text: &str) -> impl Iterator<Item = Found> {
    CONDITION_RE.captures_iter(text).map(|caps| Found {
        span: span_of(&caps),
        directive: attr_value(&caps[1], "for")
            .map(|target| Directive::Condition {
                target,
                expression: caps[2].trim().to_owned(),
            })
            .or_else(|| {
                warn!("condition directive without a `for` attribute, dropping");
                None
            }),
    })
}

fn found_foreaches(text: &str) -> impl Iterator<Item = Found> {
    FOREACH_RE.captures_iter(text).map(|caps| Found {
        span: span_of(&caps),
        directive: attr_value(&caps[1], "for")
            .map(|target| Directive::Foreach {
                target,
                expression: caps[2].trim().to_owned(),
                binding: attr_value(&caps[1], "key")
                    .unwrap_or_else(|| DEFAULT_BINDING.to_owned()),
            })
            .or_else(|| {
                warn!("foreach directive without a `for` attribute, dropping");
                None
            }),
    })
}

fn span_of(caps: &Captures<'_>) -> Range<usize> {
    caps.get(0).map_or(0..0, |m| m.range())
}

/// Find every directive block, delete the matched spans from the text and
/// return the parsed directives in order of appearance.
pub(crate) fn extract_directives(text: &str) -> (String, Vec<Directive>) {
    let mut found: Vec<Found> = found_conditions(text).chain(found_foreaches(text)).collect();
    found.sort_by_key(|f| f.span.start);

    let mut cleaned = String::with_capacity(text.len());
    let mut directives = Vec::new();
    let mut last = 0;
    for f in found {
        if f.span.start < last {
            // Overlapping directive spans mean nesting, which is out of
            // contract; keep the outer match only.
            continue;
        }
        cleaned.push_str(&text[last..f.span.start]);
        last = f.span.end;
        if let Some(directive) = f.directive {
            directives.push(directive);
        }
    }
    cleaned.push_str(&text[last..]);

    (cleaned, directives)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extracts_condition() {
        let (cleaned, directives) =
            extract_directives(r#"a<gasp:condition for="x">flag</gasp:condition>b"#);

        assert_eq!(cleaned, "ab");
        assert_eq!(
            directives,
            vec![Directive::Condition {
                target: "x".to_owned(),
                expression: "flag".to_owned(),
            }]
        );
    }

    #[test]
    fn extracts_foreach_with_default_binding() {
        let (cleaned, directives) =
            extract_directives(r#"<gasp:foreach for="list">Rows</gasp:foreach>"#);

        assert_eq!(cleaned, "");
        assert_eq!(
            directives,
            vec![Directive::Foreach {
                target: "list".to_owned(),
                expression: "Rows".to_owned(),
                binding: "item".to_owned(),
            }]
        );
    }

    #[test]
    fn foreach_key_overrides_binding() {
        let (_, directives) =
            extract_directives(r#"<gasp:foreach for="list" key="row">Rows</gasp:foreach>"#);

        assert_eq!(
            directives,
            vec![Directive::Foreach {
                target: "list".to_owned(),
                expression: "Rows".to_owned(),
                binding: "row".to_owned(),
            }]
        );
    }

    #[test]
    fn accepts_unqualified_tags() {
        let (cleaned, directives) = extract_directives(r#"<condition for="x">f</condition>"#);

        assert_eq!(cleaned, "");
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].target(), "x");
    }

    #[test]
    fn tolerates_quoting_styles() {
        for attrs in [r#"for="x""#, "for='x'", "for=x"] {
            let text = format!("<gasp:condition {attrs}>f</gasp:condition>");
            let (_, directives) = extract_directives(&text);
            assert_eq!(directives[0].target(), "x", "attrs: {attrs}");
        }
    }

    #[test]
    fn missing_for_drops_directive_but_deletes_span() {
        let (cleaned, directives) =
            extract_directives(r#"a<gasp:condition expr="flag">f</gasp:condition>b"#);

        assert_eq!(cleaned, "ab");
        assert!(directives.is_empty());
    }

    #[test]
    fn preserves_textual_order_across_kinds() {
        let text = concat!(
            r#"<gasp:foreach for="l">Rows</gasp:foreach>"#,
            r#"<gasp:condition for="x">f</gasp:condition>"#,
        );
        let (cleaned, directives) = extract_directives(text);

        assert_eq!(cleaned, "");
        assert!(matches!(directives[0], Directive::Foreach { .. }));
        assert!(matches!(directives[1], Directive::Condition { .. }));
    }

    #[test]
    fn body_may_contain_placeholders() {
        let (cleaned, directives) = extract_directives(
            r#"<gasp:condition for="x"><!-- GaspXP[[0]] --></gasp:condition>"#,
        );

        assert_eq!(cleaned, "");
        assert_eq!(
            directives,
            vec![Directive::Condition {
                target: "x".to_owned(),
                expression: "<!-- GaspXP[[0]] -->".to_owned(),
            }]
        );
    }

    #[test]
    fn multiline_body_is_trimmed() {
        let (_, directives) =
            extract_directives("<gasp:condition for=\"x\">\n  Model.Show\n</gasp:condition>");

        assert_eq!(
            directives,
            vec![Directive::Condition {
                target: "x".to_owned(),
                expression: "Model.Show".to_owned(),
            }]
        );
    }
}
