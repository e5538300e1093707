//! Allow-list markup filter for generated text.
//!
//! This is the security boundary between the completion client and anything
//! that stores or renders a brief. It is deliberately a regex-driven tag
//! filter, not an HTML parser: it gates tag names and a single attribute and
//! tolerates malformed nesting. Disallowed markup is dropped silently rather
//! than reported: a compromised or adversarial completion response degrades
//! to plain text, never to live markup.

use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};

/// Structural and inline text tags a brief is allowed to carry.
const ALLOWED_TAGS: [&str; 14] = [
    "h1", "h2", "h3", "h4", "p", "ul", "ol", "li", "b", "strong", "em", "i", "br", "span",
];

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)\b([^>]*?)(\s*/?)>")
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("tag regex must compile: {}", e))
});

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r#"\bclass\s*=\s*"([^"]*)""#)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("class regex must compile: {}", e))
});

fn is_allowed(tag: &str) -> bool {
    ALLOWED_TAGS.iter().any(|t| *t == tag)
}

/// One filtering pass over every tag-like token.
fn filter_tags(raw: &str) -> String {
    TAG_RE
        .replace_all(raw, |caps: &Captures| {
            let closing = !caps[1].is_empty();
            let tag = caps[2].to_ascii_lowercase();
            if !is_allowed(&tag) {
                // Disallowed opening *and* closing tags vanish entirely.
                return String::new();
            }
            if closing {
                return format!("</{}>", tag);
            }
            // Only `class` survives, with its value scrubbed to a safe
            // character set. Event handlers, styles, href/src are dropped.
            let class_attr = CLASS_RE
                .captures(&caps[3])
                .map(|c| {
                    let scrubbed: String = c[1]
                        .chars()
                        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | ' ' | '-'))
                        .collect();
                    format!(" class=\"{}\"", scrubbed)
                })
                .unwrap_or_default();
            format!("<{}{}{}>", tag, class_attr, &caps[4])
        })
        .into_owned()
}

/// Reduce `raw` to markup containing only allow-listed tags.
///
/// Runs the tag filter to a fixed point: removing a disallowed tag can splice
/// its neighbors into a new tag-like token, so a single pass is not enough to
/// guarantee the output is stable under re-sanitization.
pub fn sanitize(raw: &str) -> String {
    let mut current = filter_tags(raw);
    loop {
        let next = filter_tags(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn drops_script_tags_and_keeps_text() {
        let out = sanitize("<p>ok</p><script>alert(1)</script>");
        assert_eq!(out, "<p>ok</p>alert(1)");
        assert!(!out.contains("<script"));
    }

    #[test]
    fn disallowed_closing_tag_also_vanishes() {
        assert_eq!(sanitize("a</div>b"), "ab");
    }

    #[test]
    fn lowercases_allowed_tags() {
        assert_eq!(sanitize("<H2>Title</H2>"), "<h2>Title</h2>");
    }

    #[test]
    fn strips_event_handlers_and_unknown_attributes() {
        let out = sanitize(r#"<p onclick="evil()" style="x" data-y="z">hi</p>"#);
        assert_eq!(out, "<p>hi</p>");
    }

    #[test]
    fn keeps_scrubbed_class_attribute() {
        let out = sanitize(r#"<span class="flash critical">X</span>"#);
        assert_eq!(out, r#"<span class="flash critical">X</span>"#);

        let scrubbed = sanitize(r#"<span class="a;b!c">X</span>"#);
        assert_eq!(scrubbed, r#"<span class="abc">X</span>"#);
    }

    #[test]
    fn drops_href_even_on_disallowed_anchor() {
        let out = sanitize(r#"<a href="https://evil.example">link</a>"#);
        assert_eq!(out, "link");
    }

    #[test]
    fn self_closing_br_survives() {
        assert_eq!(sanitize("line<br/>break"), "line<br/>break");
    }

    #[test]
    fn split_tag_reassembly_is_still_removed() {
        // Removing the inner tag splices the outer fragments into a script
        // tag; the fixpoint pass removes it too.
        let out = sanitize("<<script>script>alert(1)</script>");
        assert!(!out.to_ascii_lowercase().contains("<script"));
    }

    #[test]
    fn plain_text_passes_through() {
        let text = "FLASH: escalation along the northern axis, 3 > 2 but < 10";
        assert_eq!(sanitize(text), text);
    }

    fn tag_names(s: &str) -> Vec<String> {
        TAG_RE
            .captures_iter(s)
            .map(|c| c[2].to_ascii_lowercase())
            .collect()
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(input in ".{0,400}") {
            let once = sanitize(&input);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn output_contains_only_allowed_tags(input in ".{0,400}") {
            let out = sanitize(&input);
            for tag in tag_names(&out) {
                prop_assert!(is_allowed(&tag), "disallowed tag '{}' survived", tag);
            }
        }

        // Markup built from hostile fragments around allowed content
        #[test]
        fn adversarial_fragments_never_leak_script(
            prefix in "[>/a-z ]{0,20}",
            suffix in "[>/a-z ]{0,20}",
        ) {
            let input = format!("{}<script>x</script>{}", prefix, suffix);
            let out = sanitize(&input).to_ascii_lowercase();
            prop_assert!(!out.contains("<script"));
        }
    }
}
