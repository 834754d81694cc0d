//! Lightweight tag scanner for server fragments
//!
//! Fragments are well-formed template output, so a tag-level scan is enough to
//! find forms, controls, links and class markers without building a tree.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*(/?)>"#,
    )
    .ok()
});

static ATTR_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).ok()
});

/// One start or end tag with its byte span in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lower-cased element name
    pub name: String,
    pub closing: bool,
    pub attrs: Vec<(String, String)>,
    pub start: usize,
    pub end: usize,
}

impl Tag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn opens(&self, name: &str) -> bool {
        !self.closing && self.name == name
    }
}

/// All tags in document order. Comments and doctype are skipped by the
/// pattern since they do not start with a letter.
pub fn tags(html: &str) -> Vec<Tag> {
    let (Some(tag_re), Some(attr_re)) = (TAG_RE.as_ref(), ATTR_RE.as_ref()) else {
        return Vec::new();
    };

    tag_re
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let attrs = caps.get(3).map_or_else(Vec::new, |raw| {
                attr_re
                    .captures_iter(raw.as_str())
                    .filter_map(|a| {
                        let name = a.get(1)?.as_str().to_ascii_lowercase();
                        let value = a
                            .get(2)
                            .or_else(|| a.get(3))
                            .or_else(|| a.get(4))
                            .map_or(String::new(), |m| decode_entities(m.as_str()));
                        Some((name, value))
                    })
                    .collect()
            });
            Some(Tag {
                name: caps.get(2)?.as_str().to_ascii_lowercase(),
                closing: caps.get(1).is_some_and(|m| !m.as_str().is_empty()),
                attrs,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Whether any element carries one of `classes`.
pub fn contains_class(html: &str, classes: &[String]) -> bool {
    tags(html)
        .iter()
        .filter(|t| !t.closing)
        .any(|t| classes.iter().any(|c| t.has_class(c)))
}

/// Byte range of the content of the element opened by `tags[index]`, up to its
/// matching end tag (or the end of the source if it is never closed).
pub fn content_range(html: &str, tags: &[Tag], index: usize) -> (usize, usize) {
    let open = &tags[index];
    let mut depth = 0usize;
    for tag in &tags[index + 1..] {
        if tag.name != open.name {
            continue;
        }
        if tag.closing {
            if depth == 0 {
                return (open.end, tag.start);
            }
            depth -= 1;
        } else {
            depth += 1;
        }
    }
    (open.end, html.len())
}

/// Index of the end tag that closes `tags[index]`, if present.
pub fn closing_index(tags: &[Tag], index: usize) -> Option<usize> {
    let open = &tags[index];
    let mut depth = 0usize;
    for (i, tag) in tags.iter().enumerate().skip(index + 1) {
        if tag.name != open.name {
            continue;
        }
        if tag.closing {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        } else {
            depth += 1;
        }
    }
    None
}

/// Text content of the element opened by `tags[index]`.
pub fn inner_text(html: &str, tags: &[Tag], index: usize) -> String {
    let (start, end) = content_range(html, tags, index);
    text_of(&html[start..end])
}

/// Strip tags from a snippet, decode entities and collapse whitespace.
pub fn text_of(snippet: &str) -> String {
    let mut text = String::with_capacity(snippet.len());
    let mut last = 0;
    for tag in tags(snippet) {
        text.push_str(&snippet[last..tag.start]);
        text.push(' ');
        last = tag.end;
    }
    text.push_str(&snippet[last..]);
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for insertion as element content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Find the first start tag named `name` at or after tag index `from`.
pub fn find_open(tags: &[Tag], name: &str, from: usize) -> Option<usize> {
    tags.iter()
        .enumerate()
        .skip(from)
        .find(|(_, t)| t.opens(name))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_attributes_in_all_quote_styles() {
        let found = tags(r#"<a id="add_id_author" data-url='/authors/new/' class=add-another>"#);
        assert_eq!(found.len(), 1);
        let tag = &found[0];
        assert_eq!(tag.name, "a");
        assert_eq!(tag.attr("id"), Some("add_id_author"));
        assert_eq!(tag.attr("data-url"), Some("/authors/new/"));
        assert!(tag.has_class("add-another"));
    }

    #[test]
    fn boolean_attributes_are_present_with_empty_value() {
        let found = tags(r#"<select name="tags" multiple>"#);
        assert!(found[0].has_attr("multiple"));
        assert_eq!(found[0].attr("multiple"), Some(""));
    }

    #[test]
    fn class_match_is_token_based() {
        let classes = vec!["alert".to_string()];
        assert!(contains_class(r#"<div class="alert alert-danger">x</div>"#, &classes));
        assert!(!contains_class(r#"<div class="alerting">x</div>"#, &classes));
        assert!(!contains_class(r#"{"pk": 1, "name": "alert"}"#, &classes));
    }

    #[test]
    fn nested_content_range() {
        let html = "<div id=\"a\"><div>inner</div>tail</div><p>after</p>";
        let found = tags(html);
        let (start, end) = content_range(html, &found, 0);
        assert_eq!(&html[start..end], "<div>inner</div>tail");
        assert_eq!(closing_index(&found, 0), Some(3));
    }

    #[test]
    fn text_strips_tags_and_decodes() {
        assert_eq!(
            text_of("  <b>Add</b>   another &amp; more\n"),
            "Add another & more"
        );
    }

    #[test]
    fn escape_round_trips_through_text() {
        let raw = r#"<Tom & "Jerry">"#;
        assert_eq!(text_of(&escape(raw)), raw);
    }
}
