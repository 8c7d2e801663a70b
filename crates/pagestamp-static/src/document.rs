//! Lightweight HTML document index.
//!
//! Scans an HTML string once into a flat list of elements and comments with
//! their byte spans, so callers can address nodes by tag, attribute or class
//! and splice new content into the original text without re-serializing it.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text and must not be scanned for tags.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<!--(.*?)-->|<(/?)([A-Za-z][A-Za-z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("Invalid token regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'=<>/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("Invalid attribute regex")
});

/// An attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name
    pub name: String,
    /// Value, or `None` for bare attributes like `defer`
    pub value: Option<String>,
}

/// An element located in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name
    pub name: String,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
    /// Span of the start tag, `<` to `>`
    pub start_tag: Range<usize>,
    /// Span between the start and end tags, when the element is explicitly closed
    pub inner: Option<Range<usize>>,
    /// Span of the end tag, when present
    pub end_tag: Option<Range<usize>>,
    /// Whether the start tag was written as `<tag ... />`
    pub self_closing: bool,
}

impl Element {
    /// Value of the named attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.value.as_deref())
    }

    /// Whether the `class` attribute lists `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Span of the whole element, start tag through end tag.
    pub fn outer(&self) -> Range<usize> {
        match &self.end_tag {
            Some(end) => self.start_tag.start..end.end,
            None => self.start_tag.clone(),
        }
    }

    /// Render this element's start tag with the given attributes.
    pub fn render_start_tag(&self, attrs: &[Attribute]) -> String {
        let mut tag = format!("<{}", self.name);
        for attr in attrs {
            tag.push(' ');
            tag.push_str(&attr.name);
            if let Some(value) = &attr.value {
                tag.push('=');
                push_quoted(&mut tag, value);
            }
        }
        tag.push_str(if self.self_closing { " />" } else { ">" });
        tag
    }

    /// Start tag with `name` set to `value`, appended if not already present.
    pub fn with_attr(&self, name: &str, value: &str) -> String {
        let mut attrs = self.attrs.clone();
        match attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            Some(attr) => attr.value = Some(value.to_string()),
            None => attrs.push(Attribute {
                name: name.to_string(),
                value: Some(value.to_string()),
            }),
        }
        self.render_start_tag(&attrs)
    }

    /// Start tag with `class` removed from the class list.
    ///
    /// The attribute is dropped entirely when no classes remain.
    pub fn without_class(&self, class: &str) -> String {
        let attrs: Vec<Attribute> = self
            .attrs
            .iter()
            .filter_map(|attr| {
                if attr.name != "class" {
                    return Some(attr.clone());
                }
                let remaining: Vec<&str> = attr
                    .value
                    .as_deref()
                    .unwrap_or("")
                    .split_ascii_whitespace()
                    .filter(|c| *c != class)
                    .collect();
                if remaining.is_empty() {
                    None
                } else {
                    Some(Attribute {
                        name: attr.name.clone(),
                        value: Some(remaining.join(" ")),
                    })
                }
            })
            .collect();
        self.render_start_tag(&attrs)
    }
}

/// An HTML comment located in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment body with surrounding whitespace trimmed
    pub text: String,
    /// Span of the whole comment, `<!--` to `-->`
    pub span: Range<usize>,
}

/// A scanned HTML document.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    source: &'a str,
    elements: Vec<Element>,
    comments: Vec<Comment>,
}

impl<'a> Document<'a> {
    /// Scan `source` into an element and comment index.
    ///
    /// Scanning never fails: stray end tags are ignored and elements left open
    /// by the end of the input have no inner span.
    pub fn parse(source: &'a str) -> Self {
        let mut elements: Vec<Element> = Vec::new();
        let mut comments = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut pos = 0;

        while let Some(caps) = TOKEN_RE.captures_at(source, pos) {
            let Some(whole) = caps.get(0) else { break };
            pos = whole.end();

            if let Some(body) = caps.get(1) {
                comments.push(Comment {
                    text: body.as_str().trim().to_string(),
                    span: whole.range(),
                });
                continue;
            }

            let name = caps
                .get(3)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_default();
            let is_end_tag = caps.get(2).is_some_and(|m| !m.as_str().is_empty());

            if is_end_tag {
                if let Some(depth) = open.iter().rposition(|&i| elements[i].name == name) {
                    let element = &mut elements[open[depth]];
                    element.inner = Some(element.start_tag.end..whole.start());
                    element.end_tag = Some(whole.range());
                    open.truncate(depth);
                }
                continue;
            }

            let raw_attrs = caps.get(4).map(|m| m.as_str()).unwrap_or("").trim_end();
            let (raw_attrs, self_closing) = split_self_closing(raw_attrs);
            let attrs = parse_attributes(raw_attrs);

            let index = elements.len();
            elements.push(Element {
                name: name.clone(),
                attrs,
                start_tag: whole.range(),
                inner: None,
                end_tag: None,
                self_closing,
            });

            if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                continue;
            }

            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                match find_raw_text_end(source, pos, &name) {
                    Some(end_tag) => {
                        let element = &mut elements[index];
                        element.inner = Some(pos..end_tag.start);
                        pos = end_tag.end;
                        element.end_tag = Some(end_tag);
                    }
                    None => pos = source.len(),
                }
                continue;
            }

            open.push(index);
        }

        Self {
            source,
            elements,
            comments,
        }
    }

    /// Elements in document order of their start tags.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Comments in document order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Source text covered by `span`.
    pub fn slice(&self, span: &Range<usize>) -> &'a str {
        &self.source[span.clone()]
    }
}

/// Strip a trailing self-closing `/` from start tag attribute text.
///
/// A `/` that ends an unquoted value, as in `href=/`, belongs to the value.
fn split_self_closing(raw: &str) -> (&str, bool) {
    let Some(rest) = raw.strip_suffix('/') else {
        return (raw, false);
    };
    match rest.chars().last() {
        None | Some('"') | Some('\'') => (rest, true),
        Some(c) if c.is_whitespace() => (rest, true),
        Some(_) => (raw, false),
    }
}

/// Append `value` as a quoted attribute value.
///
/// Double quotes are used unless the value contains one. Values holding both
/// quote characters get their double quotes written as `&quot;`.
fn push_quoted(tag: &mut String, value: &str) {
    if !value.contains('"') {
        tag.push('"');
        tag.push_str(value);
        tag.push('"');
    } else if !value.contains('\'') {
        tag.push('\'');
        tag.push_str(value);
        tag.push('\'');
    } else {
        tag.push('"');
        tag.push_str(&value.replace('"', "&quot;"));
        tag.push('"');
    }
}

/// Parse the attribute text of a start tag.
fn parse_attributes(raw: &str) -> Vec<Attribute> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            Some(Attribute { name, value })
        })
        .collect()
}

/// Find the end tag closing a raw text element, searching from `from`.
fn find_raw_text_end(source: &str, from: usize, name: &str) -> Option<Range<usize>> {
    let needle = format!("</{}", name);
    let rest = source[from..].to_ascii_lowercase();
    let start = from + rest.find(&needle)?;
    let close = source[start..].find('>')?;
    Some(start..start + close + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indexes_elements_with_spans() {
        let html = r#"<h1 class="hero-title">Hello <em>world</em></h1>"#;

        let doc = Document::parse(html);
        let h1 = &doc.elements()[0];

        assert_eq!(h1.name, "h1");
        assert!(h1.has_class("hero-title"));
        assert_eq!(doc.slice(h1.inner.as_ref().unwrap()), "Hello <em>world</em>");
        assert_eq!(doc.slice(&h1.outer()), html);
    }

    #[test]
    fn matches_nested_same_name_elements() {
        let html = r#"<div class="outer"><div class="inner">x</div>y</div>"#;

        let doc = Document::parse(html);
        let outer = &doc.elements()[0];
        let inner = &doc.elements()[1];

        assert_eq!(doc.slice(outer.inner.as_ref().unwrap()), r#"<div class="inner">x</div>y"#);
        assert_eq!(doc.slice(inner.inner.as_ref().unwrap()), "x");
    }

    #[test]
    fn parses_attribute_forms() {
        let html = r#"<input type=text value='a "b"' disabled data-x="1">"#;

        let doc = Document::parse(html);
        let input = &doc.elements()[0];

        assert_eq!(input.attr("type"), Some("text"));
        assert_eq!(input.attr("value"), Some(r#"a "b""#));
        assert_eq!(input.attr("data-x"), Some("1"));
        assert!(input.attrs.iter().any(|a| a.name == "disabled" && a.value.is_none()));
        assert!(input.inner.is_none());
    }

    #[test]
    fn void_and_self_closing_elements_have_no_inner() {
        let html = r#"<meta name="description" content="x" /><link rel="canonical" href="/"><p>after</p>"#;

        let doc = Document::parse(html);

        assert!(doc.elements()[0].self_closing);
        assert!(doc.elements()[0].inner.is_none());
        assert!(doc.elements()[1].inner.is_none());
        assert_eq!(doc.slice(doc.elements()[2].inner.as_ref().unwrap()), "after");
    }

    #[test]
    fn skips_tags_inside_raw_text() {
        let html = "<script>if (a<b) { el.innerHTML = '<div>'; }</script><div id=\"real\"></div>";

        let doc = Document::parse(html);
        let names: Vec<&str> = doc.elements().iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["script", "div"]);
        assert_eq!(doc.elements()[1].attr("id"), Some("real"));
    }

    #[test]
    fn indexes_comments() {
        let html = "<main>\n<!--SERVICE_UNIQUE_BLOCK-->\n</main>";

        let doc = Document::parse(html);
        let comment = &doc.comments()[0];

        assert_eq!(comment.text, "SERVICE_UNIQUE_BLOCK");
        assert_eq!(doc.slice(&comment.span), "<!--SERVICE_UNIQUE_BLOCK-->");
    }

    #[test]
    fn tolerates_stray_and_missing_end_tags() {
        let html = "</span><ul><li>one<li>two</ul>";

        let doc = Document::parse(html);
        let ul = &doc.elements()[0];

        assert_eq!(doc.slice(ul.inner.as_ref().unwrap()), "<li>one<li>two");
        assert!(doc.elements()[1].inner.is_none());
    }

    #[test]
    fn rewrites_start_tag_attributes() {
        let doc = Document::parse(r#"<meta property="og:url" content="old" />"#);
        let meta = &doc.elements()[0];

        assert_eq!(
            meta.with_attr("content", "https://example.com/a.html"),
            r#"<meta property="og:url" content="https://example.com/a.html" />"#
        );
    }

    #[test]
    fn keeps_quotes_inside_rewritten_attributes_balanced() {
        let doc = Document::parse(
            r#"<meta property="og:title" content="x" data-note='say "hi"' data-mix='a "b" &#39;c&#39;' />"#,
        );
        let meta = &doc.elements()[0];

        let rewritten = meta.with_attr("content", "New");
        assert_eq!(
            rewritten,
            r#"<meta property="og:title" content="New" data-note='say "hi"' data-mix='a "b" &#39;c&#39;' />"#
        );

        let reparsed = Document::parse(&rewritten);
        assert_eq!(reparsed.elements()[0].attr("data-note"), Some(r#"say "hi""#));
        assert_eq!(reparsed.elements()[0].attr("content"), Some("New"));

        assert_eq!(
            meta.with_attr("content", r#"it's "new""#),
            r#"<meta property="og:title" content="it's &quot;new&quot;" data-note='say "hi"' data-mix='a "b" &#39;c&#39;' />"#
        );
    }

    #[test]
    fn unquoted_trailing_slash_stays_in_value() {
        let doc = Document::parse(r#"<link rel=canonical href=/><br/><img src="a.png"/>"#);
        let link = &doc.elements()[0];

        assert_eq!(link.attr("href"), Some("/"));
        assert!(!link.self_closing);
        assert_eq!(link.with_attr("rel", "alternate"), "<link rel=\"alternate\" href=\"/\">");
        assert!(doc.elements()[1].self_closing);
        assert!(doc.elements()[2].self_closing);
        assert_eq!(doc.elements()[2].attr("src"), Some("a.png"));
    }

    #[test]
    fn removes_class_and_empty_attribute() {
        let doc = Document::parse(r#"<body class="page-home"><section class="hero hero--home" id="top"></section></body>"#);

        assert_eq!(doc.elements()[0].without_class("page-home"), "<body>");
        assert_eq!(
            doc.elements()[1].without_class("hero--home"),
            r#"<section class="hero" id="top">"#
        );
    }
}
