//! Compiled page template.
//!
//! The template is scanned once and every [`Region`] is resolved to a byte
//! span in the original text. Rendering a page splices per-record values into
//! those spans in a single left-to-right pass, so one substitution can never
//! disturb another.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use crate::document::{Document, Element};
use crate::region::{Anchor, Edit, Region};

/// What happened when a region was resolved against the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionStatus {
    /// Exactly one node matched
    Resolved,
    /// Nothing matched; the region is never substituted
    Missing,
    /// Several nodes matched; the first one is used
    Ambiguous(usize),
    /// The node lies inside or across another region's span and is skipped
    Overlapping(Region),
}

/// Resolution result for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOutcome {
    pub region: Region,
    pub status: RegionStatus,
}

impl RegionOutcome {
    /// Whether this outcome should be surfaced to the operator.
    pub fn is_warning(&self) -> bool {
        self.status != RegionStatus::Resolved
    }

    /// Whether the region is substituted in generated pages.
    pub fn is_applied(&self) -> bool {
        matches!(
            self.status,
            RegionStatus::Resolved | RegionStatus::Ambiguous(_)
        )
    }
}

impl fmt::Display for RegionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let anchor = self.region.anchor();
        match self.status {
            RegionStatus::Resolved => write!(f, "{} resolved at {}", self.region, anchor),
            RegionStatus::Missing => {
                write!(f, "could not find {} ({}) to replace", self.region, anchor)
            }
            RegionStatus::Ambiguous(count) => write!(
                f,
                "{} ({}) matched {} times, using the first",
                self.region, anchor, count
            ),
            RegionStatus::Overlapping(other) => write!(
                f,
                "{} ({}) overlaps {} and was skipped",
                self.region, anchor, other
            ),
        }
    }
}

/// Per-record values keyed by region.
#[derive(Debug, Clone, Default)]
pub struct RegionValues {
    values: HashMap<Region, String>,
}

impl RegionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a region.
    pub fn set(&mut self, region: Region, value: impl Into<String>) {
        self.values.insert(region, value.into());
    }

    /// Set the value for a region if one is available.
    pub fn set_opt(&mut self, region: Region, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(region, value);
        }
    }

    pub fn get(&self, region: Region) -> Option<&str> {
        self.values.get(&region).map(String::as_str)
    }
}

/// A rendered page plus the regions that kept template content because no
/// value was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub unfilled: Vec<Region>,
}

#[derive(Debug, Clone)]
enum SlotKind {
    /// Replace the span with the region's value
    Text,
    /// Replace the start tag with one carrying the region's value in `name`
    Attribute { element: Element, name: &'static str },
    /// Replace the span with precomputed text
    Fixed(String),
}

#[derive(Debug, Clone)]
struct Slot {
    region: Region,
    span: Range<usize>,
    kind: SlotKind,
}

/// A template with every region resolved to a span.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    source: String,
    slots: Vec<Slot>,
}

impl PageTemplate {
    /// Scan `source` and resolve every region.
    ///
    /// Returns one outcome per region in [`Region::ALL`] order. Regions that
    /// are missing or overlap an earlier region are left out of the template.
    pub fn compile(source: impl Into<String>) -> (Self, Vec<RegionOutcome>) {
        let source = source.into();
        let doc = Document::parse(&source);

        let mut statuses: HashMap<Region, RegionStatus> = HashMap::new();
        let mut candidates = Vec::new();

        for region in Region::ALL {
            let (slot, matches) = resolve(&doc, region);
            let status = match (slot, matches) {
                (Some(slot), count) => {
                    candidates.push(slot);
                    if count > 1 {
                        RegionStatus::Ambiguous(count)
                    } else {
                        RegionStatus::Resolved
                    }
                }
                (None, _) => RegionStatus::Missing,
            };
            statuses.insert(region, status);
        }

        candidates.sort_by_key(|slot| (slot.span.start, slot.span.end));

        let mut slots: Vec<Slot> = Vec::with_capacity(candidates.len());
        for slot in candidates {
            if let Some(previous) = slots.last() {
                if slot.span.start < previous.span.end {
                    statuses.insert(slot.region, RegionStatus::Overlapping(previous.region));
                    continue;
                }
            }
            slots.push(slot);
        }

        let outcomes = Region::ALL
            .iter()
            .map(|&region| RegionOutcome {
                region,
                status: statuses
                    .get(&region)
                    .copied()
                    .unwrap_or(RegionStatus::Missing),
            })
            .collect();

        (Self { source, slots }, outcomes)
    }

    /// Regions that will be substituted, in document order.
    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.slots.iter().map(|slot| slot.region)
    }

    /// Render a page, inserting values verbatim.
    pub fn render(&self, values: &RegionValues) -> RenderedPage {
        let mut html = String::with_capacity(self.source.len() + 4096);
        let mut unfilled = Vec::new();
        let mut cursor = 0;

        for slot in &self.slots {
            html.push_str(&self.source[cursor..slot.span.start]);
            let original = &self.source[slot.span.clone()];

            match (&slot.kind, values.get(slot.region)) {
                (SlotKind::Fixed(text), _) => html.push_str(text),
                (SlotKind::Text, Some(value)) => html.push_str(value),
                (SlotKind::Attribute { element, name }, Some(value)) => {
                    html.push_str(&element.with_attr(name, value))
                }
                (_, None) => {
                    html.push_str(original);
                    unfilled.push(slot.region);
                }
            }

            cursor = slot.span.end;
        }

        html.push_str(&self.source[cursor..]);

        RenderedPage { html, unfilled }
    }
}

/// Resolve a region to a slot on its first matching node, plus the match count.
fn resolve(doc: &Document<'_>, region: Region) -> (Option<Slot>, usize) {
    match region.anchor() {
        Anchor::Comment(_) => {
            let anchor = region.anchor();
            let mut matches = doc.comments().iter().filter(|c| anchor.matches_comment(c));
            let count = matches.clone().count();
            let slot = matches.next().map(|comment| Slot {
                region,
                span: comment.span.clone(),
                kind: SlotKind::Text,
            });
            (slot, count)
        }
        Anchor::Element(selector) => {
            let matches: Vec<&Element> = doc
                .elements()
                .iter()
                .filter(|e| selector.matches(e))
                .collect();
            let slot = matches
                .first()
                .and_then(|element| element_slot(region, element));
            (slot, matches.len())
        }
    }
}

fn element_slot(region: Region, element: &Element) -> Option<Slot> {
    match region.edit() {
        Edit::Inner => Some(Slot {
            region,
            span: element.inner.clone()?,
            kind: SlotKind::Text,
        }),
        Edit::Attribute(name) => Some(Slot {
            region,
            span: element.start_tag.clone(),
            kind: SlotKind::Attribute {
                element: element.clone(),
                name,
            },
        }),
        Edit::RemoveClass(class) => Some(Slot {
            region,
            span: element.start_tag.clone(),
            kind: SlotKind::Fixed(element.without_class(class)),
        }),
        Edit::Replace => Some(Slot {
            region,
            span: element.outer(),
            kind: SlotKind::Text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Home</title>
  <meta name="description" content="Home page" />
</head>
<body class="page-home">
  <section class="hero hero--home">
    <div class="hero-bg"></div>
    <h1 class="hero-title">Welcome</h1>
  </section>
  <!--SERVICE_UNIQUE_BLOCK-->
</body>
</html>"#;

    fn status(outcomes: &[RegionOutcome], region: Region) -> RegionStatus {
        outcomes
            .iter()
            .find(|o| o.region == region)
            .map(|o| o.status)
            .unwrap()
    }

    #[test]
    fn resolves_present_regions_and_reports_missing_ones() {
        let (_, outcomes) = PageTemplate::compile(TEMPLATE);

        assert_eq!(outcomes.len(), Region::ALL.len());
        assert_eq!(status(&outcomes, Region::Title), RegionStatus::Resolved);
        assert_eq!(status(&outcomes, Region::HeroBackground), RegionStatus::Resolved);
        assert_eq!(status(&outcomes, Region::ServiceBlock), RegionStatus::Resolved);
        assert_eq!(status(&outcomes, Region::Canonical), RegionStatus::Missing);
        assert_eq!(status(&outcomes, Region::MetaPill), RegionStatus::Missing);
    }

    #[test]
    fn renders_values_into_their_regions() {
        let (template, _) = PageTemplate::compile(TEMPLATE);
        let mut values = RegionValues::new();
        values.set(Region::Title, "Plumbers | Acme");
        values.set(Region::MetaDescription, "Answering for plumbers");
        values.set(Region::HeroTitle, "Never miss a <strong>call</strong>");
        values.set(Region::HeroBackground, "background:url('p.jpg');");
        values.set(Region::ServiceBlock, "<section>block</section>");

        let page = template.render(&values);

        assert!(page.html.contains("<title>Plumbers | Acme</title>"));
        assert!(page
            .html
            .contains(r#"<meta name="description" content="Answering for plumbers" />"#));
        assert!(page
            .html
            .contains(r#"<h1 class="hero-title">Never miss a <strong>call</strong></h1>"#));
        assert!(page
            .html
            .contains(r#"<div class="hero-bg" style="background:url('p.jpg');"></div>"#));
        assert!(page.html.contains("<body>"));
        assert!(page.html.contains(r#"<section class="hero">"#));
        assert!(page.html.contains("<section>block</section>"));
        assert!(!page.html.contains("SERVICE_UNIQUE_BLOCK"));
        assert!(page.unfilled.is_empty());
    }

    #[test]
    fn keeps_template_content_for_unfilled_regions() {
        let (template, _) = PageTemplate::compile(TEMPLATE);
        let mut values = RegionValues::new();
        values.set(Region::Title, "New");

        let page = template.render(&values);

        assert!(page.html.contains(r#"<h1 class="hero-title">Welcome</h1>"#));
        assert!(page.html.contains("<!--SERVICE_UNIQUE_BLOCK-->"));
        assert_eq!(
            page.unfilled,
            vec![
                Region::MetaDescription,
                Region::HeroBackground,
                Region::HeroTitle,
                Region::ServiceBlock
            ]
        );
    }

    #[test]
    fn uses_first_match_when_ambiguous() {
        let html = r#"<h1 class="hero-title">One</h1><h1 class="hero-title">Two</h1>"#;
        let (template, outcomes) = PageTemplate::compile(html);
        let mut values = RegionValues::new();
        values.set(Region::HeroTitle, "New");

        let page = template.render(&values);

        assert_eq!(status(&outcomes, Region::HeroTitle), RegionStatus::Ambiguous(2));
        assert_eq!(
            page.html,
            r#"<h1 class="hero-title">New</h1><h1 class="hero-title">Two</h1>"#
        );
    }

    #[test]
    fn skips_regions_nested_inside_other_regions() {
        let html = r#"<div class="meta-pill"><p class="hero-sub">x</p></div>"#;

        let (template, outcomes) = PageTemplate::compile(html);

        assert_eq!(status(&outcomes, Region::MetaPill), RegionStatus::Resolved);
        assert_eq!(
            status(&outcomes, Region::HeroSub),
            RegionStatus::Overlapping(Region::MetaPill)
        );
        assert_eq!(template.regions().collect::<Vec<_>>(), vec![Region::MetaPill]);
    }

    #[test]
    fn rendering_without_regions_returns_source() {
        let (template, outcomes) = PageTemplate::compile("<p>plain</p>");

        assert!(outcomes.iter().all(|o| o.status == RegionStatus::Missing));
        assert_eq!(template.render(&RegionValues::new()).html, "<p>plain</p>");
    }

    #[test]
    fn describes_outcomes_for_operators() {
        let outcome = RegionOutcome {
            region: Region::Canonical,
            status: RegionStatus::Missing,
        };

        assert_eq!(
            outcome.to_string(),
            r#"could not find canonical (link[rel="canonical"]) to replace"#
        );
        assert!(outcome.is_warning());
        assert!(!outcome.is_applied());
    }
}
