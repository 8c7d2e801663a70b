//! Named template regions and how each one is addressed.

use std::fmt;

use crate::document::{Comment, Element};

/// Matches a single element by tag name, an optional exact attribute value and
/// an optional class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    pub tag: &'static str,
    pub attr: Option<(&'static str, &'static str)>,
    pub class: Option<&'static str>,
}

impl Selector {
    /// Whether `element` satisfies this selector.
    pub fn matches(&self, element: &Element) -> bool {
        if element.name != self.tag {
            return false;
        }
        if let Some((name, value)) = self.attr {
            if element.attr(name) != Some(value) {
                return false;
            }
        }
        match self.class {
            Some(class) => element.has_class(class),
            None => true,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if let Some(class) = self.class {
            write!(f, ".{}", class)?;
        }
        if let Some((name, value)) = self.attr {
            write!(f, "[{}=\"{}\"]", name, value)?;
        }
        Ok(())
    }
}

/// Where a region lives in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// An element matched by selector
    Element(Selector),
    /// A comment whose trimmed body equals the marker
    Comment(&'static str),
}

impl Anchor {
    pub fn matches_comment(&self, comment: &Comment) -> bool {
        matches!(self, Anchor::Comment(marker) if comment.text == *marker)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Element(selector) => write!(f, "{}", selector),
            Anchor::Comment(marker) => write!(f, "<!--{}-->", marker),
        }
    }
}

/// How a region's content is applied to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Replace the element's content
    Inner,
    /// Set an attribute on the start tag
    Attribute(&'static str),
    /// Drop a class from the start tag; needs no per-record value
    RemoveClass(&'static str),
    /// Replace the anchor (comment) itself
    Replace,
}

/// A substitutable region of the page template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Title,
    MetaDescription,
    Canonical,
    OgTitle,
    OgDescription,
    OgUrl,
    TwitterTitle,
    TwitterDescription,
    HeroTitle,
    HeroSub,
    HeroBackground,
    MetaPill,
    BodyClass,
    HeroClass,
    ServiceBlock,
}

const fn element(
    tag: &'static str,
    attr: Option<(&'static str, &'static str)>,
    class: Option<&'static str>,
) -> Anchor {
    Anchor::Element(Selector { tag, attr, class })
}

impl Region {
    /// Every region, in substitution order.
    pub const ALL: [Region; 15] = [
        Region::Title,
        Region::MetaDescription,
        Region::Canonical,
        Region::OgTitle,
        Region::OgDescription,
        Region::OgUrl,
        Region::TwitterTitle,
        Region::TwitterDescription,
        Region::HeroTitle,
        Region::HeroSub,
        Region::HeroBackground,
        Region::MetaPill,
        Region::BodyClass,
        Region::HeroClass,
        Region::ServiceBlock,
    ];

    /// Human-readable name used in warnings.
    pub fn label(self) -> &'static str {
        match self {
            Region::Title => "title",
            Region::MetaDescription => "meta description",
            Region::Canonical => "canonical",
            Region::OgTitle => "og:title",
            Region::OgDescription => "og:description",
            Region::OgUrl => "og:url",
            Region::TwitterTitle => "twitter:title",
            Region::TwitterDescription => "twitter:description",
            Region::HeroTitle => "hero title",
            Region::HeroSub => "hero sub",
            Region::HeroBackground => "hero bg",
            Region::MetaPill => "meta pill",
            Region::BodyClass => "body class",
            Region::HeroClass => "hero class",
            Region::ServiceBlock => "service unique block",
        }
    }

    pub fn anchor(self) -> Anchor {
        match self {
            Region::Title => element("title", None, None),
            Region::MetaDescription => element("meta", Some(("name", "description")), None),
            Region::Canonical => element("link", Some(("rel", "canonical")), None),
            Region::OgTitle => element("meta", Some(("property", "og:title")), None),
            Region::OgDescription => element("meta", Some(("property", "og:description")), None),
            Region::OgUrl => element("meta", Some(("property", "og:url")), None),
            Region::TwitterTitle => element("meta", Some(("name", "twitter:title")), None),
            Region::TwitterDescription => {
                element("meta", Some(("name", "twitter:description")), None)
            }
            Region::HeroTitle => element("h1", None, Some("hero-title")),
            Region::HeroSub => element("p", None, Some("hero-sub")),
            Region::HeroBackground => element("div", None, Some("hero-bg")),
            Region::MetaPill => element("div", None, Some("meta-pill")),
            Region::BodyClass => element("body", None, Some("page-home")),
            Region::HeroClass => element("section", None, Some("hero--home")),
            Region::ServiceBlock => Anchor::Comment("SERVICE_UNIQUE_BLOCK"),
        }
    }

    pub fn edit(self) -> Edit {
        match self {
            Region::Title
            | Region::HeroTitle
            | Region::HeroSub
            | Region::MetaPill => Edit::Inner,
            Region::MetaDescription
            | Region::OgTitle
            | Region::OgDescription
            | Region::OgUrl
            | Region::TwitterTitle
            | Region::TwitterDescription => Edit::Attribute("content"),
            Region::Canonical => Edit::Attribute("href"),
            Region::HeroBackground => Edit::Attribute("style"),
            Region::BodyClass => Edit::RemoveClass("page-home"),
            Region::HeroClass => Edit::RemoveClass("hero--home"),
            Region::ServiceBlock => Edit::Replace,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn selectors_match_by_attribute_and_class() {
        let doc = Document::parse(
            r#"<meta name="twitter:title" content="x" /><h1 class="big hero-title">Hi</h1>"#,
        );

        let Anchor::Element(twitter) = Region::TwitterTitle.anchor() else {
            panic!("expected element anchor");
        };
        let Anchor::Element(hero) = Region::HeroTitle.anchor() else {
            panic!("expected element anchor");
        };

        assert!(twitter.matches(&doc.elements()[0]));
        assert!(!twitter.matches(&doc.elements()[1]));
        assert!(hero.matches(&doc.elements()[1]));
    }

    #[test]
    fn anchors_display_as_selectors() {
        assert_eq!(
            Region::MetaDescription.anchor().to_string(),
            r#"meta[name="description"]"#
        );
        assert_eq!(Region::HeroSub.anchor().to_string(), "p.hero-sub");
        assert_eq!(
            Region::ServiceBlock.anchor().to_string(),
            "<!--SERVICE_UNIQUE_BLOCK-->"
        );
    }

    #[test]
    fn every_region_has_a_distinct_label() {
        let mut labels: Vec<&str> = Region::ALL.iter().map(|r| r.label()).collect();
        labels.sort_unstable();
        labels.dedup();

        assert_eq!(labels.len(), Region::ALL.len());
    }
}
