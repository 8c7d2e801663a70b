//! Service records: one content payload per industry landing page.

use serde::Deserialize;

/// A single question/answer pair shown in a page's FAQ card.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FaqEntry {
    /// Question text
    #[serde(alias = "question")]
    pub q: String,

    /// Answer text
    #[serde(alias = "answer")]
    pub a: String,
}

/// One industry vertical's landing page content.
///
/// `slug`, `filename` and `trade_display` identify the page and are required.
/// The text fields feeding template regions are optional: when one is absent,
/// the region it feeds keeps the template's original content.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Unique identifier (e.g. "plumber")
    pub slug: String,

    /// Output file name (e.g. "plumber.html")
    pub filename: String,

    /// Display name of the trade, used for link labels and headings
    pub trade_display: String,

    /// Document title
    #[serde(default)]
    pub page_title: Option<String>,

    /// Meta description for SEO and social cards
    #[serde(default)]
    pub meta_description: Option<String>,

    /// Hero heading
    #[serde(default)]
    pub h1: Option<String>,

    /// Hero subheading
    #[serde(default)]
    pub hero_sub: Option<String>,

    /// Hero background image reference
    #[serde(default)]
    pub hero_image: Option<String>,

    /// Label shown in the hero metadata pill
    #[serde(default)]
    pub meta_label: Option<String>,

    /// Value list shown in the hero metadata pill
    #[serde(default)]
    pub meta_list: Option<String>,

    /// Short proof phrases
    #[serde(default)]
    pub short_proof: Vec<String>,

    /// Problems the service solves
    #[serde(default)]
    pub pain_points: Vec<String>,

    /// What the customer gets
    #[serde(default)]
    pub offer_bullets: Vec<String>,

    /// Frequently asked questions
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
}

impl ServiceRecord {
    /// Create a record with only its identity fields set.
    pub fn new(
        slug: impl Into<String>,
        filename: impl Into<String>,
        trade_display: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            filename: filename.into(),
            trade_display: trade_display.into(),
            page_title: None,
            meta_description: None,
            h1: None,
            hero_sub: None,
            hero_image: None,
            meta_label: None,
            meta_list: None,
            short_proof: Vec::new(),
            pain_points: Vec::new(),
            offer_bullets: Vec::new(),
            faq: Vec::new(),
        }
    }
}
