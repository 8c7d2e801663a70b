//! Pure page synthesis: template plus records in, documents out.

use std::fmt;

use pagestamp_data::{ServiceRecord, ServiceSet};

use crate::builder::BuildError;
use crate::page::{PageTemplate, RegionOutcome, RegionValues};
use crate::region::Region;
use crate::site::SiteConfig;
use crate::templates::{BlockContext, FaqItem, NavLink, TemplateEngine};

/// A resolved region that kept its template content because a record lacked
/// the field feeding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWarning {
    pub slug: String,
    pub region: Region,
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "service '{}' has no value for {}, template content kept",
            self.slug, self.region
        )
    }
}

/// One generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedPage {
    pub slug: String,
    pub filename: String,
    pub html: String,
}

/// Everything one synthesis pass produced.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// One page per record, in input order
    pub pages: Vec<SynthesizedPage>,
    /// One outcome per region, resolved once for the whole run
    pub outcomes: Vec<RegionOutcome>,
    /// Per-record regions left unfilled
    pub field_warnings: Vec<FieldWarning>,
}

impl Synthesis {
    /// Every warning as operator-facing text.
    pub fn warnings(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.is_warning())
            .map(|o| o.to_string())
            .chain(self.field_warnings.iter().map(|w| w.to_string()))
            .collect()
    }
}

/// Links to every record except `current`, in input order.
pub fn cross_links(services: &ServiceSet, current: &ServiceRecord) -> Vec<NavLink> {
    services
        .siblings(current)
        .map(|s| NavLink {
            label: s.trade_display.clone(),
            href: s.filename.clone(),
        })
        .collect()
}

/// Stamps service pages out of one template.
pub struct Synthesizer {
    site: SiteConfig,
    engine: TemplateEngine,
}

impl Synthesizer {
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            engine: TemplateEngine::new(),
        }
    }

    /// Render one page per record from `template_source`.
    pub fn synthesize(
        &self,
        template_source: &str,
        services: &ServiceSet,
    ) -> Result<Synthesis, BuildError> {
        let (template, outcomes) = PageTemplate::compile(template_source);

        let mut pages = Vec::with_capacity(services.len());
        let mut field_warnings = Vec::new();

        for record in services {
            let values = self.region_values(record, services)?;
            let rendered = template.render(&values);

            field_warnings.extend(rendered.unfilled.into_iter().map(|region| FieldWarning {
                slug: record.slug.clone(),
                region,
            }));

            pages.push(SynthesizedPage {
                slug: record.slug.clone(),
                filename: record.filename.clone(),
                html: rendered.html,
            });
        }

        Ok(Synthesis {
            pages,
            outcomes,
            field_warnings,
        })
    }

    /// Render the content block inserted at the service block marker.
    pub fn render_block(
        &self,
        record: &ServiceRecord,
        services: &ServiceSet,
    ) -> Result<String, BuildError> {
        let context = BlockContext {
            trade_display: record.trade_display.clone(),
            proof: record.short_proof.clone(),
            pain_points: record.pain_points.clone(),
            offer_bullets: record.offer_bullets.clone(),
            faq: record
                .faq
                .iter()
                .map(|f| FaqItem {
                    q: f.q.clone(),
                    a: f.a.clone(),
                })
                .collect(),
            others: cross_links(services, record),
        };

        self.engine
            .render_block(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))
    }

    /// Values for every region a record can fill.
    fn region_values(
        &self,
        record: &ServiceRecord,
        services: &ServiceSet,
    ) -> Result<RegionValues, BuildError> {
        let url = self
            .site
            .page_url(&record.filename)
            .map_err(|e| BuildError::UrlError(format!("{}: {}", record.filename, e)))?
            .to_string();

        let mut values = RegionValues::new();

        let page_title = present(&record.page_title);
        let meta_description = present(&record.meta_description);

        values.set_opt(Region::Title, page_title);
        values.set_opt(Region::OgTitle, page_title);
        values.set_opt(Region::TwitterTitle, page_title);

        values.set_opt(Region::MetaDescription, meta_description);
        values.set_opt(Region::OgDescription, meta_description);
        values.set_opt(Region::TwitterDescription, meta_description);

        values.set(Region::Canonical, url.as_str());
        values.set(Region::OgUrl, url);

        values.set_opt(Region::HeroTitle, present(&record.h1));
        values.set_opt(Region::HeroSub, present(&record.hero_sub));
        values.set_opt(
            Region::HeroBackground,
            present(&record.hero_image).map(|img| self.site.hero_style(img)),
        );

        if let (Some(label), Some(list)) = (present(&record.meta_label), present(&record.meta_list)) {
            let pill = self
                .engine
                .render_meta_pill(label, list)
                .map_err(|e| BuildError::TemplateError(e.to_string()))?;
            values.set(Region::MetaPill, pill);
        }

        values.set(Region::ServiceBlock, self.render_block(record, services)?);

        Ok(values)
    }
}

/// A content field counts as given only when it has visible text.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::RegionStatus;
    use pagestamp_data::FaqEntry;
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>QuantumTask</title>
  <meta name="description" content="Home" />
  <link rel="canonical" href="https://quantumtask.io/" />
  <meta property="og:title" content="Home" />
  <meta property="og:description" content="Home" />
  <meta property="og:url" content="https://quantumtask.io/" />
  <meta name="twitter:title" content="Home" />
  <meta name="twitter:description" content="Home" />
</head>
<body class="page-home">
  <section class="hero hero--home">
    <div class="hero-bg"></div>
    <h1 class="hero-title">Home heading</h1>
    <p class="hero-sub">Home sub</p>
    <div class="meta-pill">
      <span class="meta-label">Home</span>
    </div>
  </section>
  <!--SERVICE_UNIQUE_BLOCK-->
</body>
</html>
"#;

    fn record(slug: &str, trade: &str) -> ServiceRecord {
        let mut r = ServiceRecord::new(slug, format!("{slug}.html"), trade);
        r.page_title = Some(format!("{trade} Answering Service"));
        r.meta_description = Some(format!("Call answering for {trade}."));
        r.h1 = Some(format!("Never miss a {slug} lead"));
        r.hero_sub = Some("Live agents, 24/7".to_string());
        r.hero_image = Some(format!("images/{slug}.jpg"));
        r.meta_label = Some("Built for".to_string());
        r.meta_list = Some(trade.to_string());
        r.pain_points = vec!["Missed calls".to_string()];
        r.offer_bullets = vec!["Booked jobs".to_string()];
        r.faq = vec![FaqEntry {
            q: "How fast?".to_string(),
            a: "48 hours.".to_string(),
        }];
        r
    }

    fn services() -> ServiceSet {
        ServiceSet::new(vec![
            record("plumber", "Plumbers"),
            record("electrician", "Electricians"),
            record("roofer", "Roofers"),
        ])
        .unwrap()
    }

    #[test]
    fn cross_links_skip_self_in_input_order() {
        let set = services();

        let links = cross_links(&set, &set.records()[1]);

        assert_eq!(
            links,
            vec![
                NavLink {
                    label: "Plumbers".to_string(),
                    href: "plumber.html".to_string()
                },
                NavLink {
                    label: "Roofers".to_string(),
                    href: "roofer.html".to_string()
                },
            ]
        );
    }

    #[test]
    fn fills_every_region_for_complete_records() {
        let synthesizer = Synthesizer::new(SiteConfig::default());

        let result = synthesizer.synthesize(TEMPLATE, &services()).unwrap();

        assert!(result.outcomes.iter().all(|o| o.status == RegionStatus::Resolved));
        assert!(result.field_warnings.is_empty());
        assert!(result.warnings().is_empty());
        assert_eq!(result.pages.len(), 3);

        let plumber = &result.pages[0].html;
        assert!(plumber.contains("<title>Plumbers Answering Service</title>"));
        assert!(plumber.contains(r#"<link rel="canonical" href="https://quantumtask.io/plumber.html" />"#));
        assert!(plumber.contains(r#"<meta property="og:url" content="https://quantumtask.io/plumber.html" />"#));
        assert!(plumber.contains(r#"<meta name="twitter:description" content="Call answering for Plumbers." />"#));
        assert!(plumber.contains(r#"<h1 class="hero-title">Never miss a plumber lead</h1>"#));
        assert!(plumber.contains("url('images/plumber.jpg') center right/cover no-repeat;"));
        assert!(plumber.contains(r#"<span class="meta-list">Plumbers</span>"#));
        assert!(plumber.contains("<body>"));
        assert!(plumber.contains(r#"<section class="hero">"#));
        assert!(plumber.contains("FAQ for Plumbers"));
    }

    #[test]
    fn pages_link_to_siblings_but_not_themselves() {
        let synthesizer = Synthesizer::new(SiteConfig::default());

        let result = synthesizer.synthesize(TEMPLATE, &services()).unwrap();

        for page in &result.pages {
            for other in &result.pages {
                let link = format!(r#"href="{}""#, other.filename);
                if page.slug == other.slug {
                    assert!(!page.html.contains(&link), "{} links to itself", page.slug);
                } else {
                    assert!(page.html.contains(&link), "{} misses {}", page.slug, other.slug);
                }
            }
        }
    }

    #[test]
    fn missing_marker_warns_once_for_all_records() {
        let template = TEMPLATE.replace(r#"<p class="hero-sub">Home sub</p>"#, "");
        let synthesizer = Synthesizer::new(SiteConfig::default());

        let result = synthesizer.synthesize(&template, &services()).unwrap();

        let warnings: Vec<&RegionOutcome> =
            result.outcomes.iter().filter(|o| o.is_warning()).collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].region, Region::HeroSub);
        assert_eq!(result.pages.len(), 3);
        for page in &result.pages {
            assert!(!page.html.contains("hero-sub"));
            assert!(page.html.contains("hero-title"));
        }
    }

    #[test]
    fn missing_record_fields_keep_template_content() {
        let mut sparse = ServiceRecord::new("hvac", "hvac.html", "HVAC");
        sparse.page_title = Some("HVAC Answering".to_string());
        let set = ServiceSet::new(vec![sparse]).unwrap();
        let synthesizer = Synthesizer::new(SiteConfig::default());

        let result = synthesizer.synthesize(TEMPLATE, &set).unwrap();

        let html = &result.pages[0].html;
        assert!(html.contains("<title>HVAC Answering</title>"));
        assert!(html.contains(r#"<h1 class="hero-title">Home heading</h1>"#));
        assert!(html.contains(r#"<meta name="description" content="Home" />"#));

        let unfilled: Vec<Region> = result.field_warnings.iter().map(|w| w.region).collect();
        assert_eq!(
            unfilled,
            vec![
                Region::MetaDescription,
                Region::OgDescription,
                Region::TwitterDescription,
                Region::HeroBackground,
                Region::HeroTitle,
                Region::HeroSub,
                Region::MetaPill,
            ]
        );
    }

    #[test]
    fn blank_record_fields_keep_template_content() {
        let mut blank = record("hvac", "HVAC");
        blank.page_title = Some(String::new());
        blank.h1 = Some("   ".to_string());
        let set = ServiceSet::new(vec![blank]).unwrap();
        let synthesizer = Synthesizer::new(SiteConfig::default());

        let result = synthesizer.synthesize(TEMPLATE, &set).unwrap();

        let html = &result.pages[0].html;
        assert!(html.contains("<title>QuantumTask</title>"));
        assert!(html.contains(r#"<meta property="og:title" content="Home" />"#));
        assert!(html.contains(r#"<h1 class="hero-title">Home heading</h1>"#));
        assert!(html.contains(r#"<p class="hero-sub">Live agents, 24/7</p>"#));

        let unfilled: Vec<Region> = result.field_warnings.iter().map(|w| w.region).collect();
        assert_eq!(
            unfilled,
            vec![
                Region::Title,
                Region::OgTitle,
                Region::TwitterTitle,
                Region::HeroTitle,
            ]
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let synthesizer = Synthesizer::new(SiteConfig::default());
        let set = services();

        let first = synthesizer.synthesize(TEMPLATE, &set).unwrap();
        let second = synthesizer.synthesize(TEMPLATE, &set).unwrap();

        assert_eq!(first.pages, second.pages);
    }
}
