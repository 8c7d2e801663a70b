//! Template engine for rendering per-service content blocks.

use minijinja::{context, AutoEscape, Environment};

/// A link to a sibling service page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NavLink {
    /// Visible link text
    pub label: String,
    /// Target file name
    pub href: String,
}

/// A question/answer pair for the FAQ card.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FaqItem {
    pub q: String,
    pub a: String,
}

/// Context for rendering a service block.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BlockContext {
    /// Trade display name
    pub trade_display: String,
    /// Short proof phrases
    pub proof: Vec<String>,
    /// Problems we solve
    pub pain_points: Vec<String>,
    /// What you get
    pub offer_bullets: Vec<String>,
    /// FAQ entries
    pub faq: Vec<FaqItem>,
    /// Links to every other service page
    pub others: Vec<NavLink>,
}

/// Template engine using minijinja.
///
/// Record content is inserted verbatim; auto-escaping is disabled for every
/// template.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in block templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_template_owned("service_block.html".to_string(), SERVICE_BLOCK_TEMPLATE.to_string())
            .expect("Failed to add service block template");

        env.add_template_owned("other_trades.html".to_string(), OTHER_TRADES_TEMPLATE.to_string())
            .expect("Failed to add other trades template");

        env.add_template_owned("meta_pill.html".to_string(), META_PILL_TEMPLATE.to_string())
            .expect("Failed to add meta pill template");

        Self { env }
    }

    /// Render the full content block for a service.
    pub fn render_block(&self, context: &BlockContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("service_block.html")?;

        tmpl.render(context! {
            trade_display => &context.trade_display,
            proof => &context.proof,
            pain_points => &context.pain_points,
            offer_bullets => &context.offer_bullets,
            faq => &context.faq,
            others => &context.others,
        })
    }

    /// Render the inner content of the hero metadata pill.
    pub fn render_meta_pill(&self, label: &str, list: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("meta_pill.html")?
            .render(context! { label => label, list => list })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const SERVICE_BLOCK_TEMPLATE: &str = r##"
<section class="section section-alt service-unique">
  <div class="section-inner">
    <div class="section-header">
      <span class="section-label">Problems we solve for {{ trade_display }}</span>
      <h2>Built to win more {{ trade_display | lower }} work</h2>
      <p class="section-intro">{{ proof | join(" · ") }}</p>
    </div>
    <div class="grid-3 service-unique-grid">
      <div class="card">
        <h3>Problems we solve</h3>
        <ul class="price-list">
          {% for item in pain_points %}<li>{{ item }}</li>{% endfor %}
        </ul>
      </div>
      <div class="card">
        <h3>What you get</h3>
        <ul class="price-list included-list">
          {% for item in offer_bullets %}<li>{{ item }}</li>{% endfor %}
        </ul>
      </div>
      <div class="card">
        <h3>FAQ for {{ trade_display }}</h3>
        <div class="faq-grid">
          {% for entry in faq %}<div class="card faq-item"><h3>{{ entry.q }}</h3><p>{{ entry.a }}</p></div>{% endfor %}
        </div>
      </div>
    </div>
    {% include "other_trades.html" %}
  </div>
</section>"##;

const OTHER_TRADES_TEMPLATE: &str = r##"<div class="pill-row other-trades" style="margin-top:1.5rem;">
      {% for link in others %}<a class="pill-soft" href="{{ link.href }}">{{ link.label }}</a>{% if not loop.last %}
      {% endif %}{% endfor %}
    </div>"##;

const META_PILL_TEMPLATE: &str = r##"
            <span class="meta-label">{{ label }}</span>
            <span class="meta-list">{{ list }}</span>
          "##;
