//! Sitemap and robots policy generation.

use chrono::NaiveDate;

use pagestamp_data::ServiceSet;

use crate::site::SiteConfig;

/// One `<url>` entry in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
}

/// Entries for the site root, every service page and every static page.
pub fn sitemap_entries(
    site: &SiteConfig,
    services: &ServiceSet,
    lastmod: NaiveDate,
) -> Result<Vec<SitemapEntry>, url::ParseError> {
    let mut entries = vec![SitemapEntry {
        loc: site.root().to_string(),
        lastmod,
    }];

    let pages = services
        .iter()
        .map(|s| s.filename.as_str())
        .chain(site.static_pages.iter().map(String::as_str));

    for page in pages {
        entries.push(SitemapEntry {
            loc: site.page_url(page)?.to_string(),
            lastmod,
        });
    }

    Ok(entries)
}

/// Serialize entries as a sitemaps.org `urlset` document.
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let urls: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>",
                escape_xml(&entry.loc),
                entry.lastmod.format("%Y-%m-%d")
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
        urls.join("\n")
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Allow-all robots policy pointing at the sitemap.
pub fn render_robots(site: &SiteConfig) -> Result<String, url::ParseError> {
    Ok(format!(
        "User-agent: *\nAllow: /\nSitemap: {}\n",
        site.page_url("sitemap.xml")?
    ))
}
