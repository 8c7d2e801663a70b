//! Site-wide settings shared by every generated page.

use url::Url;

/// Domain the production site is served from.
pub const DEFAULT_DOMAIN: &str = "https://quantumtask.io/";

/// Legal pages listed in the sitemap alongside the generated pages.
pub const DEFAULT_STATIC_PAGES: [&str; 4] = [
    "terms.html",
    "privacy.html",
    "cookies.html",
    "service-terms.html",
];

/// Gradient layered over every hero image.
pub const DEFAULT_HERO_GRADIENT: &str =
    "linear-gradient(135deg,rgba(2,6,23,.96) 0%,rgba(15,23,42,.85) 50%,rgba(2,6,23,.92) 100%)";

/// Site-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site root, always ending in `/`
    domain: Url,

    /// Static pages listed in the sitemap, relative to the root
    pub static_pages: Vec<String>,

    /// CSS gradient drawn over hero images
    pub hero_gradient: String,
}

impl SiteConfig {
    /// Create a config for `domain` with default static pages and gradient.
    ///
    /// The domain must be an absolute http(s) URL; a trailing slash is added
    /// when missing so page paths resolve under it.
    pub fn new(domain: &str) -> Result<Self, url::ParseError> {
        let mut domain = Url::parse(domain)?;
        if domain.cannot_be_a_base() || !matches!(domain.scheme(), "http" | "https") {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        if !domain.path().ends_with('/') {
            let path = format!("{}/", domain.path());
            domain.set_path(&path);
        }
        domain.set_query(None);
        domain.set_fragment(None);

        Ok(Self {
            domain,
            static_pages: DEFAULT_STATIC_PAGES.iter().map(|p| p.to_string()).collect(),
            hero_gradient: DEFAULT_HERO_GRADIENT.to_string(),
        })
    }

    /// The site root URL.
    pub fn root(&self) -> &Url {
        &self.domain
    }

    /// Absolute URL of a page path relative to the site root.
    ///
    /// Each `/`-separated part of `path` is appended as literal path text, so
    /// `#`, `?` and `%` are percent-encoded rather than read as URL syntax.
    pub fn page_url(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut url = self.domain.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }

    /// Inline style for a hero background showing `image`.
    pub fn hero_style(&self, image: &str) -> String {
        format!(
            "background:{}, url('{}') center right/cover no-repeat;",
            self.hero_gradient, image
        )
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN).expect("default domain is a valid URL")
    }
}
