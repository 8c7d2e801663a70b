//! Service page generator for pagestamp.
//!
//! Stamps one landing page per service record out of a shared HTML template,
//! then writes a sitemap and robots policy covering every generated page.

pub mod builder;
pub mod document;
pub mod normalize;
pub mod page;
pub mod region;
pub mod site;
pub mod sitemap;
pub mod synthesis;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use normalize::{clean_file, Cleaned, FileCleanup, Normalizer};
pub use page::{PageTemplate, RegionOutcome, RegionStatus, RegionValues, RenderedPage};
pub use region::Region;
pub use site::SiteConfig;
pub use synthesis::{cross_links, FieldWarning, Synthesis, SynthesizedPage, Synthesizer};
