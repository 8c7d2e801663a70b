//! Initialize a pagestamp project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command in the current directory.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing pagestamp...");
    run_in(Path::new("."), yes)
}

/// Write starter files into `dir`, keeping existing ones unless `yes`.
fn run_in(dir: &Path, yes: bool) -> Result<()> {
    let files = [
        ("site.toml", DEFAULT_CONFIG),
        ("services.json", DEFAULT_SERVICES),
        ("index.html", DEFAULT_TEMPLATE),
    ];

    for (name, contents) in files {
        let path = dir.join(name);
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", name);
            continue;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", name))?;
        tracing::info!("Created {}", name);
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"[site]
domain = "https://quantumtask.io"
static_pages = ["terms.html", "privacy.html", "cookies.html", "service-terms.html"]

[paths]
services = "services.json"
template = "index.html"
output = "."
images = "images"

[build]
strict = false
"#;

const DEFAULT_SERVICES: &str = r#"[
  {
    "slug": "plumber",
    "filename": "plumber.html",
    "tradeDisplay": "Plumbers",
    "pageTitle": "Call Answering for Plumbers | QuantumTask",
    "metaDescription": "Live agents answer, qualify and book plumbing jobs around the clock.",
    "h1": "Never miss another plumbing job",
    "heroSub": "Trained agents answer every call, qualify the job and book it straight into your calendar.",
    "heroImage": "images/plumber.jpg",
    "metaLabel": "Built for",
    "metaList": "Emergency plumbers, drain specialists, geyser installers",
    "shortProof": ["Live in 48 hours", "No long-term contracts", "24/7 coverage"],
    "painPoints": ["Missed after-hours emergency calls", "Quotes that never get followed up"],
    "offerBullets": ["24/7 live call answering", "Job qualification and booking", "Daily lead summaries"],
    "faq": [
      {"q": "Can you dispatch my technicians?", "a": "Yes. We follow your dispatch rules and notify the on-call technician."}
    ]
  },
  {
    "slug": "electrician",
    "filename": "electrician.html",
    "tradeDisplay": "Electricians",
    "pageTitle": "Call Answering for Electricians | QuantumTask",
    "metaDescription": "Never lose an electrical lead to voicemail again.",
    "h1": "Every electrical lead, answered",
    "heroSub": "Agents trained on your services capture every lead while you stay on the tools.",
    "heroImage": "images/electrician.jpg",
    "metaLabel": "Built for",
    "metaList": "Residential and commercial electricians",
    "shortProof": ["Live in 48 hours", "No long-term contracts"],
    "painPoints": ["Leads lost to voicemail", "Interruptions on site"],
    "offerBullets": ["Lead capture and qualification", "Appointment booking"],
    "faq": [
      {"q": "Do you give quotes?", "a": "We collect job details so you can quote quickly."}
    ]
  }
]
"#;

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>QuantumTask | Outsourced Customer Support</title>
  <meta name="description" content="Outsourced customer support teams that scale with you." />
  <link rel="canonical" href="https://quantumtask.io/" />
  <meta property="og:title" content="QuantumTask | Outsourced Customer Support" />
  <meta property="og:description" content="Outsourced customer support teams that scale with you." />
  <meta property="og:url" content="https://quantumtask.io/" />
  <meta name="twitter:title" content="QuantumTask | Outsourced Customer Support" />
  <meta name="twitter:description" content="Outsourced customer support teams that scale with you." />
</head>
<body class="page-home">
  <section class="hero hero--home">
    <div class="hero-bg"></div>
    <div class="hero-inner">
      <h1 class="hero-title">Support that scales with you</h1>
      <p class="hero-sub">Trained agents, live in days.</p>
      <div class="meta-pill">
        <span class="meta-label">Trusted by</span>
        <span class="meta-list">SaaS, e-commerce, logistics</span>
      </div>
    </div>
  </section>
  <!--SERVICE_UNIQUE_BLOCK-->
</body>
</html>
"#;
