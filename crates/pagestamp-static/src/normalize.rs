//! Cleanup of mojibake and stray characters in generated pages.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Common cp1252/UTF-8 double-encoding artifacts, longest first.
const MOJIBAKE: &[(&str, &str)] = &[
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}\u{0099}", "'"),
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}\u{009c}", "\""),
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}\u{009d}", "\""),
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}\u{0093}", "-"),
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}\u{0094}", "--"),
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}\u{0091}", "-"),
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}\u{00a6}", "..."),
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}\u{00b9}", "-"),
    ("\u{00c3}\u{00a2}\u{00c2}\u{0080}\u{00c2}", "-"),
    ("\u{00e2}\u{0080}\u{0099}", "'"),
    ("\u{00e2}\u{0080}\u{009c}", "\""),
    ("\u{00e2}\u{0080}\u{009d}", "\""),
    ("\u{00e2}\u{0080}\u{0093}", "-"),
    ("\u{00e2}\u{0080}\u{0094}", "--"),
    ("\u{00e2}\u{0080}\u{0091}", "-"),
    ("\u{00c3}\u{00a2}\u{00c2}", "-"),
    ("\u{20ac}\u{00c2}", "-"),
    ("\u{00c2}\u{00ab}", "\""),
    ("\u{00c2}\u{00bb}", "\""),
    ("\u{00c2}\u{00b7}", "-"),
    ("\u{00c2}\u{00ad}", "-"),
    ("\u{00c2}\u{0095}", "-"),
    ("\u{00c2}\u{0096}", "-"),
    ("\u{00c2}\u{0097}", "--"),
    ("\u{20ac}", "-"),
    ("\u{00c2}", "-"),
];

/// Typographic punctuation replaced with ASCII.
const SMART_PUNCTUATION: &[(&str, &str)] = &[
    ("\u{2018}", "'"),
    ("\u{2019}", "'"),
    ("\u{201c}", "\""),
    ("\u{201d}", "\""),
    ("\u{2013}", "-"),
    ("\u{2014}", "--"),
    ("\u{2011}", "-"),
    ("\u{00b7}", "-"),
    ("\u{0095}", "-"),
    ("\u{0096}", "-"),
    ("\u{0097}", "--"),
];

const ZERO_WIDTH: &[char] = &['\u{200b}', '\u{200c}', '\u{200d}', '\u{feff}'];

/// Result of cleaning a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cleaned {
    pub text: String,
    /// Number of replacements made, per rule
    pub counts: BTreeMap<&'static str, usize>,
}

impl Cleaned {
    pub fn is_changed(&self) -> bool {
        self.counts.values().any(|&n| n > 0)
    }

    /// `rule:count` pairs joined for log output.
    pub fn summary(&self) -> String {
        self.counts
            .iter()
            .map(|(rule, n)| format!("{}:{}", rule, n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rewrites text to plain ASCII punctuation and strips invisible characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Clean `text`, counting every replacement by rule.
    pub fn clean(&self, text: &str) -> Cleaned {
        let mut counts = BTreeMap::new();
        let mut text = text.to_string();

        let bom_free = text.trim_start_matches('\u{feff}');
        if bom_free.len() != text.len() {
            counts.insert("bom_removed", 1);
            text = bom_free.to_string();
        }

        replace_counted(&mut text, "\u{00a0}", " ", "nbsp_to_space", &mut counts);

        for zw in ZERO_WIDTH {
            let hits = text.matches(*zw).count();
            if hits > 0 {
                *counts.entry("zero_width_removed").or_insert(0) += hits;
                text = text.replace(*zw, "");
            }
        }

        for (bad, good) in MOJIBAKE {
            replace_counted(&mut text, bad, good, "mojibake", &mut counts);
        }

        for (bad, good) in SMART_PUNCTUATION {
            replace_counted(&mut text, bad, good, "smart_punctuation", &mut counts);
        }

        replace_counted(&mut text, "\u{fffd}", "-", "replacement_removed", &mut counts);

        Cleaned { text, counts }
    }
}

fn replace_counted(
    text: &mut String,
    bad: &str,
    good: &str,
    rule: &'static str,
    counts: &mut BTreeMap<&'static str, usize>,
) {
    let hits = text.matches(bad).count();
    if hits > 0 {
        *counts.entry(rule).or_insert(0) += hits;
        *text = text.replace(bad, good);
    }
}

/// Outcome of cleaning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCleanup {
    pub path: PathBuf,
    pub changed: bool,
    pub summary: String,
}

/// Clean a file in place, writing only when something changed.
///
/// Invalid UTF-8 is decoded lossily so the replacement characters it yields
/// are cleaned up too. With `dry_run`, nothing is written.
pub fn clean_file(
    normalizer: &Normalizer,
    path: &Path,
    dry_run: bool,
) -> Result<FileCleanup, std::io::Error> {
    let bytes = fs::read(path)?;
    let raw = String::from_utf8_lossy(&bytes);
    let cleaned = normalizer.clean(&raw);
    let changed = cleaned.is_changed();

    if changed && !dry_run {
        fs::write(path, &cleaned.text)?;
    }

    Ok(FileCleanup {
        path: path.to_path_buf(),
        changed,
        summary: cleaned.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn strips_bom_and_invisible_characters() {
        let cleaned = Normalizer::new().clean("\u{feff}a\u{00a0}b\u{200b}c");

        assert_eq!(cleaned.text, "a bc");
        assert_eq!(cleaned.counts.get("bom_removed"), Some(&1));
        assert_eq!(cleaned.counts.get("nbsp_to_space"), Some(&1));
        assert_eq!(cleaned.counts.get("zero_width_removed"), Some(&1));
    }

    #[test]
    fn fixes_mojibake_sequences() {
        let cleaned = Normalizer::new().clean("We\u{00e2}\u{0080}\u{0099}re here \u{00e2}\u{0080}\u{0094} 24/7");

        assert_eq!(cleaned.text, "We're here -- 24/7");
        assert_eq!(cleaned.counts.get("mojibake"), Some(&2));
    }

    #[test]
    fn prefers_longest_mojibake_match() {
        let cleaned = Normalizer::new().clean("\u{00c2}\u{00ab}quoted\u{00c2}\u{00bb}");

        assert_eq!(cleaned.text, "\"quoted\"");
    }

    #[test]
    fn replaces_smart_punctuation() {
        let cleaned = Normalizer::new().clean("\u{201c}Fast\u{201d} \u{2013} it\u{2019}s live");

        assert_eq!(cleaned.text, "\"Fast\" - it's live");
        assert_eq!(cleaned.counts.get("smart_punctuation"), Some(&4));
    }

    #[test]
    fn leaves_clean_text_alone() {
        let cleaned = Normalizer::new().clean("<p>Plain ASCII</p>");

        assert!(!cleaned.is_changed());
        assert_eq!(cleaned.summary(), "");
    }

    #[test]
    fn cleans_files_in_place_unless_dry_run() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("plumber.html");
        fs::write(&path, "it\u{2019}s").unwrap();

        let dry = clean_file(&Normalizer::new(), &path, true).unwrap();
        assert!(dry.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "it\u{2019}s");

        let real = clean_file(&Normalizer::new(), &path, false).unwrap();
        assert!(real.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "it's");
    }
}
