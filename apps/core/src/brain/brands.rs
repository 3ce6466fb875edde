//! Brand registry and brand-mention detection.

use super::normalize::normalize;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Canonical brand names of the site, in registry order. Order matters:
/// callers that need a single brand take the first match.
const DEFAULT_BRANDS: &[&str] = &[
    "Aero",
    "COFFEE CRISP",
    "Coffee Mate",
    "Nescaf",
    "Drumstick",
    "Kit Kat",
    "Smarties",
    "Turtles",
    "After Eight",
    "Big Turk",
    "Crunch",
    "Quality Street",
    "Rolo",
    "Mackintosh Toffee",
    "Mirage",
    "Confectionery Frozen Desserts",
    "Häagen-Dazs",
    "iÖGO",
    "Del Monte",
    "Parlour",
    "Real Dairy",
    "Nido",
    "Nestlé Materna",
    "MAGGI",
    "BOOST Kids",
    "Boost",
    "Essentia",
    "Maison Perrier",
    "Perrier",
    "San Pellegrino",
    "GoodHost",
    "Milo",
    "NESTEA",
    "Nesfruta",
    "Carnation Hot Chocolate",
    "Nesquik",
];

static WEBSITE_INTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(website|site|link)\b").expect("Invalid regex: website intent pattern")
});

/// True when the utterance asks for a page rather than an answer, which
/// selects the direct-URL short path.
pub fn is_website_intent(utterance: &str) -> bool {
    WEBSITE_INTENT.is_match(utterance)
}

/// One registered brand with its match variants, computed once.
#[derive(Debug, Clone)]
pub struct Brand {
    pub name: String,
    pub slug: String,
    pub slug_no_hyphen: String,
}

#[derive(Debug, Clone)]
pub struct BrandRegistry {
    brands: Vec<Brand>,
}

impl Default for BrandRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BRANDS.iter().map(|s| s.to_string()))
    }
}

impl BrandRegistry {
    /// Build the registry, slugging each name up front. Two names that
    /// normalize to the same slug would be indistinguishable at match time,
    /// so collisions are resolved eagerly: the first entry wins and later
    /// colliders are dropped with a warning.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut brands: Vec<Brand> = Vec::new();
        for name in names {
            let slug = normalize(&name);
            if slug.is_empty() {
                warn!(brand = %name, "Skipping brand that normalizes to an empty slug");
                continue;
            }
            if let Some(existing) = brands.iter().find(|b| b.slug == slug) {
                warn!(
                    brand = %name,
                    kept = %existing.name,
                    slug = %slug,
                    "Skipping brand with colliding slug"
                );
                continue;
            }
            let slug_no_hyphen = slug.replace('-', "");
            brands.push(Brand {
                name,
                slug,
                slug_no_hyphen,
            });
        }
        Self { brands }
    }

    /// All brands referenced by the utterance, in registry order. A brand
    /// matches when its slug or hyphen-stripped slug appears as a substring
    /// of the normalized utterance.
    pub fn matches<'a>(&'a self, utterance: &str) -> Vec<&'a Brand> {
        let haystack = normalize(utterance);
        if haystack.is_empty() {
            return Vec::new();
        }
        self.brands
            .iter()
            .filter(|b| haystack.contains(&b.slug) || haystack.contains(&b.slug_no_hyphen))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}
