//! Literary style catalog and the pluggable selector that draws from it.

use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;

/// The forms offered to the model, in catalog order.
pub const DEFAULT_STYLES: &[&str] = &[
    "free verse",
    "haiku",
    "limerick",
    "elegy",
    "couplet",
    "ballad",
    "sonnet",
    "ode",
    "narrative",
    "prose",
    "epic",
];

#[derive(Debug, Error, PartialEq)]
#[error("style catalog must contain at least one style")]
pub struct EmptyCatalog;

/// Fixed, ordered, non-empty list of style names.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleCatalog {
    styles: Vec<String>,
}

impl StyleCatalog {
    pub fn new<I, S>(styles: I) -> Result<Self, EmptyCatalog>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let styles: Vec<String> = styles.into_iter().map(Into::into).collect();
        if styles.is_empty() {
            return Err(EmptyCatalog);
        }
        Ok(Self { styles })
    }

    /// Uniform draw. Never panics: the catalog is non-empty by construction.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.styles[rng.gen_range(0..self.styles.len())]
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self {
            styles: DEFAULT_STYLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Picks one style per pipeline run. Carried by `PoemPipeline` as
/// `Arc<dyn StyleSelector>` so tests can pin the choice.
pub trait StyleSelector: Send + Sync {
    fn select(&self, catalog: &StyleCatalog) -> String;
}

/// Production selector backed by the thread-local RNG.
pub struct ThreadRngSelector;

impl StyleSelector for ThreadRngSelector {
    fn select(&self, catalog: &StyleCatalog) -> String {
        catalog.choose(&mut rand::thread_rng()).to_string()
    }
}

/// Reproducible selector: the same seed yields the same sequence of styles.
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl StyleSelector for SeededSelector {
    fn select(&self, catalog: &StyleCatalog) -> String {
        // A poisoned lock still holds a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        catalog.choose(&mut *rng).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result = StyleCatalog::new(Vec::<String>::new());
        assert_eq!(result.unwrap_err(), EmptyCatalog);
    }

    #[test]
    fn test_default_catalog_has_eleven_styles_in_order() {
        let catalog = StyleCatalog::default();
        assert_eq!(catalog.styles.len(), 11);
        assert_eq!(catalog.styles[0], "free verse");
        assert_eq!(catalog.styles[10], "epic");
    }

    #[test]
    fn test_single_style_catalog_always_returns_it() {
        let catalog = StyleCatalog::new(["sonnet"]).unwrap();
        let selector = ThreadRngSelector;
        for _ in 0..50 {
            assert_eq!(selector.select(&catalog), "sonnet");
        }
    }

    #[test]
    fn test_seeded_selectors_are_reproducible() {
        let catalog = StyleCatalog::default();
        let a = SeededSelector::new(2024);
        let b = SeededSelector::new(2024);
        let first: Vec<String> = (0..20).map(|_| a.select(&catalog)).collect();
        let second: Vec<String> = (0..20).map(|_| b.select(&catalog)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_frequency_is_uniform() {
        let catalog = StyleCatalog::default();
        let selector = SeededSelector::new(42);
        let draws = 110_000;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..draws {
            *counts.entry(selector.select(&catalog)).or_default() += 1;
        }

        assert_eq!(counts.len(), catalog.styles.len(), "every style must be drawn");
        let expected = draws as f64 / catalog.styles.len() as f64;
        for (style, count) in counts {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(
                deviation < 0.05,
                "style {style:?} drawn {count} times, expected ~{expected}"
            );
        }
    }
}
