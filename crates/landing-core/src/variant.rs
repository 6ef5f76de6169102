//! Maps the shopper's selection onto exactly one purchasable variant.

use crate::catalog::Variant;
use crate::config::LandingConfig;
use crate::text_utils::option_key;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use ts_rs::TS;

/// Option categories the page lets the shopper choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OptionCategory {
    Color,
    Size,
}

/// The shopper's current choice, one value per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Selection {
    pub color: String,
    pub size: String,
}

impl Selection {
    pub fn new(color: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            size: size.into(),
        }
    }

    /// First configured color and the configured default size.
    pub fn initial(config: &LandingConfig) -> Self {
        Self {
            color: config.colors.first().cloned().unwrap_or_default(),
            size: config.default_size.clone(),
        }
    }

    pub fn value(&self, category: OptionCategory) -> &str {
        match category {
            OptionCategory::Color => &self.color,
            OptionCategory::Size => &self.size,
        }
    }

    fn entries(&self) -> [(OptionCategory, &str); 2] {
        [
            (OptionCategory::Color, self.color.as_str()),
            (OptionCategory::Size, self.size.as_str()),
        ]
    }
}

/// Option names accepted for each category. Catalogs are not consistent
/// about naming (`Color` vs `Colour`, `Size` vs `Talla`), so every accepted
/// name is checked on every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSynonyms {
    color: Vec<String>,
    size: Vec<String>,
}

impl Default for OptionSynonyms {
    fn default() -> Self {
        Self::new(["color", "colour"], ["size", "talla"])
    }
}

impl OptionSynonyms {
    pub fn new<C, S>(color: C, size: S) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            color: color.into_iter().map(|n| option_key(n.as_ref())).collect(),
            size: size.into_iter().map(|n| option_key(n.as_ref())).collect(),
        }
    }

    pub fn from_config(config: &LandingConfig) -> Self {
        Self::new(&config.color_option_names, &config.size_option_names)
    }

    pub fn names(&self, category: OptionCategory) -> &[String] {
        match category {
            OptionCategory::Color => &self.color,
            OptionCategory::Size => &self.size,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VariantResolver {
    synonyms: OptionSynonyms,
}

impl VariantResolver {
    pub fn new(synonyms: OptionSynonyms) -> Self {
        Self { synonyms }
    }

    /// First variant in list order matching the selection, else the first
    /// variant. `None` only when there are no variants at all.
    pub fn resolve<'a>(&self, variants: &'a [Variant], selection: &Selection) -> Option<&'a Variant> {
        if let Some(found) = variants.iter().find(|v| self.matches(v, selection)) {
            return Some(found);
        }
        let fallback = variants.first();
        if let Some(variant) = fallback {
            debug!(
                color = %selection.color,
                size = %selection.size,
                fallback = %variant.id,
                "No variant matches selection; using first variant"
            );
        }
        fallback
    }

    pub fn matches(&self, variant: &Variant, selection: &Selection) -> bool {
        // Later duplicates of an option name overwrite earlier ones.
        let options: HashMap<String, String> = variant
            .selected_options
            .iter()
            .map(|opt| (option_key(&opt.name), option_key(&opt.value)))
            .collect();

        selection.entries().iter().all(|(category, wanted)| {
            let wanted = option_key(wanted);
            self.synonyms
                .names(*category)
                .iter()
                .any(|name| options.get(name).is_some_and(|value| *value == wanted))
        })
    }
}
