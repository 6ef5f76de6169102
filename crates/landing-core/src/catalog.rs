//! Catalog data as the landing page consumes it.
//!
//! Variants and images are supplied once per page load and treated as
//! read-only by the rest of the crate.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

impl SelectedOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductImage {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl ProductImage {
    /// Alt text, treating an empty string the same as a missing one.
    pub fn alt(&self) -> Option<&str> {
        self.alt_text.as_deref().filter(|alt| !alt.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    pub id: String,
    pub available_for_sale: bool,
    pub price: Money,
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<ProductImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub variants: Vec<Variant>,
    pub images: Vec<ProductImage>,
}

impl Product {
    /// Dataset rendered when the storefront is unreachable or returns nothing:
    /// a single purchasable default variant and no images.
    pub fn fallback() -> Self {
        Self {
            id: "gid://shopify/Product/mock".to_string(),
            title: "Laredo Bomber".to_string(),
            handle: "laredo".to_string(),
            variants: vec![Variant {
                id: "gid://shopify/ProductVariant/mock1".to_string(),
                available_for_sale: true,
                price: Money {
                    amount: "185000".to_string(),
                    currency_code: "COP".to_string(),
                },
                selected_options: vec![
                    SelectedOption::new("Color", "Verde Oliva"),
                    SelectedOption::new("Talla", "M"),
                ],
                image: None,
            }],
            images: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.id == "gid://shopify/Product/mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_one_variant_and_no_images() {
        let product = Product::fallback();
        assert!(product.is_fallback());
        assert_eq!(product.variants.len(), 1);
        assert!(product.images.is_empty());
        assert!(product.variants[0].available_for_sale);
    }

    #[test]
    fn empty_alt_text_counts_as_missing() {
        let mut image = ProductImage {
            id: "img".to_string(),
            url: "https://cdn.example/img.jpg".to_string(),
            alt_text: Some(String::new()),
            width: None,
            height: None,
        };
        assert_eq!(image.alt(), None);
        image.alt_text = Some("Negro frente".to_string());
        assert_eq!(image.alt(), Some("Negro frente"));
    }
}
