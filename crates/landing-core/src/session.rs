use crate::catalog::{Money, Product, ProductImage, Variant};
use crate::config::LandingConfig;
use crate::gallery::{GalleryMode, GalleryRanker};
use crate::sizing::{SizeCategory, SizeForm};
use crate::variant::{OptionSynonyms, Selection, VariantResolver};
use crate::visibility::RootMargin;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SelectedVariantView {
    pub id: String,
    pub price: Money,
    pub available_for_sale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct StickyBarView {
    pub root_margin: RootMargin,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ScrubView {
    pub track_role: String,
    pub video_path: String,
    pub poster_path: String,
}

/// Everything the client needs to hydrate the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct LandingView {
    pub product_id: String,
    pub product_title: String,
    pub using_fallback: bool,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub selection: Selection,
    pub selected_variant: Option<SelectedVariantView>,
    pub purchasable: bool,
    pub gallery_mode: GalleryMode,
    pub gallery: Vec<ProductImage>,
    pub size_form: SizeForm,
    pub sticky_bar: StickyBarView,
    pub scrub: ScrubView,
}

/// Shopper input applied on top of the initial selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, TS)]
#[ts(export)]
pub struct SelectionPatch {
    #[ts(optional)]
    pub color: Option<String>,
    #[ts(optional)]
    pub size: Option<String>,
    #[ts(optional)]
    pub height: Option<String>,
    #[ts(optional)]
    pub weight: Option<String>,
}

/// Per-page-load state: the product, what the shopper picked, and the
/// policies that turn those into a variant and a gallery.
#[derive(Debug, Clone)]
pub struct LandingSession {
    product: Product,
    config: LandingConfig,
    selection: Selection,
    resolver: VariantResolver,
    ranker: GalleryRanker,
    size_form: SizeForm,
}

impl LandingSession {
    pub fn new(product: Product, config: LandingConfig) -> Self {
        let selection = Selection::initial(&config);
        let resolver = VariantResolver::new(OptionSynonyms::from_config(&config));
        let ranker = GalleryRanker::new(config.gallery_mode, config.gallery_limit);
        debug!(
            product = %product.id,
            color = %selection.color,
            size = %selection.size,
            "Created landing session"
        );
        Self {
            product,
            config,
            selection,
            resolver,
            ranker,
            size_form: SizeForm::default(),
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_color(&mut self, color: impl Into<String>) {
        self.selection.color = color.into();
        debug!(color = %self.selection.color, "Color selected");
    }

    pub fn select_size(&mut self, size: impl Into<String>) {
        self.selection.size = size.into();
        debug!(size = %self.selection.size, "Size selected");
    }

    pub fn set_size_inputs(&mut self, height: impl Into<String>, weight: impl Into<String>) {
        self.size_form.height = height.into();
        self.size_form.weight = weight.into();
    }

    /// Runs the size calculator. A recommendation also becomes the selected
    /// size; no recommendation leaves the selection alone.
    pub fn calculate_size(&mut self) -> Option<SizeCategory> {
        let recommended = self.size_form.calculate();
        match recommended {
            Some(size) => {
                info!(%size, "Applying recommended size");
                self.selection.size = size.label().to_string();
            }
            None => debug!("Size calculator inputs incomplete"),
        }
        recommended
    }

    pub fn apply(&mut self, patch: SelectionPatch) {
        if let Some(color) = patch.color {
            self.select_color(color);
        }
        if let Some(size) = patch.size {
            self.select_size(size);
        }
        if patch.height.is_some() || patch.weight.is_some() {
            self.set_size_inputs(
                patch.height.unwrap_or_default(),
                patch.weight.unwrap_or_default(),
            );
            self.calculate_size();
        }
    }

    pub fn selected_variant(&self) -> Option<&Variant> {
        self.resolver.resolve(&self.product.variants, &self.selection)
    }

    /// True when the resolved variant can be bought right now.
    pub fn purchasable(&self) -> bool {
        self.selected_variant()
            .is_some_and(|variant| variant.available_for_sale)
    }

    pub fn gallery(&self) -> Vec<&ProductImage> {
        self.ranker.arrange(&self.product.images, &self.selection.color)
    }

    pub fn sticky_bar(&self) -> StickyBarView {
        let root_margin = match self.config.sticky_root_margin.parse::<RootMargin>() {
            Ok(margin) => margin,
            Err(err) => {
                warn!(
                    margin = %self.config.sticky_root_margin,
                    "Invalid sticky bar root margin; using none: {err:#}"
                );
                RootMargin::default()
            }
        };
        StickyBarView {
            root_margin,
            threshold: self.config.sticky_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn view(&self) -> LandingView {
        let selected_variant = self.selected_variant().map(|variant| SelectedVariantView {
            id: variant.id.clone(),
            price: variant.price.clone(),
            available_for_sale: variant.available_for_sale,
        });
        LandingView {
            product_id: self.product.id.clone(),
            product_title: self.product.title.clone(),
            using_fallback: self.product.is_fallback(),
            colors: self.config.colors.clone(),
            sizes: self.config.sizes.clone(),
            selection: self.selection.clone(),
            purchasable: selected_variant
                .as_ref()
                .is_some_and(|variant| variant.available_for_sale),
            selected_variant,
            gallery_mode: self.ranker.mode(),
            gallery: self.gallery().into_iter().cloned().collect(),
            size_form: self.size_form.clone(),
            sticky_bar: self.sticky_bar(),
            scrub: ScrubView {
                track_role: self.config.track_role.clone(),
                video_path: self.config.video_path.clone(),
                poster_path: self.config.poster_path.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SelectedOption;

    fn variant(id: &str, color: &str, size: &str, available: bool) -> Variant {
        Variant {
            id: format!("gid://shopify/ProductVariant/{id}"),
            available_for_sale: available,
            price: Money {
                amount: "185000.0".to_string(),
                currency_code: "COP".to_string(),
            },
            selected_options: vec![
                SelectedOption::new("Color", color),
                SelectedOption::new("Talla", size),
            ],
            image: None,
        }
    }

    fn image(id: &str, alt: Option<&str>) -> ProductImage {
        ProductImage {
            id: id.to_string(),
            url: format!("https://cdn.example/{id}.jpg"),
            alt_text: alt.map(str::to_string),
            width: None,
            height: None,
        }
    }

    fn build_test_session() -> LandingSession {
        let product = Product {
            id: "gid://shopify/Product/8812".to_string(),
            title: "Laredo Bomber".to_string(),
            handle: "laredo".to_string(),
            variants: vec![
                variant("11", "Verde Oliva", "M", true),
                variant("12", "Verde Oliva", "L", false),
                variant("21", "Negro", "M", true),
                variant("22", "Negro", "XL", true),
            ],
            images: vec![
                image("olive-front", Some("Laredo Verde Oliva frente")),
                image("black-front", Some("Laredo Negro frente")),
                image("detail", None),
                image("black-back", Some("Laredo negro espalda")),
            ],
        };
        LandingSession::new(product, LandingConfig::default())
    }

    #[test]
    fn initial_selection_resolves_first_color_default_size() {
        let session = build_test_session();
        assert_eq!(session.selection(), &Selection::new("Verde Oliva", "M"));
        assert_eq!(
            session.selected_variant().map(|v| v.id.as_str()),
            Some("gid://shopify/ProductVariant/11")
        );
        assert!(session.purchasable());
    }

    #[test]
    fn sold_out_variant_is_not_purchasable() {
        let mut session = build_test_session();
        session.select_size("L");
        assert_eq!(
            session.selected_variant().map(|v| v.id.as_str()),
            Some("gid://shopify/ProductVariant/12")
        );
        assert!(!session.purchasable());
        assert!(!session.view().purchasable);
    }

    #[test]
    fn gallery_follows_selected_color() {
        let mut session = build_test_session();
        session.select_color("Negro");
        let ids: Vec<&str> = session.gallery().iter().map(|img| img.id.as_str()).collect();
        assert_eq!(ids, vec!["black-front", "detail", "black-back"]);
    }

    #[test]
    fn recommended_size_becomes_the_selection() {
        let mut session = build_test_session();
        session.select_color("Negro");
        session.set_size_inputs("182", "95");
        assert_eq!(session.calculate_size(), Some(SizeCategory::XL));
        assert_eq!(session.selection().size, "XL");
        assert_eq!(
            session.selected_variant().map(|v| v.id.as_str()),
            Some("gid://shopify/ProductVariant/22")
        );
    }

    #[test]
    fn incomplete_size_inputs_keep_selection() {
        let mut session = build_test_session();
        session.set_size_inputs("", "70");
        assert_eq!(session.calculate_size(), None);
        assert_eq!(session.selection().size, "M");
    }

    #[test]
    fn patch_applies_every_field() {
        let mut session = build_test_session();
        session.apply(SelectionPatch {
            color: Some("Negro".to_string()),
            size: Some("S".to_string()),
            height: Some("175".to_string()),
            weight: Some("70".to_string()),
        });
        assert_eq!(session.selection(), &Selection::new("Negro", "M"));
        assert_eq!(session.view().size_form.recommended, Some(SizeCategory::M));
    }

    #[test]
    fn view_carries_variant_and_page_settings() {
        let mut session = build_test_session();
        session.select_color("Negro");
        let view = session.view();

        let selected = view.selected_variant.expect("variant resolved");
        assert_eq!(selected.id, "gid://shopify/ProductVariant/21");
        assert_eq!(selected.price.amount, "185000.0");
        assert!(view.purchasable);
        assert_eq!(view.gallery_mode, GalleryMode::Filter);
        assert_eq!(view.sticky_bar.root_margin, RootMargin::new(-100.0, 0.0, 0.0, 0.0));
        assert_eq!(view.scrub.track_role, "hero-container");
        assert!(!view.using_fallback);

        let json = serde_json::to_value(session.view()).expect("view serializes");
        assert_eq!(json["selection"]["color"], "Negro");
        assert_eq!(json["selected_variant"]["available_for_sale"], true);
    }

    #[test]
    fn invalid_root_margin_degrades_to_zero() {
        let mut config = LandingConfig::default();
        config.sticky_root_margin = "10%".to_string();
        let session = LandingSession::new(Product::fallback(), config);
        assert_eq!(session.sticky_bar().root_margin, RootMargin::default());
    }

    #[test]
    fn fallback_product_is_still_purchasable() {
        let mut session = LandingSession::new(Product::fallback(), LandingConfig::default());
        session.select_color("Negro");
        session.select_size("XL");
        assert!(session.purchasable());
        let view = session.view();
        assert!(view.using_fallback);
        assert!(view.gallery.is_empty());
        assert_eq!(
            view.selected_variant.map(|v| v.id),
            Some("gid://shopify/ProductVariant/mock1".to_string())
        );
    }

    #[test]
    fn empty_catalog_has_no_variant() {
        let mut product = Product::fallback();
        product.variants.clear();
        let session = LandingSession::new(product, LandingConfig::default());
        assert!(session.selected_variant().is_none());
        assert!(!session.purchasable());
        assert!(session.view().selected_variant.is_none());
    }
}
