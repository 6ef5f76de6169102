pub mod cache;
pub mod catalog;
pub mod config;
pub mod gallery;
pub mod host;
pub mod scrub;
pub mod session;
pub mod sizing;
pub mod storefront;
pub mod text_utils;
pub mod variant;
pub mod visibility;

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<()> {
    T::export_all_to(out_dir).map_err(|err| anyhow!("failed to export {}: {err}", T::name()))
}

/// Writes TypeScript declarations for the hydration payload into `out_dir`,
/// replacing any `.ts` files already there.
pub fn export_ts_bindings(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    for entry in
        fs::read_dir(out_dir).with_context(|| format!("failed to list {}", out_dir.display()))?
    {
        let path = entry.context("failed to read directory entry")?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
    }

    export_single_type::<catalog::Money>(out_dir)?;
    export_single_type::<catalog::SelectedOption>(out_dir)?;
    export_single_type::<catalog::ProductImage>(out_dir)?;
    export_single_type::<catalog::Variant>(out_dir)?;
    export_single_type::<catalog::Product>(out_dir)?;
    export_single_type::<variant::OptionCategory>(out_dir)?;
    export_single_type::<variant::Selection>(out_dir)?;
    export_single_type::<gallery::GalleryMode>(out_dir)?;
    export_single_type::<sizing::SizeCategory>(out_dir)?;
    export_single_type::<sizing::SizeForm>(out_dir)?;
    export_single_type::<visibility::RootMargin>(out_dir)?;
    export_single_type::<session::SelectedVariantView>(out_dir)?;
    export_single_type::<session::StickyBarView>(out_dir)?;
    export_single_type::<session::ScrubView>(out_dir)?;
    export_single_type::<session::SelectionPatch>(out_dir)?;
    export_single_type::<session::LandingView>(out_dir)?;

    let index_content = r#"export type { Money } from "./Money";
export type { SelectedOption } from "./SelectedOption";
export type { ProductImage } from "./ProductImage";
export type { Variant } from "./Variant";
export type { Product } from "./Product";
export type { OptionCategory } from "./OptionCategory";
export type { Selection } from "./Selection";
export type { GalleryMode } from "./GalleryMode";
export type { SizeCategory } from "./SizeCategory";
export type { SizeForm } from "./SizeForm";
export type { RootMargin } from "./RootMargin";
export type { SelectedVariantView } from "./SelectedVariantView";
export type { StickyBarView } from "./StickyBarView";
export type { ScrubView } from "./ScrubView";
export type { SelectionPatch } from "./SelectionPatch";
export type { LandingView } from "./LandingView";
"#;

    let index_path = out_dir.join("index.ts");
    fs::write(&index_path, index_content)
        .with_context(|| format!("failed to write {}", index_path.display()))?;

    Ok(())
}
