//! Orders and filters product images by relevance to the selected color.
//!
//! An image is relevant when its lowercased alt text contains the lowercased
//! color. The session applies one mode consistently; [`GalleryMode::Filter`]
//! is the default and the page's documented policy.

use crate::catalog::ProductImage;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum GalleryMode {
    /// Keep relevant and alt-less images; show everything when nothing is
    /// relevant.
    #[default]
    Filter,
    /// Keep every image, relevant ones first. Alt-less images sort with the
    /// non-relevant group.
    Rank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryRanker {
    mode: GalleryMode,
    limit: Option<usize>,
}

impl GalleryRanker {
    pub fn new(mode: GalleryMode, limit: Option<usize>) -> Self {
        Self { mode, limit }
    }

    pub fn mode(&self) -> GalleryMode {
        self.mode
    }

    pub fn arrange<'a>(&self, images: &'a [ProductImage], color: &str) -> Vec<&'a ProductImage> {
        let mut arranged = match self.mode {
            GalleryMode::Filter => filter_by_color(images, color),
            GalleryMode::Rank => rank_by_color(images, color),
        };
        if let Some(limit) = self.limit {
            arranged.truncate(limit);
        }
        arranged
    }
}

/// `None` for images without alt text; callers decide how those count.
pub fn relevance(image: &ProductImage, color: &str) -> Option<bool> {
    image
        .alt()
        .map(|alt| alt.to_lowercase().contains(&color.to_lowercase()))
}

/// Alt-less images ride along with the matches but never count as a match
/// themselves: with no alt text matching, the full list is returned.
pub fn filter_by_color<'a>(images: &'a [ProductImage], color: &str) -> Vec<&'a ProductImage> {
    let any_match = images
        .iter()
        .any(|image| relevance(image, color) == Some(true));
    if !any_match {
        return images.iter().collect();
    }
    images
        .iter()
        .filter(|image| relevance(image, color).unwrap_or(true))
        .collect()
}

pub fn rank_by_color<'a>(images: &'a [ProductImage], color: &str) -> Vec<&'a ProductImage> {
    let (mut relevant, rest): (Vec<&ProductImage>, Vec<&ProductImage>) = images
        .iter()
        .partition(|image| relevance(image, color).unwrap_or(false));
    relevant.extend(rest);
    relevant
}
