//! Size recommendation from the fit calculator form.
//!
//! Height is collected by the form but the buckets only look at weight. That
//! is how the page has always behaved and it is kept as-is.

use crate::text_utils::parse_leading_int;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SizeCategory {
    S,
    M,
    L,
    XL,
}

impl SizeCategory {
    pub fn label(self) -> &'static str {
        match self {
            SizeCategory::S => "S",
            SizeCategory::M => "M",
            SizeCategory::L => "L",
            SizeCategory::XL => "XL",
        }
    }

    pub fn for_weight_kg(weight: i64) -> Self {
        match weight {
            i64::MIN..=64 => SizeCategory::S,
            65..=77 => SizeCategory::M,
            78..=87 => SizeCategory::L,
            _ => SizeCategory::XL,
        }
    }
}

impl std::fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// `None` when either field is empty or the weight has no leading digits.
pub fn recommend_size(height: Option<&str>, weight: Option<&str>) -> Option<SizeCategory> {
    let _height = height.filter(|h| !h.is_empty())?;
    let weight = weight.filter(|w| !w.is_empty())?;
    parse_leading_int(weight).map(SizeCategory::for_weight_kg)
}

/// Raw form state for the size calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SizeForm {
    pub height: String,
    pub weight: String,
    pub recommended: Option<SizeCategory>,
}

impl SizeForm {
    pub fn calculate(&mut self) -> Option<SizeCategory> {
        self.recommended = recommend_size(Some(&self.height), Some(&self.weight));
        self.recommended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_buckets() {
        assert_eq!(recommend_size(Some("170"), Some("70")), Some(SizeCategory::M));
        assert_eq!(recommend_size(Some("170"), Some("60")), Some(SizeCategory::S));
        assert_eq!(recommend_size(Some("170"), Some("90")), Some(SizeCategory::XL));
        assert_eq!(recommend_size(Some("170"), Some("80")), Some(SizeCategory::L));
    }

    #[test]
    fn bucket_edges_are_inclusive() {
        assert_eq!(SizeCategory::for_weight_kg(64), SizeCategory::S);
        assert_eq!(SizeCategory::for_weight_kg(65), SizeCategory::M);
        assert_eq!(SizeCategory::for_weight_kg(77), SizeCategory::M);
        assert_eq!(SizeCategory::for_weight_kg(78), SizeCategory::L);
        assert_eq!(SizeCategory::for_weight_kg(87), SizeCategory::L);
        assert_eq!(SizeCategory::for_weight_kg(88), SizeCategory::XL);
        assert_eq!(SizeCategory::for_weight_kg(-3), SizeCategory::S);
    }

    #[test]
    fn missing_or_invalid_input_yields_nothing() {
        assert_eq!(recommend_size(Some("170"), Some("")), None);
        assert_eq!(recommend_size(Some("170"), None), None);
        assert_eq!(recommend_size(Some(""), Some("70")), None);
        assert_eq!(recommend_size(None, Some("70")), None);
        assert_eq!(recommend_size(Some("170"), Some("abc")), None);
    }

    #[test]
    fn height_does_not_affect_outcome() {
        for height in ["150", "170", "200", "tall"] {
            assert_eq!(
                recommend_size(Some(height), Some("82")),
                Some(SizeCategory::L),
                "height {height} should be ignored"
            );
        }
    }

    #[test]
    fn weight_with_units_reads_leading_digits() {
        assert_eq!(recommend_size(Some("170"), Some("70kg")), Some(SizeCategory::M));
        assert_eq!(recommend_size(Some("170"), Some("87.9")), Some(SizeCategory::L));
    }

    #[test]
    fn form_stores_last_recommendation() {
        let mut form = SizeForm {
            height: "175".to_string(),
            weight: "91".to_string(),
            recommended: None,
        };
        assert_eq!(form.calculate(), Some(SizeCategory::XL));
        assert_eq!(form.recommended, Some(SizeCategory::XL));

        form.weight = "abc".to_string();
        assert_eq!(form.calculate(), None);
        assert_eq!(form.recommended, None);
    }
}
