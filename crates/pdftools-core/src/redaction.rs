//! Redaction rules and their conversion into PDF user space
//!
//! Rules arrive from the browser as fractions of the rendered page, measured
//! from the top-left corner. PDF pages measure from the bottom-left in
//! points, so every rule is converted against the target page's size before
//! a cover rectangle is drawn.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized rectangular region on a 1-indexed page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RedactionRule {
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RedactionRule {
    /// Build a rule, returning `None` unless every field is finite and in range
    pub fn new(page: u32, x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        let rule = Self {
            page,
            x,
            y,
            width,
            height,
        };
        rule.is_valid().then_some(rule)
    }

    pub fn is_valid(&self) -> bool {
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        let extent = |v: f64| v.is_finite() && v > 0.0 && v <= 1.0;

        self.page >= 1 && unit(self.x) && unit(self.y) && extent(self.width) && extent(self.height)
    }

    /// Validate one element of the serialized rule list
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |name: &str| obj.get(name).and_then(Value::as_f64);

        let page = field("page")?;
        if !page.is_finite() || page.fract() != 0.0 || page < 1.0 || page > u32::MAX as f64 {
            return None;
        }

        Self::new(
            page as u32,
            field("x")?,
            field("y")?,
            field("width")?,
            field("height")?,
        )
    }
}

/// Parse the serialized rule list, silently dropping anything invalid.
///
/// A payload that is not a JSON array yields no rules at all.
pub fn parse_rules(json: &str) -> Vec<RedactionRule> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(json) else {
        return Vec::new();
    };

    items.iter().filter_map(RedactionRule::from_value).collect()
}

/// A rule resolved against a concrete page, in points with a bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CoverRect {
    pub fn from_rule(rule: &RedactionRule, page_width: f64, page_height: f64) -> Self {
        let x = rule.x * page_width;
        let width = (page_width - x).min(rule.width * page_width);
        let height = page_height.min(rule.height * page_height);
        let y = (page_height - rule.y * page_height - height).max(0.0);

        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Size actually painted; a sliver at the page edge still covers one point
    pub fn drawn_size(&self) -> (f64, f64) {
        (self.width.max(1.0), self.height.max(1.0))
    }

    /// Content stream operators filling this rectangle in opaque black
    pub fn to_operators(&self, origin_x: f64, origin_y: f64) -> String {
        let (w, h) = self.drawn_size();
        format!(
            "q 0 0 0 rg {:.4} {:.4} {:.4} {:.4} re f Q\n",
            origin_x + self.x,
            origin_y + self.y,
            w,
            h
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimension() -> impl Strategy<Value = f64> {
        1.0f64..5000.0
    }

    fn unit() -> impl Strategy<Value = f64> {
        0.0f64..=1.0
    }

    fn extent() -> impl Strategy<Value = f64> {
        0.0001f64..=1.0
    }

    proptest! {
        /// Property: the converted rectangle never leaves the page
        #[test]
        fn cover_rect_stays_on_page(
            w in dimension(),
            h in dimension(),
            x in unit(),
            y in unit(),
            rw in extent(),
            rh in extent(),
        ) {
            let rule = RedactionRule::new(1, x, y, rw, rh).unwrap();
            let rect = CoverRect::from_rule(&rule, w, h);

            let tolerance = 1e-6;
            prop_assert!(rect.x >= 0.0);
            prop_assert!(rect.x + rect.width <= w + tolerance);
            prop_assert!(rect.y >= 0.0);
            prop_assert!(rect.height <= h + tolerance);
            prop_assert!(rect.width >= -tolerance);
        }

        /// Property: any rule built from in-range fields validates
        #[test]
        fn in_range_rules_validate(
            page in 1u32..10_000,
            x in unit(),
            y in unit(),
            rw in extent(),
            rh in extent(),
        ) {
            prop_assert!(RedactionRule::new(page, x, y, rw, rh).is_some());
        }

        /// Property: serialized valid rules survive parsing unchanged
        #[test]
        fn serialized_rules_parse_back(
            page in 1u32..500,
            x in unit(),
            y in unit(),
            rw in extent(),
            rh in extent(),
        ) {
            let rule = RedactionRule::new(page, x, y, rw, rh).unwrap();
            let json = serde_json::to_string(&vec![rule]).unwrap();
            prop_assert_eq!(parse_rules(&json), vec![rule]);
        }
    }
}
