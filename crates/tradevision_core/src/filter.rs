//! crates/tradevision_core/src/filter.rs
//!
//! Client-side filtering of the technique catalog. The visible set is a pure
//! function of the fetched collection and the active criteria, so it can be
//! recomputed whenever either one changes.

use crate::domain::{Difficulty, TradingTechnique};

/// Label used by filter controls for "no restriction".
pub const ALL: &str = "ALL";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechniqueFilter {
    /// `None` shows every category.
    pub category: Option<String>,
    /// `None` shows every difficulty.
    pub difficulty: Option<Difficulty>,
    pub keyword: String,
}

impl TechniqueFilter {
    /// Maps a control value to a category criterion; `"ALL"` clears it.
    pub fn category_from_label(label: &str) -> Option<String> {
        if label.eq_ignore_ascii_case(ALL) || label.trim().is_empty() {
            None
        } else {
            Some(label.to_string())
        }
    }

    pub fn matches(&self, technique: &TradingTechnique) -> bool {
        if let Some(category) = &self.category {
            if &technique.category != category {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if technique.difficulty != difficulty {
                return false;
            }
        }
        if !self.keyword.trim().is_empty() {
            let query = self.keyword.to_lowercase();
            return technique.title.to_lowercase().contains(&query)
                || technique.description.to_lowercase().contains(&query);
        }
        true
    }

    /// The subset of `techniques` matching every criterion, in source order.
    pub fn apply(&self, techniques: &[TradingTechnique]) -> Vec<TradingTechnique> {
        techniques
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect()
    }
}
