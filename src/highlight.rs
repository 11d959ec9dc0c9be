//! Bar colouring that marks the largest total(s) in a summary.

use serde::{Serialize, Serializer};

use crate::aggregate::SummaryTable;

pub const HIGHLIGHT_COLOR: &str = "#FF0000";
pub const DEFAULT_COLOR: &str = "#1f77b4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightTag {
    Highlight,
    Default,
}

impl HighlightTag {
    pub fn color(&self) -> &'static str {
        match self {
            HighlightTag::Highlight => HIGHLIGHT_COLOR,
            HighlightTag::Default => DEFAULT_COLOR,
        }
    }
}

impl Serialize for HighlightTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.color())
    }
}

/// Tags each row of `table`, in row order. Every row equal to the maximum
/// total is highlighted, so ties produce several highlighted rows.
pub fn assign_highlight<K>(table: &SummaryTable<K>) -> Vec<HighlightTag> {
    let Some(max) = table.max_total() else {
        return Vec::new();
    };

    table
        .totals()
        .map(|total| {
            if total == max {
                HighlightTag::Highlight
            } else {
                HighlightTag::Default
            }
        })
        .collect()
}
