//! Dashboard content: a grid of question and text tiles
//!
//! A dashboard stores its assets and an optional explicit layout. When no
//! layout has been saved, [`generate_default_layout`] derives one: a
//! 12-column grid with 6x6 tiles, two per row, filled left to right.

use crate::error::DocumentError;
use crate::id::FileId;
use serde::{Deserialize, Serialize};

/// Grid width in columns
pub const GRID_COLUMNS: u32 = 12;

/// Default tile span (width and height) in grid units
pub const DEFAULT_TILE_SPAN: u32 = 6;

/// A tile placed on a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardAsset {
    /// An embedded question, referenced by file id
    Question {
        /// Referenced question file
        id: FileId,
    },
    /// A free-standing text block
    Text {
        /// Markdown body
        body: String,
    },
}

impl DashboardAsset {
    /// File referenced by the asset, if any
    #[inline]
    #[must_use]
    pub fn file_id(&self) -> Option<FileId> {
        match self {
            Self::Question { id } => Some(*id),
            Self::Text { .. } => None,
        }
    }
}

/// Position of one asset on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Index into the dashboard's asset list
    pub asset_index: usize,
    /// Column offset
    pub x: u32,
    /// Row offset
    pub y: u32,
    /// Width in columns
    pub w: u32,
    /// Height in rows
    pub h: u32,
}

impl LayoutItem {
    /// Check the item fits the grid
    ///
    /// # Errors
    /// Returns a validation error for zero-sized or out-of-bounds tiles
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.w == 0 || self.h == 0 {
            return Err(DocumentError::validation("layout tile must be non-empty"));
        }
        if self.x + self.w > GRID_COLUMNS {
            return Err(DocumentError::validation(format!(
                "layout tile exceeds {GRID_COLUMNS}-column grid"
            )));
        }
        Ok(())
    }
}

/// An explicit dashboard layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GridLayout {
    /// Tile placements, one per laid-out asset
    pub items: Vec<LayoutItem>,
}

impl GridLayout {
    /// Validate every tile against the grid
    ///
    /// # Errors
    /// Returns the first tile validation failure
    pub fn validate(&self) -> Result<(), DocumentError> {
        self.items.iter().try_for_each(LayoutItem::validate)
    }
}

/// Content payload of a dashboard document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardContent {
    /// Tiles on the dashboard
    #[serde(default)]
    pub assets: Vec<DashboardAsset>,
    /// Saved layout; `None` or empty means "use the generated default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<GridLayout>,
}

impl DashboardContent {
    /// The layout a view should render: the saved one if present and
    /// non-empty, otherwise the generated default
    #[must_use]
    pub fn effective_layout(&self) -> GridLayout {
        match &self.layout {
            Some(layout) if !layout.items.is_empty() => layout.clone(),
            _ => generate_default_layout(&self.assets),
        }
    }
}

/// Derive the default layout for a list of assets
///
/// Tiles are [`DEFAULT_TILE_SPAN`]-square and flow two per row: asset `i`
/// lands at `(x = (i % 2) * 6, y = (i / 2) * 6)`.
#[must_use]
pub fn generate_default_layout(assets: &[DashboardAsset]) -> GridLayout {
    let items = (0..assets.len())
        .map(|i| {
            let index = u32::try_from(i).unwrap_or(u32::MAX);
            LayoutItem {
                asset_index: i,
                x: (index % 2) * DEFAULT_TILE_SPAN,
                y: (index / 2) * DEFAULT_TILE_SPAN,
                w: DEFAULT_TILE_SPAN,
                h: DEFAULT_TILE_SPAN,
            }
        })
        .collect();
    GridLayout { items }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_asset(raw_id: i64) -> DashboardAsset {
        DashboardAsset::Question {
            id: FileId::new(raw_id).unwrap(),
        }
    }

    #[test]
    fn default_layout_places_first_asset_at_origin() {
        let layout = generate_default_layout(&[question_asset(7)]);
        assert_eq!(layout.items.len(), 1);
        let item = layout.items[0];
        assert_eq!((item.x, item.y, item.w, item.h), (0, 0, 6, 6));
        assert_eq!(item.asset_index, 0);
    }

    #[test]
    fn default_layout_flows_two_per_row() {
        let assets = vec![
            question_asset(1),
            question_asset(2),
            DashboardAsset::Text {
                body: "notes".to_string(),
            },
        ];
        let layout = generate_default_layout(&assets);
        assert_eq!(
            layout
                .items
                .iter()
                .map(|i| (i.x, i.y))
                .collect::<Vec<_>>(),
            vec![(0, 0), (6, 0), (0, 6)]
        );
    }

    #[test]
    fn effective_layout_prefers_saved_layout() {
        let saved = GridLayout {
            items: vec![LayoutItem {
                asset_index: 0,
                x: 3,
                y: 0,
                w: 9,
                h: 4,
            }],
        };
        let content = DashboardContent {
            assets: vec![question_asset(7)],
            layout: Some(saved.clone()),
        };
        assert_eq!(content.effective_layout(), saved);
    }

    #[test]
    fn effective_layout_ignores_empty_saved_layout() {
        let content = DashboardContent {
            assets: vec![question_asset(7)],
            layout: Some(GridLayout::default()),
        };
        assert_eq!(content.effective_layout().items.len(), 1);
    }

    #[test]
    fn layout_item_validation() {
        let off_grid = LayoutItem {
            asset_index: 0,
            x: 8,
            y: 0,
            w: 6,
            h: 6,
        };
        assert!(off_grid.validate().is_err());

        let empty = LayoutItem {
            asset_index: 0,
            x: 0,
            y: 0,
            w: 0,
            h: 6,
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn asset_serde_tagging() {
        let json = serde_json::to_string(&question_asset(7)).unwrap();
        assert_eq!(json, r#"{"type":"question","id":7}"#);
    }
}
