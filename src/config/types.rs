//! Configuration types for claim generation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML claim configuration file. Every field has
//! a default matching the standard support on-call claim form, so a partial
//! file only needs to name what it overrides.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat amount claimable per on-call period.
pub const DEFAULT_RATE: Decimal = Decimal::from_parts(45500, 0, 0, false, 2);

/// Currency prefix printed before every amount.
pub const DEFAULT_CURRENCY: &str = "RM";

/// Label printed on every period row.
pub const DEFAULT_LABEL: &str = "Support On-Call Claim";

/// Number of period rows the claim form has room for.
pub const DEFAULT_MAX_ROWS: usize = 10;

/// Which periods count toward a claim's grand total.
///
/// The claim form has room for a bounded number of rows. Historically the
/// total only counted the rows that were printed, so a claimant with more
/// periods than rows is paid for the printed rows only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalBasis {
    /// Count only the rendered rows (capped at `max_rows`).
    #[default]
    RenderedRows,
    /// Count every period, rendered or not.
    AllPeriods,
}

/// A position on the page in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Distance from the left edge.
    pub x: f32,
    /// Distance from the top edge.
    pub y: f32,
}

impl Anchor {
    /// Creates an anchor.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Page geometry and the fixed anchors of the claim form template.
///
/// All lengths are millimetres; `font_size` is in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Page width (A4 portrait).
    pub page_width: f32,
    /// Page height (A4 portrait).
    pub page_height: f32,
    /// Rendered width of the template background.
    pub background_width: f32,
    /// Font size for every text element.
    pub font_size: f32,
    /// Where the assignee's name goes.
    pub name_anchor: Anchor,
    /// Where the claim date goes.
    pub date_anchor: Anchor,
    /// Top of the first period row.
    pub rows_top: f32,
    /// Row pitch as a multiple of the line height.
    pub row_spacing: f32,
    /// Left edge of the date range column.
    pub date_column: f32,
    /// Left edge of the label column.
    pub label_column: f32,
    /// Left edge of the amount column.
    pub amount_column: f32,
    /// Where the grand total goes.
    pub total_anchor: Anchor,
    /// Padding between an anchor or column edge and the start of its text.
    pub text_inset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            background_width: 210.0,
            font_size: 10.0,
            name_anchor: Anchor::new(57.0, 56.0),
            date_anchor: Anchor::new(57.0, 63.0),
            rows_top: 96.0,
            row_spacing: 2.1,
            date_column: 28.0,
            label_column: 75.0,
            amount_column: 160.0,
            total_anchor: Anchor::new(160.0, 166.0),
            text_inset: 1.0,
        }
    }
}

/// Everything the document compositor needs besides the data itself.
///
/// # Example
///
/// ```
/// use oncall_claim::config::{ClaimConfig, TotalBasis};
/// use rust_decimal::Decimal;
///
/// let config = ClaimConfig::default();
/// assert_eq!(config.rate, Decimal::new(45500, 2));
/// assert_eq!(config.max_rows, 10);
/// assert_eq!(config.total_basis, TotalBasis::RenderedRows);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Flat amount per period.
    pub rate: Decimal,
    /// Currency prefix for amounts.
    pub currency: String,
    /// Row label.
    pub label: String,
    /// Maximum number of period rows per document.
    pub max_rows: usize,
    /// Which periods the total is computed from.
    pub total_basis: TotalBasis,
    /// Page layout.
    pub layout: LayoutConfig,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            currency: DEFAULT_CURRENCY.to_string(),
            label: DEFAULT_LABEL.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            total_basis: TotalBasis::default(),
            layout: LayoutConfig::default(),
        }
    }
}
