//! Page layout of a claim form.
//!
//! The layout step turns a [`ClaimDocument`] into positioned text, without
//! touching any PDF machinery. Coordinates are millimetres measured from the
//! top-left corner of the page, like the claim form template they are
//! matched against.

use crate::config::ClaimConfig;
use crate::models::ClaimDocument;

use super::amount::format_amount;

/// Millimetres per typographic point.
pub const MM_PER_POINT: f32 = 25.4 / 72.0;

/// Fraction of the line height between the top of a line and its baseline.
const BASELINE_RATIO: f32 = 0.8;

/// What a text element on the page represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    /// The claimant's name.
    Assignee,
    /// The claim reference date.
    ClaimDate,
    /// Date range of period row `n`.
    RowDates(usize),
    /// Label of period row `n`.
    RowLabel(usize),
    /// Amount of period row `n`.
    RowAmount(usize),
    /// The grand total.
    Total,
}

/// One piece of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    /// What the text is.
    pub role: TextRole,
    /// Distance from the left edge.
    pub x: f32,
    /// Distance from the top edge to the top of the line.
    pub y: f32,
    /// The text itself.
    pub text: String,
}

/// A fully positioned single-page claim form.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Page width.
    pub width: f32,
    /// Page height.
    pub height: f32,
    /// Width the background template is scaled to.
    pub background_width: f32,
    /// Font size in points.
    pub font_size: f32,
    /// Line height in millimetres.
    pub line_height: f32,
    /// Text in drawing order.
    pub texts: Vec<TextPlacement>,
}

impl PageLayout {
    /// Returns the baseline of a placement measured from the bottom edge,
    /// which is how PDF positions text.
    pub fn baseline_from_bottom(&self, placement: &TextPlacement) -> f32 {
        self.height - (placement.y + self.line_height * BASELINE_RATIO)
    }

    /// Returns the text playing the given role, if any.
    pub fn text(&self, role: TextRole) -> Option<&TextPlacement> {
        self.texts.iter().find(|t| t.role == role)
    }

    /// Returns the number of period rows on the page.
    pub fn row_count(&self) -> usize {
        self.texts
            .iter()
            .filter(|t| matches!(t.role, TextRole::RowDates(_)))
            .count()
    }
}

/// Lays out a claim document on the claim form.
///
/// Name and claim date go to their anchors, each row `i` sits at
/// `rows_top + i * line_height * row_spacing`, and the total goes to its
/// anchor regardless of how many rows there are. Every text starts
/// `text_inset` to the right of its anchor or column.
///
/// # Examples
///
/// ```
/// use oncall_claim::claim::{layout_claim, TextRole};
/// use oncall_claim::config::ClaimConfig;
/// use oncall_claim::models::ClaimDocument;
/// use chrono::DateTime;
/// use rust_decimal::Decimal;
///
/// let document = ClaimDocument {
///     assignee: "Bob".to_string(),
///     claim_date: DateTime::parse_from_rfc3339("2024-01-15T00:00:00Z").unwrap(),
///     rows: vec![],
///     period_count: 0,
///     rate: Decimal::new(45500, 2),
///     total: Decimal::ZERO,
///     file_name: String::new(),
/// };
///
/// let layout = layout_claim(&document, &ClaimConfig::default());
/// assert_eq!(layout.text(TextRole::Assignee).unwrap().text, "Bob");
/// assert_eq!(layout.text(TextRole::ClaimDate).unwrap().text, "Monday, 15 Jan 2024");
/// ```
pub fn layout_claim(document: &ClaimDocument, config: &ClaimConfig) -> PageLayout {
    let layout = &config.layout;
    let line_height = layout.font_size * MM_PER_POINT;
    let row_amount = format_amount(&config.currency, document.rate);
    let inset = layout.text_inset;

    let mut texts = vec![
        TextPlacement {
            role: TextRole::Assignee,
            x: layout.name_anchor.x + inset,
            y: layout.name_anchor.y,
            text: document.assignee.clone(),
        },
        TextPlacement {
            role: TextRole::ClaimDate,
            x: layout.date_anchor.x + inset,
            y: layout.date_anchor.y,
            text: document.claim_date_label(),
        },
    ];

    for (index, period) in document.rows.iter().enumerate() {
        let y = layout.rows_top + index as f32 * line_height * layout.row_spacing;

        texts.push(TextPlacement {
            role: TextRole::RowDates(index),
            x: layout.date_column + inset,
            y,
            text: period.date_range_label(),
        });
        texts.push(TextPlacement {
            role: TextRole::RowLabel(index),
            x: layout.label_column + inset,
            y,
            text: config.label.clone(),
        });
        texts.push(TextPlacement {
            role: TextRole::RowAmount(index),
            x: layout.amount_column + inset,
            y,
            text: row_amount.clone(),
        });
    }

    texts.push(TextPlacement {
        role: TextRole::Total,
        x: layout.total_anchor.x + inset,
        y: layout.total_anchor.y,
        text: format_amount(&config.currency, document.total),
    });

    PageLayout {
        width: layout.page_width,
        height: layout.page_height,
        background_width: layout.background_width,
        font_size: layout.font_size,
        line_height,
        texts,
    }
}
