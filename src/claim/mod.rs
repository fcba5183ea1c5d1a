//! The claim engine: grouping, totals, layout and document composition.
//!
//! Records flow through this module in one direction:
//! [`group_assignments`] partitions them per person, [`build_claim_document`]
//! caps the rows and computes the total, [`layout_claim`] positions the text
//! on the form, [`render_claim_pdf`] draws it over the template, and
//! [`compose_claims`] runs all of that for every person and writes the files.

mod amount;
mod compositor;
mod document;
mod grouping;
mod layout;
mod render;

pub use amount::{ClaimAmount, calculate_claim_amount, format_amount};
pub use compositor::{ClaimOutcome, CompositionReport, compose_claims, resolve_output_directory};
pub use document::{FILE_NAME_DATE_FORMAT, build_claim_document, claim_file_name};
pub use grouping::{GroupingResult, SkippedRecord, group_assignments};
pub use layout::{MM_PER_POINT, PageLayout, TextPlacement, TextRole, layout_claim};
pub use render::{TemplateImage, render_claim_pdf};
