//! Core data models for the claim generator.
//!
//! This module contains the domain models shared by grouping, composition
//! and the collaborators that feed them.

mod assignment;
mod claim_document;
mod period;

pub use assignment::AssignmentRecord;
pub use claim_document::{CLAIM_DATE_FORMAT, ClaimDocument};
pub use period::{Period, PersonPeriods, ROW_DATE_FORMAT};
