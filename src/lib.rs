//! On-call claim generator.
//!
//! This crate turns the rendered entries of an on-call schedule into one
//! claim form per person: entries are grouped by assignee, each group is
//! laid out onto a scanned form as a PDF, and the files can be uploaded to
//! an object store.

#![warn(missing_docs)]

pub mod api;
pub mod claim;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod schedule;
pub mod template;
pub mod time_expr;
pub mod upload;
