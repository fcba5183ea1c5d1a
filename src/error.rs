//! Error types for the on-call claim generator.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the grouping, composition and collaborator layers can
//! report.

use thiserror::Error;

/// The main error type for the claim generator.
///
/// Each variant carries enough context (paths, values, messages) to be
/// reported to a user or mapped to an HTTP response without further lookup.
///
/// # Example
///
/// ```
/// use oncall_claim::error::ClaimError;
///
/// let error = ClaimError::OutputDirectory {
///     path: "/tmp/claims.pdf".to_string(),
///     message: "not a directory".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Output directory '/tmp/claims.pdf' is unusable: not a directory"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// An assignment record carried a timestamp that is not valid RFC 3339.
    #[error("Invalid {field} timestamp '{value}': {message}")]
    TimestampParse {
        /// Which timestamp failed ("start" or "end").
        field: String,
        /// The raw value that failed to parse.
        value: String,
        /// A description of the parse error.
        message: String,
    },

    /// The destination directory is not a directory or cannot be created.
    #[error("Output directory '{path}' is unusable: {message}")]
    OutputDirectory {
        /// The directory path.
        path: String,
        /// A description of the problem.
        message: String,
    },

    /// A single claim document could not be rendered or written.
    #[error("Unable to generate '{path}': {message}")]
    DocumentWrite {
        /// The target file path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The template image could not be read or decoded.
    #[error("Template image '{path}' is unusable: {message}")]
    Template {
        /// The template path.
        path: String,
        /// A description of the problem.
        message: String,
    },

    /// The template image could not be downloaded.
    #[error("Failed to download template from '{url}': {message}")]
    TemplateDownload {
        /// The download URL.
        url: String,
        /// A description of the failure.
        message: String,
    },

    /// The schedule service rejected or failed a request.
    #[error("Schedule source error: {message}")]
    ScheduleSource {
        /// A description of the failure.
        message: String,
    },

    /// No schedule matched the requested name.
    #[error("No schedule found matching '{query}'")]
    ScheduleNotFound {
        /// The schedule name that was searched for.
        query: String,
    },

    /// A time range expression could not be resolved.
    #[error("Invalid time expression '{expression}': {message}")]
    InvalidTimeExpression {
        /// The expression as supplied.
        expression: String,
        /// A description of the problem.
        message: String,
    },

    /// An object could not be uploaded to the bulk store.
    #[error("Failed to upload '{key}': {message}")]
    Upload {
        /// The object key (or directory when walking failed).
        key: String,
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return ClaimError.
pub type ClaimResult<T> = Result<T, ClaimError>;
