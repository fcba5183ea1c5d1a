//! Composition of claim documents into files.
//!
//! [`compose_claims`] produces one PDF per assignee in a destination
//! directory. Problems with the directory or the template stop the whole run
//! before anything is written; a problem with one assignee's file is logged,
//! recorded in the [`CompositionReport`] and the run carries on.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info, warn};

use crate::config::ClaimConfig;
use crate::error::{ClaimError, ClaimResult};
use crate::models::PersonPeriods;

use super::document::build_claim_document;
use super::layout::layout_claim;
use super::render::{TemplateImage, render_claim_pdf};

/// What happened to one assignee's claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The file was written.
    Generated {
        /// The claimant.
        assignee: String,
        /// Where the file was written.
        path: PathBuf,
    },
    /// The file could not be produced.
    Failed {
        /// The claimant.
        assignee: String,
        /// Where the file would have been written.
        path: PathBuf,
        /// Why it failed.
        error: ClaimError,
    },
}

impl ClaimOutcome {
    /// Returns the claimant this outcome is about.
    pub fn assignee(&self) -> &str {
        match self {
            Self::Generated { assignee, .. } | Self::Failed { assignee, .. } => assignee,
        }
    }
}

/// Per-assignee outcomes of a composition run, in assignee order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    /// Where the files went.
    pub output_directory: PathBuf,
    /// One outcome per assignee with at least one period.
    pub outcomes: Vec<ClaimOutcome>,
}

impl CompositionReport {
    /// Returns the paths of every file that was written.
    pub fn generated_files(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ClaimOutcome::Generated { path, .. } => Some(path.clone()),
                ClaimOutcome::Failed { .. } => None,
            })
            .collect()
    }

    /// Returns the outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ClaimOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ClaimOutcome::Failed { .. }))
    }

    /// Returns `true` when every claim was written.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Resolves the destination directory, creating it when missing.
///
/// An empty path means the system temp directory.
///
/// # Errors
///
/// Returns [`ClaimError::OutputDirectory`] when the path exists but is not a
/// directory, or when it cannot be created.
pub fn resolve_output_directory(path: &Path) -> ClaimResult<PathBuf> {
    let path = if path.as_os_str().is_empty() {
        std::env::temp_dir()
    } else {
        path.to_path_buf()
    };

    let directory_error = |message: String| ClaimError::OutputDirectory {
        path: path.display().to_string(),
        message,
    };

    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => Ok(path),
        Ok(_) => Err(directory_error("not a directory".to_string())),
        Err(_) => {
            fs::create_dir_all(&path).map_err(|e| directory_error(e.to_string()))?;
            Ok(path)
        }
    }
}

/// Writes one claim PDF per assignee into `output_directory`.
///
/// # Arguments
///
/// * `template_path` - Background image of the claim form
/// * `output_directory` - Destination; created when missing, temp dir when empty
/// * `grouped` - Periods per assignee, as produced by grouping
/// * `claim_date` - Reference date printed on every form
/// * `config` - Rate, row cap and layout
///
/// # Returns
///
/// A [`CompositionReport`] with one outcome per assignee that has periods,
/// in assignee order. Failed writes are part of the report, not an error.
///
/// # Errors
///
/// * [`ClaimError::OutputDirectory`] when the destination is unusable
/// * [`ClaimError::Template`] when there is something to compose and the
///   template cannot be decoded
pub fn compose_claims(
    template_path: &Path,
    output_directory: &Path,
    grouped: &PersonPeriods,
    claim_date: DateTime<FixedOffset>,
    config: &ClaimConfig,
) -> ClaimResult<CompositionReport> {
    let output_directory = resolve_output_directory(output_directory)?;
    let mut report = CompositionReport {
        output_directory: output_directory.clone(),
        outcomes: Vec::new(),
    };

    if grouped.values().all(Vec::is_empty) {
        debug!("No on-call periods to compose");
        return Ok(report);
    }

    let template = TemplateImage::open(template_path)?;

    for (assignee, periods) in grouped {
        let Some(document) = build_claim_document(assignee, periods, claim_date, config) else {
            continue;
        };

        if document.is_truncated() {
            warn!(
                assignee = %assignee,
                periods = document.period_count,
                rendered = document.rows.len(),
                "More periods than the claim form has rows; extra periods are not listed"
            );
        }

        let path = output_directory.join(&document.file_name);
        let layout = layout_claim(&document, config);
        let written = render_claim_pdf(&layout, &template, &document.file_name).and_then(|bytes| {
            fs::write(&path, bytes).map_err(|e| ClaimError::DocumentWrite {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        });

        match written {
            Ok(()) => {
                info!(
                    assignee = %assignee,
                    path = %path.display(),
                    total = %document.total,
                    "Claim generated"
                );
                report.outcomes.push(ClaimOutcome::Generated {
                    assignee: assignee.clone(),
                    path,
                });
            }
            Err(error) => {
                warn!(
                    assignee = %assignee,
                    path = %path.display(),
                    error = %error,
                    "Unable to generate claim"
                );
                report.outcomes.push(ClaimOutcome::Failed {
                    assignee: assignee.clone(),
                    path,
                    error,
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::group_assignments;
    use crate::models::AssignmentRecord;

    fn write_template(dir: &Path) -> PathBuf {
        let path = dir.join("template.png");
        image::RgbImage::from_pixel(21, 30, image::Rgb([250, 250, 250]))
            .save(&path)
            .unwrap();
        path
    }

    fn claim_date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-01-31T00:00:00Z").unwrap()
    }

    fn alice_and_bob() -> PersonPeriods {
        group_assignments(&[
            AssignmentRecord::new("Alice", "2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z"),
            AssignmentRecord::new("Alice", "2024-01-08T00:00:00Z", "2024-01-15T00:00:00Z"),
            AssignmentRecord::new("Bob", "2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z"),
        ])
        .periods
    }

    /// CP-001: one file per assignee, in assignee order
    #[test]
    fn test_cp_001_one_file_per_assignee() {
        let scratch = tempfile::tempdir().unwrap();
        let template = write_template(scratch.path());
        let out = scratch.path().join("claims");

        let report = compose_claims(
            &template,
            &out,
            &alice_and_bob(),
            claim_date(),
            &ClaimConfig::default(),
        )
        .unwrap();

        let files = report.generated_files();
        assert_eq!(
            files,
            vec![
                out.join("2024-01-01 until 2024-01-15 Alice support oncall claim.pdf"),
                out.join("2024-01-01 until 2024-01-08 Bob support oncall claim.pdf"),
            ]
        );
        for file in &files {
            assert!(fs::read(file).unwrap().starts_with(b"%PDF-"));
        }
        assert!(report.is_complete());
    }

    /// CP-002: nothing to compose, nothing written, no template needed
    #[test]
    fn test_cp_002_empty_input() {
        let scratch = tempfile::tempdir().unwrap();

        let report = compose_claims(
            Path::new("/nonexistent/template.png"),
            scratch.path(),
            &PersonPeriods::new(),
            claim_date(),
            &ClaimConfig::default(),
        )
        .unwrap();

        assert!(report.outcomes.is_empty());
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    /// CP-003: destination is a regular file
    #[test]
    fn test_cp_003_output_path_is_file() {
        let scratch = tempfile::tempdir().unwrap();
        let template = write_template(scratch.path());
        let not_a_dir = scratch.path().join("claims.pdf");
        fs::write(&not_a_dir, b"").unwrap();

        let result = compose_claims(
            &template,
            &not_a_dir,
            &alice_and_bob(),
            claim_date(),
            &ClaimConfig::default(),
        );

        match result {
            Err(ClaimError::OutputDirectory { message, .. }) => {
                assert_eq!(message, "not a directory");
            }
            other => panic!("Expected OutputDirectory error, got {:?}", other),
        }
    }

    /// CP-004: undecodable template is fatal
    #[test]
    fn test_cp_004_bad_template() {
        let scratch = tempfile::tempdir().unwrap();

        let result = compose_claims(
            &scratch.path().join("missing.png"),
            scratch.path(),
            &alice_and_bob(),
            claim_date(),
            &ClaimConfig::default(),
        );

        assert!(matches!(result, Err(ClaimError::Template { .. })));
    }

    /// CP-005: a failed write is reported and the run continues
    #[test]
    fn test_cp_005_write_failure_continues() {
        let scratch = tempfile::tempdir().unwrap();
        let template = write_template(scratch.path());
        let out = scratch.path().join("claims");
        fs::create_dir(&out).unwrap();
        // A directory squatting on Alice's file name makes her write fail
        fs::create_dir(out.join("2024-01-01 until 2024-01-15 Alice support oncall claim.pdf"))
            .unwrap();

        let report = compose_claims(
            &template,
            &out,
            &alice_and_bob(),
            claim_date(),
            &ClaimConfig::default(),
        )
        .unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert!(!report.is_complete());
        let failed: Vec<&str> = report.failures().map(ClaimOutcome::assignee).collect();
        assert_eq!(failed, vec!["Alice"]);
        assert_eq!(
            report.generated_files(),
            vec![out.join("2024-01-01 until 2024-01-08 Bob support oncall claim.pdf")]
        );
    }

    #[test]
    fn test_missing_output_directory_is_created() {
        let scratch = tempfile::tempdir().unwrap();
        let nested = scratch.path().join("a").join("b");

        let resolved = resolve_output_directory(&nested).unwrap();

        assert_eq!(resolved, nested);
        assert!(nested.is_dir());
    }

    #[test]
    fn test_empty_output_directory_is_temp_dir() {
        let resolved = resolve_output_directory(Path::new("")).unwrap();
        assert_eq!(resolved, std::env::temp_dir());
    }

    #[test]
    fn test_naming_is_idempotent_across_runs() {
        let scratch = tempfile::tempdir().unwrap();
        let template = write_template(scratch.path());

        let first = compose_claims(
            &template,
            &scratch.path().join("one"),
            &alice_and_bob(),
            claim_date(),
            &ClaimConfig::default(),
        )
        .unwrap();
        let second = compose_claims(
            &template,
            &scratch.path().join("two"),
            &alice_and_bob(),
            claim_date(),
            &ClaimConfig::default(),
        )
        .unwrap();

        let names = |report: &CompositionReport| -> Vec<String> {
            report
                .generated_files()
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };
        assert_eq!(names(&first), names(&second));
    }
}
