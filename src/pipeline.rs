//! End-to-end claim generation.
//!
//! [`ClaimPipeline`] wires the collaborators around the claim engine:
//! resolve the window, fetch the template and the schedule, group, compose,
//! and optionally upload.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::claim::{CompositionReport, compose_claims, group_assignments};
use crate::config::ClaimConfig;
use crate::error::ClaimResult;
use crate::schedule::{ScheduleQuery, ScheduleSource};
use crate::template::TemplateSource;
use crate::time_expr::parse_time_expression;
use crate::upload::{ObjectStore, object_key, upload_directory, upload_files};

/// Which date is printed as the claim reference date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClaimDate {
    /// The resolved end of the claim window.
    #[default]
    WindowEnd,
    /// The time the pipeline runs.
    Now,
    /// A fixed date.
    Fixed(DateTime<FixedOffset>),
}

impl ClaimDate {
    /// Resolves the printed date. Window end and run time are shown in the
    /// host's local time zone; a fixed date keeps its own offset.
    pub fn resolve(self, until: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::WindowEnd => until.with_timezone(&Local).fixed_offset(),
            Self::Now => now.with_timezone(&Local).fixed_offset(),
            Self::Fixed(date) => date,
        }
    }
}

/// One claim generation request.
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    /// Schedule to query.
    pub schedule_name: String,
    /// Credential for the schedule source.
    pub api_token: String,
    /// Start of the window, as a time expression.
    pub since: String,
    /// End of the window, as a time expression.
    pub until: String,
    /// Where to write the claims; a fresh `<temp>/<uuid>` when `None`.
    pub output_directory: Option<PathBuf>,
    /// Reference date printed on the claims.
    pub claim_date: ClaimDate,
}

/// What a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Per-assignee composition outcomes.
    pub report: CompositionReport,
    /// Records dropped during grouping.
    pub skipped_records: usize,
    /// Public URLs of the generated claims, when uploaded.
    pub public_urls: Vec<String>,
}

impl PipelineOutput {
    /// Returns the public URLs when claims were uploaded, otherwise the local
    /// file paths.
    pub fn locations(&self) -> Vec<String> {
        if self.public_urls.is_empty() {
            self.report
                .generated_files()
                .iter()
                .map(|path| path.display().to_string())
                .collect()
        } else {
            self.public_urls.clone()
        }
    }
}

/// The claim generation pipeline.
#[derive(Clone)]
pub struct ClaimPipeline {
    source: Arc<dyn ScheduleSource>,
    template: Arc<dyn TemplateSource>,
    store: Option<Arc<dyn ObjectStore>>,
    config: ClaimConfig,
}

impl ClaimPipeline {
    /// Creates a pipeline without uploads.
    pub fn new(
        source: Arc<dyn ScheduleSource>,
        template: Arc<dyn TemplateSource>,
        config: ClaimConfig,
    ) -> Self {
        Self {
            source,
            template,
            store: None,
            config,
        }
    }

    /// Uploads generated claims to `store`.
    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Returns the claim configuration.
    pub fn config(&self) -> &ClaimConfig {
        &self.config
    }

    /// Runs the pipeline for one request.
    ///
    /// `now` anchors relative time expressions and [`ClaimDate::Now`].
    ///
    /// # Errors
    ///
    /// Fails on an invalid time expression, a schedule source or template
    /// failure, an unusable output directory, or a failed upload. Failures
    /// of individual claim files are reported in the output instead.
    pub fn run(&self, request: &ClaimRequest, now: DateTime<Utc>) -> ClaimResult<PipelineOutput> {
        let since = parse_time_expression(&request.since, now)?;
        let until = parse_time_expression(&request.until, now)?;
        let claim_date = request.claim_date.resolve(until, now);

        let template_path = self.template.template_path()?;
        let records = self.source.fetch_assignments(&ScheduleQuery {
            schedule_name: request.schedule_name.clone(),
            since,
            until,
            api_token: request.api_token.clone(),
        })?;

        let grouping = group_assignments(&records);
        if !grouping.skipped.is_empty() {
            warn!(
                skipped = grouping.skipped.len(),
                "Some schedule entries were skipped"
            );
        }

        let output_directory = request
            .output_directory
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(Uuid::new_v4().to_string()));

        let report = compose_claims(
            &template_path,
            &output_directory,
            &grouping.periods,
            claim_date,
            &self.config,
        )?;

        let public_urls = match &self.store {
            Some(store) => {
                let generated = report.generated_files();
                // A caller's directory may hold files from earlier runs.
                if request.output_directory.is_some() {
                    upload_files(store.as_ref(), &generated)?;
                } else {
                    upload_directory(store.as_ref(), &report.output_directory)?;
                }
                generated
                    .iter()
                    .map(|path| store.public_url(&object_key(path)))
                    .collect()
            }
            None => Vec::new(),
        };

        info!(
            schedule = %request.schedule_name,
            since = %since,
            until = %until,
            records = records.len(),
            generated = report.generated_files().len(),
            "Claim run finished"
        );

        Ok(PipelineOutput {
            report,
            skipped_records: grouping.skipped.len(),
            public_urls,
        })
    }
}
