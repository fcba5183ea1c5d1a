use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, bail};
use chrono::Utc;
use clap::ArgAction;
use oncall_claim::{
    api::{AppState, create_router},
    claim::ClaimOutcome,
    config::{ConfigLoader, Settings},
    models::AssignmentRecord,
    pipeline::{ClaimDate, ClaimPipeline, ClaimRequest},
    schedule::{PagerDutyClient, ScheduleSource, StaticSchedule},
    template::{CachedTemplate, LocalTemplate, TemplateSource},
    upload::{ObjectStore, S3Store},
};
use tracing::{info, warn};

#[derive(Debug, clap::Parser)]
#[command(version, about = "Generate on-call claim forms from PagerDuty schedules")]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        match self.command {
            Command::Generate(generate) => generate.run(),
            Command::Serve(serve) => serve.run(),
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Generate claims for one schedule window
    Generate(Generate),

    /// Serve claims over HTTP, configured from the environment
    Serve(Serve),
}

#[derive(Debug, clap::Args)]
struct Generate {
    /// PagerDuty API key
    #[arg(short = 'p', long)]
    pd_api_key: Option<String>,

    /// PagerDuty schedule name
    #[arg(short = 's', long)]
    schedule_name: Option<String>,

    /// Start of the window, e.g. `now-1mo` or an RFC 3339 timestamp
    #[arg(long, default_value = "now-1mo", allow_hyphen_values = true)]
    since: String,

    /// End of the window
    #[arg(long, default_value = "now", allow_hyphen_values = true)]
    until: String,

    /// Output directory; a fresh temporary directory when omitted
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Claim configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use a local template image instead of downloading it
    #[arg(long)]
    template: Option<PathBuf>,

    /// Read assignments from a JSON file instead of PagerDuty
    #[arg(long, conflicts_with_all = ["pd_api_key", "schedule_name"])]
    records: Option<PathBuf>,

    /// Upload the claims to this bucket
    #[arg(long, requires = "region")]
    upload_bucket: Option<String>,

    /// Region of the upload bucket
    #[arg(long)]
    region: Option<String>,
}

impl Generate {
    fn run(self) -> anyhow::Result<()> {
        let config = ConfigLoader::load_or_default(self.config.as_ref())?.into_config();

        let (source, schedule_name, api_token): (Arc<dyn ScheduleSource>, String, String) =
            match &self.records {
                Some(path) => {
                    let contents = std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let records: Vec<AssignmentRecord> = serde_json::from_str(&contents)
                        .with_context(|| format!("Failed to parse {}", path.display()))?;
                    (
                        Arc::new(StaticSchedule::new(records)),
                        path.display().to_string(),
                        String::new(),
                    )
                }
                None => {
                    let Some(api_key) = self.pd_api_key.filter(|k| !k.is_empty()) else {
                        bail!("A PagerDuty API key is required (--pd-api-key)");
                    };
                    let Some(schedule) = self.schedule_name.filter(|s| !s.is_empty()) else {
                        bail!("A schedule name is required (--schedule-name)");
                    };
                    (Arc::new(PagerDutyClient::new()), schedule, api_key)
                }
            };

        let template: Arc<dyn TemplateSource> = match self.template {
            Some(path) => Arc::new(LocalTemplate::new(path)),
            None => Arc::new(CachedTemplate::default()),
        };

        // The store drives the SDK on this runtime, so it must outlive the run.
        let mut runtime = None;
        let mut pipeline = ClaimPipeline::new(source, template, config);
        if let (Some(bucket), Some(region)) = (self.upload_bucket, self.region) {
            let rt = tokio::runtime::Runtime::new().context("Failed to start the runtime")?;
            let store = rt.block_on(S3Store::connect(bucket, region));
            pipeline = pipeline.with_store(Arc::new(store));
            runtime = Some(rt);
        }

        let request = ClaimRequest {
            schedule_name,
            api_token,
            since: self.since,
            until: self.until,
            output_directory: self.output_dir.filter(|dir| !dir.as_os_str().is_empty()),
            claim_date: ClaimDate::WindowEnd,
        };

        let output = pipeline.run(&request, Utc::now())?;
        drop(runtime);

        for location in output.locations() {
            println!("{location}");
        }

        let failed = output.report.failures().count();
        if failed > 0 {
            for failure in output.report.failures() {
                if let ClaimOutcome::Failed { assignee, error, .. } = failure {
                    warn!(assignee = %assignee, error = %error, "Claim was not generated");
                }
            }
            bail!("{failed} claim(s) could not be generated");
        }
        Ok(())
    }
}

#[derive(Debug, clap::Args)]
struct Serve {
    /// Listen address, overriding CLAIM_LISTEN_ADDR
    #[arg(long)]
    addr: Option<String>,
}

impl Serve {
    fn run(self) -> anyhow::Result<()> {
        let settings = Settings::from_env();
        let config = ConfigLoader::load_or_default(settings.config_path.as_ref())?.into_config();

        let runtime = tokio::runtime::Runtime::new().context("Failed to start the runtime")?;

        let mut pipeline = ClaimPipeline::new(
            Arc::new(PagerDutyClient::new()),
            Arc::new(CachedTemplate::default()),
            config,
        );
        match (&settings.bucket, &settings.region) {
            (Some(bucket), Some(region)) => {
                let store: Arc<dyn ObjectStore> =
                    Arc::new(runtime.block_on(S3Store::connect(bucket.clone(), region.clone())));
                pipeline = pipeline.with_store(store);
            }
            (Some(_), None) => bail!("AWS_REGION must be set when PDF_BUCKET_NAME is"),
            _ => {}
        }

        let addr = self.addr.unwrap_or(settings.listen_addr);
        let router = create_router(AppState::new(pipeline, settings.schedule_name));

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;
            info!(addr = %addr, "Claim service listening");
            axum::serve(listener, router).await?;
            Ok::<(), anyhow::Error>(())
        })
    }
}
