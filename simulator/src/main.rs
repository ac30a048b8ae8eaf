use analysis::report::AnalysisReport;
use analysis::request::{AnalysisRequest, ChatTurn};
use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::GuiBridge;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod analysis;
mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Flight telemetry analysis driver")]
struct Args {
    /// Telemetry CSV to analyze
    #[arg(long, conflicts_with = "demo")]
    input: Option<PathBuf>,
    /// Analyze a synthetic flight profile instead of a CSV file
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Seed for the synthetic profile noise
    #[arg(long)]
    seed: Option<u64>,
    /// Z-score above which a reading is flagged (default 3.0)
    #[arg(long)]
    z_threshold: Option<f64>,
    /// First index of a range digest
    #[arg(long, requires = "range_end")]
    range_start: Option<usize>,
    /// Last index (inclusive) of a range digest
    #[arg(long, requires = "range_start")]
    range_end: Option<usize>,
    /// Metric id to include in the range digest (repeatable)
    #[arg(long = "range-metric")]
    range_metrics: Vec<String>,
    /// Ask a follow-up question instead of requesting a report
    #[arg(long)]
    ask: Option<String>,
    /// JSON chat history (`[{"role": "user", "text": "..."}]`) for --ask
    #[arg(long, requires = "ask")]
    history: Option<PathBuf>,
    /// Write the analysis-service request JSON here
    #[arg(long)]
    request_out: Option<PathBuf>,
    /// Parse a saved analysis-service JSON response and print the report
    #[arg(long)]
    response: Option<PathBuf>,
    /// Keep the HTTP bridge alive for the presentation layer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = match args.workflow.as_ref() {
        Some(path) => WorkflowConfig::load(path)?.with_overrides(args.seed, args.z_threshold),
        None => WorkflowConfig::from_args(args.seed, args.z_threshold),
    };

    let runner = Runner::new(workflow_config).context("preparing workflow")?;
    let model_settings = runner.config().model.clone();

    let series = match args.input.as_ref() {
        Some(path) => Some(runner.ingest_file(path)?),
        None if args.demo => Some(runner.generate()),
        None => None,
    };

    let gui_bridge = if args.serve {
        Some(GuiBridge::new(Arc::new(runner.clone())))
    } else {
        None
    };

    if let Some(series) = series {
        if series.is_empty() {
            log::warn!("no usable observations found");
        }

        let range_digest = match (args.range_start, args.range_end) {
            (Some(start), Some(end)) => {
                Some(runner.summarize_range(&series, &args.range_metrics, start, end))
            }
            _ => None,
        };
        let result = runner.execute(series);

        println!(
            "Analysis -> observations {}, anomalies {}",
            result.series.len(),
            result.anomalies.len()
        );
        println!("{}", result.full_summary);

        let request = match (args.ask.as_deref(), range_digest) {
            (Some(question), _) => {
                let history = match args.history.as_ref() {
                    Some(path) => load_history(path)?,
                    None => Vec::new(),
                };
                AnalysisRequest::chat(&history, question, &result.full_summary, &model_settings)
            }
            (None, Some(digest)) => {
                println!("\n{}", digest);
                AnalysisRequest::range(&digest, &model_settings)
            }
            (None, None) => AnalysisRequest::full_report(&result.full_summary, &model_settings),
        };

        if let Some(path) = args.request_out.as_ref() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let payload =
                serde_json::to_string_pretty(&request).context("serializing analysis request")?;
            fs::write(path, payload)
                .with_context(|| format!("writing analysis request {}", path.display()))?;
        }

        if let Some(path) = args.response.as_ref() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading analysis response {}", path.display()))?;
            print_report(&AnalysisReport::parse_or_fallback(&text));
        }

        if let Some(bridge) = gui_bridge.as_ref() {
            bridge.publish(result)?;
            bridge.publish_status("Analysis results ready.");
        }
    }

    if let Some(bridge) = gui_bridge.as_ref() {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

fn load_history(path: &Path) -> anyhow::Result<Vec<ChatTurn>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading chat history {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing chat history {}", path.display()))
}

fn print_report(report: &AnalysisReport) {
    println!("\nReport status: {:?}", report.status);
    println!("{}", report.summary);
    for insight in &report.key_insights {
        println!("  * {}", insight);
    }
    for recommendation in &report.recommendations {
        println!("  -> {}", recommendation);
    }
}
