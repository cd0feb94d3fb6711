mod events;
mod logging;
mod replay;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use bookmarks_engine::{
    drive_capture, FetchSettings, MonitorSettings, PipelineConfig, PipelineHandle, ReqwestFetcher,
    RunReport, YtDlpMaterializer,
};
use clap::Parser;
use engine_logging::{engine_info, engine_warn};

use crate::replay::ReplaySource;

/// Harvest media from captured bookmark-timeline pages into a local folder.
#[derive(Parser)]
struct Args {
    /// Directory of captured feed page payloads (*.json), in capture order.
    pages: PathBuf,

    /// Path to the output folder.
    #[arg(short, long, default_value = "out")]
    output_path: PathBuf,

    /// Settle grace interval in milliseconds before declaring the feed done.
    #[arg(long, default_value_t = 4000)]
    settle_ms: u64,

    /// Set output to verbose messages.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::initialize(logging::LogDestination::Terminal, args.verbose);

    let fetcher = match ReqwestFetcher::new(FetchSettings::default()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut pipeline = match PipelineHandle::new(
        PipelineConfig::new(args.output_path.clone()),
        fetcher,
        Arc::new(YtDlpMaterializer::new()),
    ) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(event_rx) = pipeline.take_events() {
        events::spawn_event_logger(event_rx);
    }

    let mut source = match ReplaySource::from_dir(&args.pages, pipeline.sink()) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: {err}");
            pipeline.finish();
            return ExitCode::FAILURE;
        }
    };
    engine_info!("replaying {} captured pages", source.page_count());

    let settings = MonitorSettings {
        settle_interval: Duration::from_millis(args.settle_ms),
        ..MonitorSettings::default()
    };

    // An interrupt stops the scroll drive; queued pages still drain below.
    let drive_result = tokio::select! {
        result = drive_capture(&mut source, &pipeline, &settings) => result,
        _ = tokio::signal::ctrl_c() => {
            engine_warn!("interrupt received; finishing queued pages before exit");
            Ok(())
        }
    };

    // Convergence, interrupt, and worker failure all end the same way:
    // cancel, drain what is queued, join the worker, report.
    let mut report = pipeline.finish();
    if report.failure.is_none() {
        report.failure = drive_result.err();
    }
    print_summary(&report)
}

fn print_summary(report: &RunReport) -> ExitCode {
    let summary = report.summary;
    println!("Done!");
    println!("Pages processed: {}", summary.pages_processed);
    println!("Media items examined: {}", summary.media_examined);
    println!("Newly downloaded: {}", summary.media_downloaded);

    match &report.failure {
        Some(error) => {
            eprintln!("Run aborted: {error}");
            ExitCode::FAILURE
        }
        None => {
            println!(
                "Take care: the feed sometimes reports an early end under load; \
                 if anything looks missing, run the harvest again."
            );
            ExitCode::SUCCESS
        }
    }
}
