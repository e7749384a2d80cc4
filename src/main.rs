//! # Multiraxml: batched RAxML-NG runs over a directory of alignments
//!
//! ## Usage
//! ```bash
//! multiraxml split alignments/ out/ options.txt 100 64
//!
//! # With profiling output
//! multiraxml split alignments/ out/ options.txt 100 64 --profile
//! ```

use std::time::Instant;

use multiraxml::config::Config;
use multiraxml::pipelines::{MpiDispatcher, PipelineDriver};
use multiraxml::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber for hierarchical profiling output
fn init_profiling() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime()),
        )
        .init();
}

fn run() -> Result<()> {
    let start = Instant::now();

    let config = Config::parse_and_validate()?;

    if config.profile {
        init_profiling();
        eprintln!("=== Profiling enabled ===\n");
    }

    eprintln!("Multiraxml v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Input: {:?}", config.input_dir);
    eprintln!("Replicates: {}, ranks: {}", config.replicates, config.ranks);

    let dispatcher = MpiDispatcher::from_config(&config);
    let mut driver = PipelineDriver::new(&config, dispatcher);
    let summary = driver.run()?;

    eprintln!(
        "Scheduled {} of {} datasets ({} skipped)",
        summary.datasets - summary.skipped.len(),
        summary.datasets,
        summary.skipped.len()
    );

    let elapsed = start.elapsed();
    eprintln!("\nCompleted in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
