use anyhow::Context;
use bridge::model::GrowthModel;
use bridge::server::GrowthBridge;
use clap::Parser;
use growthcore::prelude::SmoothingStrategy;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::BotConfig;
use workflow::context::QueryContext;
use workflow::handler::{handle_query, Reply};

mod bridge;
mod command;
mod source;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Answers case-count queries and plots growth rates")]
struct Args {
    /// Query tokens, e.g. `ca plot`, `"new york"` or nothing for the whole country
    tokens: Vec<String>,
    /// Load the bot config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Answer from a JSON records file instead of the tracking API
    #[arg(long)]
    records: Option<PathBuf>,
    #[arg(long)]
    window: Option<usize>,
    /// grouped, window-mean or carry-over
    #[arg(long)]
    strategy: Option<SmoothingStrategy>,
    #[arg(long, default_value_t = false)]
    abort_on_malformed: bool,
    /// Keep the HTTP bridge alive for the visualizer and remote queries
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.config.as_ref() {
        BotConfig::load(path)?
    } else {
        BotConfig::default()
    };
    config.apply_overrides(args.window, args.strategy, args.abort_on_malformed);

    let context = Arc::new(QueryContext::from_config(config, args.records.clone())?);
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;
    runtime.block_on(run(args, context))
}

async fn run(args: Args, context: Arc<QueryContext>) -> anyhow::Result<()> {
    let bridge = GrowthBridge::new();

    if !args.tokens.is_empty() || !args.serve {
        let reply = handle_query(&context, args.tokens.as_slice()).await;
        print_reply(&reply);
        if let Some(report) = reply.growth.as_ref() {
            bridge.publish(GrowthModel::from(report)).await;
        }
    }

    if args.serve {
        let server = bridge.spawn(context.clone(), context.config.bridge_address());
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
        server.abort();
        let metrics = context.metrics.snapshot();
        log::info!(
            "served {} queries, {} failed, {} records skipped",
            metrics.served,
            metrics.failed,
            metrics.skipped_records
        );
    }

    Ok(())
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.text);
    if let Some(report) = reply.growth.as_ref() {
        if !report.has_plot() {
            println!("Nothing to plot for {}", report.location);
            return;
        }
        println!(
            "Growth rate for {} ({} window {}):",
            report.location, report.strategy, report.window
        );
        println!("{:>16} {:>16}", "total_positive", "positive_increase");
        for point in &report.coordinates {
            println!("{:>16.3} {:>16.3}", point.x, point.y);
        }
    }
}
