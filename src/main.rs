//! `planorder` - `Planning Center` order-of-service CLI.

use clap::Parser;

use planorder::cli::{Cli, OutputFormat};
use planorder::config::Config;
use planorder::error::Result;
use planorder::planning_center::PlanningCenterClient;
use planorder::{render, schedule};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Single-pass pipeline: locate the plan, fetch and filter its time
/// slots, join the agenda items, assemble, render.
async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let client = PlanningCenterClient::new(&config);

    let plan_id = client.find_first_plan_after(cli.after_date).await?;
    let plan_times = client.fetch_plan_times(&plan_id).await?;
    let times = schedule::collect_service_times(&plan_times);

    let plan_items = client.fetch_plan_items(&plan_id).await?;
    let items_by_time = schedule::join_items_by_time(&client, &plan_items, &times).await?;

    let slots = schedule::build_schedule(&times, items_by_time);
    match cli.format {
        OutputFormat::Text => println!("{}", render::render_text(&slots)),
        OutputFormat::Json => println!("{}", render::render_json(&slots)?),
    }

    Ok(())
}
