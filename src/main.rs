mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::DashboardApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

#[derive(Parser)]
#[command(name = "student-dashboard")]
#[command(about = "Explore how student habits relate to exam performance", long_about = None)]
struct Cli {
    /// Student dataset (.csv, .json or .parquet)
    #[arg(
        env = "STUDENT_DASHBOARD_DATA",
        default_value = "student_habits_performance.csv"
    )]
    data: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = data::loader::load_file(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;
    log::info!(
        "Loaded {} students from {}",
        dataset.len(),
        cli.data.display()
    );
    log::debug!("{} incomplete rows dropped", dataset.dropped_rows);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    let state = AppState::new(dataset);
    eframe::run_native(
        "Student Habits and Performance Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
