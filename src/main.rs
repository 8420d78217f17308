//! LapView - browse F1 sessions and compare lap times from the terminal
//!
//! Talks to the F1 stats backend, walks the year → event → session → driver
//! hierarchy and prints lap chart data for one or two drivers, either as a
//! table or as JSON for a chart front end.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io;
use tracing_subscriber::EnvFilter;

use lapview::analysis::{AlignedRow, ChartDataset};
use lapview::api::{ApiClient, F1DataSource, F1Session, TeamColors};
use lapview::format::{
    chart_note, format_axis_tick, format_delta, format_lap_time, header_text, legend,
    outlier_badge, threshold_info, LegendEntry, Tooltip,
};
use lapview::results::{lap_table_rows, result_rows};
use lapview::settings::Settings;
use lapview::state::{ChartView, Dashboard, LapChartPanel, MAX_SELECTED_DRIVERS};
use lapview::viewport::ViewportSignal;

#[derive(Parser, Debug)]
#[command(author, version, about = "Formula 1 lap time comparison", long_about = None)]
struct Cli {
    /// Backend base URL (overrides settings and LAPVIEW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List seasons with data
    Years,
    /// List the events of a season
    Events { year: i32 },
    /// List the sessions of an event
    Sessions { meeting_key: u32 },
    /// List the drivers of a session
    Drivers { session_key: u32 },
    /// Show one driver's laps
    Laps {
        session_key: u32,
        driver_number: u32,
    },
    /// Show a session's classification
    Results { session_key: u32 },
    /// Compare lap times of up to two drivers
    Compare(CompareArgs),
    /// Show or change saved settings
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Backend base URL to save
    #[arg(long)]
    set_api_url: Option<String>,

    /// Hide outlier laps by default
    #[arg(long)]
    exclude_outliers: Option<bool>,

    /// Default viewport width in pixels
    #[arg(long)]
    viewport_width: Option<u32>,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    session_key: u32,

    /// Driver numbers; selecting more than two keeps the last two
    #[arg(required = true, num_args = 1..)]
    drivers: Vec<u32>,

    /// Keep outlier laps in the chart and its scale
    #[arg(long)]
    all: bool,

    /// Viewport width in pixels used for chart sizing
    #[arg(long)]
    width: Option<u32>,

    /// Print the chart dataset as JSON
    #[arg(long)]
    json: bool,

    /// Print the tooltip of every displayed lap
    #[arg(long)]
    tooltips: bool,
}

/// JSON document handed to chart front ends
#[derive(Serialize)]
struct ChartExport<'a> {
    header: String,
    note: String,
    outlier_badge: String,
    threshold: String,
    legend: Vec<LegendEntry>,
    dataset: &'a ChartDataset,
    tooltips: Vec<Tooltip>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let settings = Settings::load();
    let base_url = cli.api_url.clone().unwrap_or_else(|| settings.api_base_url());
    tracing::debug!("Using backend at {}", base_url);
    let client = ApiClient::new(base_url);

    match cli.command {
        Command::Years => {
            let years = client.years().context("Failed to load years")?;
            for year in years {
                println!("{}", year);
            }
        }
        Command::Events { year } => {
            let events = client.events(year).context("Failed to load events")?;
            if events.is_empty() {
                println!("No events available for this year");
            }
            for event in events {
                println!(
                    "{:>6}  {}  ({}, {})",
                    event.meeting_key, event.meeting_official_name, event.location, event.country_name
                );
            }
        }
        Command::Sessions { meeting_key } => {
            let sessions = client.sessions(meeting_key).context("Failed to load sessions")?;
            if sessions.is_empty() {
                println!("No sessions available for this event");
            }
            for session in sessions {
                println!(
                    "{:>6}  {:<12} {}  {}",
                    session.session_key, session.session_type, session.session_name, session.date
                );
            }
        }
        Command::Drivers { session_key } => {
            let drivers = client.drivers(session_key).context("Failed to load drivers")?;
            if drivers.is_empty() {
                println!("No drivers available for this session");
            }
            for driver in drivers {
                println!(
                    "{:>3}  {:<4} {:<24} {}",
                    driver.driver_number,
                    driver.name_acronym,
                    driver.full_name(),
                    driver.team.unwrap_or_default()
                );
            }
        }
        Command::Laps {
            session_key,
            driver_number,
        } => {
            let laps = client
                .driver_laps(session_key, driver_number)
                .context("Failed to load lap data")?;
            println!("Lap Data for {} {}", laps.first_name, laps.last_name);
            println!("Note: A lap time of 0:00.000 means no lap data was provided for this lap.");
            println!("{:>4}  {:>9}  {:>10}  {:<14} {}", "Lap", "Time", "Speed Trap", "Compound", "Pit Out");
            for row in lap_table_rows(&laps) {
                println!(
                    "{:>4}  {:>9}  {:>10}  {:<14} {}",
                    row.lap, row.time, row.speed_trap, row.compound, row.pit_out
                );
            }
        }
        Command::Results { session_key } => {
            let result = client
                .session_result(session_key)
                .context("Failed to load session result data")?;
            if result.result.is_empty() {
                println!("No session result available for this session");
            }
            println!("{:>3}  {:<24} {:<20} {:>14}  {}", "Pos", "Driver", "Team", "Gap", "Laps");
            for row in result_rows(&result) {
                println!(
                    "{:>3}  {:<24} {:<20} {:>14}  {}",
                    row.position, row.driver, row.team, row.gap, row.laps
                );
            }
        }
        Command::Compare(args) => compare(&client, &settings, &args)?,
        Command::Config(args) => configure(settings, &args)?,
    }

    Ok(())
}

fn configure(mut settings: Settings, args: &ConfigArgs) -> Result<()> {
    let changed = args.set_api_url.is_some()
        || args.exclude_outliers.is_some()
        || args.viewport_width.is_some();

    if let Some(url) = &args.set_api_url {
        settings.api_base_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(exclude) = args.exclude_outliers {
        settings.exclude_outliers = exclude;
    }
    if let Some(width) = args.viewport_width {
        settings.viewport_width = width;
    }

    if changed {
        settings.save().context("Failed to save settings")?;
        tracing::info!("Settings saved");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&settings).context("Failed to serialize settings")?
    );
    Ok(())
}

fn compare(client: &ApiClient, settings: &Settings, args: &CompareArgs) -> Result<()> {
    let mut dashboard = Dashboard::new();
    dashboard.load_initial(client);
    dashboard.select_session(client, F1Session::from_key(args.session_key));

    if dashboard.drivers.is_empty() {
        bail!("No drivers available for session {}", args.session_key);
    }
    if args.drivers.len() > MAX_SELECTED_DRIVERS {
        tracing::info!(
            "Only {} drivers can be compared; keeping the last {}",
            MAX_SELECTED_DRIVERS,
            MAX_SELECTED_DRIVERS
        );
    }

    for &number in &args.drivers {
        let driver = dashboard
            .drivers
            .iter()
            .find(|d| d.driver_number == number)
            .cloned()
            .with_context(|| format!("Driver {} is not in session {}", number, args.session_key))?;
        if dashboard.is_selected(number) {
            continue;
        }
        let toggle = dashboard.toggle_driver(driver);
        if let Some(request) = toggle.request {
            dashboard.fetch_laps(client, request);
        }
    }

    let signal = ViewportSignal::new(args.width.unwrap_or(settings.viewport_width));
    let exclude_outliers = settings.exclude_outliers && !args.all;
    let panel = LapChartPanel::mount(&signal, exclude_outliers);

    let selected: Vec<_> = dashboard
        .selected_drivers
        .iter()
        .map(lapview::analysis::DriverInfo::from)
        .collect();
    let header = header_text(&selected);

    let view = panel.view(&dashboard);
    let dataset = match &view {
        ChartView::Ready(dataset) => dataset.as_ref(),
        other => {
            println!("{}", header);
            println!("{}", other.message().unwrap_or_default());
            return Ok(());
        }
    };

    let team_colors = dashboard.team_colors.as_ref();
    let tooltips: Vec<Tooltip> = dataset
        .display_rows()
        .map(|row| Tooltip::for_row(dataset, row, team_colors))
        .collect();

    if args.json {
        let export = ChartExport {
            header,
            note: chart_note(dataset),
            outlier_badge: outlier_badge(dataset.outlier_count, dataset.exclude_outliers),
            threshold: threshold_info(),
            legend: legend(&dataset.drivers, team_colors),
            dataset,
            tooltips,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&export).context("Failed to serialize chart dataset")?
        );
        return Ok(());
    }

    print_chart(&header, dataset, team_colors);
    if args.tooltips {
        for tooltip in &tooltips {
            println!();
            for line in tooltip.lines() {
                println!("  {}", line);
            }
        }
    }

    Ok(())
}

fn print_chart(header: &str, dataset: &ChartDataset, team_colors: Option<&TeamColors>) {
    println!("{}", header);
    println!(
        "{}  |  {}",
        outlier_badge(dataset.outlier_count, dataset.exclude_outliers),
        threshold_info()
    );
    println!("{}", chart_note(dataset));

    for entry in legend(&dataset.drivers, team_colors) {
        let dash = if entry.style.dash.is_some() { " (dashed)" } else { "" };
        println!("  {} {}{}", entry.style.color, entry.name, dash);
    }

    match dataset.y_domain.as_array() {
        Some([max, min]) => println!(
            "Time axis: {} .. {}  |  chart {}x{}px ({} layout)",
            format_axis_tick(min),
            format_axis_tick(max),
            dataset.layout.width,
            dataset.layout.height,
            dataset.layout.breakpoint
        ),
        None => println!("Time axis: auto"),
    }
    if let Some(best) = dataset.best_lap {
        let name = dataset
            .drivers
            .get(best.driver_index)
            .map(|d| d.display_name())
            .unwrap_or_default();
        println!(
            "Best lap: {} on lap {} by {}",
            format_lap_time(Some(best.seconds)),
            best.lap,
            name
        );
    } else if let Some(seconds) = dataset.best_lap_seconds() {
        println!("Best lap: {}", format_lap_time(Some(seconds)));
    }
    println!();

    let mut heading = format!("{:>4}", "Lap");
    for driver in &dataset.drivers {
        heading.push_str(&format!("  {:>24}", driver.last_name));
    }
    println!("{}", heading);

    for row in dataset.display_rows() {
        println!("{}", format_row(dataset, row));
    }
}

fn format_row(dataset: &ChartDataset, row: &AlignedRow) -> String {
    let best = dataset.best_lap_seconds();
    let mut line = format!("{:>4}", row.lap);

    for index in 0..dataset.drivers.len() {
        let cell = match row.cell(index) {
            None => "-".to_string(),
            Some(cell) => {
                let delta = match (cell.seconds, best) {
                    (Some(seconds), Some(best)) => {
                        format_delta(lapview::analysis::delta(seconds, best))
                    }
                    _ => String::new(),
                };
                let pit = if cell.pit_out { "P" } else { " " };
                format!("{} {:>9} {:>8}", pit, format_lap_time(cell.seconds), delta)
            }
        };
        line.push_str(&format!("  {:>24}", cell));
    }

    if row.is_outlier {
        line.push_str("  outlier");
    }
    if dataset.best_lap.is_some_and(|b| b.lap == row.lap) {
        line.push_str("  best");
    }
    line
}
