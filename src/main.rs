use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use price_monitor::cli::Cli;
use price_monitor::config::Config;
use price_monitor::notify::TelegramTransport;
use price_monitor::{alerts, dashboard, enrich, fetch, history, notify, render};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    let now = Utc::now();
    let prices =
        fetch::fetch_prices(&config.assets, &config.source).context("Failed to fetch prices")?;
    log::debug!("fetched {} price(s)", prices.len());

    history::append_snapshot(&config.output.history_csv, now, &prices)
        .context("Failed to append history row")?;

    let Some(table) = history::load_history(&config.output.history_csv)? else {
        println!("No history yet; run again.");
        return Ok(());
    };
    if table.is_empty() {
        println!("No history yet; run again.");
        return Ok(());
    }

    let enriched = enrich::enrich_with_changes(&table);
    let (figure, summary) = dashboard::build_dashboard(&enriched, &config.assets, &config.chart);
    render::write_dashboard_html(&figure, &summary, &config.output.dashboard_html)
        .context("Failed to write dashboard")?;
    log::debug!(
        "dashboard written to {} ({} rows)",
        config.output.dashboard_html.display(),
        table.len()
    );

    let alert_lines = alerts::check_alerts(&prices, &config.assets);
    if config.alerts.enabled && !alert_lines.is_empty() {
        let message = alert_lines.join(" | ");
        println!("{message}");
        if config.telegram.is_some() {
            let delivery =
                notify::send_alert(&TelegramTransport, config.telegram.as_ref(), &message);
            log::debug!("alert delivery: {:?}", delivery);
        }
    }

    let price_summary = prices
        .iter()
        .map(|(name, price)| format!("{name}: ${price}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("[{}] {}", now.to_rfc3339(), price_summary);

    if !alert_lines.is_empty() {
        println!("ALERTS:");
        for line in &alert_lines {
            println!(" - {line}");
        }
    }

    Ok(())
}
