use clap::Parser;

#[derive(Parser)]
#[command(name = "price-monitor")]
#[command(about = "Fetches asset prices, accumulates a CSV history and renders an HTML dashboard")]
#[command(version)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    pub config: String,
}
