use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use dana::core::config;
use dana::tui;

#[derive(Parser)]
#[command(name = "dana", about = "Terminal chat client for the Autonomous Data Analyst backend")]
struct Args {
    /// Backend server URL (overrides config file and DANA_SERVER_URL)
    #[arg(short, long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to dana.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("dana.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("dana: {e}");
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(&loaded, args.server.as_deref());

    log::info!("Dana starting up (server: {})", resolved.server_url);

    tui::run(resolved)
}
