use chatdeck::core::config::{self, Overrides};
use chatdeck::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "chatdeck", about = "Terminal chat client for a local model server")]
struct Args {
    /// Model server base URL (overrides config and CHATDECK_SERVER_URL)
    #[arg(short, long)]
    server: Option<String>,

    /// Initial temperature
    #[arg(short, long)]
    temperature: Option<f64>,

    /// Initial max tokens
    #[arg(short, long)]
    max_tokens: Option<u32>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to chatdeck.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("chatdeck.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}. Using defaults.");
        log::warn!("Falling back to default config: {e}");
        config::ChatdeckConfig::default()
    });
    let overrides = Overrides {
        server_url: args.server,
        temperature: args.temperature,
        max_tokens: args.max_tokens,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!("Chatdeck starting up against {}", resolved.server_url);

    tui::run(resolved)
}
