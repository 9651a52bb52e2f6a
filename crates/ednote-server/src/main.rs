//! ednote: ED note formatter, HTTP server and command line.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ednote_core::EdNoteConfig;
use ednote_server::cli::{self, FormatArgs};
use ednote_server::{routes, AppState};
use ednote_soap::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for `ednote format` output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = EdNoteConfig::from_env()?;

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "format" => {
                let format_args = match FormatArgs::parse(&args[2..]) {
                    Ok(a) => a,
                    Err(e) => {
                        eprintln!("{}", e);
                        std::process::exit(1);
                    }
                };
                match cli::run_format(&format_args, &config, &SystemClock) {
                    Ok(output) => {
                        print!("{}", output);
                        if !output.ends_with('\n') {
                            println!();
                        }
                        return Ok(());
                    }
                    Err(e) => {
                        eprintln!("Error: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            "--help" | "-h" | "help" => {
                println!("ednote — ED note formatter");
                println!();
                println!("Usage: ednote [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  format <file|-> [opts]   Format a note and print the SOAP document");
                println!("  help                     Show this help message");
                println!();
                println!("Format options:");
                println!("  --mode sentence|header   Segmentation mode (default: sentence)");
                println!("  --abbreviations <file>   JSON object of {{term: abbreviation}}");
                println!("  --redact                 Remove person names first");
                println!("  --text                   Print plain text instead of JSON");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'ednote help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let port = config.port;
    let state = Arc::new(AppState::new(config));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ednote server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
