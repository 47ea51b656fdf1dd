mod cmd;

use clap::Parser;
use cmd::config::{Effective, NormalizeArgs};

#[derive(Parser)]
#[command(name = "quotes-csv", about = "Validate and normalize quote CSV files")]
struct Cli {
    #[command(flatten)]
    args: NormalizeArgs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match cmd::normalize::run(&eff) {
        Ok(summary) if eff.strict && summary.failed > 0 => {
            eprintln!("Error: {} malformed row(s)", summary.failed);
            std::process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
